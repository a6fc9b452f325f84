use iced::alignment::{Horizontal, Vertical};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, stack, text, text_input};
use iced::{ContentFit, Element, Length};

use crate::Message;

const AVATAR_SIZE: f32 = 160.0;

/// Profile picture with the "change photo" trigger on top
pub fn avatar(handle: Option<&Handle>) -> Element<'_, Message> {
    let picture: Element<'_, Message> = match handle {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(AVATAR_SIZE))
            .height(Length::Fixed(AVATAR_SIZE))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("👤").size(72))
            .center_x(Length::Fixed(AVATAR_SIZE))
            .center_y(Length::Fixed(AVATAR_SIZE))
            .style(container::rounded_box)
            .into(),
    };

    let trigger = container(
        button(text("Change photo").size(12))
            .on_press(Message::PickProfileImage)
            .padding(4),
    )
    .width(Length::Fixed(AVATAR_SIZE))
    .height(Length::Fixed(AVATAR_SIZE))
    .align_x(Horizontal::Right)
    .align_y(Vertical::Bottom)
    .padding(4);

    stack![picture, trigger].into()
}

/// Editable bio, one message per keystroke
pub fn bio(bio: &str) -> Element<'_, Message> {
    column![
        text("Bio").size(14),
        text_input("Tell people about yourself", bio)
            .on_input(Message::BioChanged)
            .padding(8)
            .width(Length::Fixed(420.0)),
    ]
    .spacing(6)
    .into()
}
