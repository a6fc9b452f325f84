/// Rendering module
///
/// Pure projections from store state to iced widgets:
/// - Decoded image handles kept in sync with the store (cache.rs)
/// - Profile picture and bio (profile.rs)
/// - Gallery grid (gallery.rs)

pub mod cache;
pub mod gallery;
pub mod profile;

use iced::widget::{button, row, text};
use iced::{Alignment, Element};

use crate::Message;

/// Upload trigger, in-flight count with a cancel control, and the
/// last failure if there was one
pub fn upload_bar(in_flight: usize, status: Option<&str>) -> Element<'_, Message> {
    let mut bar = row![button("Upload image")
        .on_press(Message::PickGalleryImage)
        .padding(10)]
    .spacing(16)
    .align_y(Alignment::Center);

    if in_flight > 0 {
        bar = bar
            .push(text(format!("Reading {} file(s)...", in_flight)).size(14))
            .push(
                button("Cancel")
                    .on_press(Message::CancelUploads)
                    .style(button::secondary),
            );
    }

    if let Some(status) = status {
        bar = bar.push(text(status).size(14));
    }

    bar.into()
}
