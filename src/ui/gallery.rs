//! Gallery grid
//!
//! Tiles are derived as plain data first (`tiles`) and then turned into
//! widgets (`view`), so what gets shown can be checked without a window.

use iced::alignment::{Horizontal, Vertical};
use iced::widget::image::Handle;
use iced::widget::{button, container, image, stack, text};
use iced::{ContentFit, Element, Length};
use iced_aw::Wrap;

use super::cache::ImageCache;
use crate::state::GalleryImage;
use crate::Message;

/// Edge length of a gallery tile in logical pixels
const TILE_SIZE: f32 = 200.0;
const TILE_SPACING: f32 = 12.0;

/// What a tile shows in place of the image
#[derive(Debug, Clone)]
pub enum Picture {
    Loaded(Handle),
    /// Remote image not fetched (yet or at all), or undecodable payload
    Broken,
}

/// Everything needed to draw one gallery entry
#[derive(Debug, Clone)]
pub struct Tile<'a> {
    /// Not drawn; lets callers check which entry a tile belongs to
    pub id: &'a str,
    pub label: &'a str,
    pub alt_text: &'a str,
    pub picture: Picture,
    /// Message emitted by the delete control; `None` hides the control
    pub on_delete: Option<Message>,
}

/// Derive the tiles for the gallery, in display order
pub fn tiles<'a>(images: &'a [GalleryImage], cache: &ImageCache) -> Vec<Tile<'a>> {
    images
        .iter()
        .map(|entry| Tile {
            id: &entry.id,
            label: &entry.label,
            alt_text: &entry.alt_text,
            picture: cache
                .gallery_image(&entry.id)
                .cloned()
                .map(Picture::Loaded)
                .unwrap_or(Picture::Broken),
            on_delete: entry
                .deletable
                .then(|| Message::DeleteImage(entry.id.clone())),
        })
        .collect()
}

/// Render the gallery as a wrapping grid of tiles
pub fn view<'a>(images: &'a [GalleryImage], cache: &ImageCache) -> Element<'a, Message> {
    if images.is_empty() {
        return text("No images yet. Upload one to get started.").size(16).into();
    }

    let elements: Vec<Element<'a, Message>> = tiles(images, cache).into_iter().map(tile_view).collect();

    Wrap::with_elements(elements)
        .spacing(TILE_SPACING)
        .line_spacing(TILE_SPACING)
        .into()
}

fn tile_view(tile: Tile<'_>) -> Element<'_, Message> {
    let picture: Element<'_, Message> = match tile.picture {
        Picture::Loaded(handle) => image(handle)
            .width(Length::Fixed(TILE_SIZE))
            .height(Length::Fixed(TILE_SIZE))
            .content_fit(ContentFit::Cover)
            .into(),
        // Broken image: fall back to the alt text
        Picture::Broken => container(text(tile.alt_text).size(14))
            .width(Length::Fixed(TILE_SIZE))
            .height(Length::Fixed(TILE_SIZE))
            .center_x(Length::Fixed(TILE_SIZE))
            .center_y(Length::Fixed(TILE_SIZE))
            .style(container::bordered_box)
            .into(),
    };

    let caption = container(container(text(tile.label).size(14)).padding(6).style(container::dark))
        .width(Length::Fixed(TILE_SIZE))
        .height(Length::Fixed(TILE_SIZE))
        .align_x(Horizontal::Left)
        .align_y(Vertical::Bottom);

    let mut layers = stack![picture, caption];

    if let Some(message) = tile.on_delete {
        let delete = container(button(text("✕").size(14)).on_press(message).style(button::danger).padding(4))
            .width(Length::Fixed(TILE_SIZE))
            .height(Length::Fixed(TILE_SIZE))
            .align_x(Horizontal::Right)
            .align_y(Vertical::Top)
            .padding(6);
        layers = layers.push(delete);
    }

    layers.into()
}
