use std::collections::HashMap;

use iced::widget::image::Handle;
use tracing::{debug, warn};

use crate::ingest::data_url::{DataUrl, DataUrlError};
use crate::state::{ImageSource, Store, StoreEvent, Subscription};

/// Decoded image handles for everything the store can show.
///
/// Decoding a data URL on every frame would be wasteful, so the cache
/// subscribes to the store and only touches entries that changed.
/// Remote seeds get a handle once their bytes arrive (`insert_fetched`).
/// Sources without a handle (unreachable URLs, undecodable payloads)
/// render as broken images.
#[derive(Debug)]
pub struct ImageCache {
    subscription: Subscription,
    profile: Option<Handle>,
    gallery: HashMap<String, Handle>,
}

impl ImageCache {
    /// Subscribe to the store and decode what it already holds
    pub fn new(store: &mut Store) -> Self {
        let subscription = store.subscribe();
        let profile = store.profile_image().and_then(decode_source);
        let gallery = store
            .gallery()
            .iter()
            .filter_map(|image| decode_source(&image.source).map(|handle| (image.id.clone(), handle)))
            .collect();

        Self {
            subscription,
            profile,
            gallery,
        }
    }

    /// Apply every change the store reported since the last sync
    pub fn sync(&mut self, store: &Store) {
        for event in self.subscription.drain() {
            match event {
                StoreEvent::ProfileImageSet => {
                    self.profile = store.profile_image().and_then(decode_source);
                }
                StoreEvent::ImageAppended { id } => {
                    if let Some(handle) = store.image(&id).and_then(|image| decode_source(&image.source)) {
                        self.gallery.insert(id, handle);
                    }
                }
                StoreEvent::ImageRemoved { id } => {
                    self.gallery.remove(&id);
                }
                StoreEvent::BioSet => {}
            }
        }
    }

    /// Store the downloaded bytes of a remote gallery image.
    ///
    /// Returns false, leaving the tile broken, when the entry is gone or
    /// is not remote, or when the bytes are not a recognised image.
    pub fn insert_fetched(&mut self, store: &Store, id: &str, bytes: Vec<u8>) -> bool {
        let Some(entry) = store.image(id) else {
            debug!(%id, "fetched image was deleted before it arrived");
            return false;
        };
        if !matches!(entry.source, ImageSource::Remote(_)) {
            return false;
        }

        match handle_from_bytes(bytes) {
            Some(handle) => {
                self.gallery.insert(id.to_string(), handle);
                true
            }
            None => {
                warn!(%id, "fetched bytes are not a recognised image format");
                false
            }
        }
    }

    pub fn profile(&self) -> Option<&Handle> {
        self.profile.as_ref()
    }

    pub fn gallery_image(&self, id: &str) -> Option<&Handle> {
        self.gallery.get(id)
    }
}

fn decode_source(source: &ImageSource) -> Option<Handle> {
    let data_url = source.as_inline()?;
    match decode_image(data_url) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(mime = data_url.mime(), "cannot display image: {}", e);
            None
        }
    }
}

fn decode_image(data_url: &DataUrl) -> Result<Handle, DataUrlError> {
    let bytes = data_url.decode()?;
    handle_from_bytes(bytes).ok_or_else(|| {
        debug!(mime = data_url.mime(), "payload is not a recognised image format");
        DataUrlError::Payload("unrecognised image format".to_string())
    })
}

fn handle_from_bytes(bytes: Vec<u8>) -> Option<Handle> {
    image::guess_format(&bytes).ok()?;
    Some(Handle::from_bytes(bytes))
}
