use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use super::data::{GalleryImage, ImageSource};
use super::ids::IdAllocator;

/// Errors raised by store mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("gallery already contains an image with id {0}")]
    DuplicateId(String),
}

/// Notification sent to subscribers after every successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ProfileImageSet,
    BioSet,
    ImageAppended { id: String },
    ImageRemoved { id: String },
}

/// Receiving end of a store subscription.
/// Dropping it unsubscribes on the next notification.
#[derive(Debug)]
pub struct Subscription {
    receiver: UnboundedReceiver<StoreEvent>,
}

impl Subscription {
    /// Take every event delivered since the last call, oldest first
    pub fn drain(&mut self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

/// The Store is the single source of truth for the profile page.
/// It holds the profile picture, the bio and the ordered gallery.
///
/// Every mutation goes through one of the methods below so that
/// id uniqueness and append-only ordering are enforced in one place.
pub struct Store {
    profile_image: Option<ImageSource>,
    bio: String,
    gallery: Vec<GalleryImage>,
    ids: IdAllocator,
    subscribers: Vec<UnboundedSender<StoreEvent>>,
}

impl Store {
    /// Create a store with the given bio and seed gallery.
    ///
    /// Seed entries with a repeated id are dropped (first one wins)
    /// so the uniqueness invariant holds from the start.
    pub fn new(bio: impl Into<String>, seed: Vec<GalleryImage>) -> Self {
        let mut gallery: Vec<GalleryImage> = Vec::with_capacity(seed.len());
        for image in seed {
            if gallery.iter().any(|existing| existing.id == image.id) {
                debug!(id = %image.id, "dropping duplicate seed image");
                continue;
            }
            gallery.push(image);
        }

        let ids = IdAllocator::after(gallery.iter().map(|image| image.id.as_str()));

        Self {
            profile_image: None,
            bio: bio.into(),
            gallery,
            ids,
            subscribers: Vec::new(),
        }
    }

    // ========== Reads ==========

    pub fn profile_image(&self) -> Option<&ImageSource> {
        self.profile_image.as_ref()
    }

    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Gallery entries in display order
    pub fn gallery(&self) -> &[GalleryImage] {
        &self.gallery
    }

    /// Look up a gallery entry by id
    pub fn image(&self, id: &str) -> Option<&GalleryImage> {
        self.gallery.iter().find(|image| image.id == id)
    }

    // ========== Mutations ==========

    /// Replace the profile picture
    pub fn set_profile_image(&mut self, source: ImageSource) {
        self.profile_image = Some(source);
        debug!("profile image replaced");
        self.notify(StoreEvent::ProfileImageSet);
    }

    /// Replace the bio text (no validation, empty is fine)
    pub fn set_bio_text(&mut self, text: impl Into<String>) {
        self.bio = text.into();
        debug!(len = self.bio.len(), "bio updated");
        self.notify(StoreEvent::BioSet);
    }

    /// Append an image to the end of the gallery.
    /// An id already present is rejected and the gallery is left as is.
    pub fn append_gallery_image(&mut self, image: GalleryImage) -> Result<(), StoreError> {
        if self.image(&image.id).is_some() {
            return Err(StoreError::DuplicateId(image.id));
        }

        self.ids.reserve(&image.id);
        let id = image.id.clone();
        self.gallery.push(image);
        debug!(%id, count = self.gallery.len(), "gallery image appended");
        self.notify(StoreEvent::ImageAppended { id });
        Ok(())
    }

    /// Remove the image with this id, returning it.
    /// Unknown ids are a no-op.
    pub fn remove_gallery_image(&mut self, id: &str) -> Option<GalleryImage> {
        let index = self.gallery.iter().position(|image| image.id == id)?;
        let removed = self.gallery.remove(index);
        debug!(%id, count = self.gallery.len(), "gallery image removed");
        self.notify(StoreEvent::ImageRemoved { id: removed.id.clone() });
        Some(removed)
    }

    /// Next unused gallery id
    pub fn allocate_id(&mut self) -> String {
        self.ids.allocate()
    }

    /// 1-based ordinal for the next uploaded image caption.
    /// Only entries a user uploaded (and could delete) are counted.
    pub fn next_upload_ordinal(&self) -> usize {
        self.gallery
            .iter()
            .filter(|image| image.counts_toward_ordinal())
            .count()
            + 1
    }

    // ========== Subscriptions ==========

    /// Subscribe to change notifications
    pub fn subscribe(&mut self) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.push(sender);
        Subscription { receiver }
    }

    fn notify(&mut self, event: StoreEvent) {
        // Closed channels belong to dropped subscriptions
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("has_profile_image", &self.profile_image.is_some())
            .field("bio", &self.bio)
            .field("gallery_len", &self.gallery.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::data_url::DataUrl;
    use crate::state::data::Origin;

    fn seed(id: &str) -> GalleryImage {
        GalleryImage {
            id: id.to_string(),
            source: ImageSource::Remote(format!("https://example.com/{}.jpg", id)),
            alt_text: format!("Gallery Image {}", id),
            label: format!("IMG {}", id),
            deletable: true,
            origin: Origin::Seed,
        }
    }

    fn uploaded(store: &mut Store) -> GalleryImage {
        let id = store.allocate_id();
        let ordinal = store.next_upload_ordinal();
        GalleryImage::uploaded(id, DataUrl::encode("image/png", b"png"), ordinal)
    }

    fn ids(store: &Store) -> Vec<&str> {
        store.gallery().iter().map(|image| image.id.as_str()).collect()
    }

    #[test]
    fn test_append_keeps_call_order() {
        let mut store = Store::new("", Vec::new());
        for id in ["a", "b", "c", "d"] {
            store.append_gallery_image(seed(id)).unwrap();
        }
        assert_eq!(ids(&store), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_append_rejects_duplicate() {
        let mut store = Store::new("", vec![seed("1")]);
        let err = store.append_gallery_image(seed("1")).unwrap_err();

        assert_eq!(err, StoreError::DuplicateId("1".to_string()));
        assert_eq!(store.gallery().len(), 1);
    }

    #[test]
    fn test_duplicate_seeds_are_dropped() {
        let store = Store::new("", vec![seed("1"), seed("1"), seed("2")]);
        assert_eq!(ids(&store), vec!["1", "2"]);
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut store = Store::new("", vec![seed("1"), seed("2"), seed("3"), seed("4")]);
        let removed = store.remove_gallery_image("2").unwrap();

        assert_eq!(removed.id, "2");
        assert_eq!(ids(&store), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = Store::new("", vec![seed("1"), seed("2")]);
        let before = store.gallery().to_vec();

        assert!(store.remove_gallery_image("99").is_none());
        assert!(store.remove_gallery_image("99").is_none());
        assert_eq!(store.gallery(), before.as_slice());
    }

    #[test]
    fn test_bio_idempotent() {
        let mut once = Store::new("hi", Vec::new());
        once.set_bio_text("hello there");

        let mut twice = Store::new("hi", Vec::new());
        twice.set_bio_text("hello there");
        twice.set_bio_text("hello there");

        assert_eq!(once.bio(), twice.bio());
    }

    #[test]
    fn test_bio_accepts_empty() {
        let mut store = Store::new("hi", Vec::new());
        store.set_bio_text("");
        assert_eq!(store.bio(), "");
    }

    #[test]
    fn test_profile_image_replaces() {
        let mut store = Store::new("", Vec::new());
        assert!(store.profile_image().is_none());

        let first = ImageSource::Inline(DataUrl::encode("image/png", b"first"));
        let second = ImageSource::Inline(DataUrl::encode("image/png", b"second"));
        store.set_profile_image(first);
        store.set_profile_image(second.clone());

        assert_eq!(store.profile_image(), Some(&second));
    }

    #[test]
    fn test_ordinal_counts_uploaded_entries() {
        let mut store = Store::new("", Vec::new());
        for n in 1..=4 {
            assert_eq!(store.next_upload_ordinal(), n);
            let image = uploaded(&mut store);
            store.append_gallery_image(image).unwrap();
        }

        let last = store.gallery().last().unwrap();
        assert_eq!(last.label, "Uploaded 4");
        assert_eq!(store.next_upload_ordinal(), 5);
    }

    #[test]
    fn test_ordinal_ignores_seeds() {
        let mut store = Store::new("", vec![seed("1"), seed("2"), seed("3")]);
        assert_eq!(store.next_upload_ordinal(), 1);

        let image = uploaded(&mut store);
        assert_eq!(image.id, "4");
        assert_eq!(image.label, "Uploaded 1");
    }

    #[test]
    fn test_ordinal_drops_after_delete() {
        let mut store = Store::new("", Vec::new());
        for _ in 0..2 {
            let image = uploaded(&mut store);
            store.append_gallery_image(image).unwrap();
        }
        store.remove_gallery_image("1");

        assert_eq!(store.next_upload_ordinal(), 2);
        // Ids keep counting even though the caption ordinal went back
        assert_eq!(store.allocate_id(), "3");
    }

    #[test]
    fn test_allocated_ids_skip_appended_ids() {
        let mut store = Store::new("", Vec::new());
        store.append_gallery_image(seed("8")).unwrap();
        assert_eq!(store.allocate_id(), "9");
    }

    #[test]
    fn test_subscribers_see_every_mutation() {
        let mut store = Store::new("", vec![seed("1")]);
        let mut subscription = store.subscribe();

        store.set_bio_text("bio");
        store.append_gallery_image(seed("2")).unwrap();
        store.remove_gallery_image("1");
        store.remove_gallery_image("1");
        let _ = store.append_gallery_image(seed("2"));
        store.set_profile_image(ImageSource::Remote("https://example.com/me.jpg".into()));

        assert_eq!(
            subscription.drain(),
            vec![
                StoreEvent::BioSet,
                StoreEvent::ImageAppended { id: "2".to_string() },
                StoreEvent::ImageRemoved { id: "1".to_string() },
                StoreEvent::ProfileImageSet,
            ]
        );
        assert!(subscription.drain().is_empty());
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let mut store = Store::new("", Vec::new());
        let dropped = store.subscribe();
        let mut kept = store.subscribe();
        drop(dropped);

        store.set_bio_text("x");

        assert_eq!(store.subscribers.len(), 1);
        assert_eq!(kept.drain(), vec![StoreEvent::BioSet]);
    }
}
