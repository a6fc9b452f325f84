/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The store and its change notifications (store.rs)
/// - Gallery id allocation (ids.rs)

pub mod data;
pub mod ids;
pub mod store;

pub use data::{GalleryImage, ImageSource, Origin};
pub use store::{Store, StoreError, StoreEvent, Subscription};
