//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the store, the ingestion layer and the UI layer.

use std::fmt;

use crate::ingest::data_url::DataUrl;

/// Where the pixels of an image come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Externally hosted image referenced by URL (seed entries)
    Remote(String),
    /// Self-contained payload read from a local file
    Inline(DataUrl),
}

impl ImageSource {
    /// The inline payload, if this source carries one
    pub fn as_inline(&self) -> Option<&DataUrl> {
        match self {
            ImageSource::Inline(data_url) => Some(data_url),
            ImageSource::Remote(_) => None,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Remote(url) => f.write_str(url),
            ImageSource::Inline(data_url) => data_url.fmt(f),
        }
    }
}

/// How an entry entered the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Present at startup
    Seed,
    /// Created by a completed upload
    Upload,
}

/// Represents a single image in the gallery
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    /// Unique key, used for lookup and deletion
    pub id: String,
    /// Displayable content
    pub source: ImageSource,
    /// Accessibility description (e.g., "Uploaded Image 2")
    pub alt_text: String,
    /// Caption shown over the tile (e.g., "Uploaded 2")
    pub label: String,
    /// Whether a delete control is rendered for this entry
    pub deletable: bool,
    /// Seeded at startup or uploaded; only uploads count toward captions
    pub origin: Origin,
}

impl GalleryImage {
    /// Build a gallery entry from a finished upload.
    /// `ordinal` is the 1-based sequence number shown in the caption.
    pub fn uploaded(id: String, data_url: DataUrl, ordinal: usize) -> Self {
        Self {
            id,
            source: ImageSource::Inline(data_url),
            alt_text: format!("Uploaded Image {}", ordinal),
            label: format!("Uploaded {}", ordinal),
            deletable: true,
            origin: Origin::Upload,
        }
    }

    /// True for entries a user uploaded and may still delete
    pub fn counts_toward_ordinal(&self) -> bool {
        self.deletable && self.origin == Origin::Upload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_entry_labels() {
        let url = DataUrl::encode("image/png", b"png");
        let image = GalleryImage::uploaded("7".to_string(), url, 2);

        assert_eq!(image.label, "Uploaded 2");
        assert_eq!(image.alt_text, "Uploaded Image 2");
        assert!(image.deletable);
        assert!(image.counts_toward_ordinal());
    }

    #[test]
    fn test_source_display() {
        let remote = ImageSource::Remote("https://example.com/a.jpg".to_string());
        assert_eq!(remote.to_string(), "https://example.com/a.jpg");
        assert!(remote.as_inline().is_none());

        let inline = ImageSource::Inline(DataUrl::encode("image/gif", b"GIF89a"));
        assert_eq!(inline.to_string(), "data:image/gif;base64,R0lGODlh");
    }
}
