/// Image ingestion module
///
/// This module handles:
/// - Reading a picked file and encoding it as a data URL (async)
/// - Downloading remote seed images for display
/// - Building gallery entries from finished uploads
/// - Tracking which uploads are still in flight

pub mod data_url;
pub mod queue;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use rfd::AsyncFileDialog;
use thiserror::Error;
use tracing::info;

use crate::state::{GalleryImage, ImageSource, Store, StoreError};
use data_url::DataUrl;

/// Extensions offered by the file pickers
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "ico", "avif"];

/// Errors produced while reading an upload
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
}

/// Errors produced while downloading a remote image
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },
}

/// Download a remote image. Non-2xx responses count as failures.
pub async fn fetch_remote(url: String) -> Result<Vec<u8>, FetchError> {
    let http_error = |e: reqwest::Error| FetchError::Http {
        url: url.clone(),
        source: Arc::new(e),
    };

    let response = reqwest::get(&url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(http_error)?;
    let bytes = response.bytes().await.map_err(http_error)?;

    info!(%url, bytes = bytes.len(), "fetched remote image");
    Ok(bytes.to_vec())
}

/// Show the native file picker for a single image.
/// Returns `None` when the user cancels.
pub async fn pick_image_file(title: &'static str) -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title(title)
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Read the whole file and encode it as a data URL
pub async fn read_data_url(path: PathBuf) -> Result<DataUrl, IngestError> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| IngestError::Read {
        path: path.clone(),
        source: Arc::new(e),
    })?;

    let data_url = DataUrl::from_file_bytes(&path, &bytes);
    info!(
        path = %path.display(),
        bytes = bytes.len(),
        mime = data_url.mime(),
        encoded = data_url.encoded_len(),
        "read upload"
    );
    Ok(data_url)
}

/// Append a finished upload to the gallery.
///
/// The caption ordinal and the id are both worked out now, against the
/// gallery as it is when the read completes. Returns the new entry's id.
pub fn commit_gallery_upload(store: &mut Store, data_url: DataUrl) -> Result<String, StoreError> {
    let id = store.allocate_id();
    let ordinal = store.next_upload_ordinal();
    let image = GalleryImage::uploaded(id.clone(), data_url, ordinal);

    store.append_gallery_image(image)?;
    info!(%id, ordinal, "gallery upload committed");
    Ok(id)
}

/// Replace the profile picture with a finished upload
pub fn commit_profile_upload(store: &mut Store, data_url: DataUrl) {
    store.set_profile_image(ImageSource::Inline(data_url));
    info!("profile upload committed");
}
