//! Data URLs: a file's bytes and MIME type packed into one string
//!
//! Uploaded images have no server to live on, so the encoded string is both
//! how they are stored and what the UI decodes to display them.

use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use thiserror::Error;

/// Fallback MIME type when neither the bytes nor the extension tell us
const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUrlError {
    #[error("not a data URL (missing \"data:\" prefix)")]
    MissingScheme,
    #[error("data URL has no ',' separating header and payload")]
    MissingSeparator,
    #[error("only base64 data URLs are supported")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Payload(String),
}

/// A base64 data URL (`data:<mime>;base64,<payload>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime: String,
    payload: String,
}

impl DataUrl {
    /// Encode raw bytes under the given MIME type
    pub fn encode(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// Encode a file's contents, sniffing the MIME type from the bytes
    /// first and the file name second.
    pub fn from_file_bytes(path: &Path, bytes: &[u8]) -> Self {
        Self::encode(sniff_mime(path, bytes), bytes)
    }

    /// Parse the string form back into a DataUrl
    pub fn parse(input: &str) -> Result<Self, DataUrlError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(DataUrlError::MissingSeparator)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(DataUrlError::NotBase64)?;

        Ok(Self {
            mime: if mime.is_empty() { OCTET_STREAM.to_string() } else { mime.to_string() },
            payload: payload.to_string(),
        })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Size of the string form in bytes
    pub fn encoded_len(&self) -> usize {
        "data:".len() + self.mime.len() + ";base64,".len() + self.payload.len()
    }

    /// Decode the payload back to the original bytes
    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        STANDARD
            .decode(self.payload.as_bytes())
            .map_err(|e| DataUrlError::Payload(e.to_string()))
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}

/// Work out the MIME type of an uploaded file
fn sniff_mime(path: &Path, bytes: &[u8]) -> &'static str {
    // Magic bytes are more trustworthy than the extension
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }

    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(OCTET_STREAM)
}
