//! Startup configuration.
//!
//! Settings live in a JSON file at
//! `$XDG_CONFIG_HOME/profile-gallery/config.json` (or the platform
//! equivalent). Every field is optional; a missing file means defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::ingest::data_url::DataUrl;
use crate::state::{GalleryImage, ImageSource, Origin};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Light or dark window theme
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

/// One gallery entry present at startup.
/// `url` may also be a base64 data URL, which is shown without a fetch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeedImage {
    pub url: String,
    pub label: String,
    pub alt_text: String,
}

impl SeedImage {
    fn source(&self) -> ImageSource {
        match DataUrl::parse(&self.url) {
            Ok(data_url) => ImageSource::Inline(data_url),
            Err(_) => ImageSource::Remote(self.url.clone()),
        }
    }
}

/// All startup settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Window title
    pub title: String,
    /// Bio text shown before the user edits it
    pub default_bio: String,
    /// Remote images the gallery starts with
    pub seed_images: Vec<SeedImage>,
    pub theme: ThemeChoice,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Profile Gallery".to_string(),
            default_bio: "Photographer, traveller and coffee enthusiast.".to_string(),
            seed_images: (1..=3)
                .map(|n| SeedImage {
                    url: format!("https://picsum.photos/seed/gallery{}/400/400", n),
                    label: format!("IMG {}", n),
                    alt_text: format!("Gallery Image {}", n),
                })
                .collect(),
            theme: ThemeChoice::default(),
        }
    }
}

impl AppConfig {
    /// Where the config file is looked up
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("profile-gallery").join("config.json"))
    }

    /// Load from the default location, falling back to defaults
    /// when there is no config directory or no file.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Seed entries for the gallery, numbered from 1 in file order
    pub fn seed_gallery(&self) -> Vec<GalleryImage> {
        self.seed_images
            .iter()
            .enumerate()
            .map(|(index, seed)| GalleryImage {
                id: (index + 1).to_string(),
                source: seed.source(),
                alt_text: seed.alt_text.clone(),
                label: seed.label.clone(),
                deletable: true,
                origin: Origin::Seed,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seeds() {
        let seeds = AppConfig::default().seed_gallery();
        let labels: Vec<_> = seeds.iter().map(|image| image.label.as_str()).collect();
        let ids: Vec<_> = seeds.iter().map(|image| image.id.as_str()).collect();

        assert_eq!(labels, vec!["IMG 1", "IMG 2", "IMG 3"]);
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(seeds.iter().all(|image| image.deletable));
        assert!(seeds.iter().all(|image| matches!(image.source, ImageSource::Remote(_))));
    }

    #[test]
    fn test_inline_seed_url() {
        let config = AppConfig {
            seed_images: vec![SeedImage {
                url: "data:image/gif;base64,R0lGODlh".to_string(),
                label: "Logo".to_string(),
                alt_text: "Logo".to_string(),
            }],
            ..AppConfig::default()
        };

        let seeds = config.seed_gallery();
        assert_eq!(seeds[0].source, ImageSource::Inline(DataUrl::encode("image/gif", b"GIF89a")));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_bio": "Hi!", "theme": "light" }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_bio, "Hi!");
        assert_eq!(config.theme, ThemeChoice::Light);
        assert_eq!(config.seed_images, AppConfig::default().seed_images);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
