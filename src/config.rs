//! Configuration types for the media janitor

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Kind of a media file, derived purely from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Photo files (jpg, heic, raw formats, etc.)
    Photo,
    /// Video files (mp4, mov, etc.)
    Video,
    /// Everything else
    Other,
}

impl MediaKind {
    /// True for photos and videos, false for everything else
    pub fn is_media(self) -> bool {
        !matches!(self, MediaKind::Other)
    }

    /// Human-readable label used in reports
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Other => "other",
        }
    }
}

/// Configuration for the media janitor
///
/// Holds the extension sets that drive file classification. Constructed
/// once at startup and passed by reference to every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Supported photo extensions (lowercase, without leading dot)
    pub photo_extensions: Vec<String>,

    /// Supported video extensions (lowercase, without leading dot)
    pub video_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            photo_extensions: vec![
                "jpg".into(),
                "jpeg".into(),
                "png".into(),
                "heic".into(),
                "tif".into(),
                "tiff".into(),
                "nef".into(),
                "cr2".into(),
                "arw".into(),
            ],
            video_extensions: vec![
                "mp4".into(),
                "mov".into(),
                "avi".into(),
                "mkv".into(),
                "mts".into(),
            ],
        }
    }
}

impl Config {
    /// Check if a file extension is a supported photo format
    pub fn is_photo(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.photo_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Check if a file extension is a supported video format
    pub fn is_video(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.video_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Classify a path by its lowercased extension
    ///
    /// Pure function of the extension; files without one are `Other`.
    pub fn kind_for(&self, path: &Path) -> MediaKind {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if self.is_photo(ext) {
            MediaKind::Photo
        } else if self.is_video(ext) {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# media-janitor configuration file
# This file uses TOML format (https://toml.io)

# Extensions classified as photos (lowercase, no dot)
photo_extensions = ["jpg", "jpeg", "png", "heic", "tif", "tiff", "nef", "cr2", "arw"]

# Extensions classified as videos (lowercase, no dot)
video_extensions = ["mp4", "mov", "avi", "mkv", "mts"]
"#
        .to_string()
    }
}
