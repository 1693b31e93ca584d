//! Capture-time resolution
//!
//! This module decides when a media file was "really" taken, using an
//! ordered fallback chain:
//! - EXIF metadata (photos only)
//! - Filename patterns
//! - File system modification time

pub mod exif;
pub mod filename;

use crate::config::{Config, MediaKind};
use crate::error::Result;
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Source of a resolved timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Extracted from EXIF metadata
    Exif,
    /// Parsed from the filename
    Filename,
    /// From file system modification time
    FileSystem,
}

/// Result of capture-time resolution
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTime {
    /// The resolved timestamp
    pub timestamp: NaiveDateTime,
    /// Where it came from
    pub source: TimeSource,
}

/// Extract a recorded capture time, without the mtime fallback
///
/// "Recorded" means the date was written down somewhere on purpose: EXIF
/// metadata for photos, or a timestamped filename for anything. Returns
/// `None` when the file carries neither. Malformed EXIF payloads are
/// swallowed here; they are indistinguishable from absent metadata as far
/// as callers are concerned.
pub fn recorded_time(path: &Path, config: &Config) -> Option<ResolvedTime> {
    if config.kind_for(path) == MediaKind::Photo {
        match exif::extract_exif_time(path) {
            Ok(timestamp) => {
                debug!(?path, "Resolved time from EXIF");
                return Some(ResolvedTime {
                    timestamp,
                    source: TimeSource::Exif,
                });
            }
            Err(e) => debug!(?path, error = %e, "No usable EXIF time"),
        }
    }

    if let Some(name) = path.file_name().and_then(|f| f.to_str()) {
        if let Some(timestamp) = filename::parse_filename_time(name) {
            debug!(?path, "Resolved time from filename");
            return Some(ResolvedTime {
                timestamp,
                source: TimeSource::Filename,
            });
        }
    }

    None
}

/// Resolve the capture time of a media file
///
/// Tries the recorded sources first and falls back to the file system
/// modification time, so every statable file resolves to something. The
/// only error path is the stat itself.
pub fn resolve(path: &Path, config: &Config) -> Result<ResolvedTime> {
    if let Some(found) = recorded_time(path, config) {
        return Ok(found);
    }

    let metadata = fs::metadata(path)?;
    let modified = metadata.modified()?;
    let datetime: chrono::DateTime<chrono::Utc> = modified.into();

    debug!(?path, "Falling back to file system modification time");

    Ok(ResolvedTime {
        timestamp: datetime.naive_utc(),
        source: TimeSource::FileSystem,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_patterned_filename_beats_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IMG_20220105_143022.mp4");
        std::fs::write(&path, b"not a real video").unwrap();

        let config = Config::default();
        let resolved = resolve(&path, &config).unwrap();
        assert_eq!(resolved.source, TimeSource::Filename);
        assert_eq!(
            resolved.timestamp.date(),
            chrono::NaiveDate::from_ymd_opt(2022, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_garbage_photo_falls_back_to_mtime() {
        // A photo with corrupt bytes and a patternless name still resolves
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holiday.jpg");
        std::fs::write(&path, &[0x00, 0x01, 0xFF, 0xD8, 0x13, 0x37]).unwrap();

        let config = Config::default();
        let resolved = resolve(&path, &config).unwrap();
        assert_eq!(resolved.source, TimeSource::FileSystem);
    }

    #[test]
    fn test_zero_byte_file_resolves() {
        let file = NamedTempFile::with_suffix(".jpg").unwrap();
        let config = Config::default();
        let resolved = resolve(file.path(), &config).unwrap();
        assert_eq!(resolved.source, TimeSource::FileSystem);
    }

    #[test]
    fn test_recorded_time_is_none_without_pattern_or_exif() {
        let mut file = NamedTempFile::with_suffix(".mov").unwrap();
        file.write_all(b"mov data").unwrap();
        file.flush().unwrap();

        let config = Config::default();
        assert!(recorded_time(file.path(), &config).is_none());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let config = Config::default();
        assert!(resolve(Path::new("/nonexistent/file.jpg"), &config).is_err());
    }
}
