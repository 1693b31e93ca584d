//! EXIF capture-time extraction for photos

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// EXIF tags to try for date extraction, in priority order
const DATE_TAGS: &[Tag] = &[
    Tag::DateTimeOriginal,  // When the original image was taken
    Tag::DateTimeDigitized, // When the image was digitized
    Tag::DateTime,          // File modification date/time
];

/// Extract the capture time from EXIF metadata
///
/// Any failure in here (unreadable container, truncated or garbled tag
/// values) comes back as an `ExifRead` error so callers can fall through
/// to the next date source.
pub fn extract_exif_time(path: &Path) -> Result<NaiveDateTime> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::ExifRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // Try each date tag in priority order, stopping at the first that
    // carries a parseable value
    for tag in DATE_TAGS {
        if let Some(field) = exif.get_field(*tag, In::PRIMARY) {
            if let Some(datetime) = parse_exif_datetime(&field.display_value().to_string()) {
                trace!(?path, ?tag, "Found EXIF date");
                return Ok(datetime);
            }
        }
    }

    Err(Error::ExifRead {
        path: path.to_path_buf(),
        message: "No valid date tag found in EXIF data".to_string(),
    })
}

/// Parse EXIF datetime string format: "YYYY:MM:DD HH:MM:SS"
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');

    // Standard EXIF format
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    // With subseconds
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f") {
        return Some(dt);
    }

    // Alternative formats some writers emit
    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_exif_datetime() {
        let dt = parse_exif_datetime("2022:01:05 14:30:22").unwrap();
        assert_eq!(dt.year(), 2022);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 5);
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 22);

        // With quotes
        let dt = parse_exif_datetime("\"2022:01:05 14:30:22\"").unwrap();
        assert_eq!(dt.year(), 2022);

        // Alternative formats
        let dt = parse_exif_datetime("2022-01-05 14:30:22").unwrap();
        assert_eq!(dt.year(), 2022);

        // Garbage values stay None instead of erroring out
        assert!(parse_exif_datetime("invalid").is_none());
        assert!(parse_exif_datetime("2022:13:05 14:30:22").is_none());
        assert!(parse_exif_datetime("").is_none());
    }

    #[test]
    fn test_truncated_container_is_soft_error() {
        let mut file = NamedTempFile::with_suffix(".jpg").unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x04, 0x45]).unwrap();
        file.flush().unwrap();

        // Must come back as an Err value, never a panic
        assert!(extract_exif_time(file.path()).is_err());
    }

    #[test]
    fn test_zero_byte_file_is_soft_error() {
        let file = NamedTempFile::with_suffix(".jpg").unwrap();
        assert!(extract_exif_time(file.path()).is_err());
    }
}
