//! Per-folder media census
//!
//! Decides, for one folder, whether it is photo- or video-dominant and
//! which date represents it. Only immediate file children count here;
//! recursing into subfolders is the organize command's business.

use crate::config::{Config, MediaKind};
use crate::error::Result;
use crate::fsutil::is_hidden_name;
use crate::time::{self, ResolvedTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Census of a single folder's immediate file children
#[derive(Debug, Clone)]
pub struct FolderSummary {
    /// The folder itself
    pub path: PathBuf,
    /// Its basename
    pub name: String,
    /// Photo file count
    pub photos: usize,
    /// Video file count
    pub videos: usize,
    /// Everything-else count
    pub others: usize,
    /// Majority media kind; a photo/video tie goes to Photo
    pub dominant: MediaKind,
    /// Representative date: the first resolvable date among the
    /// dominant kind's files, in directory-listing order
    pub taken: ResolvedTime,
}

impl FolderSummary {
    /// Total number of media files in the folder
    pub fn media_count(&self) -> usize {
        self.photos + self.videos
    }
}

/// Check whether a folder name is a bare 4-digit year
///
/// Year-named folders are the output shape of organize; they are treated
/// as already organized and never classified again.
pub fn is_year_folder(name: &str) -> bool {
    name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit())
}

/// Summarize one folder's immediate file children
///
/// Returns `Ok(None)` for folders that are not up for organization:
/// year-named folders and folders without a single media file. Hidden
/// files are invisible.
pub fn summarize_folder(dir: &Path, config: &Config) -> Result<Option<FolderSummary>> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    if is_year_folder(&name) {
        debug!(?dir, "Skipping year-named folder");
        return Ok(None);
    }

    let mut photos = 0usize;
    let mut videos = 0usize;
    let mut others = 0usize;
    let mut files: Vec<(PathBuf, MediaKind)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if is_hidden_name(file_name) {
            continue;
        }

        let path = entry.path();
        let kind = config.kind_for(&path);
        match kind {
            MediaKind::Photo => photos += 1,
            MediaKind::Video => videos += 1,
            MediaKind::Other => others += 1,
        }
        files.push((path, kind));
    }

    if photos + videos == 0 {
        debug!(?dir, "No media files, folder not classified");
        return Ok(None);
    }

    let dominant = if photos >= videos {
        MediaKind::Photo
    } else {
        MediaKind::Video
    };

    // First dominant-kind file whose date resolves wins
    let taken = files
        .iter()
        .filter(|(_, kind)| *kind == dominant)
        .find_map(|(path, _)| time::resolve(path, config).ok());

    let Some(taken) = taken else {
        warn!(?dir, "No dominant-kind file would resolve a date, skipping folder");
        return Ok(None);
    };

    Ok(Some(FolderSummary {
        path: dir.to_path_buf(),
        name,
        photos,
        videos,
        others,
        dominant,
        taken,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_photo_majority_is_photo_dominant() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "c.jpg");
        touch(dir.path(), "d.mp4");

        let config = Config::default();
        let summary = summarize_folder(dir.path(), &config).unwrap().unwrap();
        assert_eq!(summary.photos, 3);
        assert_eq!(summary.videos, 1);
        assert_eq!(summary.dominant, MediaKind::Photo);
    }

    #[test]
    fn test_tie_goes_to_photo() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "c.mp4");
        touch(dir.path(), "d.mov");

        let config = Config::default();
        let summary = summarize_folder(dir.path(), &config).unwrap().unwrap();
        assert_eq!(summary.dominant, MediaKind::Photo);
    }

    #[test]
    fn test_video_majority_is_video_dominant() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "b.mp4");
        touch(dir.path(), "c.mov");

        let config = Config::default();
        let summary = summarize_folder(dir.path(), &config).unwrap().unwrap();
        assert_eq!(summary.dominant, MediaKind::Video);
    }

    #[test]
    fn test_year_folder_is_excluded() {
        let parent = tempfile::tempdir().unwrap();
        let dir = parent.path().join("2019");
        fs::create_dir(&dir).unwrap();
        touch(&dir, "a.jpg");

        let config = Config::default();
        assert!(summarize_folder(&dir, &config).unwrap().is_none());
        assert!(is_year_folder("2019"));
        assert!(!is_year_folder("2019-trip"));
        assert!(!is_year_folder("201"));
    }

    #[test]
    fn test_folder_without_media_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "list.pdf");

        let config = Config::default();
        assert!(summarize_folder(dir.path(), &config).unwrap().is_none());
    }

    #[test]
    fn test_hidden_files_are_invisible() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".hidden.jpg");
        touch(dir.path(), ".DS_Store");

        let config = Config::default();
        assert!(summarize_folder(dir.path(), &config).unwrap().is_none());
    }

    #[test]
    fn test_representative_date_from_filename_pattern() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "IMG_20220105_143022.jpg");

        let config = Config::default();
        let summary = summarize_folder(dir.path(), &config).unwrap().unwrap();
        assert_eq!(
            summary.taken.timestamp.date(),
            chrono::NaiveDate::from_ymd_opt(2022, 1, 5).unwrap()
        );
    }
}
