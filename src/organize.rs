//! Organize media folders into dated year/month structures
//!
//! Each immediate subfolder of the source is classified, the operator
//! chooses a disposition (accept/rename/ungroup/skip, or always accept in
//! batch mode), and the folder or its files move under
//! `<dest>/<YYYY>/<MM>/`. Photo-dominant folders land under the photo
//! destination, video-dominant under the video destination.

use crate::config::{Config, MediaKind};
use crate::folder::{self, FolderSummary};
use crate::fsutil::{self, FileFailure};
use crate::interactive::{self, FolderAction};
use crate::time;
use anyhow::bail;
use chrono::{Datelike, NaiveDateTime};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Options for the organize command
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    pub source: PathBuf,
    pub photo_dest: PathBuf,
    pub video_dest: PathBuf,
    pub dry_run: bool,
    pub interactive: bool,
}

/// Destination directory for a timestamp: `<root>/<YYYY>/<MM>/`
pub fn dated_dir(root: &Path, timestamp: &NaiveDateTime) -> PathBuf {
    root.join(timestamp.year().to_string())
        .join(format!("{:02}", timestamp.month()))
}

/// Run the organize command
pub fn run(opts: &OrganizeOptions, config: &Config) -> anyhow::Result<()> {
    if !opts.source.exists() {
        bail!("{} is not accessible", opts.source.display());
    }

    let mut failures: Vec<FileFailure> = Vec::new();
    let mut moved = 0usize;
    let mut skipped = 0usize;

    for entry in fs::read_dir(&opts.source)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if fsutil::is_hidden_name(name) {
            continue;
        }

        let dir = entry.path();
        let summary = match folder::summarize_folder(&dir, config) {
            // Year folders and media-free folders are not offered at all
            Ok(None) => continue,
            Ok(Some(summary)) => summary,
            Err(e) => {
                failures.push(FileFailure::new(&dir, e.to_string()));
                continue;
            }
        };

        let year = summary.taken.timestamp.year();
        let month = summary.taken.timestamp.month();

        let action = if opts.interactive {
            interactive::prompt_folder_action(&summary, year, month)?
        } else {
            FolderAction::Accept
        };

        match action {
            FolderAction::Skip => {
                println!("Skipping {}...", summary.name);
                skipped += 1;
            }
            FolderAction::Ungroup => {
                println!("Ungrouping {}...", summary.name);
                ungroup_folder(&dir, opts, config, &mut failures)?;
            }
            FolderAction::Accept | FolderAction::Rename(_) => {
                let final_name = match &action {
                    FolderAction::Rename(new_name) => new_name.as_str(),
                    _ => summary.name.as_str(),
                };
                let dest_root = dest_root_for(&summary, opts);
                if move_entire_folder(&dir, dest_root, &summary.taken.timestamp, final_name, opts.dry_run)? {
                    moved += 1;
                } else {
                    skipped += 1;
                }
            }
        }
    }

    println!();
    println!("Folders moved: {}", moved);
    println!("Folders skipped: {}", skipped);
    fsutil::report_failures(&failures);

    if opts.dry_run {
        println!(
            "\n{}",
            style("[DRY RUN] Re-run without --dry-run to actually move folders").yellow()
        );
    }
    Ok(())
}

fn dest_root_for<'a>(summary: &FolderSummary, opts: &'a OrganizeOptions) -> &'a Path {
    match summary.dominant {
        MediaKind::Video => &opts.video_dest,
        _ => &opts.photo_dest,
    }
}

/// Move a whole folder under its dated destination
///
/// Returns whether a move happened (or would have, in dry-run). An
/// existing destination is never overwritten.
fn move_entire_folder(
    src: &Path,
    dest_root: &Path,
    timestamp: &NaiveDateTime,
    name: &str,
    dry_run: bool,
) -> anyhow::Result<bool> {
    let dest_dir = dated_dir(dest_root, timestamp);
    let dest_path = dest_dir.join(name);

    if dest_path.exists() {
        println!(
            "  {} Destination already exists: {}",
            style("!").yellow(),
            dest_path.display()
        );
        return Ok(false);
    }

    if dry_run {
        println!(
            "  [DRY RUN] Would move folder: {} -> {}",
            src.display(),
            dest_path.display()
        );
        return Ok(true);
    }

    fs::create_dir_all(&dest_dir)?;
    fsutil::move_dir(src, &dest_path)?;
    info!(src = %src.display(), dest = %dest_path.display(), "Moved folder");
    println!("  --> Moved folder: {} into {}", name, dest_dir.display());
    Ok(true)
}

/// Dissolve a folder, moving each media file by its own resolved date
///
/// Recurses the whole subtree, so nested structures dissolve too. Files
/// of other kinds stay behind, as do collisions with existing
/// destinations.
fn ungroup_folder(
    src: &Path,
    opts: &OrganizeOptions,
    config: &Config,
    failures: &mut Vec<FileFailure>,
) -> anyhow::Result<()> {
    for entry in WalkDir::new(src)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !fsutil::is_hidden_entry(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                failures.push(FileFailure::new(
                    e.path().unwrap_or(Path::new("?")),
                    e.to_string(),
                ));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let dest_root = match config.kind_for(path) {
            MediaKind::Photo => &opts.photo_dest,
            MediaKind::Video => &opts.video_dest,
            MediaKind::Other => {
                debug!(?path, "Leaving non-media file behind");
                continue;
            }
        };

        // Each file travels by its own date, not the folder's
        let taken = match time::resolve(path, config) {
            Ok(taken) => taken,
            Err(e) => {
                failures.push(FileFailure::new(path, e.to_string()));
                continue;
            }
        };

        let dest_dir = dated_dir(dest_root, &taken.timestamp);
        let dest_path = dest_dir.join(entry.file_name());

        if dest_path.exists() {
            println!(
                "  {} File already exists, skipping: {}",
                style("!").yellow(),
                dest_path.display()
            );
            continue;
        }

        if opts.dry_run {
            println!(
                "  [DRY RUN] Would move file: {} -> {}",
                path.display(),
                dest_dir.display()
            );
            continue;
        }

        fs::create_dir_all(&dest_dir)?;
        match fsutil::move_file(path, &dest_path) {
            Ok(()) => {
                info!(src = %path.display(), dest = %dest_path.display(), "Moved file");
                println!("  --> Moved file: {}", entry.file_name().to_string_lossy());
            }
            Err(e) => {
                warn!(src = %path.display(), error = %e, "Could not move file");
                failures.push(FileFailure::new(path, e.to_string()));
            }
        }
    }

    if !opts.dry_run {
        fsutil::remove_empty_dirs(src);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn opts(root: &Path, dry_run: bool) -> OrganizeOptions {
        OrganizeOptions {
            source: root.join("incoming"),
            photo_dest: root.join("photos"),
            video_dest: root.join("videos"),
            dry_run,
            interactive: false,
        }
    }

    fn timestamp(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_dated_dir_layout() {
        let dir = dated_dir(Path::new("/dest"), &timestamp(2022, 1, 5));
        assert_eq!(dir, PathBuf::from("/dest/2022/01"));
    }

    #[test]
    fn test_batch_accept_moves_photo_folder() {
        let root = tempfile::tempdir().unwrap();
        let opts = opts(root.path(), false);
        let trip = opts.source.join("trip");
        fs::create_dir_all(&trip).unwrap();
        fs::write(trip.join("IMG_20220105_143022.jpg"), b"jpg").unwrap();
        fs::write(trip.join("IMG_20220105_143023.jpg"), b"jpg").unwrap();

        let config = Config::default();
        run(&opts, &config).unwrap();

        let moved = opts.photo_dest.join("2022/01/trip");
        assert!(moved.join("IMG_20220105_143022.jpg").exists());
        assert!(!trip.exists());
    }

    #[test]
    fn test_video_dominant_folder_goes_to_video_dest() {
        let root = tempfile::tempdir().unwrap();
        let opts = opts(root.path(), false);
        let clips = opts.source.join("clips");
        fs::create_dir_all(&clips).unwrap();
        fs::write(clips.join("VID_20210720_101010.mp4"), b"mp4").unwrap();
        fs::write(clips.join("VID_20210720_101011.mp4"), b"mp4").unwrap();
        fs::write(clips.join("cover.jpg"), b"jpg").unwrap();

        let config = Config::default();
        run(&opts, &config).unwrap();

        assert!(opts.video_dest.join("2021/07/clips").exists());
        assert!(!opts.photo_dest.join("2021/07/clips").exists());
    }

    #[test]
    fn test_dry_run_moves_nothing() {
        let root = tempfile::tempdir().unwrap();
        let opts = opts(root.path(), true);
        let trip = opts.source.join("trip");
        fs::create_dir_all(&trip).unwrap();
        fs::write(trip.join("IMG_20220105_143022.jpg"), b"jpg").unwrap();

        let config = Config::default();
        run(&opts, &config).unwrap();

        assert!(trip.exists());
        assert!(!opts.photo_dest.exists());
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let root = tempfile::tempdir().unwrap();
        let opts = opts(root.path(), false);
        let trip = opts.source.join("trip");
        fs::create_dir_all(&trip).unwrap();
        fs::write(trip.join("IMG_20220105_143022.jpg"), b"jpg").unwrap();

        let config = Config::default();
        run(&opts, &config).unwrap();

        // The source now holds nothing classifiable, and the dest tree is
        // year-named all the way down; a re-run must move nothing
        run(&opts, &config).unwrap();
        assert!(opts.photo_dest.join("2022/01/trip/IMG_20220105_143022.jpg").exists());
    }

    #[test]
    fn test_existing_destination_is_not_overwritten() {
        let root = tempfile::tempdir().unwrap();
        let opts = opts(root.path(), false);
        let trip = opts.source.join("trip");
        fs::create_dir_all(&trip).unwrap();
        fs::write(trip.join("IMG_20220105_143022.jpg"), b"new").unwrap();

        let occupied = opts.photo_dest.join("2022/01/trip");
        fs::create_dir_all(&occupied).unwrap();
        fs::write(occupied.join("IMG_20220105_143022.jpg"), b"old").unwrap();

        let config = Config::default();
        run(&opts, &config).unwrap();

        // Source stays, destination content untouched
        assert!(trip.exists());
        assert_eq!(
            fs::read(occupied.join("IMG_20220105_143022.jpg")).unwrap(),
            b"old"
        );
    }
}
