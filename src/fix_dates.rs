//! Rewrite file modification times from recorded dates
//!
//! When EXIF metadata or a timestamped filename disagrees with a file's
//! mtime, the recorded date wins and the mtime is rewritten. Files with
//! no recorded date are left alone (the mtime is all they have).

use crate::config::Config;
use crate::fsutil::{self, FileFailure};
use crate::time;
use anyhow::bail;
use chrono::NaiveDateTime;
use console::style;
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Mismatch tolerance; below this the mtime already agrees
const TOLERANCE_SECONDS: i64 = 1;

/// Set a file's access and modification times to a timestamp
///
/// Timestamps are interpreted as UTC, matching how resolution reads
/// mtimes back, so a fixed file stays fixed on the next run.
pub fn stamp_file(path: &Path, timestamp: &NaiveDateTime) -> crate::error::Result<()> {
    let file_time = FileTime::from_unix_time(timestamp.and_utc().timestamp(), 0);
    filetime::set_file_times(path, file_time, file_time)?;
    Ok(())
}

/// Current mtime of a file as a naive UTC timestamp
pub fn current_mtime(path: &Path) -> crate::error::Result<NaiveDateTime> {
    let modified = fs::metadata(path)?.modified()?;
    let datetime: chrono::DateTime<chrono::Utc> = modified.into();
    Ok(datetime.naive_utc())
}

/// Run the fix-dates command
pub fn run(root: &Path, execute: bool, config: &Config) -> anyhow::Result<()> {
    if !root.exists() {
        bail!("{} is not accessible", root.display());
    }

    println!("Scanning {} for files with fixable dates...\n", root.display());

    let mut fixed = 0usize;
    let mut skipped = 0usize;
    let mut failures: Vec<FileFailure> = Vec::new();

    for entry in WalkDir::new(root)
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
        if !config.kind_for(path).is_media() {
            continue;
        }

        // No recorded date means nothing to fix against
        let Some(recorded) = time::recorded_time(path, config) else {
            skipped += 1;
            continue;
        };

        let mtime = match current_mtime(path) {
            Ok(mtime) => mtime,
            Err(e) => {
                failures.push(FileFailure::new(path, e.to_string()));
                continue;
            }
        };

        let drift = (recorded.timestamp - mtime).num_seconds().abs();
        if drift < TOLERANCE_SECONDS {
            continue;
        }

        if !execute {
            println!("[DRY RUN] {}", file_label(path));
            println!("  Current: {}", mtime.format("%Y-%m-%d %H:%M:%S"));
            println!("  Correct: {}", recorded.timestamp.format("%Y-%m-%d %H:%M:%S"));
            fixed += 1;
            continue;
        }

        match stamp_file(path, &recorded.timestamp) {
            Ok(()) => {
                info!(path = %path.display(), source = ?recorded.source, "Fixed mtime");
                println!(
                    "Fixed: {}  {} -> {}",
                    file_label(path),
                    mtime.format("%Y-%m-%d %H:%M:%S"),
                    recorded.timestamp.format("%Y-%m-%d %H:%M:%S")
                );
                fixed += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not fix mtime");
                failures.push(FileFailure::new(path, e.to_string()));
            }
        }
    }

    println!("\nFiles fixed: {}", fixed);
    println!("Files skipped (no recorded date): {}", skipped);
    fsutil::report_failures(&failures);

    if !execute && fixed > 0 {
        println!(
            "\n{}",
            style("[DRY RUN] Re-run with --execute to actually fix dates").yellow()
        );
    }
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn test_stamp_round_trips_through_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        fs::write(&path, b"mp4").unwrap();

        let target = NaiveDate::from_ymd_opt(2019, 3, 9)
            .unwrap()
            .and_hms_opt(8, 45, 30)
            .unwrap();
        stamp_file(&path, &target).unwrap();

        assert_eq!(current_mtime(&path).unwrap(), target);
    }

    #[test]
    fn test_patterned_file_gets_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VID_20220105_143022.mp4");
        fs::write(&path, b"mp4").unwrap();

        let config = Config::default();
        run(dir.path(), true, &config).unwrap();

        let expected = NaiveDate::from_ymd_opt(2022, 1, 5)
            .unwrap()
            .and_hms_opt(14, 30, 22)
            .unwrap();
        assert_eq!(current_mtime(&path).unwrap(), expected);
    }

    #[test]
    fn test_fix_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VID_20220105_143022.mp4");
        fs::write(&path, b"mp4").unwrap();

        let config = Config::default();
        run(dir.path(), true, &config).unwrap();
        let first = current_mtime(&path).unwrap();

        // Second pass finds nothing drifted
        run(dir.path(), true, &config).unwrap();
        assert_eq!(current_mtime(&path).unwrap(), first);
    }

    #[test]
    fn test_patternless_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holiday.mp4");
        fs::write(&path, b"mp4").unwrap();
        let before = current_mtime(&path).unwrap();

        let config = Config::default();
        run(dir.path(), true, &config).unwrap();

        assert_eq!(current_mtime(&path).unwrap(), before);
    }
}
