//! Stamp an operator-supplied date onto media files
//!
//! Accepts partial date strings; missing components default to the middle
//! of the parent period so a "2020" stamp sorts into the middle of 2020
//! rather than new year's midnight.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fix_dates::{current_mtime, stamp_file};
use crate::fsutil::{self, FileFailure};
use anyhow::bail;
use chrono::{NaiveDate, NaiveDateTime};
use console::style;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

lazy_static! {
    static ref RE_FULL: Regex =
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})\s+(\d{2}):(\d{2}):(\d{2})$").unwrap();
    static ref RE_MINUTE: Regex =
        Regex::new(r"^(\d{4})-(\d{2})-(\d{2})\s+(\d{2}):(\d{2})$").unwrap();
    static ref RE_DAY: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
    static ref RE_MONTH: Regex = Regex::new(r"^(\d{4})-(\d{2})$").unwrap();
    static ref RE_YEAR: Regex = Regex::new(r"^(\d{4})$").unwrap();
}

/// Parse a flexible date string
///
/// Supported shapes: YYYY, YYYY-MM, YYYY-MM-DD, YYYY-MM-DD HH:MM and
/// YYYY-MM-DD HH:MM:SS. Missing components default to the middle of the
/// parent period: July 1st for a bare year, the 15th for a bare month,
/// noon for a bare day.
pub fn parse_date_string(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();

    let parts: Option<(i32, u32, u32, u32, u32, u32)> = if let Some(c) = RE_FULL.captures(input) {
        Some((num(&c, 1)?, num(&c, 2)?, num(&c, 3)?, num(&c, 4)?, num(&c, 5)?, num(&c, 6)?))
    } else if let Some(c) = RE_MINUTE.captures(input) {
        Some((num(&c, 1)?, num(&c, 2)?, num(&c, 3)?, num(&c, 4)?, num(&c, 5)?, 0))
    } else if let Some(c) = RE_DAY.captures(input) {
        Some((num(&c, 1)?, num(&c, 2)?, num(&c, 3)?, 12, 0, 0))
    } else if let Some(c) = RE_MONTH.captures(input) {
        Some((num(&c, 1)?, num(&c, 2)?, 15, 12, 0, 0))
    } else if let Some(c) = RE_YEAR.captures(input) {
        Some((num(&c, 1)?, 7, 1, 12, 0, 0))
    } else {
        None
    };

    let Some((year, month, day, hour, minute, second)) = parts else {
        return Err(Error::InvalidDate {
            input: input.to_string(),
            message: "expected YYYY, YYYY-MM, YYYY-MM-DD, YYYY-MM-DD HH:MM or YYYY-MM-DD HH:MM:SS"
                .to_string(),
        });
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(|| Error::InvalidDate {
            input: input.to_string(),
            message: "not a valid calendar date".to_string(),
        })
}

fn num<T: std::str::FromStr>(caps: &regex::Captures<'_>, group: usize) -> Result<T> {
    caps.get(group)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| Error::InvalidDate {
            input: caps.get(0).map(|m| m.as_str()).unwrap_or("").to_string(),
            message: "unparseable component".to_string(),
        })
}

/// Run the assign-date command over a file or a folder
pub fn run(source: &Path, date_str: &str, execute: bool, config: &Config) -> anyhow::Result<()> {
    // Parse before touching anything
    let target = parse_date_string(date_str)?;

    if !source.exists() {
        bail!("{} is not accessible", source.display());
    }

    println!("Assigning date: {}\n", target.format("%Y-%m-%d %H:%M:%S"));

    let files = collect_media_files(source, config)?;
    if files.is_empty() {
        println!("No media files found.");
        return Ok(());
    }
    println!("Found {} media file(s)\n", files.len());

    let mut updated = 0usize;
    let mut skipped = 0usize;
    let mut failures: Vec<FileFailure> = Vec::new();

    for path in &files {
        let mtime = match current_mtime(path) {
            Ok(mtime) => mtime,
            Err(e) => {
                failures.push(FileFailure::new(path, e.to_string()));
                continue;
            }
        };

        // Already carries the target date
        if (target - mtime).num_seconds().abs() < 1 {
            skipped += 1;
            continue;
        }

        if !execute {
            println!(
                "[DRY RUN] {}  {} -> {}",
                path.display(),
                mtime.format("%Y-%m-%d %H:%M:%S"),
                target.format("%Y-%m-%d %H:%M:%S")
            );
            updated += 1;
            continue;
        }

        match stamp_file(path, &target) {
            Ok(()) => {
                info!(path = %path.display(), "Assigned date");
                println!("Updated: {}", path.display());
                updated += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not assign date");
                failures.push(FileFailure::new(path, e.to_string()));
            }
        }
    }

    println!("\nFiles updated: {}", updated);
    println!("Files skipped (already correct): {}", skipped);
    fsutil::report_failures(&failures);

    if !execute && updated > 0 {
        println!(
            "\n{}",
            style("[DRY RUN] Re-run with --execute to actually assign dates").yellow()
        );
    }
    Ok(())
}

/// Collect the media files under a source path (or the path itself)
fn collect_media_files(source: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    if source.is_file() {
        if !config.kind_for(source).is_media() {
            bail!("{} is not a media file", source.display());
        }
        return Ok(vec![source.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(source)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !fsutil::is_hidden_entry(e))
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && config.kind_for(entry.path()).is_media() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
