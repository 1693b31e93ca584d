//! Media health inspection
//!
//! Flags ghost (zero-byte), corrupt, and thumbnail-grade files. What
//! counts as "too small" depends on when the file was taken: a 6 KB photo
//! from 1998 is normal, the same file dated 2015 is a placeholder.

use crate::config::{Config, MediaKind};
use crate::error::Result;
use crate::fsutil::{self, FileFailure};
use crate::interactive;
use crate::time;
use anyhow::bail;
use chrono::Datelike;
use console::style;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Date-based threshold tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraBracket {
    /// Taken before 2000
    Pre2000,
    /// Taken 2000 through 2009
    Early2000s,
    /// Taken 2010 or later
    Modern,
}

impl EraBracket {
    /// Bracket for a capture year; lower edges at 2000 and 2010 are inclusive
    pub fn for_year(year: i32) -> Self {
        if year < 2000 {
            EraBracket::Pre2000
        } else if year < 2010 {
            EraBracket::Early2000s
        } else {
            EraBracket::Modern
        }
    }

    /// Human-readable label used in reports
    pub fn label(self) -> &'static str {
        match self {
            EraBracket::Pre2000 => "pre-2000",
            EraBracket::Early2000s => "2000s",
            EraBracket::Modern => "2010+",
        }
    }

    /// Minimum plausible sizes for this era
    pub fn thresholds(self) -> EraThresholds {
        match self {
            EraBracket::Pre2000 => EraThresholds {
                photo_min_bytes: 5_120,
                photo_min_dimension: 320,
                video_min_bytes: 51_200,
            },
            EraBracket::Early2000s => EraThresholds {
                photo_min_bytes: 10_240,
                photo_min_dimension: 480,
                video_min_bytes: 102_400,
            },
            EraBracket::Modern => EraThresholds {
                photo_min_bytes: 20_480,
                photo_min_dimension: 640,
                video_min_bytes: 204_800,
            },
        }
    }

    const ALL: [EraBracket; 3] = [EraBracket::Pre2000, EraBracket::Early2000s, EraBracket::Modern];
}

/// Size and resolution floors for one era
#[derive(Debug, Clone, Copy)]
pub struct EraThresholds {
    /// Minimum photo file size in bytes
    pub photo_min_bytes: u64,
    /// Minimum photo width and height in pixels
    pub photo_min_dimension: u32,
    /// Minimum video file size in bytes (videos are never decoded)
    pub video_min_bytes: u64,
}

/// A single problem found with a media file
#[derive(Debug, Clone)]
pub enum HealthIssue {
    /// Zero-byte file masquerading as media
    Ghost,
    /// Photo that fails to decode
    Corrupt { reason: String },
    /// Decodes (or, for videos, exists) but is below its era's floors
    Thumbnail { era: EraBracket, detail: String },
}

impl HealthIssue {
    /// Coarse grouping key for the report
    pub fn category(&self) -> &'static str {
        match self {
            HealthIssue::Ghost => "Ghost (zero-byte)",
            HealthIssue::Corrupt { .. } => "Corrupt",
            HealthIssue::Thumbnail { .. } => "Thumbnail",
        }
    }
}

impl fmt::Display for HealthIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthIssue::Ghost => write!(f, "zero-byte file"),
            HealthIssue::Corrupt { reason } => write!(f, "corrupted image: {}", reason),
            HealthIssue::Thumbnail { era, detail } => {
                write!(f, "below {} thresholds: {}", era.label(), detail)
            }
        }
    }
}

/// Inspect one media file, short-circuiting on the first positive check
///
/// Check order is fixed: zero-byte wins over everything, a failed decode
/// wins over threshold checks. Videos are only size-checked. Other-kind
/// files come back clean; callers are expected not to send them.
pub fn inspect(
    path: &Path,
    kind: MediaKind,
    taken: chrono::NaiveDateTime,
) -> Result<Option<HealthIssue>> {
    let size = fs::metadata(path)?.len();

    if size == 0 {
        return Ok(Some(HealthIssue::Ghost));
    }

    let era = EraBracket::for_year(taken.year());
    let thresholds = era.thresholds();

    match kind {
        MediaKind::Photo => {
            let image = match image::ImageReader::open(path)
                .map_err(|e| e.to_string())
                .and_then(|r| r.with_guessed_format().map_err(|e| e.to_string()))
                .and_then(|r| r.decode().map_err(|e| e.to_string()))
            {
                Ok(image) => image,
                Err(reason) => {
                    debug!(?path, %reason, "Image decode failed");
                    return Ok(Some(HealthIssue::Corrupt { reason }));
                }
            };

            if size < thresholds.photo_min_bytes {
                return Ok(Some(HealthIssue::Thumbnail {
                    era,
                    detail: format!(
                        "{} bytes, floor {} bytes",
                        size, thresholds.photo_min_bytes
                    ),
                }));
            }

            let (width, height) = (image.width(), image.height());
            if width < thresholds.photo_min_dimension || height < thresholds.photo_min_dimension {
                return Ok(Some(HealthIssue::Thumbnail {
                    era,
                    detail: format!(
                        "{}x{} pixels, floor {} px",
                        width, height, thresholds.photo_min_dimension
                    ),
                }));
            }
        }
        MediaKind::Video => {
            if size < thresholds.video_min_bytes {
                return Ok(Some(HealthIssue::Thumbnail {
                    era,
                    detail: format!(
                        "{} bytes, floor {} bytes",
                        size, thresholds.video_min_bytes
                    ),
                }));
            }
        }
        MediaKind::Other => {}
    }

    Ok(None)
}

/// Options for the health-check command
#[derive(Debug, Clone)]
pub struct HealthCheckOptions {
    pub root: PathBuf,
    pub execute: bool,
    pub interactive: bool,
    pub show_thresholds: bool,
}

/// Run the health-check command
pub fn run(opts: &HealthCheckOptions, config: &Config) -> anyhow::Result<()> {
    if opts.show_thresholds {
        print_thresholds();
        return Ok(());
    }

    if !opts.root.exists() {
        bail!("{} is not accessible", opts.root.display());
    }

    println!("Scanning {} for health issues...\n", opts.root.display());

    let mut findings: Vec<(PathBuf, HealthIssue)> = Vec::new();
    let mut failures: Vec<FileFailure> = Vec::new();
    let mut healthy = 0usize;
    let mut total = 0usize;

    for entry in WalkDir::new(&opts.root)
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
        let kind = config.kind_for(path);
        if !kind.is_media() {
            continue;
        }

        total += 1;

        let taken = match time::resolve(path, config) {
            Ok(taken) => taken,
            Err(e) => {
                failures.push(FileFailure::new(path, e.to_string()));
                continue;
            }
        };

        match inspect(path, kind, taken.timestamp) {
            Ok(Some(issue)) => {
                info!(path = %path.display(), issue = %issue, "Health issue");
                findings.push((path.to_path_buf(), issue));
            }
            Ok(None) => healthy += 1,
            Err(e) => failures.push(FileFailure::new(path, e.to_string())),
        }
    }

    report_findings(&findings, healthy, total);
    fsutil::report_failures(&failures);

    if findings.is_empty() {
        return Ok(());
    }

    if !opts.execute {
        println!(
            "\n{}",
            style("[DRY RUN] Re-run with --execute to delete flagged files").yellow()
        );
        return Ok(());
    }

    delete_findings(&findings, opts.interactive)
}

fn report_findings(findings: &[(PathBuf, HealthIssue)], healthy: usize, total: usize) {
    if findings.is_empty() {
        println!(
            "{} No issues found, all media files appear healthy.",
            style("✓").green().bold()
        );
    } else {
        // Group by issue category for the report
        let mut groups: BTreeMap<&'static str, Vec<&(PathBuf, HealthIssue)>> = BTreeMap::new();
        for finding in findings {
            groups.entry(finding.1.category()).or_default().push(finding);
        }

        for (category, group) in &groups {
            println!(
                "\n{} ({} file(s)):",
                style(category).red().bold(),
                group.len()
            );
            for (path, issue) in group {
                println!("  - {}", path.display());
                println!("    {}", style(issue).dim());
            }
        }
    }

    println!("\nHealth check summary:");
    println!("  Media files scanned: {}", total);
    println!("  Healthy: {}", healthy);
    println!("  With issues: {}", findings.len());
}

fn delete_findings(findings: &[(PathBuf, HealthIssue)], ask: bool) -> anyhow::Result<()> {
    let mut deleted = 0usize;
    let mut skipped = 0usize;

    println!();
    for (path, issue) in findings {
        let confirmed = if ask {
            interactive::confirm_delete(path, &issue.to_string())?
        } else {
            true
        };

        if !confirmed {
            skipped += 1;
            continue;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "Deleted unhealthy file");
                println!("  {} Deleted: {}", style("✓").green(), path.display());
                deleted += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not delete");
                println!(
                    "  {} Could not delete {}: {}",
                    style("!").yellow(),
                    path.display(),
                    e
                );
            }
        }
    }

    println!("\nDeleted: {} file(s)", deleted);
    if ask {
        println!("Skipped: {} file(s)", skipped);
    }
    Ok(())
}

/// Print the per-era threshold tables
pub fn print_thresholds() {
    println!("{:<12} | {:>12} | {:>10} | {:>12}", "Era", "Photo bytes", "Photo px", "Video bytes");
    println!("{}", "-".repeat(56));
    for era in EraBracket::ALL {
        let t = era.thresholds();
        println!(
            "{:<12} | {:>12} | {:>10} | {:>12}",
            era.label(),
            t.photo_min_bytes,
            t.photo_min_dimension,
            t.video_min_bytes
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::Path;

    fn date(year: i32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    /// Write a PNG filled with deterministic noise so it stays well above
    /// the byte floors (PNG cannot compress it away)
    fn write_noise_png(path: &Path, side: u32) {
        let mut seed: u32 = 0x2545_F491;
        let image = RgbImage::from_fn(side, side, |_, _| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let b = seed.to_le_bytes();
            Rgb([b[0], b[1], b[2]])
        });
        image.save(path).unwrap();
    }

    #[test]
    fn test_era_brackets() {
        assert_eq!(EraBracket::for_year(1995), EraBracket::Pre2000);
        assert_eq!(EraBracket::for_year(1999), EraBracket::Pre2000);
        assert_eq!(EraBracket::for_year(2000), EraBracket::Early2000s);
        assert_eq!(EraBracket::for_year(2009), EraBracket::Early2000s);
        assert_eq!(EraBracket::for_year(2010), EraBracket::Modern);
        assert_eq!(EraBracket::for_year(2024), EraBracket::Modern);
    }

    #[test]
    fn test_zero_byte_is_ghost_only() {
        let dir = tempfile::tempdir().unwrap();
        // Garbage name and unreadable content would also fail later
        // checks; ghost must win without ever reaching them
        let path = dir.path().join("empty.jpg");
        fs::write(&path, b"").unwrap();

        let issue = inspect(&path, MediaKind::Photo, date(2015)).unwrap().unwrap();
        assert!(matches!(issue, HealthIssue::Ghost));
    }

    #[test]
    fn test_undecodable_photo_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"this is not an image at all").unwrap();

        let issue = inspect(&path, MediaKind::Photo, date(2015)).unwrap().unwrap();
        assert!(matches!(issue, HealthIssue::Corrupt { .. }));
    }

    #[test]
    fn test_old_photo_passes_old_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        write_noise_png(&path, 400);
        assert!(fs::metadata(&path).unwrap().len() >= 5_120);

        // 400x400 clears the pre-2000 floor of 320 px
        assert!(inspect(&path, MediaKind::Photo, date(1995)).unwrap().is_none());
    }

    #[test]
    fn test_same_photo_dated_modern_is_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        write_noise_png(&path, 400);

        // 400x400 is under the 2010+ floor of 640 px
        let issue = inspect(&path, MediaKind::Photo, date(2015)).unwrap().unwrap();
        match issue {
            HealthIssue::Thumbnail { era, .. } => assert_eq!(era, EraBracket::Modern),
            other => panic!("expected thumbnail, got {:?}", other),
        }
    }

    #[test]
    fn test_small_video_is_thumbnail_without_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        fs::write(&path, vec![0u8; 4_096]).unwrap();

        let issue = inspect(&path, MediaKind::Video, date(2015)).unwrap().unwrap();
        assert!(matches!(issue, HealthIssue::Thumbnail { era: EraBracket::Modern, .. }));
    }

    #[test]
    fn test_large_video_is_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        // Not decodable as video, but videos are only ever size-checked
        fs::write(&path, vec![0u8; 300_000]).unwrap();

        assert!(inspect(&path, MediaKind::Video, date(2015)).unwrap().is_none());
    }

    #[test]
    fn test_old_video_floor_is_lower() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.avi");
        fs::write(&path, vec![0u8; 60_000]).unwrap();

        // 60 KB clears pre-2000 (50 KB) but not the 2000s floor (100 KB)
        assert!(inspect(&path, MediaKind::Video, date(1998)).unwrap().is_none());
        assert!(inspect(&path, MediaKind::Video, date(2005)).unwrap().is_some());
    }
}
