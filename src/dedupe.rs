//! Content-hash duplicate detection
//!
//! Every regular file in the tree is fingerprinted in full; groups with
//! two or more identical fingerprints are duplicates. One member per
//! group survives: the one with the shortest path, lexicographic order
//! breaking ties. Reading every byte is the dominant cost of the whole
//! toolkit, so the hashing pass gets a progress bar.

use crate::fsutil::{self, FileFailure};
use crate::hash::fingerprint_file;
use anyhow::bail;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A set of byte-identical files
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Hex content fingerprint shared by every member
    pub fingerprint: String,
    /// Size of each member in bytes
    pub size: u64,
    /// The member that survives a delete pass
    pub keeper: PathBuf,
    /// The members that do not
    pub redundant: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Bytes freed by deleting the redundant members
    pub fn reclaimable(&self) -> u64 {
        self.size * self.redundant.len() as u64
    }
}

/// Total bytes freed by deleting every redundant member of every group
pub fn reclaimable_bytes(groups: &[DuplicateGroup]) -> u64 {
    groups.iter().map(DuplicateGroup::reclaimable).sum()
}

/// Walk a tree and group byte-identical files
///
/// Hidden files are invisible; everything else regular gets hashed,
/// zero-byte files included. Unreadable files land in the failure list
/// without stopping the scan.
pub fn find_duplicates(root: &Path) -> (Vec<DuplicateGroup>, Vec<FileFailure>) {
    let mut failures: Vec<FileFailure> = Vec::new();
    let mut candidates: Vec<(PathBuf, u64)> = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !fsutil::is_hidden_entry(e))
    {
        match entry {
            Ok(entry) if entry.file_type().is_file() => match entry.metadata() {
                Ok(metadata) => candidates.push((entry.into_path(), metadata.len())),
                Err(e) => failures.push(FileFailure::new(entry.path(), e.to_string())),
            },
            Ok(_) => {}
            Err(e) => {
                failures.push(FileFailure::new(
                    e.path().unwrap_or(Path::new("?")),
                    e.to_string(),
                ));
            }
        }
    }

    info!(count = candidates.len(), "Fingerprinting files");

    let progress = ProgressBar::new(candidates.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut by_fingerprint: HashMap<String, Vec<(PathBuf, u64)>> = HashMap::new();
    for (path, size) in candidates {
        progress.inc(1);
        match fingerprint_file(&path) {
            Ok(fingerprint) => {
                by_fingerprint.entry(fingerprint).or_default().push((path, size));
            }
            Err(e) => {
                debug!(?path, error = %e, "Could not fingerprint");
                failures.push(FileFailure::new(path, e.to_string()));
            }
        }
    }
    progress.finish_and_clear();

    let mut groups: Vec<DuplicateGroup> = by_fingerprint
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(fingerprint, mut members)| {
            // Shortest path survives; lexicographic order breaks ties
            members.sort_by(|(a, _), (b, _)| {
                a.as_os_str()
                    .len()
                    .cmp(&b.as_os_str().len())
                    .then_with(|| a.cmp(b))
            });
            let size = members[0].1;
            let keeper = members.remove(0).0;
            DuplicateGroup {
                fingerprint,
                size,
                keeper,
                redundant: members.into_iter().map(|(path, _)| path).collect(),
            }
        })
        .collect();

    // Deterministic report order
    groups.sort_by(|a, b| a.keeper.cmp(&b.keeper));

    (groups, failures)
}

/// Run the dedupe command
pub fn run(root: &Path, execute: bool) -> anyhow::Result<()> {
    if !root.exists() {
        bail!("{} is not accessible", root.display());
    }

    println!("Scanning {} for duplicates...\n", root.display());
    let (groups, failures) = find_duplicates(root);

    if groups.is_empty() {
        println!("{} No duplicates found.", style("✓").green().bold());
        fsutil::report_failures(&failures);
        return Ok(());
    }

    let redundant_count: usize = groups.iter().map(|g| g.redundant.len()).sum();
    let savings = reclaimable_bytes(&groups);

    println!(
        "Found {} duplicate set(s), {} redundant file(s), {} reclaimable\n",
        style(groups.len()).bold(),
        redundant_count,
        style(fsutil::format_size(savings)).bold()
    );

    for (idx, group) in groups.iter().enumerate() {
        println!(
            "Set #{} (hash {}…, {} each)",
            idx + 1,
            &group.fingerprint[..8],
            fsutil::format_size(group.size)
        );
        println!("  {} {}", style("[KEEP]").green(), group.keeper.display());
        for path in &group.redundant {
            println!("  {} {}", style("[DELETE]").red(), path.display());
        }
        println!();
    }

    fsutil::report_failures(&failures);

    if !execute {
        println!(
            "{}",
            style("[DRY RUN] Re-run with --execute to delete redundant files").yellow()
        );
        return Ok(());
    }

    let mut deleted = 0usize;
    let mut freed = 0u64;
    for group in &groups {
        for path in &group.redundant {
            match fs::remove_file(path) {
                Ok(()) => {
                    info!(path = %path.display(), "Deleted duplicate");
                    deleted += 1;
                    freed += group.size;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not delete duplicate");
                    println!(
                        "  {} Could not delete {}: {}",
                        style("!").yellow(),
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    println!(
        "Deleted {} duplicate file(s), freed {}",
        deleted,
        fsutil::format_size(freed)
    );
    Ok(())
}
