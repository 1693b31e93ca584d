//! Folder statistics tree
//!
//! Counts photo/video/other files per folder, aggregates bottom-up so a
//! parent shows the totals of everything beneath it, and renders the
//! result as a tree.

use crate::config::{Config, MediaKind};
use crate::error::Result;
use crate::fsutil::is_hidden_name;
use anyhow::bail;
use std::collections::HashMap;
use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

/// Photo/video/other counts for one folder (subfolders included)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FolderStats {
    pub photos: usize,
    pub videos: usize,
    pub others: usize,
}

impl AddAssign for FolderStats {
    fn add_assign(&mut self, other: Self) {
        self.photos += other.photos;
        self.videos += other.videos;
        self.others += other.others;
    }
}

/// Recursively collect aggregated stats for every folder under root
pub fn collect_stats(root: &Path, config: &Config) -> Result<HashMap<PathBuf, FolderStats>> {
    let mut stats = HashMap::new();
    scan_folder(root, config, &mut stats)?;
    Ok(stats)
}

fn scan_folder(
    dir: &Path,
    config: &Config,
    stats: &mut HashMap<PathBuf, FolderStats>,
) -> Result<FolderStats> {
    let mut total = FolderStats::default();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if is_hidden_name(name) {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            // Children first, so parents aggregate finished totals
            total += scan_folder(&entry.path(), config, stats)?;
        } else if file_type.is_file() {
            match config.kind_for(&entry.path()) {
                MediaKind::Photo => total.photos += 1,
                MediaKind::Video => total.videos += 1,
                MediaKind::Other => total.others += 1,
            }
        }
    }

    stats.insert(dir.to_path_buf(), total);
    Ok(total)
}

/// Run the count command
pub fn run(root: &Path, config: &Config) -> anyhow::Result<()> {
    if !root.is_dir() {
        bail!("{} is not a valid directory", root.display());
    }

    println!("\nScanning: {}", root.display());
    println!("{}", "-".repeat(40));
    let stats = collect_stats(root, config)?;
    print_tree(root, &stats, "");
    println!("{}", "-".repeat(40));
    Ok(())
}

fn print_tree(path: &Path, stats: &HashMap<PathBuf, FolderStats>, prefix: &str) {
    let counts = stats.get(path).copied().unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    println!(
        "{}└── {}/ (Photos: {}, Videos: {}, Other: {})",
        prefix, name, counts.photos, counts.videos, counts.others
    );

    let mut subdirs: Vec<PathBuf> = fs::read_dir(path)
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| !is_hidden_name(n))
                .unwrap_or(false)
        })
        .collect();
    subdirs.sort();

    let child_prefix = format!("{}    ", prefix);
    for subdir in subdirs {
        print_tree(&subdir, stats, &child_prefix);
    }
}
