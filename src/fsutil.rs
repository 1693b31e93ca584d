//! Small file system helpers shared by the commands

use crate::error::Result;
use console::style;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Check whether a file or directory name is hidden (dotfile)
///
/// Hidden entries are invisible to every command.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Check whether a walkdir entry is hidden
pub fn is_hidden_entry(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(is_hidden_name)
        .unwrap_or(false)
}

/// Move a single file, falling back to copy+remove across devices
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(?src, ?dest, error = %e, "rename failed, copying instead");
            fs::copy(src, dest)?;
            fs::remove_file(src)?;
            Ok(())
        }
    }
}

/// Move a directory tree, falling back to a recursive copy across devices
pub fn move_dir(src: &Path, dest: &Path) -> Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(?src, ?dest, error = %e, "rename failed, copying tree instead");
            copy_dir_recursive(src, dest)?;
            fs::remove_dir_all(src)?;
            Ok(())
        }
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Remove a directory and any now-empty parents it leaves behind, bottom-up
pub fn remove_empty_dirs(root: &Path) {
    // contents_first yields children before their parent, so parents are
    // already empty by the time we reach them
    let dirs: Vec<_> = walkdir::WalkDir::new(root)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect();

    for dir in dirs {
        // Only empty directories go; remove_dir refuses the rest
        if fs::remove_dir(&dir).is_err() {
            debug!(?dir, "Directory not empty, keeping");
        }
    }
}

/// Format a byte count as a human-readable size
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if value < 1024.0 {
            return format!("{:.2} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2} PB", value)
}

/// A single file or folder that an operation could not process
///
/// Failures never abort a run; they are collected and reported at the end.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: std::path::PathBuf,
    pub message: String,
}

impl FileFailure {
    pub fn new(path: impl Into<std::path::PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Print the end-of-run failure summary, if there is anything to report
pub fn report_failures(failures: &[FileFailure]) {
    if failures.is_empty() {
        return;
    }

    println!();
    println!(
        "{} {} item(s) could not be processed:",
        style("!").yellow().bold(),
        failures.len()
    );
    for failure in failures {
        warn!(path = %failure.path.display(), message = %failure.message, "Operation failure");
        println!(
            "  {} {} ({})",
            style("-").dim(),
            failure.path.display(),
            style(&failure.message).dim()
        );
    }
}
