//! Flatten nested folder structures into a single directory
//!
//! Every file in the source tree moves into one flat target folder. When
//! two files share a name, the larger one wins and the smaller is
//! discarded.

use crate::fsutil::{self, FileFailure};
use anyhow::bail;
use console::style;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Run the flatten command
pub fn run(source: &Path, target: &Path, dry_run: bool) -> anyhow::Result<()> {
    if !source.exists() {
        bail!("{} is not accessible", source.display());
    }

    if !dry_run {
        fs::create_dir_all(target)?;
    }

    // Files already placed, by name: name -> (current path, size)
    let mut seen: HashMap<String, (PathBuf, u64)> = HashMap::new();
    let mut failures: Vec<FileFailure> = Vec::new();
    let prefix = if dry_run { "[DRY RUN] " } else { "" };

    for entry in WalkDir::new(source)
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

        // Files already sitting in the target stay put
        if entry.path().parent() == Some(target) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let src_path = entry.path().to_path_buf();
        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                failures.push(FileFailure::new(&src_path, e.to_string()));
                continue;
            }
        };

        match seen.get(&name) {
            Some((existing_path, existing_size)) => {
                if size > *existing_size {
                    println!(
                        "{}Replace (keep bigger): {} -> {}",
                        prefix,
                        existing_path.display(),
                        src_path.display()
                    );
                    if !dry_run {
                        let dest_path = target.join(&name);
                        if let Err(e) = fs::remove_file(existing_path)
                            .map_err(crate::error::Error::from)
                            .and_then(|()| fsutil::move_file(&src_path, &dest_path))
                        {
                            failures.push(FileFailure::new(&src_path, e.to_string()));
                            continue;
                        }
                        seen.insert(name, (dest_path, size));
                    }
                } else {
                    println!("{}Skip smaller duplicate: {}", prefix, src_path.display());
                    if !dry_run {
                        if let Err(e) = fs::remove_file(&src_path) {
                            failures.push(FileFailure::new(&src_path, e.to_string()));
                        }
                    }
                }
            }
            None => {
                let dest_path = target.join(&name);
                println!(
                    "{}Move: {} -> {}",
                    prefix,
                    src_path.display(),
                    dest_path.display()
                );
                if dry_run {
                    seen.insert(name, (src_path, size));
                } else {
                    match fsutil::move_file(&src_path, &dest_path) {
                        Ok(()) => {
                            debug!(src = %src_path.display(), "Flattened file");
                            seen.insert(name, (dest_path, size));
                        }
                        Err(e) => failures.push(FileFailure::new(&src_path, e.to_string())),
                    }
                }
            }
        }
    }

    info!(files = seen.len(), "Flattening complete");
    println!("\nFlattening complete, {} file(s) in target.", seen.len());
    fsutil::report_failures(&failures);

    if dry_run {
        println!(
            "{}",
            style("[DRY RUN] Re-run without --dry-run to actually move files").yellow()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_flatten_moves_nested_files() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("src");
        fs::create_dir_all(source.join("a/b")).unwrap();
        fs::write(source.join("top.jpg"), b"1").unwrap();
        fs::write(source.join("a/mid.jpg"), b"22").unwrap();
        fs::write(source.join("a/b/deep.jpg"), b"333").unwrap();

        let target = root.path().join("flat");
        run(&source, &target, false).unwrap();

        assert!(target.join("top.jpg").exists());
        assert!(target.join("mid.jpg").exists());
        assert!(target.join("deep.jpg").exists());
    }

    #[test]
    fn test_name_collision_keeps_larger_file() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("src");
        fs::create_dir_all(source.join("a")).unwrap();
        fs::create_dir_all(source.join("b")).unwrap();
        fs::write(source.join("a/photo.jpg"), b"small").unwrap();
        fs::write(source.join("b/photo.jpg"), b"much larger payload").unwrap();

        let target = root.path().join("flat");
        run(&source, &target, false).unwrap();

        assert_eq!(
            fs::read(target.join("photo.jpg")).unwrap(),
            b"much larger payload"
        );
        assert!(!source.join("a/photo.jpg").exists());
        assert!(!source.join("b/photo.jpg").exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("src");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("top.jpg"), b"1").unwrap();

        let target = root.path().join("flat");
        run(&source, &target, true).unwrap();

        assert!(source.join("top.jpg").exists());
        assert!(!target.exists());
    }
}
