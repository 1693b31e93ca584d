//! CLI argument parsing with clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// media-janitor - Photo and video library housekeeping
///
/// Classifies, relocates, deduplicates, date-corrects, and health-checks
/// media collections. Every run is a stateless re-scan; destructive
/// commands default to a dry run.
#[derive(Parser, Debug)]
#[command(name = "media-janitor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format) with custom extension sets
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long, global = true)]
    pub json_log: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Organize media folders into dated year/month structures
    Organize {
        /// Source directory to scan for media folders
        #[arg(long)]
        source: PathBuf,

        /// Destination directory for photo-dominant folders
        #[arg(long)]
        photo_dest: PathBuf,

        /// Destination directory for video-dominant folders
        #[arg(long)]
        video_dest: PathBuf,

        /// Show what would be done without making changes
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Run in batch mode without prompting for actions
        #[arg(long)]
        no_interactive: bool,
    },

    /// Find duplicate files by content hash
    Dedupe {
        /// Root directory to scan
        root: PathBuf,

        /// Actually delete redundant files (default is a dry run)
        #[arg(long)]
        execute: bool,
    },

    /// Rewrite file dates from EXIF metadata or filename patterns
    FixDates {
        /// Root directory to scan
        root: PathBuf,

        /// Actually rewrite dates (default is a dry run)
        #[arg(long)]
        execute: bool,
    },

    /// Assign a specific date to all media files in a folder
    AssignDate {
        /// Source folder (or single file)
        source: PathBuf,

        /// Date to assign: YYYY, YYYY-MM, YYYY-MM-DD, with optional HH:MM[:SS]
        date: String,

        /// Actually assign dates (default is a dry run)
        #[arg(long)]
        execute: bool,
    },

    /// Detect ghost, corrupt, and thumbnail-grade media files
    HealthCheck {
        /// Root directory to scan
        root: PathBuf,

        /// Actually delete flagged files (default is a dry run)
        #[arg(long)]
        execute: bool,

        /// Review each flagged file before deletion
        #[arg(short, long)]
        interactive: bool,

        /// Print the era threshold tables and exit
        #[arg(long)]
        thresholds: bool,
    },

    /// Display folder statistics in a tree view
    Count {
        /// Root directory to scan
        root: PathBuf,
    },

    /// Flatten nested folder structures into a single directory
    Flatten {
        /// Source folder to flatten
        source: PathBuf,

        /// Target folder for flattened files (default: <source>/flattened)
        target: Option<PathBuf>,

        /// Show what would be done without making changes
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_organize() {
        let cli = Cli::try_parse_from([
            "media-janitor",
            "organize",
            "--source",
            "/in",
            "--photo-dest",
            "/photos",
            "--video-dest",
            "/videos",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Organize {
                dry_run,
                no_interactive,
                ..
            } => {
                assert!(dry_run);
                assert!(!no_interactive);
            }
            _ => panic!("expected organize"),
        }
    }

    #[test]
    fn test_cli_parses_dedupe_with_global_flags() {
        let cli = Cli::try_parse_from(["media-janitor", "dedupe", "/library", "--execute", "-v"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Dedupe { root, execute } => {
                assert_eq!(root, PathBuf::from("/library"));
                assert!(execute);
            }
            _ => panic!("expected dedupe"),
        }
    }

    #[test]
    fn test_cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["media-janitor"]).is_err());
    }
}
