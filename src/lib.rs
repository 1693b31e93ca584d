//! media-janitor - Photo and video library housekeeping
//!
//! This library provides the decision engine and commands for keeping a
//! personal media collection in shape:
//! - Extension-based photo/video classification
//! - Capture-time resolution (EXIF, filename patterns, mtime fallback)
//! - Folder-level classification and dated reorganization
//! - Content-hash deduplication
//! - Era-aware health checks for ghost/corrupt/thumbnail files
//!
//! The core components return decisions only; moves, deletions, and
//! prompts happen at the command layer.

pub mod assign_date;
pub mod cli;
pub mod config;
pub mod count;
pub mod dedupe;
pub mod error;
pub mod fix_dates;
pub mod flatten;
pub mod folder;
pub mod fsutil;
pub mod hash;
pub mod health;
pub mod interactive;
pub mod organize;
pub mod time;

pub use cli::{Cli, Command};
pub use config::{Config, MediaKind};
pub use dedupe::{DuplicateGroup, find_duplicates, reclaimable_bytes};
pub use error::{Error, Result};
pub use folder::{FolderSummary, summarize_folder};
pub use health::{EraBracket, HealthIssue, inspect};
pub use time::{ResolvedTime, TimeSource, resolve};
