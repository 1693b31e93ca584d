//! Error types for the media janitor

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media janitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media janitor
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("File hash computation failed for {path}: {message}")]
    HashComputation { path: PathBuf, message: String },

    #[error("Invalid date '{input}': {message}")]
    InvalidDate { input: String, message: String },

    #[error("Failed to read config file '{path}': {message}")]
    ConfigRead { path: PathBuf, message: String },

    #[error("Failed to parse config file '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
