//! BLAKE3 content fingerprinting for deduplication
//!
//! Files are always read in full through a buffered reader; two files get
//! the same fingerprint exactly when their bytes are identical.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::trace;

/// Buffer size for streaming reads (64 KiB)
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Compute the content fingerprint of a file as a hex string
///
/// Streams the whole file through the hasher; nothing is ever loaded into
/// memory wholesale. A zero-byte file hashes like any other (to the empty
/// input digest).
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::HashComputation {
        path: path.to_path_buf(),
        message: format!("Failed to open file: {}", e),
    })?;

    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    let mut hasher = blake3::Hasher::new();

    io::copy(&mut reader, &mut hasher).map_err(|e| Error::HashComputation {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;

    let hash = hasher.finalize();
    trace!(?path, hash = %hash.to_hex(), "Computed content fingerprint");
    Ok(hash.to_hex().to_string())
}
