//! Derivative filename allocation.
//!
//! Names look like `<timestamp>_<token><.ext>`: the timestamp is nanoseconds
//! since the Unix epoch, the token is the first 16 hex characters of a SHA-256
//! over the client filename, the timestamp and a per-call random nonce.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Length of the hex token in allocated names.
pub const TOKEN_LEN: usize = 16;

/// Produces collision-resistant derivative filenames without shared state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameAllocator;

impl NameAllocator {
    pub fn allocate(&self, original_filename: &str) -> String {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let nonce: u64 = rand::random();

        let mut hasher = Sha256::new();
        hasher.update(original_filename.as_bytes());
        hasher.update(timestamp.to_be_bytes());
        hasher.update(nonce.to_be_bytes());
        let digest = hasher.finalize();

        let token = hex::encode(&digest[..TOKEN_LEN / 2]);

        format!(
            "{}_{}{}",
            timestamp,
            token,
            extension_suffix(original_filename)
        )
    }
}

/// `.ext` of the final path component, or empty when there is none.
///
/// The extension becomes part of a storage key, so it is kept verbatim only
/// when it is made of ASCII alphanumerics, `-` and `_`; otherwise it is
/// dropped. Dotfiles such as `.hidden` have no extension.
pub fn extension_suffix(filename: &str) -> String {
    let ext = Path::new(filename)
        .file_name()
        .map(Path::new)
        .and_then(|name| name.extension())
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    if ext.is_empty()
        || !ext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return String::new();
    }
    format!(".{}", ext)
}
