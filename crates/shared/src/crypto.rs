//! Content hashing utilities.
//!
//! Uploaded incident photos are stored content-addressed: the file name is the
//! SHA-256 digest of the bytes, so identical uploads share one file.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Builds the storage file name for an upload: `<sha256>.<ext>`.
///
/// The extension is taken from the original file name, lowercased, and limited
/// to ASCII alphanumerics. Files without a usable extension get no suffix.
pub fn content_addressed_name(bytes: &[u8], original_name: Option<&str>) -> String {
    let digest = sha256_hex(bytes);
    let ext = original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{}.{}", digest, ext),
        None => digest,
    }
}
