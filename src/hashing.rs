//! Hashing - SHA-256 digests of generated documents
//!
//! Generation is deterministic, so equal digests across runs mean the
//! typeset posters will be identical.

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Digest of a LaTeX document as written to disk.
pub fn document_digest(tex: &str) -> String {
    sha256_hex(tex.as_bytes())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
