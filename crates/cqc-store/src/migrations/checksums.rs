use sha2::{Digest, Sha256};

/// SHA-256 hex digest of migration text
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
