//! # Hashing Utilities
//!
//! SHA-256 is the only hash the ledger uses: network ids are the SHA-256 of
//! the network passphrase, and every signature covers the SHA-256 of the
//! network-scoped transaction payload.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// Returns `[u8; 32]` so callers can store the digest directly in wire
/// records or StrKeys.
///
/// # Example
///
/// ```
/// use ledger_tx::crypto::sha256_array;
///
/// let hash = sha256_array(b"ledger");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
