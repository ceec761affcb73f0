//! Checking attached signatures against candidate public keys.
//!
//! The hint is only a shortlist: a signature whose hint matches a key is
//! then fully verified over the sealed hash before it counts.

use std::collections::HashSet;

use tracing::debug;

use super::builder::Transaction;
use crate::crypto::keys::PublicKey;
use crate::crypto::signatures::verify_raw;

impl Transaction {
    /// Returns `true` if some attached signature was made by `public_key`
    /// over this transaction's sealed hash.
    pub fn verify_signature(&self, public_key: &PublicKey) -> bool {
        let Some(hash) = self.hash() else {
            return false;
        };
        let hint = public_key.signature_hint();
        let found = self
            .signatures
            .iter()
            .filter(|sig| sig.hint == hint)
            .any(|sig| verify_raw(public_key.as_bytes(), &hash, &sig.signature).is_ok());
        if !found {
            debug!(signer = %public_key, "no valid signature for key");
        }
        found
    }

    /// Counts the distinct keys in `candidates` that have a valid signature.
    pub fn verify_signatures(&self, candidates: &[PublicKey]) -> usize {
        candidates
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|key| self.verify_signature(key))
            .count()
    }
}
