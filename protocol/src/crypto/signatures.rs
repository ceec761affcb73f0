//! # Digital Signatures
//!
//! The signing surface the transaction layer consumes: `sign(payload, key)`,
//! `verify(payload, signature, key)`. Transactions never call
//! `ed25519-dalek` directly, so this is the one place to audit.
//!
//! ## Strictness
//!
//! [`verify_raw`] uses `verify_strict`, rejecting small-order keys and
//! non-canonical signatures. Signatures attached to a transaction are
//! checked through it. [`verify`] follows the lenient RFC 8032 rule.

use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};
use thiserror::Error;

use super::keys::{Keypair, PublicKey, Signature};

/// Errors during signature operations.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid signature bytes: expected 64 bytes, got {0}")]
    InvalidSignatureBytes(usize),

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Sign `payload` with the keypair's secret key.
///
/// # Example
///
/// ```
/// use ledger_tx::crypto::{Keypair, sign, verify};
///
/// let keypair = Keypair::random();
/// let signature = sign(&keypair, b"payload");
/// assert!(verify(&keypair.public_key(), b"payload", &signature));
/// ```
pub fn sign(keypair: &Keypair, payload: &[u8]) -> Signature {
    keypair.sign(payload)
}

/// Verify a signature against a public key and payload.
pub fn verify(public_key: &PublicKey, payload: &[u8], signature: &Signature) -> bool {
    public_key.verify(payload, signature)
}

/// Strictly verify a signature given as raw bytes off the wire.
pub fn verify_raw(
    public_key_bytes: &[u8; 32],
    payload: &[u8],
    signature_bytes: &[u8],
) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;

    let signature_bytes: &[u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| SignatureError::InvalidSignatureBytes(signature_bytes.len()))?;
    let signature = DalekSignature::from_bytes(signature_bytes);

    verifying_key
        .verify_strict(payload, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}
