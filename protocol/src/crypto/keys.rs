//! # Key Management
//!
//! Ed25519 keypairs as the ledger sees them: secret seeds travel as `S...`
//! StrKeys, public keys as `G...` account ids.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses `OsRng`.
//! - Seed bytes are never logged, and `Debug` output only shows the account id.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use crate::config::SIGNATURE_HINT_LENGTH;
use crate::strkey::{self, StrKeyError};

/// Errors that can occur during key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret seed: {0}")]
    InvalidSecretSeed(StrKeyError),

    #[error("invalid account id: {0}")]
    InvalidAccountId(StrKeyError),

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An Ed25519 keypair able to sign transactions.
///
/// Like the secret it holds, a `Keypair` intentionally does not implement
/// `Serialize`. Export the seed with [`Keypair::secret`] when you mean to.
///
/// # Examples
///
/// ```
/// use ledger_tx::crypto::Keypair;
///
/// let kp = Keypair::random();
/// let restored = Keypair::from_secret(&kp.secret()).unwrap();
/// assert_eq!(kp.account_id(), restored.account_id());
/// ```
pub struct Keypair {
    signing_key: SigningKey,
}

/// The public half of a keypair, as carried by an account id.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: [u8; 32],
}

/// A detached Ed25519 signature. Always 64 bytes when produced locally; a
/// signature of any other length simply fails verification.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Keypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Constructs a keypair from a raw 32-byte seed.
    pub fn from_raw_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Constructs a keypair from an `S...` secret seed.
    pub fn from_secret(secret: &str) -> Result<Self, KeyError> {
        let seed = strkey::decode_ed25519_secret_seed(secret).map_err(KeyError::InvalidSecretSeed)?;
        Ok(Self::from_raw_seed(&seed))
    }

    /// The `S...` secret seed. Handle with care.
    pub fn secret(&self) -> String {
        strkey::encode_ed25519_secret_seed(&self.signing_key.to_bytes())
    }

    /// Raw 32-byte seed.
    pub fn raw_secret_key(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// The `G...` account id of this keypair.
    pub fn account_id(&self) -> String {
        self.public_key().account_id()
    }

    /// Last four bytes of the public key.
    pub fn signature_hint(&self) -> [u8; SIGNATURE_HINT_LENGTH] {
        self.public_key().signature_hint()
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.signing_key.sign(message);
        Signature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(message, signature)
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output.
        write!(f, "Keypair({})", self.account_id())
    }
}

impl PartialEq for Keypair {
    /// Compares public keys only; secret material is never compared in
    /// non-constant time.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for Keypair {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

impl PublicKey {
    /// Create a `PublicKey` from raw bytes without curve validation.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Parses a `G...` account id and checks the bytes are a valid Ed25519
    /// point.
    pub fn from_account_id(account_id: &str) -> Result<Self, KeyError> {
        let bytes =
            strkey::decode_ed25519_public_key(account_id).map_err(KeyError::InvalidAccountId)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn account_id(&self) -> String {
        strkey::encode_ed25519_public_key(&self.bytes)
    }

    /// Last four bytes of the key, used to shortlist signers.
    pub fn signature_hint(&self) -> [u8; SIGNATURE_HINT_LENGTH] {
        let mut hint = [0u8; SIGNATURE_HINT_LENGTH];
        hint.copy_from_slice(&self.bytes[32 - SIGNATURE_HINT_LENGTH..]);
        hint
    }

    /// Returns `true` if the signature is valid for this key and message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        let dalek_sig = DalekSignature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.account_id())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.account_id())
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    /// Wraps raw signature bytes (e.g. produced by an external signer).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "Signature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "Signature({})", hex_str)
        }
    }
}
