//! # Cryptographic Primitives
//!
//! The crypto provider the transaction layer signs and verifies through.
//! Nothing here implements curve or hash math: these are thin, typed wrappers
//! around `ed25519-dalek` and `sha2`.
//!
//! - **Ed25519** for signatures, keyed by StrKey seeds and account ids.
//! - **SHA-256** for network ids and transaction signature payloads.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::sha256_array;
pub use keys::{KeyError, Keypair, PublicKey, Signature};
pub use signatures::{sign, verify, verify_raw, SignatureError};
