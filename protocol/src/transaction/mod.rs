//! # Transaction Module
//!
//! Assembly, sealing, signing and envelope export for ledger transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        TimeBounds, Memo, TransactionState
//! builder.rs      TransactionBuilder, Transaction, seal and envelope I/O
//! signing.rs      Local and out-of-process signatures
//! verification.rs Hint shortlist plus Ed25519 verification
//! error.rs        TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] claims `account.sequence + 1` and
//!    advances the account. Operations can still be appended.
//! 2. **Seal**: [`Transaction::seal`] fixes the body and hashes it together
//!    with the network id. Nothing about the body can change afterwards.
//! 3. **Sign**: [`Transaction::sign`] / [`Transaction::add_signature`], as
//!    many times as there are signers.
//! 4. **Export**: [`Transaction::to_envelope`] emits body plus signatures.
//!
//! The reverse path, [`Transaction::from_envelope`], restores a sealed or
//! signed transaction and decodes its operations back into
//! [`OperationSpec`](crate::operation::OperationSpec)s.
//!
//! ## Design Decisions
//!
//! - The total fee is the per-operation fee times the operation count.
//! - The signing hash is `sha256(network_id || tagged body)`, so the same
//!   body signed for two networks yields unrelated signatures.
//! - A failed build never consumes a sequence number.

pub mod builder;
pub mod error;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder};
pub use error::TransactionError;
pub use types::{Memo, TimeBounds, TransactionState};
