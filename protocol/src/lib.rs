// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Transactions Client Library
//!
//! Turns human instructions ("pay this account 12.5", "add this signer") into
//! byte-exact, checksummed, signed transaction envelopes a ledger node will
//! accept, and turns received envelopes back into readable records.
//!
//! Everything here is synchronous and CPU-only. The library never touches the
//! network, never reads the disk and never installs a logging subscriber.
//!
//! ## Architecture
//!
//! - **config**: Protocol constants and the [`Network`](config::Network) a
//!   transaction is signed for.
//! - **strkey**: Versioned, checksummed base-32 text for keys and hashes.
//! - **amount**: Decimal strings to stroops and back, plus rational prices.
//! - **xdr**: Canonical wire records and the schema codec seam.
//! - **crypto**: Ed25519 keys and signatures, SHA-256.
//! - **account**: Caller-owned account id and sequence number.
//! - **operation**: The ten operation builders and their decoder.
//! - **transaction**: Build, seal, sign, export, and the reverse path.
//!
//! ## Design Philosophy
//!
//! 1. No floating point anywhere near an amount.
//! 2. Invalid input fails immediately, naming the field at fault.
//! 3. A transaction can only be signed after its body is frozen.
//! 4. If it touches money, it has tests. Plural.

pub mod account;
pub mod amount;
pub mod config;
pub mod crypto;
pub mod operation;
pub mod strkey;
pub mod transaction;
pub mod xdr;

pub use account::{Account, AccountError};
pub use config::Network;
pub use crypto::Keypair;
pub use operation::{OperationError, OperationSpec};
pub use transaction::{Transaction, TransactionBuilder, TransactionError};
