//! # Protocol Configuration & Constants
//!
//! Every magic number the transaction layer depends on lives here. If you're
//! hardcoding a limit somewhere else, move it here first.
//!
//! These values mirror what the ledger nodes enforce. Drifting from them does
//! not make a transaction "more flexible", it makes it rejected at submission.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::hash::sha256_array;

// ---------------------------------------------------------------------------
// Network Passphrases
// ---------------------------------------------------------------------------

/// Passphrase of the production network.
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Ledger Network ; September 2015";

/// Passphrase of the shared test network.
pub const TESTNET_NETWORK_PASSPHRASE: &str = "Test Ledger Network ; September 2015";

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Number of fractional decimal digits carried by an on-ledger amount.
pub const AMOUNT_DECIMALS: u32 = 7;

/// One display unit expressed in stroops (10^7).
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Largest amount the ledger can represent, in stroops.
pub const MAX_AMOUNT_STROOPS: i64 = i64::MAX;

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

/// Default fee charged per operation, in stroops.
pub const BASE_FEE: u32 = 100;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum number of operations a single transaction may carry.
pub const MAX_OPERATIONS: usize = 100;

/// Maximum length of a text memo, in bytes.
pub const MAX_MEMO_TEXT_LENGTH: usize = 28;

/// Maximum length of a `manageData` entry name or value, in bytes.
pub const MAX_DATA_ENTRY_LENGTH: usize = 64;

/// Maximum length of an account home domain, in bytes.
pub const MAX_HOME_DOMAIN_LENGTH: usize = 32;

/// Upper bound for signer weights and account thresholds.
pub const MAX_WEIGHT: u32 = 255;

/// Maximum number of signatures an envelope may carry.
pub const MAX_SIGNATURES: usize = 20;

/// Number of public key bytes used as a signature hint.
pub const SIGNATURE_HINT_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Account Flags
// ---------------------------------------------------------------------------

/// Trustlines to assets issued by this account must be authorized first.
pub const AUTH_REQUIRED_FLAG: u32 = 0x1;

/// Authorization flags on this account can never be changed again.
/// Bit `0x2` is unassigned.
pub const AUTH_IMMUTABLE_FLAG: u32 = 0x4;

/// The restricted account cannot receive payments.
pub const RESTRICT_INBOUND_FLAG: u32 = 0x1;

/// The restricted account cannot send payments.
pub const RESTRICT_OUTBOUND_FLAG: u32 = 0x2;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Errors raised while loading network configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("network passphrase must not be empty")]
    EmptyPassphrase,

    #[error("malformed network config: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The network a transaction is signed for.
///
/// Signatures commit to `network_id()`, so a transaction signed for the test
/// network can never be replayed on the public one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    passphrase: String,
}

impl Network {
    /// Creates a network from an arbitrary passphrase (private networks,
    /// standalone test ledgers).
    pub fn new(passphrase: impl Into<String>) -> Result<Self, ConfigError> {
        let passphrase = passphrase.into();
        if passphrase.is_empty() {
            return Err(ConfigError::EmptyPassphrase);
        }
        Ok(Self { passphrase })
    }

    /// The production network.
    pub fn public() -> Self {
        Self {
            passphrase: PUBLIC_NETWORK_PASSPHRASE.to_string(),
        }
    }

    /// The shared test network.
    pub fn testnet() -> Self {
        Self {
            passphrase: TESTNET_NETWORK_PASSPHRASE.to_string(),
        }
    }

    /// Loads a network from a JSON document such as
    /// `{"passphrase": "Test Ledger Network ; September 2015"}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let network: Network = serde_json::from_str(json)?;
        Self::new(network.passphrase)
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// SHA-256 of the passphrase. Prefixed to every signature payload.
    pub fn network_id(&self) -> [u8; 32] {
        sha256_array(self.passphrase.as_bytes())
    }
}
