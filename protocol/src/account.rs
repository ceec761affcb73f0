//! # Account
//!
//! The caller-owned view of a ledger account: its id, its current sequence
//! number and the per-operation fee it pays. The library never fetches this
//! state; callers load it from the network and hand it to the transaction
//! builder, which bumps the sequence once per built transaction.
//!
//! `Account` is not internally synchronized. Building transactions for one
//! account from several threads needs a lock around build + increment at the
//! call site (see `tests/e2e.rs`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BASE_FEE;
use crate::strkey::{self, StrKeyError};

/// Errors raised while constructing or mutating an [`Account`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("invalid account id: {0}")]
    InvalidAccountId(StrKeyError),

    #[error("sequence must be a decimal unsigned integer, got {0:?}")]
    InvalidSequence(String),

    #[error("sequence number overflow")]
    SequenceOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    account_id: String,
    sequence: u64,
    base_fee: u32,
}

impl Account {
    /// Creates an account from its `G...` id and its current sequence
    /// number as a decimal string (the form the network reports it in).
    pub fn new(account_id: &str, sequence: &str) -> Result<Self, AccountError> {
        strkey::decode_ed25519_public_key(account_id).map_err(AccountError::InvalidAccountId)?;

        if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountError::InvalidSequence(sequence.to_string()));
        }
        let sequence = sequence
            .parse::<u64>()
            .map_err(|_| AccountError::InvalidSequence(sequence.to_string()))?;

        Ok(Self {
            account_id: account_id.to_string(),
            sequence,
            base_fee: BASE_FEE,
        })
    }

    /// Overrides the per-operation fee (stroops) used by default when
    /// building transactions for this account.
    pub fn with_base_fee(mut self, base_fee: u32) -> Self {
        self.base_fee = base_fee;
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence
    }

    pub fn base_fee(&self) -> u32 {
        self.base_fee
    }

    /// Advances the sequence number by exactly one.
    pub fn increment_sequence_number(&mut self) -> Result<(), AccountError> {
        self.sequence = self
            .sequence
            .checked_add(1)
            .ok_or(AccountError::SequenceOverflow)?;
        Ok(())
    }
}
