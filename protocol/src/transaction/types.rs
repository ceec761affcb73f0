//! Value types carried by a transaction: time bounds, memo and the
//! lifecycle state.

use std::fmt;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use crate::config::MAX_MEMO_TEXT_LENGTH;
use crate::xdr;

// ---------------------------------------------------------------------------
// TimeBounds
// ---------------------------------------------------------------------------

/// Validity window in Unix seconds. `max_time == 0` means no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    pub fn new(min_time: u64, max_time: u64) -> Result<Self, TransactionError> {
        let bounds = Self { min_time, max_time };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Valid from now on until `timeout` from now.
    pub fn expiring_in(timeout: Duration) -> Self {
        let deadline = (Utc::now() + timeout).timestamp().max(0) as u64;
        Self {
            min_time: 0,
            max_time: deadline,
        }
    }

    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.max_time != 0 && self.min_time > self.max_time {
            return Err(TransactionError::InvalidTimeBounds {
                min_time: self.min_time,
                max_time: self.max_time,
            });
        }
        Ok(())
    }

    /// Returns `true` if `unix_seconds` falls inside the window.
    pub fn contains(&self, unix_seconds: u64) -> bool {
        unix_seconds >= self.min_time && (self.max_time == 0 || unix_seconds <= self.max_time)
    }

    pub(crate) fn to_wire(self) -> xdr::TimeBounds {
        xdr::TimeBounds {
            min_time: self.min_time,
            max_time: self.max_time,
        }
    }

    pub(crate) fn from_wire(bounds: &xdr::TimeBounds) -> Self {
        Self {
            min_time: bounds.min_time,
            max_time: bounds.max_time,
        }
    }
}

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Memo {
    #[default]
    None,
    /// At most 28 bytes of UTF-8.
    Text(String),
    Id(u64),
    Hash([u8; 32]),
    Return([u8; 32]),
}

impl Memo {
    pub fn text(text: impl Into<String>) -> Result<Self, TransactionError> {
        let memo = Memo::Text(text.into());
        memo.validate()?;
        Ok(memo)
    }

    pub fn validate(&self) -> Result<(), TransactionError> {
        if let Memo::Text(text) = self {
            if text.len() > MAX_MEMO_TEXT_LENGTH {
                return Err(TransactionError::MemoTooLong {
                    max: MAX_MEMO_TEXT_LENGTH,
                    actual: text.len(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn to_wire(&self) -> xdr::Memo {
        match self {
            Memo::None => xdr::Memo::None,
            Memo::Text(text) => xdr::Memo::Text(text.clone()),
            Memo::Id(id) => xdr::Memo::Id(*id),
            Memo::Hash(hash) => xdr::Memo::Hash(*hash),
            Memo::Return(hash) => xdr::Memo::Return(*hash),
        }
    }

    pub(crate) fn from_wire(memo: &xdr::Memo) -> Self {
        match memo {
            xdr::Memo::None => Memo::None,
            xdr::Memo::Text(text) => Memo::Text(text.clone()),
            xdr::Memo::Id(id) => Memo::Id(*id),
            xdr::Memo::Hash(hash) => Memo::Hash(*hash),
            xdr::Memo::Return(hash) => Memo::Return(*hash),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionState
// ---------------------------------------------------------------------------

/// Where a transaction is in its lifecycle. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionState {
    /// Operations may still be appended.
    Building,
    /// Body and signing payload are fixed.
    Sealed,
    /// At least one signature is attached.
    Signed,
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building => write!(f, "Building"),
            Self::Sealed => write!(f, "Sealed"),
            Self::Signed => write!(f, "Signed"),
        }
    }
}
