//! Error types for operation construction and decoding.
//!
//! Construction fails on the first invalid field and names it; decoding only
//! fails on tags this library does not know.

use thiserror::Error;

use crate::amount::AmountError;
use crate::strkey::StrKeyError;
use crate::xdr::XdrError;

/// Errors that can occur while building or decoding an operation.
#[derive(Debug, Error)]
pub enum OperationError {
    /// A field that must hold a StrKey did not decode as the right kind.
    #[error("{field} is invalid: {reason}")]
    InvalidAddress {
        field: &'static str,
        reason: StrKeyError,
    },

    /// An amount failed the ledger amount contract.
    #[error("{field} must be a valid amount: {reason}")]
    InvalidAmount {
        field: &'static str,
        reason: AmountError,
    },

    /// A flag, weight or threshold is not an unsigned integer in range.
    #[error("{field} has invalid value {value}")]
    InvalidFlagValue { field: &'static str, value: String },

    /// A string or buffer exceeds its byte limit.
    #[error("{field} must be at most {max} bytes, got {actual}")]
    InvalidFieldLength {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// The signer does not carry exactly one key, or its key is malformed.
    #[error("invalid signer: {0}")]
    InvalidSignerSpec(String),

    /// Payments decoded from the wire must use the native asset.
    #[error("unsupported payment asset: {0}")]
    UnsupportedAsset(String),

    /// An asset code is empty, too long or not alphanumeric.
    #[error("invalid asset code {0:?}")]
    InvalidAssetCode(String),

    #[error("unknown operation kind: {0}")]
    UnknownOperationKind(u32),

    #[error("unknown account type: {0}")]
    UnknownAccountType(i32),

    #[error("unknown signer type: {0}")]
    UnknownSignerType(i32),

    #[error(transparent)]
    Xdr(#[from] XdrError),
}
