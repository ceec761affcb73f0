use thiserror::Error;

use crate::account::AccountError;
use crate::crypto::KeyError;
use crate::operation::OperationError;
use crate::xdr::XdrError;

/// Errors raised while assembling, sealing, signing or decoding a
/// transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A lifecycle step was attempted in the wrong state: signing before
    /// sealing, sealing twice, appending to a sealed transaction, or
    /// sealing with no operations.
    #[error("sequence misuse: {0}")]
    SequenceMisuse(String),

    #[error("too many operations: at most {max}, got {actual}")]
    TooManyOperations { max: usize, actual: usize },

    #[error("too many signatures: at most {max}")]
    TooManySignatures { max: usize },

    /// Per-operation fee times operation count does not fit in a `u32`.
    #[error("fee overflow: {per_operation} x {operations} operations")]
    FeeOverflow {
        per_operation: u32,
        operations: usize,
    },

    #[error("invalid time bounds: min {min_time} > max {max_time}")]
    InvalidTimeBounds { min_time: u64, max_time: u64 },

    #[error("memo text must be at most {max} bytes, got {actual}")]
    MemoTooLong { max: usize, actual: usize },

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Xdr(#[from] XdrError),
}
