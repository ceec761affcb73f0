//! # Operations
//!
//! The ten things a transaction can do, described as plain options records
//! and turned into canonical wire [`Operation`](crate::xdr::Operation)s.
//!
//! ## Architecture
//!
//! ```text
//! validate.rs     Field checks shared by every builder (addresses, amounts, flags)
//! asset.rs        Native and issued assets
//! account_ops.rs  createAccount, accountMerge, setOptions, restrictAccount
//! payment_ops.rs  payment, emission, settlement, spendFee, setFee
//! data.rs         manageData
//! error.rs        OperationError
//! ```
//!
//! [`OperationSpec`] is the tagged union over all options records. It
//! serializes as `{"type": "payment", "destination": ..., "amount": ...}`,
//! so the same shape can come from a config file, a request body or code.
//!
//! ## Decoding
//!
//! [`OperationSpec::from_wire_object`] is the inverse of
//! [`OperationSpec::build`]: amounts come back through
//! [`from_ledger_amount`](crate::amount::from_ledger_amount), keys come back
//! as StrKeys, and the per-operation source is restored when present.

pub mod account_ops;
pub mod asset;
pub mod data;
pub mod error;
pub mod payment_ops;
pub mod validate;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use account_ops::{
    account_merge, create_account, restrict_account, set_options, AccountMergeOptions,
    AccountType, CreateAccountOptions, RestrictAccountOptions, SetAccountOptions, SignerOptions,
    SignerType,
};
pub use asset::Asset;
pub use data::{manage_data, DataValue, ManageDataOptions};
pub use error::OperationError;
pub use payment_ops::{
    emission, payment, set_fee, settlement, spend_fee, EmissionOptions, PaymentOptions,
    SetFeeOptions, SettlementOptions, SpendFeeOptions,
};
pub use validate::NumericLike;

use crate::xdr::{self, peek_operation_tag, OperationBody, ReadXdr, WriteXdr, OPERATION_KIND_COUNT};

/// Any operation, as its human-facing options record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OperationSpec {
    CreateAccount(CreateAccountOptions),
    Emission(EmissionOptions),
    Settlement(SettlementOptions),
    Payment(PaymentOptions),
    SetOptions(SetAccountOptions),
    AccountMerge(AccountMergeOptions),
    ManageData(ManageDataOptions),
    SpendFee(SpendFeeOptions),
    SetFee(SetFeeOptions),
    RestrictAccount(RestrictAccountOptions),
}

impl OperationSpec {
    /// The camelCase operation name, as used in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationSpec::CreateAccount(_) => "createAccount",
            OperationSpec::Emission(_) => "emission",
            OperationSpec::Settlement(_) => "settlement",
            OperationSpec::Payment(_) => "payment",
            OperationSpec::SetOptions(_) => "setOptions",
            OperationSpec::AccountMerge(_) => "accountMerge",
            OperationSpec::ManageData(_) => "manageData",
            OperationSpec::SpendFee(_) => "spendFee",
            OperationSpec::SetFee(_) => "setFee",
            OperationSpec::RestrictAccount(_) => "restrictAccount",
        }
    }

    /// The per-operation source override, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            OperationSpec::CreateAccount(o) => o.source.as_deref(),
            OperationSpec::Emission(o) => o.source.as_deref(),
            OperationSpec::Settlement(o) => o.source.as_deref(),
            OperationSpec::Payment(o) => o.source.as_deref(),
            OperationSpec::SetOptions(o) => o.source.as_deref(),
            OperationSpec::AccountMerge(o) => o.source.as_deref(),
            OperationSpec::ManageData(o) => o.source.as_deref(),
            OperationSpec::SpendFee(o) => o.source.as_deref(),
            OperationSpec::SetFee(o) => o.source.as_deref(),
            OperationSpec::RestrictAccount(o) => o.source.as_deref(),
        }
    }

    /// Validates the options and produces the canonical wire operation.
    pub fn build(&self) -> Result<xdr::Operation, OperationError> {
        let result = match self {
            OperationSpec::CreateAccount(o) => create_account(o),
            OperationSpec::Emission(o) => emission(o),
            OperationSpec::Settlement(o) => settlement(o),
            OperationSpec::Payment(o) => payment(o),
            OperationSpec::SetOptions(o) => set_options(o),
            OperationSpec::AccountMerge(o) => account_merge(o),
            OperationSpec::ManageData(o) => manage_data(o),
            OperationSpec::SpendFee(o) => spend_fee(o),
            OperationSpec::SetFee(o) => set_fee(o),
            OperationSpec::RestrictAccount(o) => restrict_account(o),
        };
        if let Err(err) = &result {
            debug!(kind = self.kind(), error = %err, "operation rejected");
        }
        result
    }

    /// Builds the operation and encodes it with the schema codec.
    pub fn to_xdr(&self) -> Result<Vec<u8>, OperationError> {
        Ok(self.build()?.to_xdr()?)
    }

    pub fn to_xdr_base64(&self) -> Result<String, OperationError> {
        Ok(self.build()?.to_xdr_base64()?)
    }

    /// Converts a decoded wire operation back into its options record.
    pub fn from_wire_object(op: &xdr::Operation) -> Result<Self, OperationError> {
        let source = op.source_account.as_ref().map(validate::render_account_id);
        let spec = match &op.body {
            OperationBody::CreateAccount(b) => {
                OperationSpec::CreateAccount(account_ops::decode_create_account(source, b)?)
            }
            OperationBody::Emission(b) => {
                OperationSpec::Emission(payment_ops::decode_emission(source, b))
            }
            OperationBody::Settlement(b) => {
                OperationSpec::Settlement(payment_ops::decode_settlement(source, b))
            }
            OperationBody::Payment(b) => {
                OperationSpec::Payment(payment_ops::decode_payment(source, b)?)
            }
            OperationBody::SetOptions(b) => {
                OperationSpec::SetOptions(account_ops::decode_set_options(source, b)?)
            }
            OperationBody::AccountMerge(b) => {
                OperationSpec::AccountMerge(account_ops::decode_account_merge(source, b))
            }
            OperationBody::ManageData(b) => {
                OperationSpec::ManageData(data::decode_manage_data(source, b))
            }
            OperationBody::SpendFee(b) => {
                OperationSpec::SpendFee(payment_ops::decode_spend_fee(source, b))
            }
            OperationBody::SetFee(b) => OperationSpec::SetFee(payment_ops::decode_set_fee(source, b)),
            OperationBody::RestrictAccount(b) => {
                OperationSpec::RestrictAccount(account_ops::decode_restrict_account(source, b))
            }
        };
        Ok(spec)
    }

    /// Decodes an encoded operation. A body tag this library does not know
    /// is reported as [`OperationError::UnknownOperationKind`].
    pub fn from_xdr(bytes: &[u8]) -> Result<Self, OperationError> {
        let tag = peek_operation_tag(bytes)?;
        if tag >= OPERATION_KIND_COUNT {
            warn!(tag, "unknown operation kind");
            return Err(OperationError::UnknownOperationKind(tag));
        }
        let op = xdr::Operation::from_xdr(bytes)?;
        Self::from_wire_object(&op)
    }

    pub fn from_xdr_base64(encoded: &str) -> Result<Self, OperationError> {
        use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

        let bytes = BASE64.decode(encoded).map_err(xdr::XdrError::from)?;
        Self::from_xdr(&bytes)
    }
}
