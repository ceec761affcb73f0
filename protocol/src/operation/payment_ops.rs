//! Operations that move value: payments, emission, settlement and fees.
//!
//! Every amount here must be strictly positive; the only operation that
//! accepts zero is `createAccount`.

use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::error::OperationError;
use super::validate::{check_account_id, check_amount, check_source, render_account_id};
use crate::amount::from_ledger_amount;
use crate::xdr::{
    EmissionOp, Operation, OperationBody, PaymentOp, SetFeeOp, SettlementOp, SpendFeeOp,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOptions {
    pub destination: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Builds a payment in the native asset.
pub fn payment(opts: &PaymentOptions) -> Result<Operation, OperationError> {
    let destination = check_account_id("destination", &opts.destination)?;
    let amount = check_amount("amount", &opts.amount, false)?;
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::Payment(PaymentOp {
            destination,
            asset: Asset::Native.to_wire()?,
            amount,
        }),
    })
}

pub(super) fn decode_payment(
    source: Option<String>,
    op: &PaymentOp,
) -> Result<PaymentOptions, OperationError> {
    match Asset::from_wire(&op.asset) {
        Asset::Native => Ok(PaymentOptions {
            destination: render_account_id(&op.destination),
            amount: from_ledger_amount(op.amount),
            source,
        }),
        Asset::Issued { code, issuer } => {
            Err(OperationError::UnsupportedAsset(format!("{code}:{issuer}")))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionOptions {
    pub destination: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Issues new units of the native asset to `destination`.
pub fn emission(opts: &EmissionOptions) -> Result<Operation, OperationError> {
    let destination = check_account_id("destination", &opts.destination)?;
    let amount = check_amount("amount", &opts.amount, false)?;
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::Emission(EmissionOp {
            destination,
            amount,
        }),
    })
}

pub(super) fn decode_emission(source: Option<String>, op: &EmissionOp) -> EmissionOptions {
    EmissionOptions {
        destination: render_account_id(&op.destination),
        amount: from_ledger_amount(op.amount),
        source,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOptions {
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

pub fn settlement(opts: &SettlementOptions) -> Result<Operation, OperationError> {
    let amount = check_amount("amount", &opts.amount, false)?;
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::Settlement(SettlementOp { amount }),
    })
}

pub(super) fn decode_settlement(source: Option<String>, op: &SettlementOp) -> SettlementOptions {
    SettlementOptions {
        amount: from_ledger_amount(op.amount),
        source,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendFeeOptions {
    pub destination: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Moves collected fees to `destination`.
pub fn spend_fee(opts: &SpendFeeOptions) -> Result<Operation, OperationError> {
    let destination = check_account_id("destination", &opts.destination)?;
    let amount = check_amount("amount", &opts.amount, false)?;
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::SpendFee(SpendFeeOp {
            destination,
            amount,
        }),
    })
}

pub(super) fn decode_spend_fee(source: Option<String>, op: &SpendFeeOp) -> SpendFeeOptions {
    SpendFeeOptions {
        destination: render_account_id(&op.destination),
        amount: from_ledger_amount(op.amount),
        source,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFeeOptions {
    /// Network-wide base fee in stroops. Passed through as-is.
    pub base_fee: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

pub fn set_fee(opts: &SetFeeOptions) -> Result<Operation, OperationError> {
    Ok(Operation {
        source_account: check_source(opts.source.as_deref())?,
        body: OperationBody::SetFee(SetFeeOp {
            base_fee: opts.base_fee,
        }),
    })
}

pub(super) fn decode_set_fee(source: Option<String>, op: &SetFeeOp) -> SetFeeOptions {
    SetFeeOptions {
        base_fee: op.base_fee,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xdr::AccountId;

    const DEST: &str = "GCEZWKCA5VLDNRLN3RPRJMRZOX3Z6G5CHCGSNFHEYVXM3XOJMDS674JZ";

    #[test]
    fn payment_scales_amount_to_stroops() {
        let op = payment(&PaymentOptions {
            destination: DEST.into(),
            amount: "1000".into(),
            source: None,
        })
        .unwrap();
        let OperationBody::Payment(body) = &op.body else {
            panic!("wrong body");
        };
        assert_eq!(body.amount, 10_000_000_000);
        assert_eq!(body.asset, crate::xdr::Asset::Native);
        assert!(op.source_account.is_none());
    }

    #[test]
    fn positive_amounts_required() {
        for amount in ["0", "-1", "abc", "0.00000001"] {
            let err = emission(&EmissionOptions {
                destination: DEST.into(),
                amount: amount.into(),
                source: None,
            })
            .unwrap_err();
            assert!(
                matches!(err, OperationError::InvalidAmount { field: "amount", .. }),
                "{amount:?}"
            );
        }
        assert!(settlement(&SettlementOptions {
            amount: "0".into(),
            source: None
        })
        .is_err());
    }

    #[test]
    fn source_override_is_carried() {
        let op = spend_fee(&SpendFeeOptions {
            destination: DEST.into(),
            amount: "0.0000001".into(),
            source: Some(DEST.into()),
        })
        .unwrap();
        assert!(op.source_account.is_some());
        let OperationBody::SpendFee(body) = &op.body else {
            panic!("wrong body");
        };
        assert_eq!(body.amount, 1);
    }

    #[test]
    fn set_fee_passes_value_through() {
        let op = set_fee(&SetFeeOptions {
            base_fee: 0,
            source: None,
        })
        .unwrap();
        assert_eq!(
            op.body,
            OperationBody::SetFee(SetFeeOp { base_fee: 0 })
        );
    }

    #[test]
    fn issued_asset_payment_not_decoded() {
        let op = PaymentOp {
            destination: AccountId([1u8; 32]),
            asset: crate::xdr::Asset::CreditAlphanum4 {
                code: *b"USD\0",
                issuer: AccountId([2u8; 32]),
            },
            amount: 1,
        };
        assert!(matches!(
            decode_payment(None, &op),
            Err(OperationError::UnsupportedAsset(_))
        ));
    }
}
