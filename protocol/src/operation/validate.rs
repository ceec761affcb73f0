//! Field validators shared by every operation builder.
//!
//! Each helper takes the camelCase field name it is checking so that the
//! resulting [`OperationError`] points at the offending input.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::OperationError;
use crate::amount;
use crate::config::MAX_WEIGHT;
use crate::strkey;
use crate::xdr::AccountId;

/// A flag, weight or threshold as a caller may supply it: an integer, a
/// JSON float that happens to be whole, or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericLike {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<u32> for NumericLike {
    fn from(value: u32) -> Self {
        NumericLike::Integer(i64::from(value))
    }
}

impl From<i64> for NumericLike {
    fn from(value: i64) -> Self {
        NumericLike::Integer(value)
    }
}

impl From<&str> for NumericLike {
    fn from(value: &str) -> Self {
        NumericLike::Text(value.to_string())
    }
}

impl fmt::Display for NumericLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericLike::Integer(v) => write!(f, "{v}"),
            NumericLike::Float(v) => write!(f, "{v}"),
            NumericLike::Text(v) => write!(f, "{v:?}"),
        }
    }
}

fn whole_float(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

impl NumericLike {
    /// The value as a non-negative integer, if it is one.
    fn as_unsigned(&self) -> Option<u64> {
        match self {
            NumericLike::Integer(v) => u64::try_from(*v).ok(),
            NumericLike::Float(v) => whole_float(*v),
            NumericLike::Text(s) => {
                if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                    s.parse::<u64>().ok()
                } else {
                    // "4.0" is a whole number; "inf" and "NaN" parse but are rejected.
                    s.parse::<f64>().ok().and_then(whole_float)
                }
            }
        }
    }
}

/// Parses a 32-bit unsigned flag field.
pub fn check_unsigned(field: &'static str, value: &NumericLike) -> Result<u32, OperationError> {
    value
        .as_unsigned()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| OperationError::InvalidFlagValue {
            field,
            value: value.to_string(),
        })
}

/// Parses a weight or threshold, which must lie in `0..=255`.
pub fn check_weight(field: &'static str, value: &NumericLike) -> Result<u32, OperationError> {
    let parsed = check_unsigned(field, value)?;
    if parsed > MAX_WEIGHT {
        return Err(OperationError::InvalidFlagValue {
            field,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

pub fn check_optional_unsigned(
    field: &'static str,
    value: Option<&NumericLike>,
) -> Result<Option<u32>, OperationError> {
    value.map(|v| check_unsigned(field, v)).transpose()
}

pub fn check_optional_weight(
    field: &'static str,
    value: Option<&NumericLike>,
) -> Result<Option<u32>, OperationError> {
    value.map(|v| check_weight(field, v)).transpose()
}

pub fn check_account_id(field: &'static str, value: &str) -> Result<AccountId, OperationError> {
    strkey::decode_ed25519_public_key(value)
        .map(AccountId)
        .map_err(|reason| OperationError::InvalidAddress { field, reason })
}

pub fn check_source(source: Option<&str>) -> Result<Option<AccountId>, OperationError> {
    source.map(|s| check_account_id("source", s)).transpose()
}

/// Validates an amount string and converts it to stroops.
pub fn check_amount(
    field: &'static str,
    value: &str,
    allow_zero: bool,
) -> Result<i64, OperationError> {
    amount::check_amount(value, allow_zero)
        .map_err(|reason| OperationError::InvalidAmount { field, reason })
}

pub fn check_length(field: &'static str, actual: usize, max: usize) -> Result<(), OperationError> {
    if actual > max {
        return Err(OperationError::InvalidFieldLength { field, max, actual });
    }
    Ok(())
}

pub(crate) fn render_account_id(account: &AccountId) -> String {
    strkey::encode_ed25519_public_key(&account.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_accepts_integers_and_decimal_strings() {
        assert_eq!(check_unsigned("setFlags", &4u32.into()).unwrap(), 4);
        assert_eq!(check_unsigned("setFlags", &"4".into()).unwrap(), 4);
        assert_eq!(check_unsigned("setFlags", &"4.0".into()).unwrap(), 4);
        assert_eq!(
            check_unsigned("setFlags", &NumericLike::Float(5.0)).unwrap(),
            5
        );
        assert_eq!(
            check_unsigned("setFlags", &u32::MAX.into()).unwrap(),
            u32::MAX
        );
    }

    #[test]
    fn unsigned_rejects_negative_fractional_and_non_finite() {
        let bad = [
            NumericLike::Integer(-1),
            NumericLike::Integer(i64::from(u32::MAX) + 1),
            NumericLike::Float(1.5),
            NumericLike::Float(f64::NAN),
            NumericLike::Float(f64::INFINITY),
            NumericLike::Text("abc".into()),
            NumericLike::Text("".into()),
            NumericLike::Text("-3".into()),
            NumericLike::Text("inf".into()),
            NumericLike::Text("NaN".into()),
        ];
        for value in bad {
            assert!(
                matches!(
                    check_unsigned("clearFlags", &value),
                    Err(OperationError::InvalidFlagValue { field: "clearFlags", .. })
                ),
                "{value:?}"
            );
        }
    }

    #[test]
    fn weight_is_bounded() {
        assert_eq!(check_weight("masterWeight", &255u32.into()).unwrap(), 255);
        assert_eq!(check_weight("masterWeight", &0u32.into()).unwrap(), 0);
        assert!(check_weight("masterWeight", &256u32.into()).is_err());
    }

    #[test]
    fn json_numbers_pick_the_right_variant() {
        let v: NumericLike = serde_json::from_str("4").unwrap();
        assert_eq!(v, NumericLike::Integer(4));
        let v: NumericLike = serde_json::from_str("4.5").unwrap();
        assert_eq!(v, NumericLike::Float(4.5));
        let v: NumericLike = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(v, NumericLike::Text("4".into()));
    }

    #[test]
    fn account_id_errors_name_the_field() {
        let err = check_account_id("destination", "GABC").unwrap_err();
        assert!(matches!(
            err,
            OperationError::InvalidAddress { field: "destination", .. }
        ));
    }

    #[test]
    fn length_check() {
        assert!(check_length("name", 64, 64).is_ok());
        assert!(matches!(
            check_length("name", 65, 64),
            Err(OperationError::InvalidFieldLength { max: 64, actual: 65, .. })
        ));
    }
}
