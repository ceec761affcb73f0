//! # Amount & Price Codec
//!
//! Humans write `"12.5"`; the ledger stores `125_000_000` stroops in a signed
//! 64-bit integer. This module is the only place that crosses that boundary.
//!
//! Amounts only ever arrive as decimal strings. There is no `f64` anywhere in
//! this file: every conversion is exact integer arithmetic, so anything that
//! passes [`is_valid_amount`] survives [`to_ledger_amount`] /
//! [`from_ledger_amount`] without losing a stroop.
//!
//! Prices are rationals `n / d` with both terms in `1..=i32::MAX`. Decimal
//! prices are turned into the closest such fraction by walking the continued
//! fraction expansion until the next convergent would overflow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AMOUNT_DECIMALS, MAX_AMOUNT_STROOPS, STROOPS_PER_UNIT};

/// Largest numerator/denominator a ledger price can carry.
const MAX_PRICE_TERM: u128 = i32::MAX as u128;

/// Fractional digits rendered by [`from_ledger_price`].
const PRICE_DECIMALS: usize = 20;

/// u128 holds every 38-digit decimal.
const MAX_PRICE_DIGITS: usize = 38;

/// Errors produced by amount and price conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("not a decimal number: {0:?}")]
    NotANumber(String),

    #[error("amount must not be negative: {0}")]
    Negative(String),

    #[error("amount must be greater than zero")]
    Zero,

    #[error("amount {0} has more than 7 fractional digits")]
    TooManyDecimals(String),

    #[error("amount {0} exceeds the maximum ledger amount")]
    Overflow(String),

    #[error("price terms must be positive: {n}/{d}")]
    NonPositivePrice { n: i64, d: i64 },

    #[error("no price approximation fits 32-bit terms for {0}")]
    NoApproximation(String),
}

// ---------------------------------------------------------------------------
// Decimal parsing
// ---------------------------------------------------------------------------

/// A non-negative decimal split into its digit runs, sign already checked.
struct Decimal<'a> {
    integer: &'a str,
    /// Fractional digits with trailing zeros removed.
    fraction: &'a str,
}

fn parse_decimal(value: &str) -> Result<Decimal<'_>, AmountError> {
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
    {
        return Err(AmountError::NotANumber(value.to_string()));
    }

    let decimal = Decimal {
        integer,
        fraction: fraction.trim_end_matches('0'),
    };
    // "-0" and "-0.000" are still zero, not negative.
    let is_zero = decimal.integer.bytes().all(|b| b == b'0') && decimal.fraction.is_empty();
    if negative && !is_zero {
        return Err(AmountError::Negative(value.to_string()));
    }
    Ok(decimal)
}

/// Parses a decimal string into stroops, rejecting anything that cannot be
/// represented exactly.
fn parse_stroops(value: &str) -> Result<i64, AmountError> {
    let decimal = parse_decimal(value)?;
    if decimal.fraction.len() > AMOUNT_DECIMALS as usize {
        return Err(AmountError::TooManyDecimals(value.to_string()));
    }

    let overflow = || AmountError::Overflow(value.to_string());
    let mut stroops: i64 = 0;
    for digit in decimal.integer.bytes() {
        stroops = stroops
            .checked_mul(10)
            .and_then(|v| v.checked_add((digit - b'0') as i64))
            .ok_or_else(overflow)?;
    }
    stroops = stroops.checked_mul(STROOPS_PER_UNIT).ok_or_else(overflow)?;

    let mut fraction: i64 = 0;
    for digit in decimal.fraction.bytes() {
        fraction = fraction * 10 + (digit - b'0') as i64;
    }
    fraction *= 10i64.pow(AMOUNT_DECIMALS - decimal.fraction.len() as u32);

    stroops.checked_add(fraction).ok_or_else(overflow)
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Checks that `value` is a decimal amount the ledger can hold exactly.
///
/// Accepts non-negative decimals with at most 7 significant fractional
/// digits whose stroop value fits in `0..=i64::MAX`. Zero is only accepted
/// when `allow_zero` is set.
pub fn is_valid_amount(value: &str, allow_zero: bool) -> bool {
    check_amount(value, allow_zero).is_ok()
}

/// [`is_valid_amount`] with the reason for rejection.
pub fn check_amount(value: &str, allow_zero: bool) -> Result<i64, AmountError> {
    let stroops = parse_stroops(value)?;
    if stroops == 0 && !allow_zero {
        return Err(AmountError::Zero);
    }
    debug_assert!(stroops <= MAX_AMOUNT_STROOPS);
    Ok(stroops)
}

/// Converts a decimal amount into stroops (`value * 10^7`).
pub fn to_ledger_amount(value: &str) -> Result<i64, AmountError> {
    parse_stroops(value)
}

/// Renders stroops as the shortest exact decimal string.
///
/// `10_000_000_000` becomes `"1000"`, `1` becomes `"0.0000001"`.
pub fn from_ledger_amount(stroops: i64) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let magnitude = (stroops as i128).unsigned_abs();
    let scale = STROOPS_PER_UNIT as u128;
    let whole = magnitude / scale;
    let fraction = magnitude % scale;

    if fraction == 0 {
        return format!("{sign}{whole}");
    }
    let digits = format!("{:0width$}", fraction, width = AMOUNT_DECIMALS as usize);
    format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// A ledger price: `n / d`, both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

/// A price as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// An explicit fraction, used as-is.
    Ratio { n: i32, d: i32 },
    /// A decimal string, approximated by a fraction.
    Decimal(String),
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        Self::Decimal(value.to_string())
    }
}

impl From<(i32, i32)> for PriceInput {
    fn from((n, d): (i32, i32)) -> Self {
        Self::Ratio { n, d }
    }
}

/// Converts a caller price into a ledger [`Price`].
pub fn to_ledger_price(input: impl Into<PriceInput>) -> Result<Price, AmountError> {
    match input.into() {
        PriceInput::Ratio { n, d } => {
            if n <= 0 || d <= 0 {
                return Err(AmountError::NonPositivePrice {
                    n: n as i64,
                    d: d as i64,
                });
            }
            Ok(Price { n, d })
        }
        PriceInput::Decimal(value) => best_rational_approximation(&value),
    }
}

/// Renders `n / d` as a decimal string (20 fractional digits, half-up,
/// trailing zeros trimmed).
pub fn from_ledger_price(n: i32, d: i32) -> Result<String, AmountError> {
    if d == 0 {
        return Err(AmountError::NonPositivePrice {
            n: n as i64,
            d: d as i64,
        });
    }
    let negative = (n < 0) != (d < 0) && n != 0;
    let num = (n as i64).unsigned_abs() as u128;
    let den = (d as i64).unsigned_abs() as u128;

    let mut whole = num / den;
    let mut rem = num % den;
    let mut digits = Vec::with_capacity(PRICE_DECIMALS);
    for _ in 0..PRICE_DECIMALS {
        rem *= 10;
        digits.push((rem / den) as u8);
        rem %= den;
    }

    if rem * 10 / den >= 5 {
        // Carry the rounding through the digits and into the whole part.
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            whole += 1;
        }
    }

    while digits.last() == Some(&0) {
        digits.pop();
    }

    let sign = if negative { "-" } else { "" };
    if digits.is_empty() {
        return Ok(format!("{sign}{whole}"));
    }
    let fraction: String = digits.iter().map(|d| (b'0' + d) as char).collect();
    Ok(format!("{sign}{whole}.{fraction}"))
}

impl Price {
    /// Decimal rendering of this price.
    pub fn to_decimal_string(&self) -> Result<String, AmountError> {
        from_ledger_price(self.n, self.d)
    }
}

/// Continued-fraction approximation of a decimal string.
///
/// Works on the exact rational `p / q` the decimal denotes, so the result is
/// the same convergent an arbitrary-precision implementation would find.
fn best_rational_approximation(value: &str) -> Result<Price, AmountError> {
    let decimal = parse_decimal(value)?;
    let digits = decimal.integer.trim_start_matches('0').len() + decimal.fraction.len();
    if digits > MAX_PRICE_DIGITS {
        return Err(AmountError::NoApproximation(value.to_string()));
    }

    let mut p: u128 = 0;
    for digit in decimal.integer.bytes().chain(decimal.fraction.bytes()) {
        p = p * 10 + (digit - b'0') as u128;
    }
    let mut q: u128 = 10u128.pow(decimal.fraction.len() as u32);

    // Convergents h/k, seeded with 0/1 and 1/0.
    let (mut h_prev, mut k_prev) = (0u128, 1u128);
    let (mut h, mut k) = (1u128, 0u128);

    loop {
        if p / q > MAX_PRICE_TERM {
            break;
        }
        let a = p / q;
        let rem = p % q;

        let h_next = a * h + h_prev;
        let k_next = a * k + k_prev;
        if h_next > MAX_PRICE_TERM || k_next > MAX_PRICE_TERM {
            break;
        }
        h_prev = h;
        k_prev = k;
        h = h_next;
        k = k_next;

        if rem == 0 {
            break;
        }
        // Next term is 1 / (fractional part) = q / rem.
        p = q;
        q = rem;
    }

    if h == 0 || k == 0 {
        return Err(AmountError::NoApproximation(value.to_string()));
    }
    Ok(Price {
        n: h as i32,
        d: k as i32,
    })
}
