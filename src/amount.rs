//! Fixed-point amount conversions.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Amount is not a decimal number: {0}")]
    Malformed(String),

    #[error("Amount has more than {0} decimal places")]
    TooPrecise(u32),
}

fn ten_pow(decimals: u32) -> BigUint {
    BigUint::from(10u32).pow(decimals)
}

/// Renders a fixed-point integer as a decimal string.
///
/// Trailing fractional zeros are trimmed but one digit is always kept, so
/// `10^18` renders as `"1.0"` with 18 decimals.
pub fn format_units(value: &BigUint, decimals: u32) -> String {
    let unit = ten_pow(decimals);
    let whole = value / &unit;
    let fraction = value % &unit;

    if decimals == 0 {
        return format!("{whole}.0");
    }

    let padded = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Parses user input such as `"1.5"` into fixed-point units.
pub fn parse_units(input: &str, decimals: u32) -> Result<BigUint, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return Err(AmountError::Malformed(input.to_string()));
    }
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooPrecise(decimals));
    }

    let whole_units = if whole.is_empty() {
        BigUint::zero()
    } else {
        whole
            .parse::<BigUint>()
            .map_err(|_| AmountError::Malformed(input.to_string()))?
    };
    let fraction_units = if fraction.is_empty() {
        BigUint::zero()
    } else {
        let padded = format!("{fraction:0<width$}", width = decimals as usize);
        padded
            .parse::<BigUint>()
            .map_err(|_| AmountError::Malformed(input.to_string()))?
    };

    Ok(whole_units * ten_pow(decimals) + fraction_units)
}

/// Progress of `raised` towards `goal` in basis points (10_000 = 100%).
///
/// A zero goal has no meaningful ratio and reports 0.
pub fn progress_basis_points(raised: &BigUint, goal: &BigUint) -> u64 {
    if goal.is_zero() {
        return 0;
    }
    let bps = raised * 10_000u32 / goal;
    bps.to_u64().unwrap_or(u64::MAX)
}

/// `5000` → `"50.00"`
pub fn format_basis_points(bps: u64) -> String {
    format!("{}.{:02}", bps / 100, bps % 100)
}
