//! Integer money arithmetic
//!
//! Amounts are `i64` minor units (cents). Rates are basis points where
//! 10000 = 100%. Division rounds half away from zero. Sums and products of
//! caller-supplied amounts go through the `checked_*` helpers, which report
//! an out-of-range result as invalid input.

use crate::errors::{InnkeepError, Result};

/// One hundred percent in basis points
pub const BP_SCALE: i64 = 10_000;

/// Divide rounding half away from zero. `denominator` must be non-zero.
pub fn div_round(numerator: i128, denominator: i128) -> i64 {
    debug_assert!(denominator != 0);
    let (n, d) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };
    let half = d / 2;
    let q = if n >= 0 {
        (n + half) / d
    } else {
        (n - half) / d
    };
    q as i64
}

/// Apply a basis-point rate to an amount
pub fn apply_bp(amount_cents: i64, rate_bp: i64) -> i64 {
    div_round(amount_cents as i128 * rate_bp as i128, BP_SCALE as i128)
}

/// `part / whole` expressed in basis points; 0 when `whole` is 0
pub fn ratio_bp(part: i64, whole: i64) -> i64 {
    if whole == 0 {
        return 0;
    }
    div_round(part as i128 * BP_SCALE as i128, whole as i128)
}

/// Average in cents per unit; 0 when `units` is 0
pub fn per_unit(total_cents: i64, units: i64) -> i64 {
    if units == 0 {
        return 0;
    }
    div_round(total_cents as i128, units as i128)
}

fn out_of_range(field: &str) -> InnkeepError {
    InnkeepError::invalid(field, "amount is out of range")
}

/// `a + b`, failing on `field` when the result does not fit
pub fn checked_add(field: &str, a: i64, b: i64) -> Result<i64> {
    a.checked_add(b).ok_or_else(|| out_of_range(field))
}

/// `a × b`, failing on `field` when the result does not fit
pub fn checked_mul(field: &str, a: i64, b: i64) -> Result<i64> {
    a.checked_mul(b).ok_or_else(|| out_of_range(field))
}

/// Sum of `amounts`, failing on `field` at the first overflow
pub fn checked_sum(field: &str, amounts: impl IntoIterator<Item = i64>) -> Result<i64> {
    amounts
        .into_iter()
        .try_fold(0i64, |acc, amount| checked_add(field, acc, amount))
}
