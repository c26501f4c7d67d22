//! Common utility functions for quote calculations.
//!
//! This module provides shared functionality used by both the premium and
//! progress calculations, including rounding and percentage helpers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rounds a decimal value to a whole number, sending exact halves toward
/// positive infinity.
///
/// This matches the rounding the quote screens have always displayed:
/// `2.5` becomes `3` and `-2.5` becomes `-2`.
///
/// # Arguments
///
/// * `value` - The decimal value to round
///
/// # Returns
///
/// The value rounded to zero decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(24749.4)), dec!(24749));
/// assert_eq!(round_half_up(dec!(24749.5)), dec!(24750));
/// assert_eq!(round_half_up(dec!(-2.5)), dec!(-2));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    (value + dec!(0.5)).floor()
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps an arbitrary integer into the 0-100 percentage range.
///
/// # Examples
///
/// ```
/// use quote_core::calculations::common::clamp_percent;
///
/// assert_eq!(clamp_percent(150), 100);
/// assert_eq!(clamp_percent(-20), 0);
/// assert_eq!(clamp_percent(42), 42);
/// ```
pub fn clamp_percent(value: i64) -> u8 {
    // the clamp guarantees the cast is lossless
    value.clamp(0, 100) as u8
}

/// Percentage of `filled` out of `total`, rounded half-up.
///
/// A form with no required fields counts as complete.
///
/// # Examples
///
/// ```
/// use quote_core::calculations::common::completion_percentage;
///
/// assert_eq!(completion_percentage(1, 6), 17);
/// assert_eq!(completion_percentage(2, 5), 40);
/// assert_eq!(completion_percentage(0, 0), 100);
/// ```
pub fn completion_percentage(
    filled: usize,
    total: usize,
) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = Decimal::from(filled.min(total) as u64) * dec!(100) / Decimal::from(total as u64);
    let rounded = round_half_up(ratio);
    clamp_percent(rounded.try_into().unwrap_or(100))
}
