//! Common utility functions for program calculations.
//!
//! This module provides the arithmetic shared by every calculator: cent
//! rounding, progressive bracket evaluation, linear phase-outs and bracket
//! rate lookups.

use rust_decimal::Decimal;

use crate::models::TaxBracket;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use revdisp_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use revdisp_core::calculations::common::max;
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

/// Returns the amount by which `value` exceeds `threshold`, or zero.
pub fn excess(
    value: Decimal,
    threshold: Decimal,
) -> Decimal {
    max(value - threshold, Decimal::ZERO)
}

/// Applies a progressive bracket schedule to `income`.
///
/// Each band taxes only the part of the income that falls inside it:
/// `Σ rate_i × (min(income, upper_i) − lower_i)` over the bands whose lower
/// bound is below `income`. The result is continuous and non-decreasing in
/// `income`; negative income yields zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use revdisp_core::TaxBracket;
/// use revdisp_core::calculations::common::progressive;
///
/// let brackets = [
///     TaxBracket::new(dec!(0), Some(dec!(50000)), dec!(0.14)),
///     TaxBracket::new(dec!(50000), None, dec!(0.19)),
/// ];
///
/// assert_eq!(progressive(&brackets, dec!(60000)), dec!(8900.00));
/// ```
pub fn progressive(
    brackets: &[TaxBracket],
    income: Decimal,
) -> Decimal {
    brackets
        .iter()
        .take_while(|band| income > band.lower)
        .map(|band| {
            let top = band.upper.map_or(income, |upper| income.min(upper));
            (top - band.lower) * band.rate
        })
        .sum()
}

/// Reduces `base` by `rate` for every dollar of `income` above `threshold`,
/// never going below zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use revdisp_core::calculations::common::phase_out;
///
/// assert_eq!(phase_out(dec!(1000), dec!(0.10), dec!(25000), dec!(20000)), dec!(500.00));
/// assert_eq!(phase_out(dec!(1000), dec!(0.10), dec!(90000), dec!(20000)), dec!(0));
/// ```
pub fn phase_out(
    base: Decimal,
    rate: Decimal,
    income: Decimal,
    threshold: Decimal,
) -> Decimal {
    max(base - rate * excess(income, threshold), Decimal::ZERO)
}

/// Returns the rate of the band containing `income`.
///
/// Used for rate tables (such as the childcare credit) where a single rate
/// applies to the whole amount rather than progressively.
pub fn rate_for(
    brackets: &[TaxBracket],
    income: Decimal,
) -> Option<Decimal> {
    brackets
        .iter()
        .find(|band| band.contains(income))
        .or_else(|| brackets.first().filter(|_| income < Decimal::ZERO))
        .map(|band| band.rate)
}
