//! Money helpers with two-digit decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` normalized to two fraction digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// Scale (fraction digits) of every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Default balance tolerance (0.01), absorbing rounding from currency input.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest amount a single line may carry: 17 integer and 2 fraction digits,
/// the range of a `NUMERIC(19, 2)` column.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, 2);

/// Normalizes an amount to two fraction digits, rounding half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if `a` and `b` differ by no more than `tolerance`.
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

/// Returns true if `amount` is zero within `tolerance`.
#[must_use]
pub fn is_negligible(amount: Decimal, tolerance: Decimal) -> bool {
    within_tolerance(amount, Decimal::ZERO, tolerance)
}
