//! Money helpers with two-decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` quantized to cents with
//! banker's rounding (round half to even).

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Largest magnitude a `DECIMAL(12, 2)` column holds, `9999999999.99`.
pub const MAX_STORED_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, MONEY_SCALE);

/// Quantizes an amount to cents using round-half-to-even.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Formats an amount with exactly two decimals, e.g. `28.25`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}

/// Returns true if the amount already has at most two decimals.
#[must_use]
pub fn is_cent_precise(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Returns true if the amount is cent-precise and fits a money column.
#[must_use]
pub fn is_storable_amount(amount: Decimal) -> bool {
    is_cent_precise(amount) && amount.abs() <= MAX_STORED_AMOUNT
}
