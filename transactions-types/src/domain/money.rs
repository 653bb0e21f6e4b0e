//! Monetary rounding rules.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for stored and converted amounts.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to cents, half away from zero.
///
/// Used both when a purchase amount is stored and when a converted
/// amount is computed, so `150.75 * 5.5 = 829.125` becomes `829.13`.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
