//! Two-decimal money arithmetic shared by the cost calculator and rollups.

use crate::error::{PlanError, PlanResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Number of decimal places every persisted money value carries.
pub const MONEY_SCALE: u32 = 2;

/// Round half away from zero and pin the scale, so `25000` renders as `25000.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Zero with the money scale applied.
pub fn zero_money() -> Decimal {
    round_money(Decimal::ZERO)
}

/// Parse a user-supplied decimal string. Rejects empty, malformed, and negative input.
pub fn parse_amount(field: &str, raw: &str) -> PlanResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PlanError::validation(format!("{field} is required")));
    }
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| PlanError::validation(format!("{field} must be a decimal number, got {trimmed:?}")))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PlanError::validation(format!("{field} must not be negative")));
    }
    Ok(value)
}
