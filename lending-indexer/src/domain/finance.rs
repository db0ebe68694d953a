//! Derived financial values

use bigdecimal::{BigDecimal, Zero};

/// Scale applied to the market's rate parameter (per-million)
pub const RATE_SCALE: u32 = 1_000_000;

/// Payout to a liquidator: `debt * 1_000_000 / rate`.
///
/// A missing or zero rate yields zero. Negative rates are passed through.
pub fn liquidation_proceeds(rate: Option<&BigDecimal>, debt: &BigDecimal) -> BigDecimal {
    match rate {
        Some(rate) if !rate.is_zero() => debt * BigDecimal::from(RATE_SCALE) / rate,
        _ => BigDecimal::zero(),
    }
}
