//! Human amount to base unit conversion
//!
//! UI code works in human token units (e.g. "5.25 USDC"); instructions take
//! raw base units. Conversion happens exactly once, at the settlement
//! boundary, so downstream code never sees floats.

use thiserror::Error;

/// Error returned when a human amount cannot be expressed in base units
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("Amount is not a finite number")]
    NotFinite,

    #[error("Amount must not be negative: {amount}")]
    Negative { amount: f64 },

    #[error("Amount {amount} overflows u64 base units at {decimals} decimals")]
    Overflow { amount: f64, decimals: u8 },
}

/// Convert a human token amount to raw base units, rounding to the nearest
/// base unit.
pub fn to_base_units(human: f64, decimals: u8) -> Result<u64, AmountError> {
    if !human.is_finite() {
        return Err(AmountError::NotFinite);
    }
    if human < 0.0 {
        return Err(AmountError::Negative { amount: human });
    }

    let scaled = (human * 10f64.powi(decimals as i32)).round();
    if scaled > u64::MAX as f64 {
        return Err(AmountError::Overflow {
            amount: human,
            decimals,
        });
    }

    Ok(scaled as u64)
}
