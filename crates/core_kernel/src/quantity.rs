//! Stock measures with precise decimal arithmetic
//!
//! Every stock metric in the engine is a pair of a physical volume (units,
//! litres, kilograms) and a monetary value. Both halves use rust_decimal so
//! that conservation checks are not disturbed by floating-point drift.
//!
//! Upstream data sources are not guaranteed clean: figures may be missing,
//! `NaN`, infinite or negative. [`RawMeasure`] is the permissive boundary
//! shape and [`RawMeasure::sanitize`] is the only way into a [`StockMeasure`]
//! from untrusted input.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Decimal places kept for monetary values
pub const VALUE_PRECISION: u32 = 2;

/// Errors that can occur when constructing stock measures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Negative {field}: {amount}")]
    Negative { field: &'static str, amount: Decimal },

    #[error("Invalid quantity: {0}")]
    Invalid(String),
}

/// Rounds a monetary value to two decimal places, half away from zero
pub fn round_value(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(VALUE_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a volume to whole units, half away from zero
pub fn round_volume(volume: Decimal) -> Decimal {
    volume.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// A volume/value pair describing one stock metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StockMeasure {
    pub volume: Decimal,
    pub value: Decimal,
}

impl StockMeasure {
    /// Creates a measure without any sanitization
    pub fn new(volume: Decimal, value: Decimal) -> Self {
        Self { volume, value }
    }

    /// Creates a measure, rejecting negative halves
    pub fn try_new(volume: Decimal, value: Decimal) -> Result<Self, QuantityError> {
        if volume.is_sign_negative() && !volume.is_zero() {
            return Err(QuantityError::Negative { field: "volume", amount: volume });
        }
        if value.is_sign_negative() && !value.is_zero() {
            return Err(QuantityError::Negative { field: "value", amount: value });
        }
        Ok(Self { volume, value })
    }

    /// The zero measure
    pub fn zero() -> Self {
        Self {
            volume: Decimal::ZERO,
            value: Decimal::ZERO,
        }
    }

    /// Returns true if both halves are zero
    pub fn is_zero(&self) -> bool {
        self.volume.is_zero() && self.value.is_zero()
    }

    /// Returns true if either half is below zero
    pub fn is_negative(&self) -> bool {
        self.volume < Decimal::ZERO || self.value < Decimal::ZERO
    }

    /// Clamps both halves at zero
    pub fn clamp_non_negative(&self) -> Self {
        Self {
            volume: self.volume.max(Decimal::ZERO),
            value: self.value.max(Decimal::ZERO),
        }
    }

    /// Subtraction floored at zero on each half
    pub fn saturating_sub(&self, other: &StockMeasure) -> Self {
        Self {
            volume: self.volume.saturating_sub(other.volume).max(Decimal::ZERO),
            value: self.value.saturating_sub(other.value).max(Decimal::ZERO),
        }
    }

    /// Addition returning `None` if either half leaves the decimal range
    pub fn checked_add(&self, other: &StockMeasure) -> Option<Self> {
        Some(Self {
            volume: self.volume.checked_add(other.volume)?,
            value: self.value.checked_add(other.value)?,
        })
    }

    /// Scales both halves by a share; volume to whole units, value to cents
    pub fn scale(&self, share: Decimal) -> Self {
        Self {
            volume: round_volume(self.volume * share),
            value: round_value(self.value * share),
        }
    }

    /// Rounds the value half to currency precision
    pub fn with_rounded_value(&self) -> Self {
        Self {
            volume: self.volume,
            value: round_value(self.value),
        }
    }
}

impl fmt::Display for StockMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units / {:.2}", self.volume.normalize(), self.value)
    }
}

impl Add for StockMeasure {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            volume: self.volume + other.volume,
            value: self.value + other.value,
        }
    }
}

impl Sub for StockMeasure {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            volume: self.volume - other.volume,
            value: self.value - other.value,
        }
    }
}

impl Sum for StockMeasure {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(StockMeasure::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a StockMeasure> for StockMeasure {
    fn sum<I: Iterator<Item = &'a StockMeasure>>(iter: I) -> Self {
        iter.fold(StockMeasure::zero(), |acc, m| acc + *m)
    }
}

/// Unsanitized measure as delivered by upstream data sources
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMeasure {
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl RawMeasure {
    pub fn new(volume: f64, value: f64) -> Self {
        Self {
            volume: Some(volume),
            value: Some(value),
        }
    }

    /// Coerces both halves to non-negative decimals
    ///
    /// Missing, `NaN` and infinite figures become zero, as do negatives.
    pub fn sanitize(&self) -> StockMeasure {
        StockMeasure {
            volume: sanitize_number(self.volume),
            value: sanitize_number(self.value),
        }
    }
}

impl From<StockMeasure> for RawMeasure {
    fn from(measure: StockMeasure) -> Self {
        use rust_decimal::prelude::ToPrimitive;
        Self {
            volume: measure.volume.to_f64(),
            value: measure.value.to_f64(),
        }
    }
}

fn sanitize_number(raw: Option<f64>) -> Decimal {
    raw.filter(|n| n.is_finite())
        .and_then(Decimal::from_f64)
        .map(|d| d.max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sanitize_defaults_nan_to_zero() {
        let raw = RawMeasure {
            volume: Some(f64::NAN),
            value: None,
        };
        assert_eq!(raw.sanitize(), StockMeasure::zero());
    }

    #[test]
    fn test_checked_add_detects_overflow() {
        let huge = StockMeasure::new(Decimal::MAX, dec!(1));
        assert_eq!(huge.checked_add(&StockMeasure::new(dec!(1), dec!(1))), None);
        assert_eq!(
            StockMeasure::new(dec!(2), dec!(3)).checked_add(&StockMeasure::new(dec!(4), dec!(5))),
            Some(StockMeasure::new(dec!(6), dec!(8)))
        );
    }

    #[test]
    fn test_saturating_sub_at_range_limits() {
        let top = StockMeasure::new(Decimal::MAX, Decimal::MAX);
        let negative = StockMeasure::new(dec!(-1), dec!(-1));
        assert_eq!(top.saturating_sub(&negative), top);
        assert_eq!(negative.saturating_sub(&top), StockMeasure::zero());
    }

    #[test]
    fn test_round_value_half_away_from_zero() {
        assert_eq!(round_value(dec!(10.005)), dec!(10.01));
        assert_eq!(round_volume(dec!(2.5)), dec!(3));
    }
}
