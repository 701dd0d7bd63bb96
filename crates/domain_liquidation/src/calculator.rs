//! Metrics calculator
//!
//! Computes the stock tuple of one entity from its opening stock, period
//! sales and liquidation. Inputs are sanitized, the balance and percentage
//! are derived, and the candidate tuple must pass the stock conservation
//! rule before it is returned.

use chrono::{DateTime, Utc};
use core_kernel::{round_value, RawMeasure, StockMeasure};
use domain_rules::{liquidation_percentage, RuleCheck, RuleThresholds, RuleValidator};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::MetricsError;
use crate::tuple::StockTuple;

/// Source of the `last_updated` timestamp
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A computed tuple and the advisory warnings raised while computing it
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsOutcome {
    pub tuple: StockTuple,
    pub warnings: Vec<String>,
}

/// Computes validated stock tuples
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    validator: RuleValidator,
    clock: Arc<dyn Clock>,
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new(RuleThresholds::default())
    }
}

impl MetricsCalculator {
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self {
            validator: RuleValidator::new(thresholds),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used to stamp tuples
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn validator(&self) -> &RuleValidator {
        &self.validator
    }

    /// Computes a tuple stamped with the calculator's clock
    pub fn compute_tuple(
        &self,
        opening: StockMeasure,
        period_sales: StockMeasure,
        liquidation: StockMeasure,
    ) -> Result<MetricsOutcome, MetricsError> {
        self.compute_tuple_at(opening, period_sales, liquidation, self.clock.now())
    }

    /// Computes a tuple from unsanitized upstream figures
    pub fn compute_tuple_raw(
        &self,
        opening: &RawMeasure,
        period_sales: &RawMeasure,
        liquidation: &RawMeasure,
    ) -> Result<MetricsOutcome, MetricsError> {
        self.compute_tuple(opening.sanitize(), period_sales.sanitize(), liquidation.sanitize())
    }

    /// Computes a tuple stamped with the given instant
    ///
    /// Negative inputs are clamped to zero. The balance is
    /// `max(0, opening + sales - liquidation)` with its value rounded to
    /// cents, and the percentage is liquidation over available volume.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::ConservationViolated` when liquidation exceeds
    /// the available stock. No clamped tuple is produced in that case.
    /// Returns `MetricsError::OutOfRange` when opening plus sales leaves the
    /// decimal range.
    pub fn compute_tuple_at(
        &self,
        opening: StockMeasure,
        period_sales: StockMeasure,
        liquidation: StockMeasure,
        at: DateTime<Utc>,
    ) -> Result<MetricsOutcome, MetricsError> {
        let opening = opening.clamp_non_negative();
        let period_sales = period_sales.clamp_non_negative();
        let liquidation = liquidation.clamp_non_negative();

        let available = opening
            .checked_add(&period_sales)
            .ok_or_else(|| MetricsError::out_of_range("Opening stock plus period sales"))?;
        let balance = available.saturating_sub(&liquidation).with_rounded_value();
        let percentage = liquidation_percentage(liquidation.volume, available.volume);

        let tuple = StockTuple::from_parts(opening, period_sales, liquidation, balance, percentage, at);

        let result = self
            .validator
            .validate(&RuleCheck::StockConservation(tuple.conservation_input()));
        if !result.is_valid {
            debug!(errors = ?result.errors, "Stock tuple rejected");
            return Err(MetricsError::ConservationViolated { errors: result.errors });
        }

        Ok(MetricsOutcome {
            tuple,
            warnings: result.warnings,
        })
    }
}
