//! Proportional cascade of portfolio-level edits
//!
//! When the portfolio's period sales or liquidation is edited directly, the
//! new total is spread over the distributors in proportion to each one's
//! share of the old total. Each distributor's share is rounded on its own
//! (volume to whole units, value to cents), so the cascaded figures may
//! drift from the new total by a few units; the drift is reported rather
//! than corrected.

use core_kernel::{DistributorId, StockMeasure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument, warn};

use crate::error::LiquidationError;
use crate::portfolio::LiquidationPortfolio;
use crate::tuple::StockTuple;

/// A portfolio field that can be cascaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeField {
    PeriodSales,
    Liquidation,
}

impl CascadeField {
    /// Reads this field from a tuple
    pub fn of(&self, tuple: &StockTuple) -> StockMeasure {
        match self {
            CascadeField::PeriodSales => tuple.period_sales(),
            CascadeField::Liquidation => tuple.liquidation(),
        }
    }
}

impl fmt::Display for CascadeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeField::PeriodSales => write!(f, "period_sales"),
            CascadeField::Liquidation => write!(f, "liquidation"),
        }
    }
}

/// New portfolio totals to cascade; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEdit {
    #[serde(default)]
    pub period_sales: Option<StockMeasure>,
    #[serde(default)]
    pub liquidation: Option<StockMeasure>,
}

impl PortfolioEdit {
    pub fn period_sales(mut self, total: StockMeasure) -> Self {
        self.period_sales = Some(total);
        self
    }

    pub fn liquidation(mut self, total: StockMeasure) -> Self {
        self.liquidation = Some(total);
        self
    }

    /// The edited fields, period sales first
    pub fn fields(&self) -> Vec<(CascadeField, StockMeasure)> {
        let mut fields = Vec::with_capacity(2);
        if let Some(total) = self.period_sales {
            fields.push((CascadeField::PeriodSales, total));
        }
        if let Some(total) = self.liquidation {
            fields.push((CascadeField::Liquidation, total));
        }
        fields
    }
}

/// Difference between the cascaded distributor figures and the edited total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeDrift {
    pub field: CascadeField,
    pub target: StockMeasure,
    pub cascaded_total: StockMeasure,
}

impl CascadeDrift {
    /// Signed volume drift, cascaded minus target
    pub fn volume_drift(&self) -> Decimal {
        self.cascaded_total.volume - self.target.volume
    }

    /// Signed value drift, cascaded minus target
    pub fn value_drift(&self) -> Decimal {
        self.cascaded_total.value - self.target.value
    }
}

/// Outcome of a cascade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeReport {
    /// The re-derived portfolio tuple
    pub portfolio: StockTuple,
    /// Distributors whose tuples were recomputed
    pub adjusted: Vec<DistributorId>,
    /// Fields not cascaded because their old portfolio volume was zero
    pub skipped_fields: Vec<CascadeField>,
    pub drift: Vec<CascadeDrift>,
    /// Warnings raised by recomputed distributor tuples, prefixed by code
    pub warnings: Vec<String>,
}

impl LiquidationPortfolio {
    /// Cascades new portfolio totals down to the distributors
    ///
    /// For each edited field, distributor `d` receives
    /// `new_total × d.volume / old_total.volume`. Every distributor is then
    /// recomputed; if any one fails validation the whole cascade is
    /// abandoned and no distributor is changed.
    ///
    /// # Errors
    ///
    /// - `Quantity` when an edited total is negative
    /// - `InconsistentCascade` naming the first distributor that fails
    #[instrument(skip(self, edit))]
    pub fn cascade_portfolio_update(&mut self, edit: PortfolioEdit) -> Result<CascadeReport, LiquidationError> {
        let fields = edit.fields();
        for (_, total) in &fields {
            StockMeasure::try_new(total.volume, total.value)?;
        }

        let old = self.portfolio.clone();
        let mut staged: Vec<(StockMeasure, StockMeasure, StockMeasure)> = self
            .distributors
            .iter()
            .map(|record| {
                let tuple = record.tuple();
                (tuple.opening_stock(), tuple.period_sales(), tuple.liquidation())
            })
            .collect();

        let mut applied = Vec::new();
        let mut skipped_fields = Vec::new();
        for (field, target) in fields {
            let old_total = field.of(&old);
            if old_total.volume.is_zero() {
                warn!(%field, "Portfolio total is zero; field not cascaded");
                skipped_fields.push(field);
                continue;
            }

            for (record, inputs) in self.distributors.iter().zip(staged.iter_mut()) {
                let share = field.of(record.tuple()).volume / old_total.volume;
                let cascaded = target.scale(share);
                match field {
                    CascadeField::PeriodSales => inputs.1 = cascaded,
                    CascadeField::Liquidation => inputs.2 = cascaded,
                }
            }
            applied.push((field, target));
        }

        if applied.is_empty() {
            return Ok(CascadeReport {
                portfolio: old,
                adjusted: Vec::new(),
                skipped_fields,
                drift: Vec::new(),
                warnings: Vec::new(),
            });
        }

        let at = self.calculator.now();
        let mut candidates = Vec::with_capacity(self.distributors.len());
        let mut warnings = Vec::new();
        for (record, (opening, period_sales, liquidation)) in self.distributors.iter().zip(staged) {
            let outcome = self
                .calculator
                .compute_tuple_at(opening, period_sales, liquidation, at)
                .map_err(|e| {
                    warn!(distributor_id = %record.id(), errors = ?e.errors(), "Cascade aborted");
                    LiquidationError::InconsistentCascade {
                        distributor_id: record.id(),
                        errors: e.errors().to_vec(),
                    }
                })?;

            let code = &record.profile().code;
            warnings.extend(outcome.warnings.into_iter().map(|w| format!("{}: {}", code, w)));

            let mut candidate = record.clone();
            candidate.replace_tuple(outcome.tuple);
            candidates.push(candidate);
        }

        let portfolio = self.aggregate(candidates.iter())?;
        let drift = applied
            .iter()
            .map(|&(field, target)| CascadeDrift {
                field,
                target,
                cascaded_total: candidates.iter().map(|c| field.of(c.tuple())).sum(),
            })
            .collect();
        let adjusted = candidates.iter().map(|c| c.id()).collect();

        self.distributors = candidates;
        self.portfolio = portfolio.clone();
        info!(
            distributors = self.distributors.len(),
            liquidation_percentage = portfolio.liquidation_percentage(),
            "Portfolio cascade applied"
        );

        Ok(CascadeReport {
            portfolio,
            adjusted,
            skipped_fields,
            drift,
            warnings,
        })
    }
}
