//! Distributor portfolio
//!
//! [`LiquidationPortfolio`] is the explicit owned store of distributor
//! records. Every mutation recomputes the affected tuples through the
//! metrics calculator and re-derives the portfolio tuple; a mutation is
//! either applied completely or not at all.

use chrono::{DateTime, Utc};
use core_kernel::{DistributorId, StockMeasure};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::calculator::{MetricsCalculator, MetricsOutcome};
use crate::distributor::{
    DistributorProfile, DistributorRecord, DistributorSeed, DistributorUpdate, FarmerSaleEvent,
};
use crate::error::{LiquidationError, MetricsError};
use crate::ports::TupleSnapshot;
use crate::report::ScopeFilter;
use crate::tuple::StockTuple;

/// Result of a successful single-distributor mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    /// The distributor after the change
    pub record: DistributorRecord,
    /// The re-derived portfolio tuple
    pub portfolio: StockTuple,
    /// Advisory warnings raised by the distributor's new tuple
    pub warnings: Vec<String>,
}

/// Owned store of distributor records and their portfolio tuple
#[derive(Debug, Clone)]
pub struct LiquidationPortfolio {
    pub(crate) calculator: MetricsCalculator,
    pub(crate) distributors: Vec<DistributorRecord>,
    pub(crate) portfolio: StockTuple,
}

impl LiquidationPortfolio {
    /// Creates an empty portfolio
    pub fn new(calculator: MetricsCalculator) -> Self {
        Self {
            calculator,
            distributors: Vec::new(),
            portfolio: StockTuple::empty(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    /// Builds a portfolio from seed data
    ///
    /// # Errors
    ///
    /// Fails on the first seed that is structurally invalid, duplicates an
    /// earlier id, or whose figures violate stock conservation.
    pub fn from_seeds(
        calculator: MetricsCalculator,
        seeds: impl IntoIterator<Item = DistributorSeed>,
    ) -> Result<Self, LiquidationError> {
        let mut portfolio = Self::new(calculator);
        for seed in seeds {
            let (record, _) = portfolio.record_from_seed(&seed)?;
            portfolio.distributors.push(record);
        }
        portfolio.recompute_portfolio()?;
        Ok(portfolio)
    }

    pub fn calculator(&self) -> &MetricsCalculator {
        &self.calculator
    }

    /// Distributors in onboarding order
    pub fn distributors(&self) -> &[DistributorRecord] {
        &self.distributors
    }

    pub fn distributor(&self, id: DistributorId) -> Option<&DistributorRecord> {
        self.distributors.iter().find(|record| record.id() == id)
    }

    /// The portfolio tuple over every distributor
    pub fn portfolio(&self) -> &StockTuple {
        &self.portfolio
    }

    pub fn len(&self) -> usize {
        self.distributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distributors.is_empty()
    }

    /// Current tuples of every distributor, for handing to a persistence port
    pub fn snapshots(&self) -> Vec<TupleSnapshot> {
        self.distributors.iter().map(TupleSnapshot::from).collect()
    }

    /// Onboards one distributor and re-derives the portfolio
    #[instrument(skip(self, seed), fields(distributor_id = %seed.id))]
    pub fn onboard(&mut self, seed: DistributorSeed) -> Result<UpdateOutcome, LiquidationError> {
        let (record, warnings) = self.record_from_seed(&seed)?;
        let portfolio = self.aggregate(self.distributors.iter().chain(std::iter::once(&record)))?;

        self.distributors.push(record.clone());
        self.portfolio = portfolio.clone();
        info!(code = %record.profile().code, "Distributor onboarded");

        Ok(UpdateOutcome {
            record,
            portfolio,
            warnings,
        })
    }

    /// Re-derives the portfolio tuple from the current distributor tuples
    ///
    /// Only opening stock, period sales and liquidation are summed; balance
    /// and percentage are recomputed from the sums.
    pub fn recompute_portfolio(&mut self) -> Result<&StockTuple, LiquidationError> {
        let tuple = self.aggregate(self.distributors.iter())?;
        debug!(
            distributors = self.distributors.len(),
            liquidation_percentage = tuple.liquidation_percentage(),
            "Portfolio recomputed"
        );
        self.portfolio = tuple;
        Ok(&self.portfolio)
    }

    /// The portfolio tuple over the distributors matching `filter`
    pub fn portfolio_for(&self, filter: &ScopeFilter) -> Result<StockTuple, LiquidationError> {
        self.aggregate(
            self.distributors
                .iter()
                .filter(|record| filter.matches(record.profile())),
        )
    }

    /// Replaces some of a distributor's input metrics
    ///
    /// A new liquidation is first checked against the distributor's current
    /// opening stock plus period sales; the merged figures must then pass
    /// the metrics calculator.
    ///
    /// # Errors
    ///
    /// - `DistributorNotFound` for an unknown id
    /// - `LiquidationExceedsAvailable` when the new liquidation volume
    ///   exceeds the current available volume
    /// - `Validation` when the recomputed tuple fails conservation
    #[instrument(skip(self, update), fields(distributor_id = %id))]
    pub fn update_distributor(
        &mut self,
        id: DistributorId,
        update: DistributorUpdate,
    ) -> Result<UpdateOutcome, LiquidationError> {
        let index = self.index_of(id)?;
        let current = self.distributors[index].tuple().clone();

        if let Some(liquidation) = update.liquidation {
            let available = current.available();
            if liquidation.volume > available.volume {
                warn!(
                    requested = %liquidation.volume,
                    available = %available.volume,
                    "Liquidation update rejected"
                );
                return Err(LiquidationError::LiquidationExceedsAvailable {
                    distributor_id: id,
                    requested: liquidation.volume.normalize(),
                    available: available.volume.normalize(),
                });
            }
        }

        let outcome = self
            .calculator
            .compute_tuple(
                update.opening_stock.unwrap_or(current.opening_stock()),
                update.period_sales.unwrap_or(current.period_sales()),
                update.liquidation.unwrap_or(current.liquidation()),
            )
            .map_err(|e| {
                warn!(errors = ?e.errors(), "Distributor update rejected");
                LiquidationError::Validation {
                    distributor_id: id,
                    errors: e.errors().to_vec(),
                }
            })?;

        self.commit_single(index, outcome)
    }

    /// Adds a farmer sale to a distributor's liquidation
    pub fn record_farmer_sale(
        &mut self,
        id: DistributorId,
        event: FarmerSaleEvent,
    ) -> Result<UpdateOutcome, LiquidationError> {
        let index = self.index_of(id)?;
        let liquidation = self.distributors[index]
            .tuple()
            .liquidation()
            .checked_add(&event.sold())
            .ok_or_else(|| LiquidationError::Validation {
                distributor_id: id,
                errors: MetricsError::out_of_range("Liquidation plus farmer sale").errors().to_vec(),
            })?;
        self.update_distributor(id, DistributorUpdate::default().liquidation(liquidation))
    }

    pub(crate) fn index_of(&self, id: DistributorId) -> Result<usize, LiquidationError> {
        self.distributors
            .iter()
            .position(|record| record.id() == id)
            .ok_or(LiquidationError::DistributorNotFound(id))
    }

    /// Sums the input metrics of `records` and derives their tuple
    ///
    /// The tuple is stamped with the latest `last_updated` among the
    /// records, so deriving twice from the same records is deterministic.
    pub(crate) fn aggregate<'a>(
        &self,
        records: impl Iterator<Item = &'a DistributorRecord>,
    ) -> Result<StockTuple, LiquidationError> {
        let mut opening = StockMeasure::zero();
        let mut period_sales = StockMeasure::zero();
        let mut liquidation = StockMeasure::zero();
        let mut latest = DateTime::<Utc>::UNIX_EPOCH;

        for record in records {
            let tuple = record.tuple();
            opening = opening
                .checked_add(&tuple.opening_stock())
                .ok_or_else(|| MetricsError::out_of_range("Portfolio opening stock"))?;
            period_sales = period_sales
                .checked_add(&tuple.period_sales())
                .ok_or_else(|| MetricsError::out_of_range("Portfolio period sales"))?;
            liquidation = liquidation
                .checked_add(&tuple.liquidation())
                .ok_or_else(|| MetricsError::out_of_range("Portfolio liquidation"))?;
            latest = latest.max(tuple.last_updated());
        }

        let outcome = self
            .calculator
            .compute_tuple_at(opening, period_sales, liquidation, latest)?;
        Ok(outcome.tuple)
    }

    fn record_from_seed(
        &self,
        seed: &DistributorSeed,
    ) -> Result<(DistributorRecord, Vec<String>), LiquidationError> {
        seed.validate()
            .map_err(|e| LiquidationError::InvalidSeed(format!("{}: {}", seed.id, e)))?;

        let profile = DistributorProfile::from(seed);
        let blank = [&profile.code, &profile.name, &profile.territory, &profile.zone, &profile.state]
            .iter()
            .any(|field| field.is_empty());
        if blank {
            return Err(LiquidationError::InvalidSeed(format!(
                "{}: identity fields cannot be blank",
                seed.id
            )));
        }

        if self.distributor(seed.id).is_some() {
            return Err(LiquidationError::DuplicateDistributor(seed.id));
        }

        let at = seed.last_updated.unwrap_or_else(|| self.calculator.now());
        let outcome = self
            .calculator
            .compute_tuple_at(
                seed.opening_stock.sanitize(),
                seed.period_sales.sanitize(),
                seed.liquidation.sanitize(),
                at,
            )
            .map_err(|e| LiquidationError::Validation {
                distributor_id: seed.id,
                errors: e.errors().to_vec(),
            })?;

        Ok((DistributorRecord::new(profile, outcome.tuple), outcome.warnings))
    }

    fn commit_single(
        &mut self,
        index: usize,
        outcome: MetricsOutcome,
    ) -> Result<UpdateOutcome, LiquidationError> {
        let mut staged = self.distributors[index].clone();
        staged.replace_tuple(outcome.tuple);

        let portfolio = self.aggregate(
            self.distributors
                .iter()
                .enumerate()
                .map(|(i, record)| if i == index { &staged } else { record }),
        )?;

        self.distributors[index] = staged.clone();
        self.portfolio = portfolio.clone();
        info!(
            revision = staged.revision(),
            liquidation_percentage = staged.tuple().liquidation_percentage(),
            "Distributor updated"
        );

        Ok(UpdateOutcome {
            record: staged,
            portfolio,
            warnings: outcome.warnings,
        })
    }
}
