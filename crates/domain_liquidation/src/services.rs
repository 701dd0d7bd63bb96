//! Liquidation domain services
//!
//! Services orchestrate the portfolio and the persistence port. Every
//! result is fully computed and validated before the port is called.

use core_kernel::{DistributorId, OperationMetadata};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::calculator::MetricsCalculator;
use crate::cascade::{CascadeReport, PortfolioEdit};
use crate::distributor::DistributorUpdate;
use crate::error::LiquidationError;
use crate::portfolio::{LiquidationPortfolio, UpdateOutcome};
use crate::ports::{LiquidationPort, TupleSnapshot};
use crate::report::ScopeFilter;

/// Loads, mutates and persists distributor portfolios
pub struct LiquidationService {
    port: Arc<dyn LiquidationPort>,
    calculator: MetricsCalculator,
}

impl LiquidationService {
    pub fn new(port: Arc<dyn LiquidationPort>, calculator: MetricsCalculator) -> Self {
        Self { port, calculator }
    }

    /// Loads the distributors in scope and derives their portfolio
    ///
    /// # Errors
    ///
    /// Returns `LiquidationError::Port` if loading fails, or the first seed
    /// error encountered while building the portfolio.
    #[instrument(skip(self, metadata))]
    pub async fn load_and_recompute(
        &self,
        filter: &ScopeFilter,
        metadata: Option<OperationMetadata>,
    ) -> Result<LiquidationPortfolio, LiquidationError> {
        let seeds = self.port.load_distributors(filter, metadata).await?;
        let portfolio = LiquidationPortfolio::from_seeds(self.calculator.clone(), seeds)?;
        info!(distributors = portfolio.len(), "Portfolio loaded");
        Ok(portfolio)
    }

    /// Updates one distributor and persists its new tuple
    ///
    /// The in-memory change stands even if persisting fails; callers may
    /// retry with [`save_portfolio`](Self::save_portfolio).
    #[instrument(skip(self, portfolio, update, metadata), fields(distributor_id = %id))]
    pub async fn update_and_persist(
        &self,
        portfolio: &mut LiquidationPortfolio,
        id: DistributorId,
        update: DistributorUpdate,
        metadata: Option<OperationMetadata>,
    ) -> Result<UpdateOutcome, LiquidationError> {
        let outcome = portfolio.update_distributor(id, update)?;
        self.port
            .save_tuples(vec![TupleSnapshot::from(&outcome.record)], metadata)
            .await?;
        Ok(outcome)
    }

    /// Cascades a portfolio edit and persists every recomputed tuple
    #[instrument(skip(self, portfolio, edit, metadata))]
    pub async fn cascade_and_persist(
        &self,
        portfolio: &mut LiquidationPortfolio,
        edit: PortfolioEdit,
        metadata: Option<OperationMetadata>,
    ) -> Result<CascadeReport, LiquidationError> {
        let report = portfolio.cascade_portfolio_update(edit)?;
        if !report.adjusted.is_empty() {
            let snapshots = portfolio
                .snapshots()
                .into_iter()
                .filter(|s| report.adjusted.contains(&s.distributor_id))
                .collect();
            self.port.save_tuples(snapshots, metadata).await?;
        }
        Ok(report)
    }

    /// Persists every distributor tuple of the portfolio
    pub async fn save_portfolio(
        &self,
        portfolio: &LiquidationPortfolio,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), LiquidationError> {
        self.port.save_tuples(portfolio.snapshots(), metadata).await?;
        Ok(())
    }
}
