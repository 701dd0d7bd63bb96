//! The stock tuple snapshot

use chrono::{DateTime, Utc};
use core_kernel::StockMeasure;
use serde::Serialize;

use domain_rules::StockConservationInput;

/// The four stock metrics of one entity, plus its liquidation percentage
///
/// Tuples are produced only by the [`MetricsCalculator`](crate::MetricsCalculator)
/// and are immutable; request a new computation to change one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockTuple {
    opening_stock: StockMeasure,
    period_sales: StockMeasure,
    liquidation: StockMeasure,
    balance_stock: StockMeasure,
    liquidation_percentage: u32,
    last_updated: DateTime<Utc>,
}

impl StockTuple {
    pub(crate) fn from_parts(
        opening_stock: StockMeasure,
        period_sales: StockMeasure,
        liquidation: StockMeasure,
        balance_stock: StockMeasure,
        liquidation_percentage: u32,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            opening_stock,
            period_sales,
            liquidation,
            balance_stock,
            liquidation_percentage,
            last_updated,
        }
    }

    /// An all-zero tuple
    pub(crate) fn empty(last_updated: DateTime<Utc>) -> Self {
        Self::from_parts(
            StockMeasure::zero(),
            StockMeasure::zero(),
            StockMeasure::zero(),
            StockMeasure::zero(),
            0,
            last_updated,
        )
    }

    pub fn opening_stock(&self) -> StockMeasure {
        self.opening_stock
    }

    pub fn period_sales(&self) -> StockMeasure {
        self.period_sales
    }

    pub fn liquidation(&self) -> StockMeasure {
        self.liquidation
    }

    pub fn balance_stock(&self) -> StockMeasure {
        self.balance_stock
    }

    pub fn liquidation_percentage(&self) -> u32 {
        self.liquidation_percentage
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Opening stock plus period sales
    pub fn available(&self) -> StockMeasure {
        self.opening_stock + self.period_sales
    }

    /// The tuple as input to the stock conservation rule
    pub fn conservation_input(&self) -> StockConservationInput {
        StockConservationInput {
            opening: self.opening_stock,
            period_sales: self.period_sales,
            liquidation: self.liquidation,
            balance: self.balance_stock,
            liquidation_percentage: Some(self.liquidation_percentage),
        }
    }
}
