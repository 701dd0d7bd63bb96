//! Distributor records
//!
//! A distributor is onboarded from seed data supplied by the data-access
//! collaborator and then owns exactly one stock tuple. Records are mutated
//! only by the [`LiquidationPortfolio`](crate::LiquidationPortfolio) that
//! owns them.

use chrono::{DateTime, Utc};
use core_kernel::{DistributorId, QuantityError, RawMeasure, StockMeasure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::tuple::StockTuple;

/// Commercial status of a distributor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributorStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl fmt::Display for DistributorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributorStatus::Active => write!(f, "Active"),
            DistributorStatus::Inactive => write!(f, "Inactive"),
            DistributorStatus::Suspended => write!(f, "Suspended"),
        }
    }
}

/// Follow-up priority assigned by the field team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Seed data for onboarding a distributor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DistributorSeed {
    pub id: DistributorId,
    /// Business code, e.g. "DLR001"
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub territory: String,
    #[validate(length(min = 1, max = 100))]
    pub zone: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[serde(default)]
    pub status: DistributorStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub opening_stock: RawMeasure,
    #[serde(default)]
    pub period_sales: RawMeasure,
    #[serde(default)]
    pub liquidation: RawMeasure,
    /// When the figures were last recorded upstream
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Identity and classification of a distributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributorProfile {
    pub id: DistributorId,
    pub code: String,
    pub name: String,
    pub territory: String,
    pub zone: String,
    pub state: String,
    pub status: DistributorStatus,
    pub priority: Priority,
}

impl From<&DistributorSeed> for DistributorProfile {
    fn from(seed: &DistributorSeed) -> Self {
        Self {
            id: seed.id,
            code: seed.code.trim().to_string(),
            name: seed.name.trim().to_string(),
            territory: seed.territory.trim().to_string(),
            zone: seed.zone.trim().to_string(),
            state: seed.state.trim().to_string(),
            status: seed.status,
            priority: seed.priority,
        }
    }
}

/// A distributor and its current stock tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributorRecord {
    profile: DistributorProfile,
    tuple: StockTuple,
    /// Bumped on every successful mutation
    revision: u64,
}

impl DistributorRecord {
    pub(crate) fn new(profile: DistributorProfile, tuple: StockTuple) -> Self {
        Self {
            profile,
            tuple,
            revision: 1,
        }
    }

    pub fn id(&self) -> DistributorId {
        self.profile.id
    }

    pub fn profile(&self) -> &DistributorProfile {
        &self.profile
    }

    pub fn tuple(&self) -> &StockTuple {
        &self.tuple
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn replace_tuple(&mut self, tuple: StockTuple) {
        self.tuple = tuple;
        self.revision += 1;
    }
}

/// A change to one distributor's input metrics
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributorUpdate {
    #[serde(default)]
    pub opening_stock: Option<StockMeasure>,
    #[serde(default)]
    pub period_sales: Option<StockMeasure>,
    #[serde(default)]
    pub liquidation: Option<StockMeasure>,
}

impl DistributorUpdate {
    pub fn opening_stock(mut self, measure: StockMeasure) -> Self {
        self.opening_stock = Some(measure);
        self
    }

    pub fn period_sales(mut self, measure: StockMeasure) -> Self {
        self.period_sales = Some(measure);
        self
    }

    pub fn liquidation(mut self, measure: StockMeasure) -> Self {
        self.liquidation = Some(measure);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.opening_stock.is_none() && self.period_sales.is_none() && self.liquidation.is_none()
    }
}

/// Stock sold to a farmer by a distributor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FarmerSaleEvent {
    sold: StockMeasure,
}

impl FarmerSaleEvent {
    /// Creates a sale event, rejecting negative figures
    pub fn try_new(volume: Decimal, value: Decimal) -> Result<Self, QuantityError> {
        Ok(Self {
            sold: StockMeasure::try_new(volume, value)?,
        })
    }

    pub fn sold(&self) -> StockMeasure {
        self.sold
    }
}
