//! Scope filters and portfolio reporting

use core_kernel::{DistributorId, StockMeasure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::distributor::{DistributorProfile, DistributorRecord, DistributorStatus};
use crate::error::LiquidationError;
use crate::portfolio::LiquidationPortfolio;
use crate::tuple::StockTuple;

/// Restricts a portfolio computation to a subset of distributors
///
/// Text fields match case-insensitively; `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    #[serde(default)]
    pub territory: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub status: Option<DistributorStatus>,
}

impl ScopeFilter {
    /// A filter that matches every distributor
    pub fn all() -> Self {
        Self::default()
    }

    pub fn territory(mut self, territory: impl Into<String>) -> Self {
        self.territory = Some(territory.into());
        self
    }

    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn status(mut self, status: DistributorStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self == &Self::default()
    }

    /// Returns true if the distributor is in scope
    pub fn matches(&self, profile: &DistributorProfile) -> bool {
        fn text_matches(filter: &Option<String>, value: &str) -> bool {
            filter
                .as_deref()
                .map_or(true, |wanted| wanted.trim().eq_ignore_ascii_case(value))
        }

        text_matches(&self.territory, &profile.territory)
            && text_matches(&self.zone, &profile.zone)
            && text_matches(&self.state, &profile.state)
            && self.status.map_or(true, |status| status == profile.status)
    }
}

/// Aggregated metrics for one territory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub territory: String,
    pub distributor_count: usize,
    pub tuple: StockTuple,
}

/// One entry of the top-liquidators ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiquidatorRanking {
    pub rank: usize,
    pub distributor_id: DistributorId,
    pub code: String,
    pub name: String,
    pub territory: String,
    pub liquidation_percentage: u32,
    pub liquidation: StockMeasure,
}

impl LiquidationPortfolio {
    /// Portfolio tuple per territory, ordered by territory name
    pub fn territory_summaries(&self) -> Result<Vec<PortfolioSummary>, LiquidationError> {
        let mut territories: BTreeMap<&str, Vec<&DistributorRecord>> = BTreeMap::new();
        for record in self.distributors() {
            territories
                .entry(record.profile().territory.as_str())
                .or_default()
                .push(record);
        }

        territories
            .into_iter()
            .map(|(territory, records)| {
                let tuple = self.aggregate(records.iter().copied())?;
                Ok(PortfolioSummary {
                    territory: territory.to_string(),
                    distributor_count: records.len(),
                    tuple,
                })
            })
            .collect()
    }

    /// The `limit` distributors with the highest liquidation percentage
    ///
    /// Ties are broken by liquidated volume, then by distributor code.
    pub fn top_liquidators(&self, limit: usize) -> Vec<LiquidatorRanking> {
        let mut records: Vec<_> = self.distributors().iter().collect();
        records.sort_by(|a, b| {
            b.tuple()
                .liquidation_percentage()
                .cmp(&a.tuple().liquidation_percentage())
                .then_with(|| b.tuple().liquidation().volume.cmp(&a.tuple().liquidation().volume))
                .then_with(|| a.profile().code.cmp(&b.profile().code))
        });

        records
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, record)| LiquidatorRanking {
                rank: index + 1,
                distributor_id: record.id(),
                code: record.profile().code.clone(),
                name: record.profile().name.clone(),
                territory: record.profile().territory.clone(),
                liquidation_percentage: record.tuple().liquidation_percentage(),
                liquidation: record.tuple().liquidation(),
            })
            .collect()
    }
}
