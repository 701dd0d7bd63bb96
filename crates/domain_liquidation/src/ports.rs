//! Liquidation Domain Ports
//!
//! The `LiquidationPort` trait is what the liquidation domain needs from its
//! data source: seed data for distributors in scope, and somewhere to hand
//! validated tuples. The engine only ever calls `save_tuples` with tuples
//! that passed the metrics calculator.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_liquidation::{LiquidationService, ScopeFilter};
//! use std::sync::Arc;
//!
//! let service = LiquidationService::new(Arc::new(adapter), calculator);
//! let portfolio = service.load_and_recompute(&ScopeFilter::all().zone("West"), None).await?;
//! ```

use async_trait::async_trait;
use core_kernel::{DistributorId, DomainPort, OperationMetadata, PortError};
use serde::Serialize;

use crate::distributor::{DistributorRecord, DistributorSeed};
use crate::report::ScopeFilter;
use crate::tuple::StockTuple;

/// A validated tuple handed to the persistence collaborator
///
/// `revision` lets adapters detect concurrent writers; the engine itself
/// does not lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TupleSnapshot {
    pub distributor_id: DistributorId,
    pub revision: u64,
    pub tuple: StockTuple,
}

impl From<&DistributorRecord> for TupleSnapshot {
    fn from(record: &DistributorRecord) -> Self {
        Self {
            distributor_id: record.id(),
            revision: record.revision(),
            tuple: record.tuple().clone(),
        }
    }
}

/// Port for distributor stock data
#[async_trait]
pub trait LiquidationPort: DomainPort {
    /// Loads seed data for every distributor matching the filter
    ///
    /// # Arguments
    ///
    /// * `filter` - Territory/zone/state/status scope
    /// * `metadata` - Optional operation metadata for tracing/auditing
    async fn load_distributors(
        &self,
        filter: &ScopeFilter,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<DistributorSeed>, PortError>;

    /// Persists validated distributor tuples
    ///
    /// # Returns
    ///
    /// `PortError::Conflict` if the adapter detects a stale revision
    async fn save_tuples(
        &self,
        snapshots: Vec<TupleSnapshot>,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}
