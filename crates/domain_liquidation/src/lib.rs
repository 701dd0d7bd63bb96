//! Liquidation Domain - Stock metrics, aggregation and cascades
//!
//! This crate owns the four core stock metrics of the distribution chain:
//!
//! - **Opening stock**: stock held at the start of the period
//! - **Period sales**: stock received during the period
//! - **Liquidation**: stock sold to farmers, which has left the chain for good
//! - **Balance stock**: opening + period sales - liquidation
//!
//! # Components
//!
//! - [`MetricsCalculator`] computes a validated [`StockTuple`] for one entity
//! - [`LiquidationPortfolio`] owns the distributor records, derives the
//!   portfolio tuple and cascades portfolio-level edits proportionally
//! - [`LiquidationService`] loads distributors through a [`LiquidationPort`]
//!   and hands validated tuples back to it

pub mod tuple;
pub mod calculator;
pub mod distributor;
pub mod portfolio;
pub mod cascade;
pub mod report;
pub mod error;
pub mod ports;
pub mod services;

pub use tuple::StockTuple;
pub use calculator::{MetricsCalculator, MetricsOutcome, Clock, SystemClock, FixedClock};
pub use distributor::{
    DistributorSeed, DistributorRecord, DistributorProfile, DistributorStatus, Priority,
    DistributorUpdate, FarmerSaleEvent,
};
pub use portfolio::{LiquidationPortfolio, UpdateOutcome};
pub use cascade::{PortfolioEdit, CascadeReport, CascadeField, CascadeDrift};
pub use report::{ScopeFilter, PortfolioSummary, LiquidatorRanking};
pub use error::{LiquidationError, MetricsError};
pub use ports::{LiquidationPort, TupleSnapshot};
pub use services::LiquidationService;
