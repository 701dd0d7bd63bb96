//! Core Kernel - Foundational types for the liquidation engine
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Stock measures (volume and value pairs) with precise decimal arithmetic
//! - Strongly-typed identifiers for distributors, retailers, SKUs and sessions
//! - Layered configuration loading
//! - Port abstractions for the persistence collaborator

pub mod quantity;
pub mod identifiers;
pub mod config;
pub mod ports;
pub mod error;

pub use quantity::{
    StockMeasure, RawMeasure, QuantityError,
    round_value, round_volume, VALUE_PRECISION,
};
pub use identifiers::{
    DistributorId, RetailerId, SkuId, SessionId, TransferId, StockHolder,
};
pub use config::{load_section, ConfigSource};
pub use ports::{PortError, DomainPort, OperationMetadata};
pub use error::CoreError;
