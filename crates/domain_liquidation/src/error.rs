//! Liquidation domain errors

use core_kernel::{DistributorId, PortError, QuantityError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from the metrics calculator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// The computed tuple fails the stock conservation rule
    #[error("Stock conservation violated: {}", errors.join("; "))]
    ConservationViolated { errors: Vec<String> },

    /// A sum of stock figures left the decimal range
    #[error("{message}")]
    OutOfRange { message: String },
}

impl MetricsError {
    pub(crate) fn out_of_range(figure: &str) -> Self {
        MetricsError::OutOfRange {
            message: format!("{figure} exceeds supported range"),
        }
    }

    /// The rule errors behind this failure
    pub fn errors(&self) -> &[String] {
        match self {
            MetricsError::ConservationViolated { errors } => errors,
            MetricsError::OutOfRange { message } => std::slice::from_ref(message),
        }
    }
}

/// Errors that can occur in the liquidation domain
#[derive(Debug, Error)]
pub enum LiquidationError {
    /// A distributor's recomputed tuple failed validation
    #[error("Validation failed for distributor {distributor_id}: {}", errors.join("; "))]
    Validation {
        distributor_id: DistributorId,
        errors: Vec<String>,
    },

    /// The portfolio tuple could not be derived
    #[error("Portfolio metrics failed: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Distributor not found: {0}")]
    DistributorNotFound(DistributorId),

    #[error("Duplicate distributor: {0}")]
    DuplicateDistributor(DistributorId),

    /// A liquidation edit exceeds the distributor's current available stock
    #[error("Liquidation ({requested}) cannot exceed total available stock ({available}) for distributor {distributor_id}")]
    LiquidationExceedsAvailable {
        distributor_id: DistributorId,
        requested: Decimal,
        available: Decimal,
    },

    /// A portfolio cascade would invalidate a distributor; nothing was applied
    #[error("Cascade aborted at distributor {distributor_id}: {}", errors.join("; "))]
    InconsistentCascade {
        distributor_id: DistributorId,
        errors: Vec<String>,
    },

    /// Seed data is structurally invalid
    #[error("Invalid distributor seed: {0}")]
    InvalidSeed(String),

    #[error("Quantity error: {0}")]
    Quantity(#[from] QuantityError),

    #[error("Port error: {0}")]
    Port(#[from] PortError),
}

impl LiquidationError {
    /// Rule errors carried by this failure, if any
    pub fn rule_errors(&self) -> &[String] {
        match self {
            LiquidationError::Validation { errors, .. }
            | LiquidationError::InconsistentCascade { errors, .. } => errors,
            LiquidationError::Metrics(e) => e.errors(),
            _ => &[],
        }
    }
}
