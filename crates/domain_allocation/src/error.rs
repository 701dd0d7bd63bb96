//! Allocation domain errors
//!
//! Every rejected edit leaves the session exactly as it was.

use core_kernel::{PortError, RetailerId, SessionId, SkuId};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllocationError {
    /// The allocation would exceed the remaining decrease
    #[error("Allocation of {requested} exceeds remaining {remaining}")]
    ExceedsRemaining { requested: Decimal, remaining: Decimal },

    #[error("Allocation amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Stock cannot be negative: {0}")]
    NegativeStock(Decimal),

    #[error("SKU not in session: {0}")]
    UnknownSku(SkuId),

    #[error("SKU already observed in session: {0}")]
    DuplicateSku(SkuId),

    #[error("Retailer not in directory: {0}")]
    UnknownRetailer(String),

    #[error("Stock cannot be transferred to the verified entity itself: {0}")]
    SelfTransfer(RetailerId),

    #[error("No retailer allocation at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The SKU has no decrease to allocate
    #[error("SKU {0} has no stock decrease to allocate")]
    NotAllocating(SkuId),

    /// Submission attempted while a decrease is partly unexplained
    #[error("SKU {sku_id} is not fully allocated; {remaining} remaining")]
    IncompleteAllocation { sku_id: SkuId, remaining: Decimal },

    #[error("Session {0} has already been submitted")]
    SessionClosed(SessionId),

    #[error("Port error: {0}")]
    Port(#[from] PortError),
}
