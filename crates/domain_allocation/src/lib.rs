//! Allocation Domain - Stock verification and decrease allocation
//!
//! During a stock verification visit the field employee re-counts each SKU
//! held by a retailer or distributor. When the count drops, the decrease has
//! to be explained: stock sold to farmers counts as liquidation, stock moved
//! on to other retailers does not.
//!
//! # Workflow
//!
//! ```text
//!   Observing ──edit < prior──► Allocating ◄──► Complete ──submit──► Submitted
//!       │                                          ▲
//!       └──────────edit >= prior───────────────────┘
//! ```
//!
//! The allocated amounts of a SKU never exceed its observed decrease. On
//! submission the session emits transfer records and verified stock for the
//! persistence collaborator.

pub mod state;
pub mod directory;
pub mod session;
pub mod transfer;
pub mod config;
pub mod error;
pub mod ports;
pub mod services;

pub use state::{AllocationState, RetailerAllocation};
pub use directory::{Retailer, RetailerDirectory};
pub use session::{
    VerificationSession, SessionStatus, SkuObservation, SkuStatus, SkuVerification,
};
pub use transfer::{Submission, TransferRecord, TransferType, VerifiedStock};
pub use config::{WorkflowConfig, RemainderPolicy};
pub use error::AllocationError;
pub use ports::TransferPort;
pub use services::AllocationService;
