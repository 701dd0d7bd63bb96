//! Allocation Domain Ports
//!
//! A submitted verification session is handed to the persistence
//! collaborator as one [`Submission`]. Adapters are expected to store its
//! transfers and verified stock together.

use async_trait::async_trait;
use core_kernel::{DomainPort, OperationMetadata, PortError};

use crate::transfer::Submission;

/// Port for verification submissions
#[async_trait]
pub trait TransferPort: DomainPort {
    /// Persists the transfers and verified stock of one session
    ///
    /// # Arguments
    ///
    /// * `submission` - Complete output of a verification session
    /// * `metadata` - Optional operation metadata for tracing/auditing
    ///
    /// # Returns
    ///
    /// `PortError::Conflict` if the session was already persisted
    async fn persist_submission(
        &self,
        submission: &Submission,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}
