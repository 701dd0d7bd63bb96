//! Allocation domain services

use core_kernel::OperationMetadata;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::AllocationError;
use crate::ports::TransferPort;
use crate::session::VerificationSession;
use crate::transfer::Submission;

/// Submits verification sessions through the transfer port
pub struct AllocationService {
    port: Arc<dyn TransferPort>,
}

impl AllocationService {
    pub fn new(port: Arc<dyn TransferPort>) -> Self {
        Self { port }
    }

    /// Builds, persists and closes a session's submission
    ///
    /// The session stays open if persisting fails, so the submission can be
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns the session's submission error, or `AllocationError::Port` if
    /// the adapter rejects it.
    #[instrument(skip(self, session, metadata), fields(session_id = %session.id()))]
    pub async fn submit_and_persist(
        &self,
        session: &mut VerificationSession,
        metadata: Option<OperationMetadata>,
    ) -> Result<Submission, AllocationError> {
        let submission = session.prepare_submission()?;
        self.port.persist_submission(&submission, metadata).await?;
        session.mark_submitted();
        info!(
            transfers = submission.transfers.len(),
            liquidated = %submission.liquidated_volume(),
            "Submission persisted"
        );
        Ok(submission)
    }
}
