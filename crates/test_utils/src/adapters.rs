//! In-memory port adapters
//!
//! Stand-ins for the persistence collaborator. The liquidation adapter
//! rejects snapshots older than the stored revision, which lets tests
//! exercise optimistic concurrency on top of the engine's revisions.

use async_trait::async_trait;
use core_kernel::{DistributorId, DomainPort, OperationMetadata, PortError, SessionId};
use domain_allocation::{Submission, TransferPort};
use domain_liquidation::{DistributorProfile, DistributorSeed, LiquidationPort, ScopeFilter, TupleSnapshot};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tracing::debug;

/// In-memory distributor store
#[derive(Debug, Default)]
pub struct InMemoryLiquidationPort {
    seeds: RwLock<Vec<DistributorSeed>>,
    saved: RwLock<HashMap<DistributorId, TupleSnapshot>>,
    fail_next: AtomicBool,
}

impl InMemoryLiquidationPort {
    pub fn new(seeds: Vec<DistributorSeed>) -> Self {
        Self {
            seeds: RwLock::new(seeds),
            ..Default::default()
        }
    }

    /// Makes the next call fail with a transient connection error
    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// The last snapshot saved for a distributor
    pub fn saved(&self, id: DistributorId) -> Option<TupleSnapshot> {
        self.saved.read().ok()?.get(&id).cloned()
    }

    pub fn saved_count(&self) -> usize {
        self.saved.read().map(|saved| saved.len()).unwrap_or(0)
    }

    fn check_failure(&self) -> Result<(), PortError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PortError::connection("in-memory store unavailable"));
        }
        Ok(())
    }
}

impl DomainPort for InMemoryLiquidationPort {}

#[async_trait]
impl LiquidationPort for InMemoryLiquidationPort {
    async fn load_distributors(
        &self,
        filter: &ScopeFilter,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<DistributorSeed>, PortError> {
        self.check_failure()?;
        let seeds = self
            .seeds
            .read()
            .map_err(|_| PortError::internal("lock poisoned"))?;
        Ok(seeds
            .iter()
            .filter(|seed| filter.matches(&DistributorProfile::from(*seed)))
            .cloned()
            .collect())
    }

    async fn save_tuples(
        &self,
        snapshots: Vec<TupleSnapshot>,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        self.check_failure()?;
        let mut saved = self
            .saved
            .write()
            .map_err(|_| PortError::internal("lock poisoned"))?;

        if let Some(stale) = snapshots.iter().find(|snapshot| {
            saved
                .get(&snapshot.distributor_id)
                .is_some_and(|existing| existing.revision > snapshot.revision)
        }) {
            return Err(PortError::conflict(format!(
                "stale revision {} for {}",
                stale.revision, stale.distributor_id
            )));
        }

        debug!(
            count = snapshots.len(),
            correlation_id = ?metadata.as_ref().and_then(|m| m.correlation_id.as_deref()),
            "Saving tuples"
        );
        for snapshot in snapshots {
            saved.insert(snapshot.distributor_id, snapshot);
        }
        Ok(())
    }
}

/// In-memory submission log
#[derive(Debug, Default)]
pub struct InMemoryTransferPort {
    submissions: RwLock<Vec<Submission>>,
    fail_next: AtomicBool,
}

impl InMemoryTransferPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call fail with a transient connection error
    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Every persisted submission in arrival order
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .read()
            .map(|submissions| submissions.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, session_id: SessionId) -> bool {
        self.submissions().iter().any(|s| s.session_id == session_id)
    }
}

impl DomainPort for InMemoryTransferPort {}

#[async_trait]
impl TransferPort for InMemoryTransferPort {
    async fn persist_submission(
        &self,
        submission: &Submission,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PortError::connection("in-memory log unavailable"));
        }
        let mut submissions = self
            .submissions
            .write()
            .map_err(|_| PortError::internal("lock poisoned"))?;
        if submissions.iter().any(|s| s.session_id == submission.session_id) {
            return Err(PortError::conflict(format!(
                "session {} already persisted",
                submission.session_id
            )));
        }
        submissions.push(submission.clone());
        Ok(())
    }
}
