//! Verification sessions
//!
//! A session belongs to one stock holder and tracks every SKU verified
//! during one visit. It owns the allocation state of each SKU; abandoning
//! the session discards all of it.

use core_kernel::{RetailerId, SessionId, SkuId, StockHolder, TransferId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{RemainderPolicy, WorkflowConfig};
use crate::directory::{Retailer, RetailerDirectory};
use crate::error::AllocationError;
use crate::state::{AllocationState, RetailerAllocation};
use crate::transfer::{Submission, TransferRecord, TransferType, VerifiedStock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkuStatus {
    /// Registered but not re-counted yet
    Observing,
    /// Stock decreased and the decrease is not fully allocated
    Allocating,
    /// Nothing left to allocate
    Complete,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    Submitted,
}

/// A re-count of one SKU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuObservation {
    pub sku_id: SkuId,
    pub prior_stock: Decimal,
    pub edited_stock: Decimal,
    pub unit: String,
}

/// Verification progress of one SKU
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkuVerification {
    sku_id: SkuId,
    unit: String,
    prior_stock: Decimal,
    edited_stock: Option<Decimal>,
    allocation: Option<AllocationState>,
    status: SkuStatus,
}

impl SkuVerification {
    pub fn sku_id(&self) -> SkuId {
        self.sku_id
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn prior_stock(&self) -> Decimal {
        self.prior_stock
    }

    pub fn edited_stock(&self) -> Option<Decimal> {
        self.edited_stock
    }

    pub fn allocation(&self) -> Option<&AllocationState> {
        self.allocation.as_ref()
    }

    pub fn status(&self) -> SkuStatus {
        self.status
    }

    /// The stock count to record on submission
    ///
    /// A SKU that was never re-counted keeps its prior stock.
    pub fn verified_stock(&self) -> Decimal {
        self.edited_stock.unwrap_or(self.prior_stock)
    }

    fn refresh_status(&mut self) {
        self.status = match &self.allocation {
            Some(state) if !state.is_fully_allocated() => SkuStatus::Allocating,
            _ => SkuStatus::Complete,
        };
    }
}

/// Stock verification of one stock holder during one visit
#[derive(Debug, Clone)]
pub struct VerificationSession {
    id: SessionId,
    entity: StockHolder,
    directory: RetailerDirectory,
    config: WorkflowConfig,
    skus: Vec<SkuVerification>,
    status: SessionStatus,
}

impl VerificationSession {
    pub fn new(entity: StockHolder, directory: RetailerDirectory, config: WorkflowConfig) -> Self {
        let id = SessionId::new_v7();
        debug!(session_id = %id, %entity, "Verification session opened");
        Self {
            id,
            entity,
            directory,
            config,
            skus: Vec::new(),
            status: SessionStatus::Open,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn entity(&self) -> StockHolder {
        self.entity
    }

    pub fn directory(&self) -> &RetailerDirectory {
        &self.directory
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// SKUs in the order they were registered
    pub fn skus(&self) -> &[SkuVerification] {
        &self.skus
    }

    pub fn sku(&self, sku_id: SkuId) -> Option<&SkuVerification> {
        self.skus.iter().find(|s| s.sku_id == sku_id)
    }

    /// Remaining decrease of a SKU
    pub fn remaining(&self, sku_id: SkuId) -> Result<Decimal, AllocationError> {
        Ok(self.allocation_of(sku_id)?.remaining())
    }

    /// Registers a SKU with its prior stock, awaiting a re-count
    pub fn register_sku(
        &mut self,
        sku_id: SkuId,
        prior_stock: Decimal,
        unit: impl Into<String>,
    ) -> Result<(), AllocationError> {
        self.ensure_open()?;
        if prior_stock < Decimal::ZERO {
            return Err(AllocationError::NegativeStock(prior_stock));
        }
        if self.sku(sku_id).is_some() {
            return Err(AllocationError::DuplicateSku(sku_id));
        }
        self.skus.push(SkuVerification {
            sku_id,
            unit: unit.into(),
            prior_stock,
            edited_stock: None,
            allocation: None,
            status: SkuStatus::Observing,
        });
        Ok(())
    }

    /// Registers a SKU and applies its re-count in one step
    pub fn observe(&mut self, observation: SkuObservation) -> Result<SkuStatus, AllocationError> {
        self.ensure_open()?;
        if observation.edited_stock < Decimal::ZERO {
            return Err(AllocationError::NegativeStock(observation.edited_stock));
        }
        self.register_sku(observation.sku_id, observation.prior_stock, observation.unit)?;
        self.edit_stock(observation.sku_id, observation.edited_stock)
    }

    /// Records a re-count of a SKU
    ///
    /// A count below the prior stock opens an allocation of the decrease;
    /// any other count completes the SKU at once. Re-counting discards the
    /// previous allocation.
    pub fn edit_stock(&mut self, sku_id: SkuId, edited_stock: Decimal) -> Result<SkuStatus, AllocationError> {
        self.ensure_open()?;
        if edited_stock < Decimal::ZERO {
            return Err(AllocationError::NegativeStock(edited_stock));
        }
        let sku = self.sku_mut(sku_id)?;

        sku.allocation = if edited_stock < sku.prior_stock {
            Some(AllocationState::new(sku.prior_stock - edited_stock)?)
        } else {
            None
        };
        sku.edited_stock = Some(edited_stock);
        sku.refresh_status();

        debug!(%sku_id, edited = %edited_stock, status = ?sku.status, "Stock re-counted");
        Ok(sku.status)
    }

    /// Sets the amount of a SKU's decrease sold to farmers
    pub fn set_farmer_amount(&mut self, sku_id: SkuId, amount: Decimal) -> Result<SkuStatus, AllocationError> {
        self.edit_allocation(sku_id, |state| state.set_farmer_amount(amount))
            .map(|(_, status)| status)
    }

    /// Allocates part of a SKU's decrease to a retailer from the directory
    pub fn add_retailer_allocation(
        &mut self,
        sku_id: SkuId,
        retailer_id: RetailerId,
        amount: Decimal,
    ) -> Result<SkuStatus, AllocationError> {
        let retailer = self
            .directory
            .get(retailer_id)
            .cloned()
            .ok_or_else(|| AllocationError::UnknownRetailer(retailer_id.to_string()))?;
        self.allocate_to(sku_id, retailer, amount)
    }

    /// Allocates to a retailer looked up by name
    pub fn add_retailer_allocation_by_name(
        &mut self,
        sku_id: SkuId,
        name: &str,
        amount: Decimal,
    ) -> Result<SkuStatus, AllocationError> {
        let retailer = self
            .directory
            .find_by_name(name)
            .cloned()
            .ok_or_else(|| AllocationError::UnknownRetailer(name.to_string()))?;
        self.allocate_to(sku_id, retailer, amount)
    }

    /// Removes a retailer allocation by position
    pub fn remove_retailer_allocation(
        &mut self,
        sku_id: SkuId,
        index: usize,
    ) -> Result<RetailerAllocation, AllocationError> {
        self.edit_allocation(sku_id, |state| state.remove_retailer_allocation(index))
            .map(|(removed, _)| removed)
    }

    /// Builds the submission without closing the session
    ///
    /// # Errors
    ///
    /// - `SessionClosed` if the session was already submitted
    /// - `IncompleteAllocation` for the first SKU with unallocated decrease,
    ///   unless the remainder policy retains it at the retailer
    pub fn prepare_submission(&self) -> Result<Submission, AllocationError> {
        self.ensure_open()?;

        let mut transfers = Vec::new();
        let mut verified_stock = Vec::with_capacity(self.skus.len());

        for sku in &self.skus {
            if let Some(state) = &sku.allocation {
                if !state.remaining().is_zero() && self.config.remainder_policy == RemainderPolicy::Block {
                    return Err(AllocationError::IncompleteAllocation {
                        sku_id: sku.sku_id,
                        remaining: state.remaining(),
                    });
                }

                if state.farmer_amount() > Decimal::ZERO {
                    transfers.push(TransferRecord {
                        transfer_id: TransferId::new_v7(),
                        transfer_type: TransferType::RetailerToFarmer,
                        from_id: self.entity,
                        to_id: StockHolder::Farmer,
                        sku_id: sku.sku_id,
                        quantity: state.farmer_amount(),
                        unit: sku.unit.clone(),
                    });
                }
                for allocation in state.retailers().iter().filter(|a| a.amount > Decimal::ZERO) {
                    transfers.push(TransferRecord {
                        transfer_id: TransferId::new_v7(),
                        transfer_type: TransferType::DistributorToRetailer,
                        from_id: self.entity,
                        to_id: StockHolder::Retailer(allocation.retailer_id),
                        sku_id: sku.sku_id,
                        quantity: allocation.amount,
                        unit: sku.unit.clone(),
                    });
                }
            }

            verified_stock.push(VerifiedStock {
                sku_id: sku.sku_id,
                verified_stock: sku.verified_stock(),
                unit: sku.unit.clone(),
            });
        }

        Ok(Submission {
            session_id: self.id,
            entity: self.entity,
            transfers,
            verified_stock,
        })
    }

    /// Closes the session after its submission has been handed off
    pub fn mark_submitted(&mut self) {
        for sku in &mut self.skus {
            sku.status = SkuStatus::Submitted;
        }
        self.status = SessionStatus::Submitted;
        info!(session_id = %self.id, skus = self.skus.len(), "Verification session submitted");
    }

    /// Builds the submission and closes the session
    pub fn submit(&mut self) -> Result<Submission, AllocationError> {
        let submission = self.prepare_submission()?;
        self.mark_submitted();
        Ok(submission)
    }

    /// Discards the session and all of its allocation state
    pub fn abandon(self) -> SessionId {
        debug!(session_id = %self.id, skus = self.skus.len(), "Verification session abandoned");
        self.id
    }

    fn allocate_to(&mut self, sku_id: SkuId, retailer: Retailer, amount: Decimal) -> Result<SkuStatus, AllocationError> {
        if self.entity == StockHolder::Retailer(retailer.id) {
            return Err(AllocationError::SelfTransfer(retailer.id));
        }
        self.edit_allocation(sku_id, |state| state.add_retailer_allocation(&retailer, amount))
            .map(|(_, status)| status)
    }

    /// Applies `edit` to a copy of the SKU's allocation and keeps it only on success
    fn edit_allocation<T, F>(&mut self, sku_id: SkuId, edit: F) -> Result<(T, SkuStatus), AllocationError>
    where
        F: FnOnce(&mut AllocationState) -> Result<T, AllocationError>,
    {
        self.ensure_open()?;
        let sku = self.sku_mut(sku_id)?;
        let mut staged = sku
            .allocation
            .clone()
            .ok_or(AllocationError::NotAllocating(sku_id))?;

        let output = match edit(&mut staged) {
            Ok(output) => output,
            Err(e) => {
                warn!(%sku_id, error = %e, "Allocation edit rejected");
                return Err(e);
            }
        };

        sku.allocation = Some(staged);
        sku.refresh_status();
        Ok((output, sku.status))
    }

    fn allocation_of(&self, sku_id: SkuId) -> Result<&AllocationState, AllocationError> {
        self.sku(sku_id)
            .ok_or(AllocationError::UnknownSku(sku_id))?
            .allocation
            .as_ref()
            .ok_or(AllocationError::NotAllocating(sku_id))
    }

    fn sku_mut(&mut self, sku_id: SkuId) -> Result<&mut SkuVerification, AllocationError> {
        self.skus
            .iter_mut()
            .find(|s| s.sku_id == sku_id)
            .ok_or(AllocationError::UnknownSku(sku_id))
    }

    fn ensure_open(&self) -> Result<(), AllocationError> {
        match self.status {
            SessionStatus::Open => Ok(()),
            SessionStatus::Submitted => Err(AllocationError::SessionClosed(self.id)),
        }
    }
}
