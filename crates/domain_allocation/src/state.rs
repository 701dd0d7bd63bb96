//! Allocation state of one SKU
//!
//! The farmer amount plus every retailer amount never exceeds the observed
//! decrease. Edits that would break this are rejected and leave the state
//! untouched.

use core_kernel::RetailerId;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::directory::Retailer;
use crate::error::AllocationError;

/// Part of a decrease transferred to another retailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetailerAllocation {
    pub retailer_id: RetailerId,
    pub name: String,
    pub amount: Decimal,
}

/// Split of one SKU's observed decrease
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationState {
    total_decrease: Decimal,
    farmer: Decimal,
    retailers: Vec<RetailerAllocation>,
}

impl AllocationState {
    /// Starts an empty allocation of `total_decrease`
    pub fn new(total_decrease: Decimal) -> Result<Self, AllocationError> {
        if total_decrease < Decimal::ZERO {
            return Err(AllocationError::NegativeAmount(total_decrease));
        }
        Ok(Self {
            total_decrease,
            farmer: Decimal::ZERO,
            retailers: Vec::new(),
        })
    }

    pub fn total_decrease(&self) -> Decimal {
        self.total_decrease
    }

    /// Amount sold to farmers
    pub fn farmer_amount(&self) -> Decimal {
        self.farmer
    }

    /// Retailer allocations in the order they were added
    pub fn retailers(&self) -> &[RetailerAllocation] {
        &self.retailers
    }

    pub fn retailer_total(&self) -> Decimal {
        self.retailers.iter().map(|r| r.amount).sum()
    }

    /// Total allocated so far
    pub fn allocated(&self) -> Decimal {
        self.farmer + self.retailer_total()
    }

    /// Decrease not yet allocated, never negative
    pub fn remaining(&self) -> Decimal {
        (self.total_decrease - self.allocated()).max(Decimal::ZERO)
    }

    /// Returns true if there is a decrease and all of it is allocated
    pub fn is_fully_allocated(&self) -> bool {
        self.total_decrease > Decimal::ZERO && self.remaining().is_zero()
    }

    /// Sets the farmer amount, replacing the previous one
    ///
    /// # Errors
    ///
    /// `NegativeAmount` for a negative amount; `ExceedsRemaining` when the
    /// amount plus the retailer total would exceed the decrease.
    pub fn set_farmer_amount(&mut self, amount: Decimal) -> Result<(), AllocationError> {
        if amount < Decimal::ZERO {
            return Err(AllocationError::NegativeAmount(amount));
        }
        let available = self.total_decrease - self.retailer_total();
        if amount > available {
            return Err(AllocationError::ExceedsRemaining {
                requested: amount,
                remaining: available.max(Decimal::ZERO),
            });
        }
        self.farmer = amount;
        Ok(())
    }

    /// Appends a retailer allocation
    ///
    /// # Errors
    ///
    /// `NegativeAmount` for a negative amount; `ExceedsRemaining` when the
    /// amount is more than what remains.
    pub fn add_retailer_allocation(&mut self, retailer: &Retailer, amount: Decimal) -> Result<(), AllocationError> {
        if amount < Decimal::ZERO {
            return Err(AllocationError::NegativeAmount(amount));
        }
        let remaining = self.remaining();
        if amount > remaining {
            return Err(AllocationError::ExceedsRemaining {
                requested: amount,
                remaining,
            });
        }
        self.retailers.push(RetailerAllocation {
            retailer_id: retailer.id,
            name: retailer.name.clone(),
            amount,
        });
        Ok(())
    }

    /// Removes the retailer allocation at `index`
    pub fn remove_retailer_allocation(&mut self, index: usize) -> Result<RetailerAllocation, AllocationError> {
        if index >= self.retailers.len() {
            return Err(AllocationError::IndexOutOfRange {
                index,
                len: self.retailers.len(),
            });
        }
        Ok(self.retailers.remove(index))
    }
}
