//! Submission output: transfer records and verified stock

use core_kernel::{SessionId, SkuId, StockHolder, TransferId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    /// Sold to a farmer; counts as liquidation
    RetailerToFarmer,
    /// Moved on to another retailer; does not count as liquidation
    DistributorToRetailer,
}

/// One stock movement emitted by a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub transfer_id: TransferId,
    pub transfer_type: TransferType,
    pub from_id: StockHolder,
    pub to_id: StockHolder,
    pub sku_id: SkuId,
    pub quantity: Decimal,
    pub unit: String,
}

/// The confirmed stock count of one SKU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedStock {
    pub sku_id: SkuId,
    pub verified_stock: Decimal,
    pub unit: String,
}

/// Everything a verification session hands to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub session_id: SessionId,
    pub entity: StockHolder,
    pub transfers: Vec<TransferRecord>,
    pub verified_stock: Vec<VerifiedStock>,
}

impl Submission {
    /// Quantity sold to farmers across every SKU
    pub fn liquidated_volume(&self) -> Decimal {
        self.volume_of(TransferType::RetailerToFarmer)
    }

    /// Quantity moved on to other retailers across every SKU
    pub fn transferred_volume(&self) -> Decimal {
        self.volume_of(TransferType::DistributorToRetailer)
    }

    /// Quantity sold to farmers for one SKU
    pub fn liquidated_volume_for(&self, sku_id: SkuId) -> Decimal {
        self.transfers
            .iter()
            .filter(|t| t.sku_id == sku_id && t.transfer_type == TransferType::RetailerToFarmer)
            .map(|t| t.quantity)
            .sum()
    }

    fn volume_of(&self, transfer_type: TransferType) -> Decimal {
        self.transfers
            .iter()
            .filter(|t| t.transfer_type == transfer_type)
            .map(|t| t.quantity)
            .sum()
    }
}
