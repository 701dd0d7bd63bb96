//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else. Names and places are generated with `fake`.

use chrono::{DateTime, Utc};
use core_kernel::{DistributorId, RawMeasure, RetailerId, SkuId};
use domain_allocation::{Retailer, RetailerDirectory, SkuObservation};
use domain_liquidation::{DistributorSeed, DistributorStatus, Priority};
use fake::faker::address::en::{CityName, StateName};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::TemporalFixtures;

/// Builder for distributor seed data
pub struct DistributorSeedBuilder {
    id: DistributorId,
    code: String,
    name: String,
    territory: String,
    zone: String,
    state: String,
    status: DistributorStatus,
    priority: Priority,
    opening_stock: RawMeasure,
    period_sales: RawMeasure,
    liquidation: RawMeasure,
    last_updated: Option<DateTime<Utc>>,
}

impl Default for DistributorSeedBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DistributorSeedBuilder {
    /// Creates a new builder with generated identity and empty stock
    pub fn new() -> Self {
        let number: u32 = (1..1000).fake();
        Self {
            id: DistributorId::new(),
            code: format!("DLR{:03}", number),
            name: CompanyName().fake(),
            territory: CityName().fake(),
            zone: "West".to_string(),
            state: StateName().fake(),
            status: DistributorStatus::Active,
            priority: Priority::Medium,
            opening_stock: RawMeasure::default(),
            period_sales: RawMeasure::default(),
            liquidation: RawMeasure::default(),
            last_updated: Some(TemporalFixtures::recorded_at()),
        }
    }

    pub fn with_id(mut self, id: DistributorId) -> Self {
        self.id = id;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_territory(mut self, territory: impl Into<String>) -> Self {
        self.territory = territory.into();
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_status(mut self, status: DistributorStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets opening stock volume and value
    pub fn with_opening(mut self, volume: f64, value: f64) -> Self {
        self.opening_stock = RawMeasure::new(volume, value);
        self
    }

    /// Sets period sales volume and value
    pub fn with_period_sales(mut self, volume: f64, value: f64) -> Self {
        self.period_sales = RawMeasure::new(volume, value);
        self
    }

    /// Sets liquidation volume and value
    pub fn with_liquidation(mut self, volume: f64, value: f64) -> Self {
        self.liquidation = RawMeasure::new(volume, value);
        self
    }

    /// Sets raw measures verbatim, including unsanitized figures
    pub fn with_raw(mut self, opening: RawMeasure, sales: RawMeasure, liquidation: RawMeasure) -> Self {
        self.opening_stock = opening;
        self.period_sales = sales;
        self.liquidation = liquidation;
        self
    }

    pub fn with_last_updated(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_updated = at;
        self
    }

    /// Builds the seed
    pub fn build(self) -> DistributorSeed {
        DistributorSeed {
            id: self.id,
            code: self.code,
            name: self.name,
            territory: self.territory,
            zone: self.zone,
            state: self.state,
            status: self.status,
            priority: self.priority,
            opening_stock: self.opening_stock,
            period_sales: self.period_sales,
            liquidation: self.liquidation,
            last_updated: self.last_updated,
        }
    }
}

/// Builder for SKU re-count observations
pub struct SkuObservationBuilder {
    sku_id: SkuId,
    prior_stock: Decimal,
    edited_stock: Decimal,
    unit: String,
}

impl Default for SkuObservationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SkuObservationBuilder {
    /// Creates an unchanged count of 100 Kg
    pub fn new() -> Self {
        Self {
            sku_id: SkuId::new(),
            prior_stock: dec!(100),
            edited_stock: dec!(100),
            unit: "Kg".to_string(),
        }
    }

    pub fn with_sku_id(mut self, sku_id: SkuId) -> Self {
        self.sku_id = sku_id;
        self
    }

    pub fn with_prior(mut self, prior: Decimal) -> Self {
        self.prior_stock = prior;
        self
    }

    pub fn with_edited(mut self, edited: Decimal) -> Self {
        self.edited_stock = edited;
        self
    }

    /// Sets the edited count to `decrease` below the prior count
    pub fn decreased_by(mut self, decrease: Decimal) -> Self {
        self.edited_stock = self.prior_stock - decrease;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn build(self) -> SkuObservation {
        SkuObservation {
            sku_id: self.sku_id,
            prior_stock: self.prior_stock,
            edited_stock: self.edited_stock,
            unit: self.unit,
        }
    }
}

/// Builds a directory of `count` retailers with generated names
pub fn fake_retailer_directory(count: usize) -> RetailerDirectory {
    (0..count)
        .map(|i| {
            let company: String = CompanyName().fake();
            Retailer::new(RetailerId::new(), format!("{} {}", company, i + 1))
        })
        .collect()
}
