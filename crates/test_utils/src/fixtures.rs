//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the distribution chain. These
//! fixtures are consistent and predictable for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{DistributorId, RawMeasure, RetailerId, StockMeasure};
use domain_allocation::{Retailer, RetailerDirectory};
use domain_liquidation::{DistributorSeed, DistributorStatus, FixedClock, MetricsCalculator, Priority};
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Fixture for stock measures
pub struct MeasureFixtures;

impl MeasureFixtures {
    /// Opening stock of the reference distributor
    pub fn opening() -> StockMeasure {
        StockMeasure::new(dec!(100), dec!(50.00))
    }

    /// Period sales of the reference distributor
    pub fn period_sales() -> StockMeasure {
        StockMeasure::new(dec!(20), dec!(10.00))
    }

    /// Liquidation of the reference distributor, 25% of available
    pub fn liquidation() -> StockMeasure {
        StockMeasure::new(dec!(30), dec!(15.00))
    }

    /// Liquidation exceeding the reference distributor's available stock
    pub fn excessive_liquidation() -> StockMeasure {
        StockMeasure::new(dec!(130), dec!(65.00))
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant every fixed-clock calculator reports
    pub fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).unwrap()
    }

    /// When seed figures were recorded upstream
    pub fn recorded_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 31, 18, 0, 0).unwrap()
    }
}

/// Fixture for engine components
pub struct EngineFixtures;

impl EngineFixtures {
    /// A calculator with default thresholds and a fixed clock
    pub fn calculator() -> MetricsCalculator {
        MetricsCalculator::default().with_clock(Arc::new(FixedClock(TemporalFixtures::as_of())))
    }
}

/// Fixture for distributor seeds
pub struct SeedFixtures;

impl SeedFixtures {
    /// The reference distributor: opening 100, sales 20, liquidation 30
    pub fn reference() -> DistributorSeed {
        Self::with_figures(
            "DLR001",
            "Nashik",
            (100.0, 50.0),
            (20.0, 10.0),
            (30.0, 15.0),
        )
    }

    /// A distributor in the West zone with the given raw figures
    pub fn with_figures(
        code: &str,
        territory: &str,
        opening: (f64, f64),
        sales: (f64, f64),
        liquidation: (f64, f64),
    ) -> DistributorSeed {
        DistributorSeed {
            id: DistributorId::new(),
            code: code.to_string(),
            name: format!("{} Agro Traders", code),
            territory: territory.to_string(),
            zone: "West".to_string(),
            state: "Maharashtra".to_string(),
            status: DistributorStatus::Active,
            priority: Priority::Medium,
            opening_stock: RawMeasure::new(opening.0, opening.1),
            period_sales: RawMeasure::new(sales.0, sales.1),
            liquidation: RawMeasure::new(liquidation.0, liquidation.1),
            last_updated: Some(TemporalFixtures::recorded_at()),
        }
    }

    /// Three distributors across two territories
    pub fn west_zone() -> Vec<DistributorSeed> {
        vec![
            Self::with_figures("DLR001", "Nashik", (100.0, 50.0), (20.0, 10.0), (30.0, 15.0)),
            Self::with_figures("DLR002", "Nashik", (200.0, 100.0), (40.0, 20.0), (60.0, 30.0)),
            Self::with_figures("DLR003", "Pune", (300.0, 150.0), (140.0, 70.0), (110.0, 55.0)),
        ]
    }
}

/// Fixture for retailer directories
pub struct DirectoryFixtures;

impl DirectoryFixtures {
    /// Two retailers, "RetailerX" and "Shree Krishi Kendra"
    pub fn retailers() -> RetailerDirectory {
        RetailerDirectory::new(vec![
            Retailer::new(RetailerId::new(), "RetailerX"),
            Retailer::new(RetailerId::new(), "Shree Krishi Kendra"),
        ])
    }
}
