//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random stock figures and
//! distributor seeds that maintain domain invariants.

use core_kernel::{DistributorId, RawMeasure, StockMeasure};
use domain_liquidation::{DistributorSeed, DistributorStatus, Priority};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::fixtures::TemporalFixtures;

/// Strategy for whole-unit volumes
pub fn volume_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(Decimal::from)
}

/// Strategy for monetary values with two decimal places
pub fn value_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for non-negative stock measures
pub fn stock_measure_strategy() -> impl Strategy<Value = StockMeasure> {
    (volume_strategy(), value_strategy()).prop_map(|(volume, value)| StockMeasure::new(volume, value))
}

/// Strategy for opening, sales and liquidation where liquidation never
/// exceeds the available stock on either half
pub fn conserving_inputs_strategy() -> impl Strategy<Value = (StockMeasure, StockMeasure, StockMeasure)> {
    (stock_measure_strategy(), stock_measure_strategy(), 0u32..=100u32, 0u32..=100u32).prop_map(
        |(opening, sales, volume_pct, value_pct)| {
            let available = opening + sales;
            let liquidation = StockMeasure::new(
                (available.volume * Decimal::from(volume_pct) / Decimal::ONE_HUNDRED).floor(),
                (available.value * Decimal::from(value_pct) / Decimal::ONE_HUNDRED).round_dp(2).min(available.value),
            );
            (opening, sales, liquidation)
        },
    )
}

/// Strategy for opening, sales and a liquidation volume above the available stock
pub fn overdrawn_inputs_strategy() -> impl Strategy<Value = (StockMeasure, StockMeasure, StockMeasure)> {
    (stock_measure_strategy(), stock_measure_strategy(), 1i64..10_000i64).prop_map(
        |(opening, sales, excess)| {
            let available = opening + sales;
            let liquidation = StockMeasure::new(available.volume + Decimal::from(excess), available.value);
            (opening, sales, liquidation)
        },
    )
}

/// Strategy for one upstream figure, including garbage
pub fn raw_figure_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        4 => (0.0f64..1_000_000.0).prop_map(Some),
        1 => (-1_000.0f64..0.0).prop_map(Some),
        1 => Just(Some(f64::NAN)),
        1 => Just(Some(f64::INFINITY)),
        1 => Just(None),
    ]
}

/// Strategy for unsanitized measures
pub fn raw_measure_strategy() -> impl Strategy<Value = RawMeasure> {
    (raw_figure_strategy(), raw_figure_strategy()).prop_map(|(volume, value)| RawMeasure { volume, value })
}

/// Strategy for a distributor seed whose figures satisfy conservation
pub fn distributor_seed_strategy() -> impl Strategy<Value = DistributorSeed> {
    (
        1u32..1000,
        prop_oneof![Just("Nashik"), Just("Pune"), Just("Indore"), Just("Nagpur")],
        (0u32..5000, 0u32..5000, 0u32..=100),
    )
        .prop_map(|(number, territory, (opening, sales, pct))| {
            let opening = opening as f64;
            let sales = sales as f64;
            let liquidation = ((opening + sales) * pct as f64 / 100.0).floor();
            DistributorSeed {
                id: DistributorId::new(),
                code: format!("DLR{:03}", number),
                name: format!("Distributor {}", number),
                territory: territory.to_string(),
                zone: "West".to_string(),
                state: "Maharashtra".to_string(),
                status: DistributorStatus::Active,
                priority: Priority::Medium,
                opening_stock: RawMeasure::new(opening, opening * 0.5),
                period_sales: RawMeasure::new(sales, sales * 0.5),
                liquidation: RawMeasure::new(liquidation, liquidation * 0.5),
                last_updated: Some(TemporalFixtures::recorded_at()),
            }
        })
}

/// Strategy for a portfolio of one to `max` distributors
pub fn portfolio_seeds_strategy(max: usize) -> impl Strategy<Value = Vec<DistributorSeed>> {
    prop::collection::vec(distributor_seed_strategy(), 1..=max.max(1))
}
