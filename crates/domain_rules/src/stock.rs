//! Stock rules
//!
//! Conservation of the four stock metrics, stock movements, retailer-level
//! liquidation and physical inventory counts.

use core_kernel::StockMeasure;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{ConservationThresholds, InventoryThresholds, MovementThresholds, RetailerThresholds};
use crate::result::ValidationResult;

/// Liquidation percentage of the available stock, rounded half away from zero
///
/// The denominator is floored at one unit so an empty entity reports 0%.
/// Negative ratios report 0% and ratios beyond `u32` saturate.
pub fn liquidation_percentage(liquidation_volume: Decimal, available_volume: Decimal) -> u32 {
    let denominator = available_volume.max(Decimal::ONE);
    let ratio = liquidation_volume
        .checked_div(denominator)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    ratio
        .checked_mul(dec!(100))
        .and_then(|percent| {
            percent
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
        })
        .unwrap_or(u32::MAX)
}

/// Whether two figures differ by more than the tolerance
///
/// A difference outside the decimal range always counts as a mismatch.
fn differs(actual: Decimal, expected: Decimal, tolerance: Decimal) -> bool {
    actual
        .checked_sub(expected)
        .map_or(true, |difference| difference.abs() > tolerance)
}

/// A candidate stock tuple to check for conservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockConservationInput {
    pub opening: StockMeasure,
    pub period_sales: StockMeasure,
    pub liquidation: StockMeasure,
    pub balance: StockMeasure,
    /// Reported liquidation percentage, checked when present
    #[serde(default)]
    pub liquidation_percentage: Option<u32>,
}

/// Checks that the four stock metrics are mutually consistent
///
/// Balance must equal opening + sales - liquidation (floored at zero) on both
/// volume and value, liquidation may not exceed the available stock, and the
/// input volumes may not be negative. Values are not sign-checked.
pub fn check_stock_conservation(
    input: &StockConservationInput,
    thresholds: &ConservationThresholds,
) -> ValidationResult {
    let mut result = ValidationResult::ok();

    for (label, measure) in [
        ("Opening stock", &input.opening),
        ("Period sales", &input.period_sales),
        ("Liquidation", &input.liquidation),
    ] {
        if measure.volume < Decimal::ZERO {
            result.add_error(format!("{} volume cannot be negative", label));
        }
    }

    let Some(available) = input.opening.checked_add(&input.period_sales) else {
        result.add_range_error("Opening stock plus period sales");
        return result;
    };
    if input.liquidation.volume > available.volume {
        result.add_error(format!(
            "Liquidation ({}) cannot exceed total available stock ({})",
            input.liquidation.volume.normalize(),
            available.volume.normalize()
        ));
    }

    let expected = available.saturating_sub(&input.liquidation);
    if differs(input.balance.volume, expected.volume, thresholds.tolerance) {
        result.add_error(format!(
            "Balance stock volume ({}) does not match opening + sales - liquidation ({})",
            input.balance.volume.normalize(),
            expected.volume.normalize()
        ));
    }
    if differs(input.balance.value, expected.value, thresholds.tolerance) {
        result.add_error(format!(
            "Balance stock value ({:.2}) does not match opening + sales - liquidation ({:.2})",
            input.balance.value, expected.value
        ));
    }

    if let Some(reported) = input.liquidation_percentage {
        let derived = liquidation_percentage(input.liquidation.volume, available.volume);
        if reported != derived {
            result.add_error(format!(
                "Liquidation percentage ({}%) does not match derived value ({}%)",
                reported, derived
            ));
        }
    }

    if available.volume > Decimal::ZERO {
        let rate = input.liquidation.volume.checked_div(available.volume);
        if let Some(rate) = rate.filter(|rate| *rate < thresholds.low_liquidation_ratio) {
            result.add_warning(format!(
                "Liquidation rate ({}%) is below 50% target",
                rate.saturating_mul(dec!(100)).round_dp(1).normalize()
            ));
        }
    }

    result
}

/// Kind of stock movement being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Sale,
    Purchase,
    Transfer,
    Return,
    Adjustment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovementInput {
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub current_stock: Decimal,
}

/// Checks a single stock movement against the stock on hand
pub fn check_stock_movement(
    input: &StockMovementInput,
    thresholds: &MovementThresholds,
) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.quantity <= Decimal::ZERO {
        result.add_error("Quantity must be greater than zero");
        return result;
    }

    if input.movement_type == MovementType::Sale && input.quantity > input.current_stock {
        result.add_error(format!(
            "Insufficient stock: requested {}, available {}",
            input.quantity.normalize(),
            input.current_stock.normalize()
        ));
    } else if input.current_stock > Decimal::ZERO
        && input
            .current_stock
            .checked_mul(thresholds.large_movement_ratio)
            .is_some_and(|limit| input.quantity > limit)
    {
        result.add_warning(format!(
            "Large stock movement: {} is more than {}% of current stock ({})",
            input.quantity.normalize(),
            thresholds.large_movement_ratio.saturating_mul(dec!(100)).normalize(),
            input.current_stock.normalize()
        ));
    }

    result
}

/// Stock position of one retailer for one SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailerLiquidationInput {
    pub assigned_stock: Decimal,
    pub current_stock: Decimal,
    pub farmer_sales: Decimal,
    pub retailer_sales: Decimal,
}

/// Checks that a retailer's stock is fully accounted for by its sales
pub fn check_retailer_liquidation(
    input: &RetailerLiquidationInput,
    thresholds: &RetailerThresholds,
) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let expected = input
        .farmer_sales
        .checked_add(input.retailer_sales)
        .and_then(|sold| input.assigned_stock.checked_sub(sold));
    match expected {
        Some(expected) if input.current_stock != expected => {
            result.add_error(format!(
                "Current stock ({}) does not match assigned stock minus sales ({})",
                input.current_stock.normalize(),
                expected.normalize()
            ));
        }
        Some(_) => {}
        None => result.add_range_error("Assigned stock minus sales"),
    }

    if input.farmer_sales > input.assigned_stock {
        result.add_error(format!(
            "Farmer sales ({}) cannot exceed assigned stock ({})",
            input.farmer_sales.normalize(),
            input.assigned_stock.normalize()
        ));
    }
    if input.retailer_sales > input.assigned_stock {
        result.add_error(format!(
            "Retailer sales ({}) cannot exceed assigned stock ({})",
            input.retailer_sales.normalize(),
            input.assigned_stock.normalize()
        ));
    }

    if input.assigned_stock > Decimal::ZERO
        && input
            .assigned_stock
            .checked_mul(thresholds.retailer_sales_warning_ratio)
            .is_some_and(|limit| input.retailer_sales > limit)
    {
        result.add_warning(format!(
            "Retailer-to-retailer sales exceed {}% of assigned stock; verify transfers",
            thresholds.retailer_sales_warning_ratio.saturating_mul(dec!(100)).normalize()
        ));
    }

    result
}

/// A physical count compared against the system stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryVarianceInput {
    pub system_stock: Decimal,
    pub physical_stock: Decimal,
}

/// Checks the variance between counted and recorded stock
pub fn check_inventory_variance(
    input: &InventoryVarianceInput,
    thresholds: &InventoryThresholds,
) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.physical_stock < Decimal::ZERO {
        result.add_error("Physical stock count cannot be negative");
        return result;
    }

    if input.system_stock <= Decimal::ZERO {
        if input.physical_stock > Decimal::ZERO {
            result.add_warning(format!(
                "System stock is zero but {} units were counted",
                input.physical_stock.normalize()
            ));
        }
        return result;
    }

    let variance = input
        .physical_stock
        .checked_sub(input.system_stock)
        .and_then(|difference| difference.abs().checked_div(input.system_stock))
        .and_then(|ratio| ratio.checked_mul(dec!(100)));
    let Some(variance) = variance.map(|percent| percent.round_dp(2)) else {
        result.add_range_error("Stock variance");
        return result;
    };
    if variance > thresholds.recount_percent {
        result.add_error(format!(
            "Stock variance of {}% exceeds {}%; recount required",
            variance.normalize(),
            thresholds.recount_percent.normalize()
        ));
    } else if variance > thresholds.warn_percent {
        result.add_warning(format!(
            "Stock variance of {}% exceeds {}%",
            variance.normalize(),
            thresholds.warn_percent.normalize()
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(volume: Decimal, value: Decimal) -> StockMeasure {
        StockMeasure::new(volume, value)
    }

    #[test]
    fn test_liquidation_percentage_floors_denominator() {
        assert_eq!(liquidation_percentage(dec!(30), dec!(120)), 25);
        assert_eq!(liquidation_percentage(dec!(0), dec!(0)), 0);
        assert_eq!(liquidation_percentage(dec!(1), dec!(8)), 13);
    }

    #[test]
    fn test_liquidation_percentage_saturates() {
        assert_eq!(liquidation_percentage(Decimal::MAX, dec!(1)), u32::MAX);
        assert_eq!(liquidation_percentage(dec!(-5), dec!(10)), 0);
    }

    #[test]
    fn test_conservation_balanced_tuple() {
        let input = StockConservationInput {
            opening: measure(dec!(100), dec!(50.00)),
            period_sales: measure(dec!(20), dec!(10.00)),
            liquidation: measure(dec!(30), dec!(15.00)),
            balance: measure(dec!(90), dec!(45.00)),
            liquidation_percentage: Some(25),
        };
        let result = check_stock_conservation(&input, &ConservationThresholds::default());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_conservation_balance_within_tolerance() {
        let input = StockConservationInput {
            opening: measure(dec!(100), dec!(50.00)),
            period_sales: measure(dec!(0), dec!(0)),
            liquidation: measure(dec!(50), dec!(25.00)),
            balance: measure(dec!(50), dec!(25.01)),
            liquidation_percentage: None,
        };
        let result = check_stock_conservation(&input, &ConservationThresholds::default());
        assert!(result.is_valid);
    }

    #[test]
    fn test_movement_zero_quantity() {
        let input = StockMovementInput {
            movement_type: MovementType::Purchase,
            quantity: dec!(0),
            current_stock: dec!(10),
        };
        let result = check_stock_movement(&input, &MovementThresholds::default());
        assert!(!result.is_valid);
    }

    #[test]
    fn test_inventory_zero_system_stock() {
        let input = InventoryVarianceInput {
            system_stock: dec!(0),
            physical_stock: dec!(4),
        };
        let result = check_inventory_variance(&input, &InventoryThresholds::default());
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
