//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::StockMeasure;
use domain_allocation::{Submission, TransferType};
use domain_liquidation::StockTuple;
use domain_rules::ValidationResult;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Asserts that two measures are equal within a tolerance on each half
pub fn assert_measure_approx_eq(actual: &StockMeasure, expected: &StockMeasure, tolerance: Decimal) {
    let volume_diff = (actual.volume - expected.volume).abs();
    let value_diff = (actual.value - expected.value).abs();
    assert!(
        volume_diff <= tolerance && value_diff <= tolerance,
        "Measures differ by more than tolerance: actual={}, expected={}, tolerance={}",
        actual,
        expected,
        tolerance
    );
}

/// Asserts that a tuple's balance equals opening + sales - liquidation
/// floored at zero, to the cent
pub fn assert_conserved(tuple: &StockTuple) {
    let expected = (tuple.opening_stock() + tuple.period_sales()).saturating_sub(&tuple.liquidation());
    assert_measure_approx_eq(&tuple.balance_stock(), &expected, dec!(0.01));
    assert!(
        tuple.liquidation().volume <= tuple.available().volume,
        "Liquidation {} exceeds available {}",
        tuple.liquidation().volume,
        tuple.available().volume
    );
}

/// Asserts that a validation result passed
pub fn assert_valid(result: &ValidationResult) {
    assert!(result.is_valid, "Expected a valid result, got errors: {:?}", result.errors);
    assert!(result.errors.is_empty(), "Valid result carries errors: {:?}", result.errors);
}

/// Asserts that a validation result failed with an error containing `needle`
pub fn assert_error_containing(result: &ValidationResult, needle: &str) {
    assert!(!result.is_valid, "Expected an invalid result");
    assert!(
        result.errors.iter().any(|e| e.contains(needle)),
        "No error contains {:?}: {:?}",
        needle,
        result.errors
    );
}

/// Asserts that a validation result carries a warning containing `needle`
pub fn assert_warning_containing(result: &ValidationResult, needle: &str) {
    assert!(
        result.warnings.iter().any(|w| w.contains(needle)),
        "No warning contains {:?}: {:?}",
        needle,
        result.warnings
    );
}

/// Asserts that a submission's transfers only leave the verified entity
/// and that every quantity is positive
pub fn assert_submission_well_formed(submission: &Submission) {
    for transfer in &submission.transfers {
        assert_eq!(transfer.from_id, submission.entity, "Transfer not from verified entity");
        assert!(transfer.quantity > Decimal::ZERO, "Non-positive transfer quantity {}", transfer.quantity);
        if transfer.transfer_type == TransferType::RetailerToFarmer {
            assert_eq!(transfer.to_id, core_kernel::StockHolder::Farmer);
        }
    }
}
