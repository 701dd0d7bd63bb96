//! Integration tests for the rule validator
//!
//! Each rule is exercised through `RuleValidator` with default thresholds,
//! followed by the tagged entry point and property tests for conservation.

use chrono::NaiveDate;
use core_kernel::StockMeasure;
use domain_rules::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn validator() -> RuleValidator {
    RuleValidator::default()
}

// ============================================================================
// Stock conservation
// ============================================================================

mod conservation_tests {
    use super::*;

    fn tuple(liquidation: StockMeasure, balance: StockMeasure) -> RuleCheck {
        RuleCheck::StockConservation(StockConservationInput {
            opening: StockMeasure::new(dec!(100), dec!(50.00)),
            period_sales: StockMeasure::new(dec!(20), dec!(10.00)),
            liquidation,
            balance,
            liquidation_percentage: None,
        })
    }

    #[test]
    fn test_liquidation_exceeding_available_is_rejected() {
        let check = tuple(StockMeasure::new(dec!(130), dec!(65.00)), StockMeasure::zero());
        let result = validator().validate(&check);

        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("cannot exceed total available stock (120)")));
    }

    #[test]
    fn test_balance_mismatch_is_rejected() {
        let check = tuple(
            StockMeasure::new(dec!(30), dec!(15.00)),
            StockMeasure::new(dec!(95), dec!(45.00)),
        );
        let result = validator().validate(&check);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Balance stock volume"));
    }

    #[test]
    fn test_low_liquidation_rate_warns() {
        let check = tuple(
            StockMeasure::new(dec!(12), dec!(6.00)),
            StockMeasure::new(dec!(108), dec!(54.00)),
        );
        let result = validator().validate(&check);

        assert!(result.is_valid);
        assert_eq!(result.warnings, vec!["Liquidation rate (10%) is below 50% target"]);
    }

    #[test]
    fn test_no_rate_warning_without_available_stock() {
        let check = RuleCheck::StockConservation(StockConservationInput {
            opening: StockMeasure::zero(),
            period_sales: StockMeasure::zero(),
            liquidation: StockMeasure::zero(),
            balance: StockMeasure::zero(),
            liquidation_percentage: Some(0),
        });
        let result = validator().validate(&check);

        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_negative_inputs_are_rejected() {
        let check = RuleCheck::StockConservation(StockConservationInput {
            opening: StockMeasure::new(dec!(-1), dec!(0)),
            period_sales: StockMeasure::zero(),
            liquidation: StockMeasure::zero(),
            balance: StockMeasure::zero(),
            liquidation_percentage: None,
        });
        let result = validator().validate(&check);

        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("Opening stock volume cannot be negative")));
    }

    #[test]
    fn test_negative_value_half_is_not_sign_checked() {
        let check = RuleCheck::StockConservation(StockConservationInput {
            opening: StockMeasure::new(dec!(100), dec!(-10.00)),
            period_sales: StockMeasure::new(dec!(20), dec!(10.00)),
            liquidation: StockMeasure::new(dec!(30), dec!(0)),
            balance: StockMeasure::new(dec!(90), dec!(0)),
            liquidation_percentage: Some(25),
        });
        let result = validator().validate(&check);

        assert!(result.is_valid, "{:?}", result.errors);
        assert!(!result.errors.iter().any(|e| e.contains("value cannot be negative")));
    }

    #[test]
    fn test_wrong_reported_percentage_is_rejected() {
        let check = RuleCheck::StockConservation(StockConservationInput {
            opening: StockMeasure::new(dec!(100), dec!(50.00)),
            period_sales: StockMeasure::new(dec!(20), dec!(10.00)),
            liquidation: StockMeasure::new(dec!(30), dec!(15.00)),
            balance: StockMeasure::new(dec!(90), dec!(45.00)),
            liquidation_percentage: Some(30),
        });
        assert!(!validator().validate(&check).is_valid);
    }
}

// ============================================================================
// Stock movement, retailer liquidation, inventory variance
// ============================================================================

mod stock_rule_tests {
    use super::*;

    #[test]
    fn test_sale_exceeding_stock() {
        let check = RuleCheck::StockMovement(StockMovementInput {
            movement_type: MovementType::Sale,
            quantity: dec!(60),
            current_stock: dec!(50),
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("Insufficient stock"));
    }

    #[test]
    fn test_purchase_may_exceed_stock() {
        let check = RuleCheck::StockMovement(StockMovementInput {
            movement_type: MovementType::Purchase,
            quantity: dec!(60),
            current_stock: dec!(50),
        });
        let result = validator().validate(&check);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_large_sale_warns() {
        let check = RuleCheck::StockMovement(StockMovementInput {
            movement_type: MovementType::Sale,
            quantity: dec!(30),
            current_stock: dec!(50),
        });
        let result = validator().validate(&check);
        assert!(result.is_valid);
        assert!(result.warnings[0].contains("Large stock movement"));
    }

    #[test]
    fn test_retailer_stock_must_reconcile() {
        let balanced = RetailerLiquidationInput {
            assigned_stock: dec!(100),
            current_stock: dec!(40),
            farmer_sales: dec!(50),
            retailer_sales: dec!(10),
        };
        assert!(validator().validate(&RuleCheck::RetailerLiquidation(balanced.clone())).is_valid);

        let off_by_one = RetailerLiquidationInput { current_stock: dec!(41), ..balanced };
        let result = validator().validate(&RuleCheck::RetailerLiquidation(off_by_one));
        assert!(!result.is_valid);
    }

    #[test]
    fn test_retailer_heavy_transfers_warn() {
        let input = RetailerLiquidationInput {
            assigned_stock: dec!(100),
            current_stock: dec!(10),
            farmer_sales: dec!(10),
            retailer_sales: dec!(80),
        };
        let result = validator().validate(&RuleCheck::RetailerLiquidation(input));
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_retailer_sales_above_assigned() {
        let input = RetailerLiquidationInput {
            assigned_stock: dec!(100),
            current_stock: dec!(-50),
            farmer_sales: dec!(150),
            retailer_sales: dec!(0),
        };
        let result = validator().validate(&RuleCheck::RetailerLiquidation(input));
        assert!(result.errors.iter().any(|e| e.contains("Farmer sales (150) cannot exceed")));
    }

    #[test]
    fn test_inventory_variance_bands() {
        let check = |physical| {
            validator().validate(&RuleCheck::InventoryVariance(InventoryVarianceInput {
                system_stock: dec!(100),
                physical_stock: physical,
            }))
        };

        let exact = check(dec!(100));
        assert!(exact.is_valid && exact.warnings.is_empty());

        let small = check(dec!(94));
        assert!(small.is_valid);
        assert_eq!(small.warnings.len(), 1);

        let large = check(dec!(85));
        assert!(!large.is_valid);
        assert!(large.errors[0].contains("recount required"));

        assert!(!check(dec!(-1)).is_valid);
    }
}

// ============================================================================
// Finance rules
// ============================================================================

mod finance_tests {
    use super::*;

    #[test]
    fn test_order_exceeding_available_credit() {
        let check = RuleCheck::CreditLimit(CreditLimitInput {
            credit_limit: dec!(100000),
            outstanding: dec!(60000),
            pending: dec!(20000),
            new_order: dec!(25000),
        });
        let result = validator().validate(&check);

        assert!(!result.is_valid);
        assert!(result.errors[0].contains("exceeds available credit (20000)"));
    }

    #[test]
    fn test_high_utilization_warns() {
        let check = RuleCheck::CreditLimit(CreditLimitInput {
            credit_limit: dec!(100000),
            outstanding: dec!(60000),
            pending: dec!(10000),
            new_order: dec!(15000),
        });
        let result = validator().validate(&check);

        assert!(result.is_valid);
        assert_eq!(result.warnings, vec!["Credit utilization (85%) exceeds 80%"]);
    }

    #[test]
    fn test_overdrawn_credit() {
        let check = RuleCheck::CreditLimit(CreditLimitInput {
            credit_limit: dec!(50000),
            outstanding: dec!(45000),
            pending: dec!(10000),
            new_order: dec!(1),
        });
        let result = validator().validate(&check);
        assert!(result.errors[0].contains("available credit is negative"));
    }

    #[test]
    fn test_payment_bounds() {
        let over = RuleCheck::PaymentBounds(PaymentInput {
            amount: dec!(1200),
            outstanding: dec!(1000),
            mode: PaymentMode::Upi,
        });
        assert!(!validator().validate(&over).is_valid);

        let zero = RuleCheck::PaymentBounds(PaymentInput {
            amount: dec!(0),
            outstanding: dec!(1000),
            mode: PaymentMode::Upi,
        });
        assert!(!validator().validate(&zero).is_valid);

        let large = RuleCheck::PaymentBounds(PaymentInput {
            amount: dec!(600000),
            outstanding: dec!(800000),
            mode: PaymentMode::BankTransfer,
        });
        let result = validator().validate(&large);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_sales_order_discounts() {
        let order = |discount| {
            validator().validate(&RuleCheck::SalesOrder(SalesOrderInput {
                quantity: dec!(10),
                unit_price: dec!(500),
                discount_percent: discount,
            }))
        };

        assert!(order(dec!(5)).warnings.is_empty());
        let review = order(dec!(15));
        assert!(review.is_valid);
        assert_eq!(review.warnings.len(), 1);
        assert!(!order(dec!(25)).is_valid);
    }

    #[test]
    fn test_sales_order_value_limit() {
        let check = RuleCheck::SalesOrder(SalesOrderInput {
            quantity: dec!(1000),
            unit_price: dec!(1500),
            discount_percent: dec!(0),
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("single-order limit"));
    }
}

// ============================================================================
// Field rules
// ============================================================================

mod field_tests {
    use super::*;

    #[test]
    fn test_travel_distance_limit() {
        let check = RuleCheck::TravelExpense(TravelExpenseInput {
            mode: TravelMode::Bus,
            distance_km: dec!(120),
            amount: dec!(300),
            working_hours: None,
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("exceeds maximum allowed (110 km)"));
    }

    #[test]
    fn test_car_claim_above_rate_warns() {
        // 50 km x 12 x 1.10 = 660
        let check = RuleCheck::TravelExpense(TravelExpenseInput {
            mode: TravelMode::Car,
            distance_km: dec!(50),
            amount: dec!(700),
            working_hours: Some(dec!(10)),
        });
        let result = validator().validate(&check);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("660"));
    }

    #[test]
    fn test_short_day_warns() {
        let check = RuleCheck::TravelExpense(TravelExpenseInput {
            mode: TravelMode::Bike,
            distance_km: dec!(40),
            amount: dec!(200),
            working_hours: Some(dec!(7)),
        });
        let result = validator().validate(&check);
        assert!(result.is_valid);
        assert!(result.warnings[0].contains("below the 9 hour minimum"));
    }

    #[test]
    fn test_non_positive_distance() {
        let check = RuleCheck::TravelExpense(TravelExpenseInput {
            mode: TravelMode::Car,
            distance_km: dec!(0),
            amount: dec!(100),
            working_hours: None,
        });
        assert!(!validator().validate(&check).is_valid);
    }

    #[test]
    fn test_visit_far_from_plan() {
        let check = RuleCheck::VisitLocation(VisitLocationInput {
            planned: GeoPoint::new(19.9975, 73.7898),
            actual: GeoPoint::new(20.1, 73.9),
            tolerance_km: None,
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("escalated approval"));
    }

    #[test]
    fn test_visit_near_tolerance_warns() {
        // about 4 km north of the planned point
        let check = RuleCheck::VisitLocation(VisitLocationInput {
            planned: GeoPoint::new(20.0, 74.0),
            actual: GeoPoint::new(20.036, 74.0),
            tolerance_km: Some(5.0),
        });
        let result = validator().validate(&check);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_visit_outside_region() {
        let check = RuleCheck::VisitLocation(VisitLocationInput {
            planned: GeoPoint::new(51.5, -0.12),
            actual: GeoPoint::new(51.5, -0.12),
            tolerance_km: None,
        });
        let result = validator().validate(&check);
        assert!(result.errors.iter().any(|e| e.contains("outside expected region")));
    }

    #[test]
    fn test_activity_planning() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let plan = |date: NaiveDate, count| {
            validator().validate(&RuleCheck::ActivityPlanning(ActivityPlanInput {
                planned_date: date,
                today,
                activities_on_day: count,
            }))
        };

        assert!(!plan(today.pred_opt().unwrap(), 1).is_valid);
        assert!(plan(today, 3).warnings.is_empty());
        assert_eq!(plan(today, 9).warnings.len(), 1);
        let far = plan(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(), 1);
        assert!(far.is_valid);
        assert_eq!(far.warnings.len(), 1);
    }

    #[test]
    fn test_working_hours() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let shift = |from: u32, to: u32| {
            validator().validate(&RuleCheck::WorkingHours(WorkingHoursInput {
                check_in: day.and_hms_opt(from, 0, 0).unwrap(),
                check_out: day.and_hms_opt(to, 0, 0).unwrap(),
            }))
        };

        assert!(!shift(10, 9).is_valid);
        assert!(!shift(5, 22).is_valid);
        assert_eq!(shift(7, 20).warnings, vec!["Long working day of 13 hours"]);
        assert_eq!(shift(9, 17).warnings.len(), 1);
        assert!(shift(9, 19).warnings.is_empty());
    }
}

// ============================================================================
// Approval and performance rules
// ============================================================================

mod approval_tests {
    use super::*;

    #[test]
    fn test_approver_must_outrank_submitter() {
        let check = RuleCheck::ApprovalWorkflow(ApprovalInput {
            submitter: Role::Rbh,
            approver: Role::Rbh,
            request_kind: RequestKind::Activity,
            amount: None,
        });
        assert!(!validator().validate(&check).is_valid);
    }

    #[test]
    fn test_expense_band_requires_senior_approver() {
        let check = RuleCheck::ApprovalWorkflow(ApprovalInput {
            submitter: Role::Mdo,
            approver: Role::Tsm,
            request_kind: RequestKind::Expense,
            amount: Some(dec!(20000)),
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("RBH"));

        let escalated = RuleCheck::ApprovalWorkflow(ApprovalInput {
            submitter: Role::Mdo,
            approver: Role::Rbh,
            request_kind: RequestKind::Expense,
            amount: Some(dec!(20000)),
        });
        assert!(validator().validate(&escalated).is_valid);
    }

    #[test]
    fn test_largest_expenses_need_md() {
        let check = RuleCheck::ApprovalWorkflow(ApprovalInput {
            submitter: Role::Zbh,
            approver: Role::Vp,
            request_kind: RequestKind::Expense,
            amount: Some(dec!(750000)),
        });
        assert!(!validator().validate(&check).is_valid);
    }

    #[test]
    fn test_performance_score() {
        let score = |s| validator().validate(&RuleCheck::PerformanceScore(PerformanceScoreInput { score: s }));
        assert!(!score(dec!(101)).is_valid);
        assert!(!score(dec!(-1)).is_valid);
        assert_eq!(score(dec!(40)).warnings.len(), 1);
        assert!(score(dec!(75)).warnings.is_empty());
    }

    #[test]
    fn test_target_achievement() {
        let achieve = |target, achieved| {
            validator().validate(&RuleCheck::TargetAchievement(TargetAchievementInput { target, achieved }))
        };
        assert!(!achieve(dec!(0), dec!(10)).is_valid);
        assert!(!achieve(dec!(100), dec!(-1)).is_valid);
        assert!(achieve(dec!(100), dec!(160)).warnings[0].contains("verify"));
        assert_eq!(achieve(dec!(100), dec!(40)).warnings.len(), 1);
        assert!(achieve(dec!(100), dec!(90)).warnings.is_empty());
    }
}

// ============================================================================
// Tagged dispatch
// ============================================================================

mod dispatch_tests {
    use super::*;

    #[test]
    fn test_tagged_credit_check() {
        let result = validator()
            .validate_tagged(
                "credit_limit",
                json!({
                    "credit_limit": 100000,
                    "outstanding": 60000,
                    "pending": 20000,
                    "new_order": 25000
                }),
            )
            .unwrap();
        assert!(!result.is_valid);
    }

    #[test]
    fn test_tagged_missing_field_is_malformed() {
        let error = validator()
            .validate_tagged("credit_limit", json!({ "credit_limit": 100000 }))
            .unwrap_err();
        assert!(matches!(error, RuleError::MalformedInput { ref operation, .. } if operation == "credit_limit"));
    }

    #[test]
    fn test_unknown_operation_is_permitted_by_default() {
        let result = validator().validate_tagged("weather_check", json!({})).unwrap();
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_operation_can_be_rejected() {
        let thresholds = RuleThresholds {
            unknown_operation: UnknownOperationPolicy::Reject,
            ..Default::default()
        };
        let result = RuleValidator::new(thresholds)
            .validate_tagged("weather_check", json!({}))
            .unwrap();
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("weather_check"));
    }

    #[test]
    fn test_validate_all_merges() {
        let checks = vec![
            RuleCheck::PerformanceScore(PerformanceScoreInput { score: dec!(40) }),
            RuleCheck::PaymentBounds(PaymentInput {
                amount: dec!(0),
                outstanding: dec!(100),
                mode: PaymentMode::Cash,
            }),
        ];
        let result = validator().validate_all(&checks);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_custom_thresholds_apply() {
        let mut thresholds = RuleThresholds::default();
        thresholds.travel.max_distance_km = dec!(200);
        let check = RuleCheck::TravelExpense(TravelExpenseInput {
            mode: TravelMode::Train,
            distance_km: dec!(150),
            amount: dec!(400),
            working_hours: None,
        });
        assert!(RuleValidator::new(thresholds).validate(&check).is_valid);
    }
}

// ============================================================================
// Figures at the edge of the decimal range
// ============================================================================

mod range_tests {
    use super::*;
    use chrono::NaiveDateTime;

    /// Smallest positive decimal
    fn tiny() -> Decimal {
        Decimal::new(1, 28)
    }

    fn assert_range_error(result: &ValidationResult, figure: &str) {
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&format!("{figure} exceeds supported range")),
            "{:?}",
            result.errors
        );
    }

    #[test]
    fn test_conservation_available_overflow() {
        let check = RuleCheck::StockConservation(StockConservationInput {
            opening: StockMeasure::new(Decimal::MAX, dec!(1)),
            period_sales: StockMeasure::new(dec!(1), dec!(1)),
            liquidation: StockMeasure::zero(),
            balance: StockMeasure::zero(),
            liquidation_percentage: Some(0),
        });
        let result = validator().validate(&check);
        assert_range_error(&result, "Opening stock plus period sales");
    }

    #[test]
    fn test_conservation_balance_difference_overflow() {
        let check = RuleCheck::StockConservation(StockConservationInput {
            opening: StockMeasure::new(Decimal::MAX, Decimal::ZERO),
            period_sales: StockMeasure::zero(),
            liquidation: StockMeasure::zero(),
            balance: StockMeasure::new(Decimal::MIN, Decimal::ZERO),
            liquidation_percentage: None,
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("Balance stock volume"));
    }

    #[test]
    fn test_conservation_tiny_available_stock() {
        let check = RuleCheck::StockConservation(StockConservationInput {
            opening: StockMeasure::new(tiny(), Decimal::ZERO),
            period_sales: StockMeasure::zero(),
            liquidation: StockMeasure::new(Decimal::MAX, Decimal::ZERO),
            balance: StockMeasure::zero(),
            liquidation_percentage: Some(u32::MAX),
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert!(result.warnings.is_empty());
        assert!(result.errors.iter().any(|e| e.contains("cannot exceed total available stock")));
    }

    #[test]
    fn test_movement_limit_overflow_skips_warning() {
        let mut thresholds = RuleThresholds::default();
        thresholds.movement.large_movement_ratio = dec!(2);
        let check = RuleCheck::StockMovement(StockMovementInput {
            movement_type: MovementType::Purchase,
            quantity: Decimal::MAX,
            current_stock: Decimal::MAX,
        });
        let result = RuleValidator::new(thresholds).validate(&check);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_credit_available_overflow() {
        let check = RuleCheck::CreditLimit(CreditLimitInput {
            credit_limit: dec!(1),
            outstanding: Decimal::MAX,
            pending: Decimal::MAX,
            new_order: dec!(1),
        });
        let result = validator().validate(&check);
        assert_range_error(&result, "Available credit");
    }

    #[test]
    fn test_credit_utilization_overflow() {
        let check = RuleCheck::CreditLimit(CreditLimitInput {
            credit_limit: tiny(),
            outstanding: Decimal::ZERO,
            pending: Decimal::ZERO,
            new_order: Decimal::MAX,
        });
        let result = validator().validate(&check);
        assert!(result.errors[0].contains("exceeds available credit"));
        assert_range_error(&result, "Credit utilization");
    }

    #[test]
    fn test_travel_expected_cost_overflow() {
        let result = validator()
            .validate_tagged(
                "travel_expense",
                json!({
                    "mode": "car",
                    "distance_km": "10000000000000000000000000000",
                    "amount": "1"
                }),
            )
            .unwrap();
        assert!(result.errors[0].contains("exceeds maximum allowed"));
        assert_range_error(&result, "Expected travel cost");
    }

    #[test]
    fn test_visit_location_extreme_coordinates() {
        let check = RuleCheck::VisitLocation(VisitLocationInput {
            planned: GeoPoint::new(f64::MAX, f64::MIN),
            actual: GeoPoint::new(f64::MIN, f64::MAX),
            tolerance_km: Some(f64::MAX),
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_retailer_sales_overflow() {
        let check = RuleCheck::RetailerLiquidation(RetailerLiquidationInput {
            assigned_stock: Decimal::MAX,
            current_stock: Decimal::ZERO,
            farmer_sales: Decimal::MAX,
            retailer_sales: Decimal::MAX,
        });
        let result = validator().validate(&check);
        assert_range_error(&result, "Assigned stock minus sales");
    }

    #[test]
    fn test_approval_maximum_amount() {
        let check = RuleCheck::ApprovalWorkflow(ApprovalInput {
            submitter: Role::Zbh,
            approver: Role::Md,
            request_kind: RequestKind::Expense,
            amount: Some(Decimal::MAX),
        });
        assert!(validator().validate(&check).is_valid);
    }

    #[test]
    fn test_performance_maximum_score() {
        let check = RuleCheck::PerformanceScore(PerformanceScoreInput { score: Decimal::MAX });
        assert!(!validator().validate(&check).is_valid);
    }

    #[test]
    fn test_activity_planning_date_extremes() {
        let check = RuleCheck::ActivityPlanning(ActivityPlanInput {
            planned_date: NaiveDate::MAX,
            today: NaiveDate::MIN,
            activities_on_day: u32::MAX,
        });
        let result = validator().validate(&check);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_sales_order_value_overflow() {
        let result = validator()
            .validate_tagged(
                "sales_order",
                json!({
                    "quantity": "100000000000000",
                    "unit_price": "100000000000000000"
                }),
            )
            .unwrap();
        assert_range_error(&result, "Order value");
    }

    #[test]
    fn test_working_hours_datetime_extremes() {
        let check = RuleCheck::WorkingHours(WorkingHoursInput {
            check_in: NaiveDateTime::MIN,
            check_out: NaiveDateTime::MAX,
        });
        let result = validator().validate(&check);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("hour maximum"));
    }

    #[test]
    fn test_payment_maximum_amount() {
        let check = RuleCheck::PaymentBounds(PaymentInput {
            amount: Decimal::MAX,
            outstanding: Decimal::MAX,
            mode: PaymentMode::BankTransfer,
        });
        let result = validator().validate(&check);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_inventory_variance_overflow() {
        let check = RuleCheck::InventoryVariance(InventoryVarianceInput {
            system_stock: tiny(),
            physical_stock: Decimal::MAX,
        });
        let result = validator().validate(&check);
        assert_range_error(&result, "Stock variance");
    }

    #[test]
    fn test_target_achievement_overflow() {
        let check = RuleCheck::TargetAchievement(TargetAchievementInput {
            target: tiny(),
            achieved: Decimal::MAX,
        });
        let result = validator().validate(&check);
        assert_range_error(&result, "Achievement percentage");
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A tuple with balance derived from its inputs always passes conservation
    #[test]
    fn prop_derived_balance_is_conserved(
        opening in 0u32..100_000u32,
        sales in 0u32..100_000u32,
        liquidated_bp in 0u32..=10_000u32,
    ) {
        let opening = StockMeasure::new(Decimal::from(opening), Decimal::from(opening) / dec!(2));
        let sales = StockMeasure::new(Decimal::from(sales), Decimal::from(sales) / dec!(2));
        let available = opening + sales;
        let liquidation = available.scale(Decimal::new(liquidated_bp as i64, 4));
        let balance = available.saturating_sub(&liquidation);

        let input = StockConservationInput {
            opening,
            period_sales: sales,
            liquidation,
            balance,
            liquidation_percentage: Some(liquidation_percentage(liquidation.volume, available.volume)),
        };
        let result = validator().validate(&RuleCheck::StockConservation(input));
        prop_assert!(result.is_valid, "{:?}", result.errors);
    }

    /// Liquidation above the available stock is always an error
    #[test]
    fn prop_over_liquidation_is_rejected(
        opening in 0u32..100_000u32,
        sales in 0u32..100_000u32,
        excess in 1u32..1_000u32,
    ) {
        let opening = StockMeasure::new(Decimal::from(opening), Decimal::ZERO);
        let sales = StockMeasure::new(Decimal::from(sales), Decimal::ZERO);
        let liquidation = StockMeasure::new(opening.volume + sales.volume + Decimal::from(excess), Decimal::ZERO);

        let input = StockConservationInput {
            opening,
            period_sales: sales,
            liquidation,
            balance: StockMeasure::zero(),
            liquidation_percentage: None,
        };
        let result = validator().validate(&RuleCheck::StockConservation(input));
        prop_assert!(!result.is_valid);
        prop_assert!(result.errors.iter().any(|e| e.contains("cannot exceed total available stock")));
    }
}
