//! Rule dispatch
//!
//! [`RuleCheck`] has one variant per rule, so callers inside the engine pick
//! the rule at compile time. Boundary callers that only have an operation
//! name and a JSON payload go through [`RuleValidator::validate_tagged`].

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::approval::{check_approval, ApprovalInput};
use crate::config::{RuleThresholds, UnknownOperationPolicy};
use crate::error::RuleError;
use crate::field::{
    check_activity_plan, check_travel_expense, check_visit_location, check_working_hours,
    ActivityPlanInput, TravelExpenseInput, VisitLocationInput, WorkingHoursInput,
};
use crate::finance::{
    check_credit_limit, check_payment, check_sales_order, CreditLimitInput, PaymentInput,
    SalesOrderInput,
};
use crate::performance::{
    check_performance_score, check_target_achievement, PerformanceScoreInput,
    TargetAchievementInput,
};
use crate::result::ValidationResult;
use crate::stock::{
    check_inventory_variance, check_retailer_liquidation, check_stock_conservation,
    check_stock_movement, InventoryVarianceInput, RetailerLiquidationInput,
    StockConservationInput, StockMovementInput,
};

/// A rule together with its input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "data", rename_all = "snake_case")]
pub enum RuleCheck {
    StockConservation(StockConservationInput),
    StockMovement(StockMovementInput),
    CreditLimit(CreditLimitInput),
    TravelExpense(TravelExpenseInput),
    VisitLocation(VisitLocationInput),
    RetailerLiquidation(RetailerLiquidationInput),
    ApprovalWorkflow(ApprovalInput),
    PerformanceScore(PerformanceScoreInput),
    ActivityPlanning(ActivityPlanInput),
    SalesOrder(SalesOrderInput),
    WorkingHours(WorkingHoursInput),
    PaymentBounds(PaymentInput),
    InventoryVariance(InventoryVarianceInput),
    TargetAchievement(TargetAchievementInput),
}

impl RuleCheck {
    /// Operation names accepted by the tagged entry point
    pub const OPERATIONS: [&'static str; 14] = [
        "stock_conservation",
        "stock_movement",
        "credit_limit",
        "travel_expense",
        "visit_location",
        "retailer_liquidation",
        "approval_workflow",
        "performance_score",
        "activity_planning",
        "sales_order",
        "working_hours",
        "payment_bounds",
        "inventory_variance",
        "target_achievement",
    ];

    /// The operation name of this check
    pub fn operation(&self) -> &'static str {
        match self {
            RuleCheck::StockConservation(_) => "stock_conservation",
            RuleCheck::StockMovement(_) => "stock_movement",
            RuleCheck::CreditLimit(_) => "credit_limit",
            RuleCheck::TravelExpense(_) => "travel_expense",
            RuleCheck::VisitLocation(_) => "visit_location",
            RuleCheck::RetailerLiquidation(_) => "retailer_liquidation",
            RuleCheck::ApprovalWorkflow(_) => "approval_workflow",
            RuleCheck::PerformanceScore(_) => "performance_score",
            RuleCheck::ActivityPlanning(_) => "activity_planning",
            RuleCheck::SalesOrder(_) => "sales_order",
            RuleCheck::WorkingHours(_) => "working_hours",
            RuleCheck::PaymentBounds(_) => "payment_bounds",
            RuleCheck::InventoryVariance(_) => "inventory_variance",
            RuleCheck::TargetAchievement(_) => "target_achievement",
        }
    }

    /// Returns true if `operation` names a known rule
    pub fn is_known_operation(operation: &str) -> bool {
        Self::OPERATIONS.contains(&operation)
    }
}

/// Runs rule checks against a set of thresholds
#[derive(Debug, Clone, Default)]
pub struct RuleValidator {
    thresholds: RuleThresholds,
}

impl RuleValidator {
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RuleThresholds {
        &self.thresholds
    }

    /// Runs one rule check
    #[instrument(skip(self, check), fields(operation = check.operation()))]
    pub fn validate(&self, check: &RuleCheck) -> ValidationResult {
        let t = &self.thresholds;
        let result = match check {
            RuleCheck::StockConservation(input) => check_stock_conservation(input, &t.conservation),
            RuleCheck::StockMovement(input) => check_stock_movement(input, &t.movement),
            RuleCheck::CreditLimit(input) => check_credit_limit(input, &t.credit),
            RuleCheck::TravelExpense(input) => check_travel_expense(input, &t.travel),
            RuleCheck::VisitLocation(input) => check_visit_location(input, &t.location),
            RuleCheck::RetailerLiquidation(input) => check_retailer_liquidation(input, &t.retailer),
            RuleCheck::ApprovalWorkflow(input) => check_approval(input, &t.approval),
            RuleCheck::PerformanceScore(input) => check_performance_score(input, &t.performance),
            RuleCheck::ActivityPlanning(input) => check_activity_plan(input, &t.activity),
            RuleCheck::SalesOrder(input) => check_sales_order(input, &t.sales_order),
            RuleCheck::WorkingHours(input) => check_working_hours(input, &t.working_hours),
            RuleCheck::PaymentBounds(input) => check_payment(input, &t.payment),
            RuleCheck::InventoryVariance(input) => check_inventory_variance(input, &t.inventory),
            RuleCheck::TargetAchievement(input) => check_target_achievement(input, &t.target),
        };

        debug!(
            is_valid = result.is_valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Rule evaluated"
        );
        result
    }

    /// Runs several checks and merges their results
    pub fn validate_all<'a>(&self, checks: impl IntoIterator<Item = &'a RuleCheck>) -> ValidationResult {
        let mut combined = ValidationResult::ok();
        for check in checks {
            combined.merge(self.validate(check));
        }
        combined
    }

    /// Runs the rule named by `operation` on a JSON payload
    ///
    /// # Errors
    ///
    /// Returns `RuleError::MalformedInput` if the payload does not have the
    /// shape of the named rule's input. Unknown operation names are not
    /// errors; they follow the configured [`UnknownOperationPolicy`].
    pub fn validate_tagged(
        &self,
        operation: &str,
        payload: serde_json::Value,
    ) -> Result<ValidationResult, RuleError> {
        if !RuleCheck::is_known_operation(operation) {
            warn!(operation, policy = ?self.thresholds.unknown_operation, "Unknown rule operation");
            return Ok(match self.thresholds.unknown_operation {
                UnknownOperationPolicy::Permit => ValidationResult::ok(),
                UnknownOperationPolicy::Reject => {
                    ValidationResult::fail(vec![format!("Unknown operation type: {}", operation)])
                }
            });
        }

        let tagged = serde_json::json!({ "operation": operation, "data": payload });
        let check: RuleCheck = serde_json::from_value(tagged)
            .map_err(|e| RuleError::malformed(operation, e.to_string()))?;
        Ok(self.validate(&check))
    }
}
