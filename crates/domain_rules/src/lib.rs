//! Rule Validator - Business rules over stock metrics and field operations
//!
//! This crate provides the independent business-rule checks used by the
//! liquidation engine and the surrounding dashboard:
//!
//! - **Stock rules**: conservation of opening, sales, liquidation and balance;
//!   stock movements; retailer liquidation; inventory variance
//! - **Finance rules**: credit limits, payment bounds, sales-order limits
//! - **Field rules**: travel expenses, visit location, activity planning,
//!   working hours
//! - **Approval rules**: role hierarchy and expense approval bands
//! - **Performance rules**: performance scores and target achievement
//!
//! Every rule takes a precise input struct and returns a [`ValidationResult`].
//! Rules never fail; errors block the triggering action and warnings call for
//! explicit confirmation. [`RuleValidator`] dispatches a [`RuleCheck`] to the
//! matching rule using the configured [`RuleThresholds`].

pub mod result;
pub mod config;
pub mod error;
pub mod stock;
pub mod finance;
pub mod field;
pub mod approval;
pub mod performance;
pub mod dispatch;

pub use result::ValidationResult;
pub use config::{RuleThresholds, UnknownOperationPolicy};
pub use error::RuleError;
pub use stock::{
    StockConservationInput, StockMovementInput, MovementType,
    RetailerLiquidationInput, InventoryVarianceInput, liquidation_percentage,
};
pub use finance::{CreditLimitInput, PaymentInput, PaymentMode, SalesOrderInput};
pub use field::{
    TravelExpenseInput, TravelMode, VisitLocationInput, GeoPoint,
    ActivityPlanInput, WorkingHoursInput, haversine_km,
};
pub use approval::{ApprovalInput, RequestKind, Role};
pub use performance::{PerformanceScoreInput, TargetAchievementInput};
pub use dispatch::{RuleCheck, RuleValidator};
