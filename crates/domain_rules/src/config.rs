//! Rule thresholds
//!
//! Every numeric limit used by the rules lives here so deployments can tune
//! them through the layered configuration in `core_kernel::config`. The
//! `Default` impl carries the standard business limits.

use core_kernel::{load_section, ConfigSource, CoreError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::approval::Role;

/// What to do when a boundary caller names a rule that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownOperationPolicy {
    /// Treat the check as passed with no errors or warnings
    #[default]
    Permit,
    /// Fail the check with an "unknown operation" error
    Reject,
}

/// All thresholds consulted by the rule validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub conservation: ConservationThresholds,
    pub movement: MovementThresholds,
    pub credit: CreditThresholds,
    pub travel: TravelThresholds,
    pub location: LocationThresholds,
    pub retailer: RetailerThresholds,
    pub approval: ApprovalThresholds,
    pub performance: PerformanceThresholds,
    pub activity: ActivityThresholds,
    pub sales_order: SalesOrderThresholds,
    pub working_hours: WorkingHoursThresholds,
    pub payment: PaymentThresholds,
    pub inventory: InventoryThresholds,
    pub target: TargetThresholds,
    pub unknown_operation: UnknownOperationPolicy,
}

impl RuleThresholds {
    /// Loads the `rules` section from the default configuration sources
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&ConfigSource::default())
    }

    /// Loads the `rules` section from the given sources
    pub fn load_from(source: &ConfigSource) -> Result<Self, CoreError> {
        load_section("rules", source)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConservationThresholds {
    /// Allowed absolute difference between reported and derived balance
    pub tolerance: Decimal,
    /// Liquidation ratio below which a warning is raised
    pub low_liquidation_ratio: Decimal,
}

impl Default for ConservationThresholds {
    fn default() -> Self {
        Self {
            tolerance: dec!(0.01),
            low_liquidation_ratio: dec!(0.20),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementThresholds {
    /// Share of current stock above which a movement is flagged as large
    pub large_movement_ratio: Decimal,
}

impl Default for MovementThresholds {
    fn default() -> Self {
        Self {
            large_movement_ratio: dec!(0.50),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditThresholds {
    /// Utilization ratio above which a warning is raised
    pub utilization_warning: Decimal,
}

impl Default for CreditThresholds {
    fn default() -> Self {
        Self {
            utilization_warning: dec!(0.80),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelThresholds {
    pub max_distance_km: Decimal,
    pub car_rate_per_km: Decimal,
    pub bike_rate_per_km: Decimal,
    /// Multiplier applied to distance x rate before an amount is flagged
    pub allowance_margin: Decimal,
    pub min_working_hours: Decimal,
}

impl Default for TravelThresholds {
    fn default() -> Self {
        Self {
            max_distance_km: dec!(110),
            car_rate_per_km: dec!(12),
            bike_rate_per_km: dec!(5),
            allowance_margin: dec!(1.10),
            min_working_hours: dec!(9),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationThresholds {
    pub default_tolerance_km: f64,
    /// Fraction of the tolerance from which a near-limit warning is raised
    pub warning_ratio: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl Default for LocationThresholds {
    fn default() -> Self {
        Self {
            default_tolerance_km: 5.0,
            warning_ratio: 0.7,
            min_latitude: 6.0,
            max_latitude: 37.0,
            min_longitude: 68.0,
            max_longitude: 97.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetailerThresholds {
    /// Share of assigned stock sold on to other retailers before a warning
    pub retailer_sales_warning_ratio: Decimal,
}

impl Default for RetailerThresholds {
    fn default() -> Self {
        Self {
            retailer_sales_warning_ratio: dec!(0.70),
        }
    }
}

/// Expense values up to `up_to` need at least `minimum_approver`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBand {
    pub up_to: Decimal,
    pub minimum_approver: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalThresholds {
    /// Bands in ascending order of `up_to`
    pub expense_bands: Vec<ExpenseBand>,
    /// Approver required above the highest band
    pub above_bands: Role,
}

impl ApprovalThresholds {
    /// Minimum approver role for an expense of the given value
    pub fn required_approver(&self, amount: Decimal) -> Role {
        self.expense_bands
            .iter()
            .find(|band| amount <= band.up_to)
            .map(|band| band.minimum_approver)
            .unwrap_or(self.above_bands)
    }
}

impl Default for ApprovalThresholds {
    fn default() -> Self {
        Self {
            expense_bands: vec![
                ExpenseBand { up_to: dec!(5000), minimum_approver: Role::Tsm },
                ExpenseBand { up_to: dec!(25000), minimum_approver: Role::Rbh },
                ExpenseBand { up_to: dec!(100000), minimum_approver: Role::Zbh },
                ExpenseBand { up_to: dec!(500000), minimum_approver: Role::Vp },
            ],
            above_bands: Role::Md,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    pub min_score: Decimal,
    pub max_score: Decimal,
    pub warning_below: Decimal,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            min_score: dec!(0),
            max_score: dec!(100),
            warning_below: dec!(50),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityThresholds {
    pub max_per_day: u32,
    pub max_days_ahead: i64,
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            max_per_day: 8,
            max_days_ahead: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesOrderThresholds {
    pub max_discount_percent: Decimal,
    pub warn_discount_percent: Decimal,
    pub max_order_value: Decimal,
}

impl Default for SalesOrderThresholds {
    fn default() -> Self {
        Self {
            max_discount_percent: dec!(20),
            warn_discount_percent: dec!(10),
            max_order_value: dec!(1000000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingHoursThresholds {
    pub max_hours: Decimal,
    pub long_day_hours: Decimal,
    pub min_hours: Decimal,
}

impl Default for WorkingHoursThresholds {
    fn default() -> Self {
        Self {
            max_hours: dec!(16),
            long_day_hours: dec!(12),
            min_hours: dec!(9),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentThresholds {
    pub max_cash: Decimal,
    pub large_payment: Decimal,
}

impl Default for PaymentThresholds {
    fn default() -> Self {
        Self {
            max_cash: dec!(200000),
            large_payment: dec!(500000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryThresholds {
    pub recount_percent: Decimal,
    pub warn_percent: Decimal,
}

impl Default for InventoryThresholds {
    fn default() -> Self {
        Self {
            recount_percent: dec!(10),
            warn_percent: dec!(5),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetThresholds {
    pub over_achievement_percent: Decimal,
    pub under_achievement_percent: Decimal,
}

impl Default for TargetThresholds {
    fn default() -> Self {
        Self {
            over_achievement_percent: dec!(150),
            under_achievement_percent: dec!(50),
        }
    }
}
