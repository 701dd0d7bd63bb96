//! Finance rules: credit limits, payments and sales orders

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{CreditThresholds, PaymentThresholds, SalesOrderThresholds};
use crate::result::ValidationResult;

/// Credit position of a customer placing a new order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLimitInput {
    pub credit_limit: Decimal,
    pub outstanding: Decimal,
    pub pending: Decimal,
    pub new_order: Decimal,
}

impl CreditLimitInput {
    /// Credit still available before the new order
    ///
    /// `None` when the figures leave the decimal range.
    pub fn available_credit(&self) -> Option<Decimal> {
        self.credit_limit
            .checked_sub(self.outstanding)?
            .checked_sub(self.pending)
    }

    /// Share of the limit used once the new order is placed
    fn utilization(&self) -> Option<Decimal> {
        self.outstanding
            .checked_add(self.pending)?
            .checked_add(self.new_order)?
            .checked_div(self.credit_limit)
    }
}

/// Checks a new order against the customer's available credit
///
/// # Arguments
///
/// * `input` - Credit limit, outstanding and pending amounts, and the new order value
/// * `thresholds` - Utilization ratio above which a warning is raised
///
/// # Returns
///
/// An error when the order exceeds the available credit or the credit is
/// already overdrawn; a warning on high utilization.
pub fn check_credit_limit(input: &CreditLimitInput, thresholds: &CreditThresholds) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let Some(available) = input.available_credit() else {
        result.add_range_error("Available credit");
        return result;
    };

    if available < Decimal::ZERO {
        result.add_error(format!(
            "Credit limit exceeded: available credit is negative ({})",
            available.normalize()
        ));
    } else if input.new_order > available {
        result.add_error(format!(
            "Order value ({}) exceeds available credit ({})",
            input.new_order.normalize(),
            available.normalize()
        ));
    }

    if input.credit_limit > Decimal::ZERO {
        match input.utilization() {
            Some(utilization) if utilization > thresholds.utilization_warning => {
                result.add_warning(format!(
                    "Credit utilization ({}%) exceeds {}%",
                    utilization.saturating_mul(dec!(100)).round_dp(1).normalize(),
                    thresholds.utilization_warning.saturating_mul(dec!(100)).normalize()
                ));
            }
            Some(_) => {}
            None => result.add_range_error("Credit utilization"),
        }
    }

    result
}

/// Payment instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Cheque,
    BankTransfer,
    Upi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInput {
    pub amount: Decimal,
    pub outstanding: Decimal,
    pub mode: PaymentMode,
}

/// Checks a collected payment against the outstanding balance
pub fn check_payment(input: &PaymentInput, thresholds: &PaymentThresholds) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.amount <= Decimal::ZERO {
        result.add_error("Payment amount must be greater than zero");
        return result;
    }

    if input.amount > input.outstanding {
        result.add_error(format!(
            "Payment amount ({}) exceeds outstanding balance ({})",
            input.amount.normalize(),
            input.outstanding.normalize()
        ));
    }

    if input.mode == PaymentMode::Cash && input.amount > thresholds.max_cash {
        result.add_error(format!(
            "Cash payments above {} are not permitted",
            thresholds.max_cash.normalize()
        ));
    }

    if input.amount > thresholds.large_payment {
        result.add_warning(format!(
            "Large payment of {}; verify before recording",
            input.amount.normalize()
        ));
    }

    result
}

/// One sales-order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrderInput {
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount_percent: Decimal,
}

impl SalesOrderInput {
    /// Order value after discount
    ///
    /// `None` when the figures leave the decimal range.
    pub fn net_value(&self) -> Option<Decimal> {
        let retained = Decimal::ONE.checked_sub(self.discount_percent.checked_div(dec!(100))?)?;
        self.quantity.checked_mul(self.unit_price)?.checked_mul(retained)
    }
}

/// Checks quantity, price, discount and order value limits
pub fn check_sales_order(input: &SalesOrderInput, thresholds: &SalesOrderThresholds) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.quantity <= Decimal::ZERO {
        result.add_error("Order quantity must be greater than zero");
    }
    if input.unit_price < Decimal::ZERO {
        result.add_error("Unit price cannot be negative");
    }

    if input.discount_percent < Decimal::ZERO {
        result.add_error("Discount cannot be negative");
    } else if input.discount_percent > thresholds.max_discount_percent {
        result.add_error(format!(
            "Discount of {}% exceeds the maximum of {}%",
            input.discount_percent.normalize(),
            thresholds.max_discount_percent.normalize()
        ));
    } else if input.discount_percent > thresholds.warn_discount_percent {
        result.add_warning(format!(
            "Discount of {}% exceeds {}% and needs manager review",
            input.discount_percent.normalize(),
            thresholds.warn_discount_percent.normalize()
        ));
    }

    match input.net_value() {
        Some(value) if value > thresholds.max_order_value => {
            result.add_error(format!(
                "Order value ({}) exceeds the single-order limit ({})",
                value.round_dp(2).normalize(),
                thresholds.max_order_value.normalize()
            ));
        }
        Some(_) => {}
        None => result.add_range_error("Order value"),
    }

    result
}
