//! Approval workflow rules
//!
//! Approvals follow a fixed role hierarchy. An approver must rank strictly
//! above the submitter, and expense requests additionally need an approver
//! senior enough for the expense value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ApprovalThresholds;
use crate::result::ValidationResult;

/// Organisational role, in ascending order of seniority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Market Development Officer
    Mdo,
    /// Territory Sales Manager
    Tsm,
    /// Regional Business Head
    Rbh,
    /// Regional Marketing Manager
    Rmm,
    /// Zonal Business Head
    Zbh,
    /// Marketing Head
    Mh,
    /// Vice President
    Vp,
    /// Managing Director
    Md,
}

impl Role {
    /// Position in the hierarchy, starting at 1 for the most junior role
    pub fn rank(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn code(&self) -> &'static str {
        match self {
            Role::Mdo => "MDO",
            Role::Tsm => "TSM",
            Role::Rbh => "RBH",
            Role::Rmm => "RMM",
            Role::Zbh => "ZBH",
            Role::Mh => "MH",
            Role::Vp => "VP",
            Role::Md => "MD",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MDO" => Ok(Role::Mdo),
            "TSM" => Ok(Role::Tsm),
            "RBH" => Ok(Role::Rbh),
            "RMM" => Ok(Role::Rmm),
            "ZBH" => Ok(Role::Zbh),
            "MH" => Ok(Role::Mh),
            "VP" => Ok(Role::Vp),
            "MD" => Ok(Role::Md),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// What is being submitted for approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Expense,
    Activity,
    StockAdjustment,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalInput {
    pub submitter: Role,
    pub approver: Role,
    pub request_kind: RequestKind,
    /// Value of the request; required for expenses
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// Checks that the approver may approve this request
pub fn check_approval(input: &ApprovalInput, thresholds: &ApprovalThresholds) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.approver <= input.submitter {
        result.add_error(format!(
            "Approver ({}) must rank above submitter ({})",
            input.approver, input.submitter
        ));
    }

    if input.request_kind == RequestKind::Expense {
        match input.amount {
            None => result.add_error("Expense approval requires an amount"),
            Some(amount) if amount < Decimal::ZERO => {
                result.add_error("Expense amount cannot be negative")
            }
            Some(amount) => {
                let required = thresholds.required_approver(amount);
                if input.approver < required {
                    result.add_error(format!(
                        "Expense of {} requires approval by {} or above",
                        amount.normalize(),
                        required
                    ));
                }
            }
        }
    }

    result
}
