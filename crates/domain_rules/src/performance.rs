//! Performance rules: scores and target achievement

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{PerformanceThresholds, TargetThresholds};
use crate::result::ValidationResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScoreInput {
    pub score: Decimal,
}

pub fn check_performance_score(
    input: &PerformanceScoreInput,
    thresholds: &PerformanceThresholds,
) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.score < thresholds.min_score || input.score > thresholds.max_score {
        result.add_error(format!(
            "Performance score ({}) must be between {} and {}",
            input.score.normalize(),
            thresholds.min_score.normalize(),
            thresholds.max_score.normalize()
        ));
    } else if input.score < thresholds.warning_below {
        result.add_warning(format!(
            "Performance score ({}) is below {}",
            input.score.normalize(),
            thresholds.warning_below.normalize()
        ));
    }

    result
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAchievementInput {
    pub target: Decimal,
    pub achieved: Decimal,
}

impl TargetAchievementInput {
    /// Achievement as a percentage of target
    ///
    /// `None` for a non-positive target or a percentage outside the decimal range.
    pub fn achievement_percent(&self) -> Option<Decimal> {
        if self.target <= Decimal::ZERO {
            return None;
        }
        self.achieved
            .checked_div(self.target)?
            .checked_mul(dec!(100))
            .map(|percent| percent.round_dp(1))
    }
}

pub fn check_target_achievement(
    input: &TargetAchievementInput,
    thresholds: &TargetThresholds,
) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.target <= Decimal::ZERO {
        result.add_error("Target must be greater than zero");
    }
    if input.achieved < Decimal::ZERO {
        result.add_error("Achieved value cannot be negative");
    }
    if !result.is_valid {
        return result;
    }

    let Some(percent) = input.achievement_percent() else {
        result.add_range_error("Achievement percentage");
        return result;
    };
    if percent > thresholds.over_achievement_percent {
        result.add_warning(format!(
            "Achievement of {}% exceeds {}%; verify reported figures",
            percent.normalize(),
            thresholds.over_achievement_percent.normalize()
        ));
    } else if percent < thresholds.under_achievement_percent {
        result.add_warning(format!(
            "Achievement of {}% is below {}% of target",
            percent.normalize(),
            thresholds.under_achievement_percent.normalize()
        ));
    }

    result
}
