//! Field-operation rules: travel, visit location, activity planning and
//! working hours

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ActivityThresholds, LocationThresholds, TravelThresholds, WorkingHoursThresholds};
use crate::result::ValidationResult;

/// Mean Earth radius used for great-circle distances
const EARTH_RADIUS_KM: f64 = 6371.0;

/// How a field employee travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Car,
    Bike,
    Bus,
    Train,
    Auto,
    Other,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TravelMode::Car => "car",
            TravelMode::Bike => "bike",
            TravelMode::Bus => "bus",
            TravelMode::Train => "train",
            TravelMode::Auto => "auto",
            TravelMode::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// A claimed travel expense for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelExpenseInput {
    pub mode: TravelMode,
    pub distance_km: Decimal,
    pub amount: Decimal,
    #[serde(default)]
    pub working_hours: Option<Decimal>,
}

/// Checks a travel claim against distance limits and per-km rates
pub fn check_travel_expense(input: &TravelExpenseInput, thresholds: &TravelThresholds) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.distance_km <= Decimal::ZERO {
        result.add_error("Travel distance must be greater than zero");
    }
    if input.amount <= Decimal::ZERO {
        result.add_error("Expense amount must be greater than zero");
    }
    if !result.is_valid {
        return result;
    }

    if input.distance_km > thresholds.max_distance_km {
        result.add_error(format!(
            "Travel distance ({} km) exceeds maximum allowed ({} km)",
            input.distance_km.normalize(),
            thresholds.max_distance_km.normalize()
        ));
    }

    let rate = match input.mode {
        TravelMode::Car => Some(thresholds.car_rate_per_km),
        TravelMode::Bike => Some(thresholds.bike_rate_per_km),
        _ => None,
    };
    if let Some(rate) = rate {
        let allowed = input
            .distance_km
            .checked_mul(rate)
            .and_then(|cost| cost.checked_mul(thresholds.allowance_margin));
        match allowed {
            Some(allowed) if input.amount > allowed => {
                result.add_warning(format!(
                    "Expense amount ({}) exceeds expected {} for {} travel",
                    input.amount.normalize(),
                    allowed.round_dp(2).normalize(),
                    input.mode
                ));
            }
            Some(_) => {}
            None => result.add_range_error("Expected travel cost"),
        }
    }

    if let Some(hours) = input.working_hours {
        if hours < thresholds.min_working_hours {
            result.add_warning(format!(
                "Working hours ({}) below the {} hour minimum",
                hours.normalize(),
                thresholds.min_working_hours.normalize()
            ));
        }
    }

    result
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Great-circle distance between two points in kilometres
pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos() * to.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Planned and captured location of a field visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitLocationInput {
    pub planned: GeoPoint,
    pub actual: GeoPoint,
    /// Allowed deviation; the configured default applies when absent
    #[serde(default)]
    pub tolerance_km: Option<f64>,
}

/// Checks that a visit happened close to where it was planned
pub fn check_visit_location(input: &VisitLocationInput, thresholds: &LocationThresholds) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let in_region = |point: &GeoPoint| {
        (thresholds.min_latitude..=thresholds.max_latitude).contains(&point.latitude)
            && (thresholds.min_longitude..=thresholds.max_longitude).contains(&point.longitude)
    };
    if !in_region(&input.planned) {
        result.add_error("Planned location is outside expected region");
    }
    if !in_region(&input.actual) {
        result.add_error("Visit location is outside expected region");
    }
    if !result.is_valid {
        return result;
    }

    let tolerance = input.tolerance_km.unwrap_or(thresholds.default_tolerance_km);
    let distance = haversine_km(&input.planned, &input.actual);
    if distance > tolerance {
        result.add_error(format!(
            "Visit location is {:.2} km from planned location (tolerance {} km); escalated approval required",
            distance, tolerance
        ));
    } else if distance >= tolerance * thresholds.warning_ratio {
        result.add_warning(format!(
            "Visit location is {:.2} km from planned location, close to the {} km tolerance",
            distance, tolerance
        ));
    }

    result
}

/// A planned field activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPlanInput {
    pub planned_date: NaiveDate,
    pub today: NaiveDate,
    /// Activities on the planned date, including this one
    pub activities_on_day: u32,
}

/// Checks a planned activity date and the day's workload
pub fn check_activity_plan(input: &ActivityPlanInput, thresholds: &ActivityThresholds) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.planned_date < input.today {
        result.add_error("Activity cannot be planned in the past");
        return result;
    }

    if input.activities_on_day > thresholds.max_per_day {
        result.add_warning(format!(
            "{} activities planned on {}; more than {} may not be achievable",
            input.activities_on_day, input.planned_date, thresholds.max_per_day
        ));
    }

    let days_ahead = (input.planned_date - input.today).num_days();
    if days_ahead > thresholds.max_days_ahead {
        result.add_warning(format!(
            "Activity is planned {} days ahead; plans beyond {} days are likely to change",
            days_ahead, thresholds.max_days_ahead
        ));
    }

    result
}

/// Attendance for one working day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHoursInput {
    pub check_in: NaiveDateTime,
    pub check_out: NaiveDateTime,
}

impl WorkingHoursInput {
    /// Worked duration in hours
    pub fn hours(&self) -> Decimal {
        Decimal::from((self.check_out - self.check_in).num_minutes()) / dec!(60)
    }
}

/// Checks the length of a working day
pub fn check_working_hours(input: &WorkingHoursInput, thresholds: &WorkingHoursThresholds) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if input.check_out <= input.check_in {
        result.add_error("Check-out time must be after check-in time");
        return result;
    }

    let hours = input.hours();
    if hours > thresholds.max_hours {
        result.add_error(format!(
            "Working day of {} hours exceeds the {} hour maximum",
            hours.round_dp(2).normalize(),
            thresholds.max_hours.normalize()
        ));
    } else if hours > thresholds.long_day_hours {
        result.add_warning(format!(
            "Long working day of {} hours",
            hours.round_dp(2).normalize()
        ));
    } else if hours < thresholds.min_hours {
        result.add_warning(format!(
            "Working day of {} hours is below the {} hour minimum",
            hours.round_dp(2).normalize(),
            thresholds.min_hours.normalize()
        ));
    }

    result
}
