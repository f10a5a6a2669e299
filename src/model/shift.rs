use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::timecalc::ClockTime;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ShiftMaster {
    #[schema(example = 1)]
    pub shift_id: u64,

    #[schema(example = "General")]
    pub shift_name: String,

    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,

    #[schema(example = "18:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ShiftMapping {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = 1)]
    pub shift_id: u64,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub effective_from: NaiveDate,

    #[schema(example = "2026-12-31", value_type = String, format = "date", nullable = true)]
    pub effective_to: Option<NaiveDate>,
}

/// A shift definition resolved for one employee, with the expected start and
/// end of day in minutes-since-midnight form ready for time arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftWindow {
    pub shift_name: String,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ShiftWindow {
    /// Fallback used when an employee has no shift mapping.
    pub fn unmapped() -> Self {
        ShiftWindow {
            shift_name: "N/A".to_string(),
            start: ClockTime::MIDNIGHT,
            end: ClockTime::from_minutes(8 * 60).unwrap_or(ClockTime::MIDNIGHT),
        }
    }

    pub fn from_times(shift_name: String, start: NaiveTime, end: NaiveTime) -> Self {
        ShiftWindow {
            shift_name,
            start: ClockTime::from_naive(start),
            end: ClockTime::from_naive(end),
        }
    }
}
