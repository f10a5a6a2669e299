use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::timecalc::LateBy;

/// One employee-day extracted from the uploaded timesheet, enriched with the
/// derived time metrics. Request-scoped: these rows are returned to the
/// caller and fed straight into consolidation, never persisted one by one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizedAttendanceRecord {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    /// Day label as it appears in the report's day-header row.
    #[schema(example = "15")]
    pub date: String,

    /// "00:00" stands for a missing punch, not midnight.
    #[schema(example = "09:15")]
    pub in_time: String,

    #[schema(example = "18:40")]
    pub out_time: String,

    #[schema(example = 1.0)]
    pub present_days: f64,

    #[schema(example = "General")]
    pub shift_name: String,

    /// "On Time" or lateness as HH:MM.
    #[schema(example = "00:15", value_type = String)]
    pub late_by: LateBy,

    /// Raw overtime past the shift end, HH:MM.
    #[schema(example = "00:40")]
    pub ot_hours: String,

    /// Overtime rounded to the nearest half hour, decimal hours.
    #[schema(example = 0.5)]
    pub final_ot_hours: f64,
}

/// One row per (employee, month, year, location) after consolidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ConsolidatedAttendance {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = 3)]
    pub month: u32,

    #[schema(example = 2024)]
    pub year: i32,

    #[schema(example = 21.5)]
    pub total_present_days: f64,

    #[schema(example = 12.5)]
    pub total_ot_hours: f64,

    #[schema(example = "Chennai Plant")]
    pub location_name: String,
}
