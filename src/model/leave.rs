use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "Jane Smith")]
    pub employee_name: String,

    #[schema(example = "sick")]
    pub leave_type: String,

    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,

    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,

    /// Calendar days, both endpoints inclusive.
    #[schema(example = 3)]
    pub duration_days: i64,

    #[schema(example = "Fever", nullable = true)]
    pub reason: Option<String>,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Hourly leave within a working day.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Permission {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "Jane Smith")]
    pub employee_name: String,

    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub permission_date: NaiveDate,

    #[schema(example = "14:00:00", format = "time", value_type = String)]
    pub from_time: chrono::NaiveTime,

    #[schema(example = "16:00:00", format = "time", value_type = String)]
    pub to_time: chrono::NaiveTime,

    #[schema(example = "Bank visit", nullable = true)]
    pub reason: Option<String>,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
