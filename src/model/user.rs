use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registration record walking the Pending -> Active/Rejected state machine.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Jane Smith")]
    pub name: String,

    #[schema(example = "jane@example.com")]
    pub email: String,

    /// NULL for company-wide roles.
    #[schema(example = "Chennai Plant", nullable = true)]
    pub location_name: Option<String>,

    #[schema(example = "Manager", nullable = true)]
    pub role: Option<String>,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(example = "Duplicate account", nullable = true)]
    pub rejection_reason: Option<String>,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
