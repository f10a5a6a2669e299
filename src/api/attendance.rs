use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, Responder, web};
use calamine::{Reader, Xlsx, open_workbook};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::api::{ensure_month, pipeline_error};
use crate::core::consolidator::consolidate;
use crate::core::organizer::{
    SheetGrid, build_block_records, day_columns, grid_from_range, scan_employee_blocks,
};
use crate::error::PipelineError;
use crate::model::attendance::{ConsolidatedAttendance, OrganizedAttendanceRecord};
use crate::store;
use crate::utils::shift_cache;

/// Timesheet upload: the workbook plus the reporting period and location.
/// The file lands in a temp location that is removed when the request scope
/// ends, success or not.
#[derive(Debug, MultipartForm)]
pub struct OrganizeUpload {
    #[multipart(limit = "16MB")]
    pub file: TempFile,
    pub year: Text<i32>,
    pub month: Text<u32>,
    pub location_name: Text<String>,
}

#[derive(Serialize, ToSchema)]
pub struct OrganizeResponse {
    #[schema(example = "Attendance data organized successfully.")]
    pub message: String,
    pub data: Vec<OrganizedAttendanceRecord>,
}

/// Organize attendance endpoint: parses the uploaded fixed-layout timesheet
/// into one record per employee per day.
#[utoipa::path(
    post,
    path = "/api/organize-attendance",
    responses(
        (status = 200, description = "Organized attendance rows", body = OrganizeResponse),
        (status = 400, description = "Missing fields or malformed workbook"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn organize_attendance(
    pool: web::Data<MySqlPool>,
    MultipartForm(form): MultipartForm<OrganizeUpload>,
) -> actix_web::Result<impl Responder> {
    let year = *form.year;
    let month = *form.month;
    let location_name = form.location_name.trim().to_string();

    if location_name.is_empty() {
        return Err(pipeline_error(PipelineError::MissingField("location_name")));
    }
    ensure_month(month).map_err(pipeline_error)?;

    // The workbook read is blocking; only the temp path crosses into the
    // worker, the TempFile itself stays in scope so the file outlives the
    // read and is still removed on every exit path.
    let path = form.file.file.path().to_path_buf();
    let grid: SheetGrid = web::block(move || -> Result<SheetGrid, PipelineError> {
        let mut workbook: Xlsx<_> = open_workbook(&path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| PipelineError::Layout("workbook has no sheets".to_string()))??;
        Ok(grid_from_range(&range))
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Workbook read task failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?
    .map_err(pipeline_error)?;

    let days = day_columns(&grid).map_err(pipeline_error)?;
    let blocks = scan_employee_blocks(&grid);

    let mut output: Vec<OrganizedAttendanceRecord> = Vec::new();
    for block in &blocks {
        let shift = shift_cache::resolve(pool.get_ref(), &block.employee_id)
            .await
            .map_err(|e| pipeline_error(PipelineError::Store(e)))?;
        let mut records =
            build_block_records(&grid, block, &shift, &days).map_err(pipeline_error)?;
        output.append(&mut records);
    }

    tracing::info!(
        year,
        month,
        location = %location_name,
        employees = blocks.len(),
        records = output.len(),
        "Organized attendance upload"
    );

    Ok(HttpResponse::Ok().json(OrganizeResponse {
        message: "Attendance data organized successfully.".to_string(),
        data: output,
    }))
}

#[derive(Deserialize, ToSchema)]
pub struct ConsolidateRequest {
    #[schema(example = 2024)]
    pub year: Option<i32>,

    #[schema(example = 3)]
    pub month: Option<u32>,

    /// Must be a JSON string; anything else is rejected.
    #[schema(example = "Chennai Plant", value_type = String)]
    pub location_name: Option<serde_json::Value>,

    pub organized_data: Option<Vec<OrganizedAttendanceRecord>>,
}

#[derive(Serialize, ToSchema)]
pub struct ConsolidateResponse {
    #[schema(example = "Attendance data consolidated successfully.")]
    pub message: String,
    pub consolidated_data: Vec<ConsolidatedAttendance>,
}

/// Checks the consolidation payload before anything touches the store: the
/// period must be a real calendar month, the location textual and non-blank,
/// and the record set non-empty. An empty record set is rejected rather than
/// treated as a request to wipe the period's rows.
fn validated_consolidate_input(
    payload: &ConsolidateRequest,
) -> Result<(u32, i32, &str, &[OrganizedAttendanceRecord]), PipelineError> {
    let year = payload.year.ok_or(PipelineError::MissingField("year"))?;
    let month = payload.month.ok_or(PipelineError::MissingField("month"))?;
    ensure_month(month)?;

    let location_name = payload
        .location_name
        .as_ref()
        .ok_or(PipelineError::MissingField("location_name"))?
        .as_str()
        .ok_or_else(|| PipelineError::InvalidField {
            field: "location_name",
            reason: "it must be a string".to_string(),
        })?
        .trim();
    if location_name.is_empty() {
        return Err(PipelineError::MissingField("location_name"));
    }

    let records = payload
        .organized_data
        .as_deref()
        .ok_or(PipelineError::MissingField("organized_data"))?;
    if records.is_empty() {
        return Err(PipelineError::InvalidField {
            field: "organized_data",
            reason: "it must contain at least one record".to_string(),
        });
    }

    Ok((month, year, location_name, records))
}

/// Consolidate attendance endpoint: aggregates the organized rows into one
/// row per employee for the period and replaces the period's stored rows.
#[utoipa::path(
    post,
    path = "/api/consolidate-attendance",
    request_body = ConsolidateRequest,
    responses(
        (status = 200, description = "Consolidated rows", body = ConsolidateResponse),
        (status = 400, description = "Missing or invalid period, location or rows"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn consolidate_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ConsolidateRequest>,
) -> actix_web::Result<impl Responder> {
    let (month, year, location_name, records) =
        validated_consolidate_input(&payload).map_err(pipeline_error)?;

    let rows = consolidate(records, month, year, location_name);

    store::replace_consolidated_attendance(pool.get_ref(), month, year, &rows)
        .await
        .map_err(|e| pipeline_error(PipelineError::Store(e)))?;

    tracing::info!(year, month, rows = rows.len(), "Consolidated attendance");

    Ok(HttpResponse::Ok().json(ConsolidateResponse {
        message: "Attendance data consolidated successfully.".to_string(),
        consolidated_data: rows,
    }))
}

/// Consolidated data listing for the review screen.
#[utoipa::path(
    get,
    path = "/api/consolidated-attendance-data",
    responses(
        (status = 200, description = "All consolidated rows", body = [ConsolidatedAttendance])
    ),
    tag = "Attendance"
)]
pub async fn consolidated_attendance_data(
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let rows = store::list_consolidated(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch consolidated attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timecalc::LateBy;

    fn record() -> OrganizedAttendanceRecord {
        OrganizedAttendanceRecord {
            employee_id: "EMP-001".to_string(),
            employee_name: "John Doe".to_string(),
            date: "1".to_string(),
            in_time: "09:00".to_string(),
            out_time: "18:00".to_string(),
            present_days: 1.0,
            shift_name: "General".to_string(),
            late_by: LateBy::OnTime,
            ot_hours: "00:00".to_string(),
            final_ot_hours: 0.0,
        }
    }

    fn request(month: Option<u32>, records: Option<Vec<OrganizedAttendanceRecord>>) -> ConsolidateRequest {
        ConsolidateRequest {
            year: Some(2024),
            month,
            location_name: Some(serde_json::json!("Chennai Plant")),
            organized_data: records,
        }
    }

    #[test]
    fn consolidation_accepts_a_complete_payload() {
        let payload = request(Some(3), Some(vec![record()]));
        let (month, year, location, records) = validated_consolidate_input(&payload).unwrap();
        assert_eq!(month, 3);
        assert_eq!(year, 2024);
        assert_eq!(location, "Chennai Plant");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn consolidation_rejects_out_of_range_months() {
        for month in [0, 13, 99] {
            let payload = request(Some(month), Some(vec![record()]));
            assert!(matches!(
                validated_consolidate_input(&payload),
                Err(PipelineError::InvalidField { field: "month", .. })
            ));
        }
    }

    #[test]
    fn consolidation_rejects_an_empty_record_set() {
        // an empty batch must not silently wipe the period's stored rows
        let payload = request(Some(3), Some(Vec::new()));
        assert!(matches!(
            validated_consolidate_input(&payload),
            Err(PipelineError::InvalidField { field: "organized_data", .. })
        ));
    }

    #[test]
    fn consolidation_rejects_non_textual_location() {
        let mut payload = request(Some(3), Some(vec![record()]));
        payload.location_name = Some(serde_json::json!(42));
        assert!(matches!(
            validated_consolidate_input(&payload),
            Err(PipelineError::InvalidField { field: "location_name", .. })
        ));

        payload.location_name = Some(serde_json::json!("   "));
        assert!(matches!(
            validated_consolidate_input(&payload),
            Err(PipelineError::MissingField("location_name"))
        ));
    }
}
