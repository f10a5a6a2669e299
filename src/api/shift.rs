use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::model::shift::{ShiftMapping, ShiftMaster};
use crate::store;
use crate::utils::shift_cache;

fn parse_clock(field: &str, value: &str) -> actix_web::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| {
            actix_web::error::ErrorBadRequest(format!("invalid {field}: expected HH:MM"))
        })
}

/// List shift masters.
#[utoipa::path(
    get,
    path = "/api/shift-masters",
    responses((status = 200, body = [ShiftMaster])),
    tag = "Shift"
)]
pub async fn list_shift_masters(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let shifts = store::list_shifts(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch shift masters");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(shifts))
}

#[derive(Deserialize, ToSchema)]
pub struct CreateShiftMaster {
    #[schema(example = "General")]
    pub shift_name: String,

    #[schema(example = "09:00")]
    pub start_time: String,

    #[schema(example = "18:00")]
    pub end_time: String,
}

/// Add a shift master.
#[utoipa::path(
    post,
    path = "/api/shift-masters",
    request_body = CreateShiftMaster,
    responses(
        (status = 201, description = "Shift master added"),
        (status = 400, description = "Missing or malformed fields")
    ),
    tag = "Shift"
)]
pub async fn create_shift_master(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateShiftMaster>,
) -> actix_web::Result<impl Responder> {
    if payload.shift_name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "All fields are required"
        })));
    }
    let start = parse_clock("start_time", &payload.start_time)?;
    let end = parse_clock("end_time", &payload.end_time)?;

    let result = sqlx::query(
        "INSERT INTO shift_master (shift_name, start_time, end_time) VALUES (?, ?, ?)",
    )
    .bind(payload.shift_name.trim())
    .bind(start)
    .bind(end)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to add shift master");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Shift master added successfully",
        "shift_id": result.last_insert_id()
    })))
}

/// List shift mappings.
#[utoipa::path(
    get,
    path = "/api/shift-mappings",
    responses((status = 200, body = [ShiftMapping])),
    tag = "Shift"
)]
pub async fn list_shift_mappings(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let mappings = sqlx::query_as::<_, ShiftMapping>(
        "SELECT id, employee_id, shift_id, effective_from, effective_to FROM shift_mapping",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch shift mappings");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(mappings))
}

#[derive(Deserialize, ToSchema)]
pub struct CreateShiftMapping {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = 1)]
    pub shift_id: u64,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub effective_from: NaiveDate,

    #[schema(example = "2026-12-31", value_type = String, format = "date", nullable = true)]
    pub effective_to: Option<NaiveDate>,
}

/// Map an employee to a shift. Overlaps with earlier mappings are not
/// reconciled; lookups take the most recently created mapping.
#[utoipa::path(
    post,
    path = "/api/shift-mappings",
    request_body = CreateShiftMapping,
    responses(
        (status = 201, description = "Shift mapping added"),
        (status = 400, description = "Missing fields")
    ),
    tag = "Shift"
)]
pub async fn create_shift_mapping(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateShiftMapping>,
) -> actix_web::Result<impl Responder> {
    if payload.employee_id.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "employee_id is required"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO shift_mapping (employee_id, shift_id, effective_from, effective_to)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id.trim())
    .bind(payload.shift_id)
    .bind(payload.effective_from)
    .bind(payload.effective_to)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = %payload.employee_id, "Failed to add shift mapping");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // the cached window for this employee is stale now
    shift_cache::invalidate(payload.employee_id.trim()).await;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Shift mapping added successfully"
    })))
}

#[derive(Serialize, ToSchema)]
pub struct ShiftOption {
    pub shift_id: u64,
    pub shift_name: String,

    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,
}

/// Shift dropdown options.
#[utoipa::path(
    get,
    path = "/api/shifts",
    responses((status = 200, body = [ShiftOption])),
    tag = "Shift"
)]
pub async fn list_shift_options(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let shifts = store::list_shifts(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch shifts");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    let options: Vec<ShiftOption> = shifts
        .into_iter()
        .map(|s| ShiftOption {
            shift_id: s.shift_id,
            shift_name: s.shift_name,
            start_time: s.start_time,
        })
        .collect();
    Ok(HttpResponse::Ok().json(options))
}
