use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::model::leave::LeaveRequest;
use crate::notify::{EventKind, Notifier};

/// List leave requests, newest first.
#[utoipa::path(
    get,
    path = "/api/leave-requests",
    responses((status = 200, body = [LeaveRequest])),
    tag = "Leave"
)]
pub async fn list_leave_requests(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, employee_id, employee_name, leave_type, start_date, end_date,
               duration_days, reason, status, created_at
        FROM leave_requests
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(rows))
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveRequest {
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

    #[schema(example = "Fever", nullable = true)]
    pub reason: Option<String>,
}

/// Submit a leave request. Duration counts both endpoints, so a single-day
/// leave is 1 day.
#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave request submitted"),
        (status = 400, description = "Missing fields or inverted date range")
    ),
    tag = "Leave"
)]
pub async fn create_leave_request(
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    payload: web::Json<CreateLeaveRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id.trim();
    if employee_id.is_empty()
        || payload.employee_name.trim().is_empty()
        || payload.leave_type.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "employee_id, employee_name and leave_type are required"
        })));
    }
    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let duration_days = (payload.end_date - payload.start_date).num_days() + 1;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, employee_name, leave_type, start_date, end_date,
             duration_days, reason, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'Pending')
        "#,
    )
    .bind(employee_id)
    .bind(payload.employee_name.trim())
    .bind(payload.leave_type.trim())
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(duration_days)
    .bind(payload.reason.as_deref().map(str::trim))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    notifier.broadcast(
        EventKind::LeaveRequested,
        serde_json::json!({
            "id": result.last_insert_id(),
            "employee_id": employee_id,
            "employee_name": payload.employee_name.trim(),
            "leave_type": payload.leave_type.trim(),
            "duration_days": duration_days
        }),
    );

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Leave request submitted",
        "duration_days": duration_days,
        "status": "Pending"
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeaveStatus {
    #[schema(example = "Approved")]
    pub status: String,
}

/// Decide a pending leave request. Only Approved and Rejected are accepted.
#[utoipa::path(
    put,
    path = "/api/leave-requests/{id}",
    params(("id" = u64, Path, description = "Leave request id")),
    request_body = UpdateLeaveStatus,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "No pending request with that id")
    ),
    tag = "Leave"
)]
pub async fn update_leave_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeaveStatus>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let status = payload.status.trim();

    if status != "Approved" && status != "Rejected" {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "status must be Approved or Rejected"
        })));
    }

    let result = sqlx::query(
        "UPDATE leave_requests SET status = ? WHERE id = ? AND status = 'Pending'",
    )
    .bind(status)
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id = id, "Failed to update leave status");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Leave request {}", status.to_lowercase())
    })))
}
