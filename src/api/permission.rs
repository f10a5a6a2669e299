use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::model::leave::Permission;
use crate::notify::{EventKind, Notifier};

/// List permission requests, newest first.
#[utoipa::path(
    get,
    path = "/api/permissions",
    responses((status = 200, body = [Permission])),
    tag = "Permission"
)]
pub async fn list_permissions(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, Permission>(
        r#"
        SELECT id, employee_id, employee_name, permission_date, from_time, to_time,
               reason, status, created_at
        FROM permissions
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch permissions");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(rows))
}

#[derive(Deserialize, ToSchema)]
pub struct CreatePermission {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "Jane Smith")]
    pub employee_name: String,

    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub permission_date: NaiveDate,

    #[schema(example = "14:00:00", format = "time", value_type = String)]
    pub from_time: NaiveTime,

    #[schema(example = "16:00:00", format = "time", value_type = String)]
    pub to_time: NaiveTime,

    #[schema(example = "Bank visit", nullable = true)]
    pub reason: Option<String>,
}

/// Request an hourly permission slot within a working day.
#[utoipa::path(
    post,
    path = "/api/permissions",
    request_body = CreatePermission,
    responses(
        (status = 201, description = "Permission requested"),
        (status = 400, description = "Missing fields or inverted time range")
    ),
    tag = "Permission"
)]
pub async fn create_permission(
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    payload: web::Json<CreatePermission>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id.trim();
    if employee_id.is_empty() || payload.employee_name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "employee_id and employee_name are required"
        })));
    }
    if payload.from_time >= payload.to_time {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "from_time must be before to_time"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO permissions
            (employee_id, employee_name, permission_date, from_time, to_time,
             reason, status)
        VALUES (?, ?, ?, ?, ?, ?, 'Pending')
        "#,
    )
    .bind(employee_id)
    .bind(payload.employee_name.trim())
    .bind(payload.permission_date)
    .bind(payload.from_time)
    .bind(payload.to_time)
    .bind(payload.reason.as_deref().map(str::trim))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create permission");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    notifier.broadcast(
        EventKind::PermissionRequested,
        serde_json::json!({
            "id": result.last_insert_id(),
            "employee_id": employee_id,
            "employee_name": payload.employee_name.trim(),
            "permission_date": payload.permission_date
        }),
    );

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Permission requested",
        "status": "Pending"
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePermissionStatus {
    #[schema(example = "Approved")]
    pub status: String,
}

/// Decide a pending permission. Only Approved and Rejected are accepted.
#[utoipa::path(
    put,
    path = "/api/permissions/{id}",
    params(("id" = u64, Path, description = "Permission id")),
    request_body = UpdatePermissionStatus,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "No pending permission with that id")
    ),
    tag = "Permission"
)]
pub async fn update_permission_status(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdatePermissionStatus>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let status = payload.status.trim();

    if status != "Approved" && status != "Rejected" {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "status must be Approved or Rejected"
        })));
    }

    let result =
        sqlx::query("UPDATE permissions SET status = ? WHERE id = ? AND status = 'Pending'")
            .bind(status)
            .bind(id)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, permission_id = id, "Failed to update permission");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Permission not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Permission {}", status.to_lowercase())
    })))
}
