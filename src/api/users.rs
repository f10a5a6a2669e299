use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::model::user::User;
use crate::notify::{EventKind, Notifier};

// Company-wide roles are not tied to a location.
const GLOBAL_ROLES: [&str; 2] = ["CEO", "CFO"];

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Jane Smith")]
    pub name: String,

    #[schema(example = "jane@example.com")]
    pub email: String,

    #[schema(example = "Chennai Plant")]
    pub location_name: String,
}

/// Register a new account. The account stays Pending until an admin approves
/// it. A rejected registration may register again; a pending or active one
/// for the same location may not.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration submitted"),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Already registered for this location")
    ),
    tag = "Users"
)]
pub async fn register(
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    payload: web::Json<RegisterRequest>,
) -> actix_web::Result<impl Responder> {
    let name = payload.name.trim();
    let email = payload.email.trim();
    let location_name = payload.location_name.trim();

    if name.is_empty() || email.is_empty() || location_name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Name, email and location_name are required"
        })));
    }

    let existing: Option<(u64, String)> = sqlx::query_as(
        r#"
        SELECT id, status FROM users
        WHERE email = ? AND location_name = ? AND status IN ('Pending', 'Active')
        LIMIT 1
        "#,
    )
    .bind(email)
    .bind(location_name)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Registration lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if let Some((_, status)) = existing {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": format!("A {} registration already exists for this location",
                status.to_lowercase())
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, location_name, status)
        VALUES (?, ?, ?, 'Pending')
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(location_name)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, email, "Failed to register user");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let user_id = result.last_insert_id();
    notifier.broadcast(
        EventKind::NewRegistration,
        serde_json::json!({
            "id": user_id,
            "name": name,
            "email": email,
            "location_name": location_name
        }),
    );

    tracing::info!(user_id, email, "New registration pending approval");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Registration submitted for approval",
        "id": user_id
    })))
}

/// Registrations awaiting a decision.
#[utoipa::path(
    get,
    path = "/api/pending-users",
    responses((status = 200, body = [User])),
    tag = "Users"
)]
pub async fn pending_users(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, location_name, role, status, rejection_reason, created_at
        FROM users
        WHERE status = 'Pending'
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch pending users");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(users))
}

#[derive(Deserialize, ToSchema)]
pub struct ApproveUserRequest {
    #[schema(example = 1)]
    pub user_id: u64,

    #[schema(example = "Manager")]
    pub role: String,
}

/// Approve a pending registration and assign a role. Company-wide roles
/// (CEO, CFO) clear the location so the account is not scoped to one site.
#[utoipa::path(
    post,
    path = "/api/approve-user",
    request_body = ApproveUserRequest,
    responses(
        (status = 200, description = "User approved"),
        (status = 400, description = "Missing role"),
        (status = 404, description = "No pending user with that id")
    ),
    tag = "Users"
)]
pub async fn approve_user(
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    payload: web::Json<ApproveUserRequest>,
) -> actix_web::Result<impl Responder> {
    let role = payload.role.trim();
    if role.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "role is required"
        })));
    }

    let global = GLOBAL_ROLES.iter().any(|r| r.eq_ignore_ascii_case(role));
    let sql = if global {
        "UPDATE users SET status = 'Active', role = ?, location_name = NULL \
         WHERE id = ? AND status = 'Pending'"
    } else {
        "UPDATE users SET status = 'Active', role = ? \
         WHERE id = ? AND status = 'Pending'"
    };

    let result = sqlx::query(sql)
        .bind(role)
        .bind(payload.user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = payload.user_id, "Approve user failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "User not found or already processed"
        })));
    }

    notifier.broadcast(
        EventKind::UserApproved,
        serde_json::json!({ "id": payload.user_id, "role": role }),
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User approved"
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct RejectUserRequest {
    #[schema(example = 1)]
    pub user_id: u64,

    #[schema(example = "Unknown applicant")]
    pub reason: String,
}

/// Reject a pending registration with a reason. The applicant may register
/// again afterwards.
#[utoipa::path(
    post,
    path = "/api/reject-user",
    request_body = RejectUserRequest,
    responses(
        (status = 200, description = "User rejected"),
        (status = 400, description = "Missing reason"),
        (status = 404, description = "No pending user with that id")
    ),
    tag = "Users"
)]
pub async fn reject_user(
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    payload: web::Json<RejectUserRequest>,
) -> actix_web::Result<impl Responder> {
    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "reason is required"
        })));
    }

    let result = sqlx::query(
        "UPDATE users SET status = 'Rejected', rejection_reason = ? \
         WHERE id = ? AND status = 'Pending'",
    )
    .bind(reason)
    .bind(payload.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = payload.user_id, "Reject user failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "User not found or already processed"
        })));
    }

    notifier.broadcast(
        EventKind::UserRejected,
        serde_json::json!({ "id": payload.user_id, "reason": reason }),
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User rejected"
    })))
}
