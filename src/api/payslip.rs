use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::api::{ensure_month, pipeline_error};
use crate::config::Config;
use crate::error::PipelineError;
use crate::payslip::{PayslipDispatcher, SmtpDispatcher, month_name, render_payslip};
use crate::store;

#[derive(Deserialize, ToSchema)]
pub struct SendPayslipRequest {
    #[schema(example = 3)]
    pub month: Option<u32>,

    #[schema(example = 2024)]
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct SendPayslipResponse {
    #[schema(example = "Payslips processed.")]
    pub message: String,

    #[schema(example = 12)]
    pub sent: usize,

    #[schema(example = 1)]
    pub failed: usize,
}

/// Payslip fan-out: renders and emails one payslip per processed payroll
/// row for the period. Deliveries are independent and best-effort; a failed
/// recipient is logged and skipped, successful ones are marked "Sent".
#[utoipa::path(
    post,
    path = "/api/send-payslip",
    request_body = SendPayslipRequest,
    responses(
        (status = 200, description = "Dispatch summary", body = SendPayslipResponse),
        (status = 400, description = "Month and year are required"),
        (status = 404, description = "No processed payroll for the period"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
pub async fn send_payslip(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<SendPayslipRequest>,
) -> actix_web::Result<impl Responder> {
    let month = payload
        .month
        .ok_or_else(|| pipeline_error(PipelineError::MissingField("month")))?;
    let year = payload
        .year
        .ok_or_else(|| pipeline_error(PipelineError::MissingField("year")))?;
    ensure_month(month).map_err(pipeline_error)?;

    let rows = store::payslip_rows(pool.get_ref(), month, year)
        .await
        .map_err(|e| pipeline_error(PipelineError::Store(e)))?;
    if rows.is_empty() {
        return Err(pipeline_error(PipelineError::EmptyPeriod));
    }

    let dispatcher = SmtpDispatcher::from_config(&config).map_err(|e| {
        tracing::error!(error = %e, "Failed to build SMTP dispatcher");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let subject = format!("Payslip for {} {}", month_name(month), year);
    let mut sent = 0usize;
    let mut failed = 0usize;

    for row in &rows {
        let body = render_payslip(row, month, year);
        match dispatcher.dispatch(&row.email, &subject, body).await {
            Ok(()) => {
                if let Err(e) =
                    store::mark_payroll_sent(pool.get_ref(), &row.employee_id, month, year).await
                {
                    tracing::error!(error = %e, employee_id = %row.employee_id,
                        "Payslip sent but status update failed");
                }
                sent += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, employee_id = %row.employee_id, to = %row.email,
                    "Payslip dispatch failed");
                failed += 1;
            }
        }
    }

    tracing::info!(year, month, sent, failed, "Payslip fan-out finished");

    Ok(HttpResponse::Ok().json(SendPayslipResponse {
        message: "Payslips processed.".to_string(),
        sent,
        failed,
    }))
}
