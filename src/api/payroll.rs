use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::api::{ensure_month, pipeline_error};
use crate::core::processor::process_period;
use crate::error::PipelineError;
use crate::model::payroll::{PayStructure, PayrollProcessingRecord};
use crate::store;

#[derive(Deserialize, ToSchema)]
pub struct ProcessPayrollRequest {
    #[schema(example = 2024)]
    pub year: Option<i32>,

    #[schema(example = 3)]
    pub month: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct ProcessPayrollResponse {
    pub success: bool,

    #[schema(example = "Payroll data processed and saved successfully.")]
    pub message: String,

    pub data: Vec<PayrollProcessingRecord>,
}

/// Payroll processing endpoint: joins the period's consolidated attendance
/// with each employee's pay structure, prorates, and replaces the period's
/// processed rows.
#[utoipa::path(
    post,
    path = "/api/process-payroll",
    request_body = ProcessPayrollRequest,
    responses(
        (status = 200, description = "Processed payroll rows", body = ProcessPayrollResponse),
        (status = 400, description = "Year and month are required"),
        (status = 404, description = "No joined rows for the period"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn process_payroll(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ProcessPayrollRequest>,
) -> actix_web::Result<impl Responder> {
    let year = payload
        .year
        .ok_or_else(|| pipeline_error(PipelineError::MissingField("year")))?;
    let month = payload
        .month
        .ok_or_else(|| pipeline_error(PipelineError::MissingField("month")))?;
    ensure_month(month).map_err(pipeline_error)?;

    let joined = store::consolidated_joined_with_pay_structure(pool.get_ref(), month, year)
        .await
        .map_err(|e| pipeline_error(PipelineError::Store(e)))?;

    let records = process_period(&joined, month, year).map_err(pipeline_error)?;

    store::replace_payroll_rows(pool.get_ref(), month, year, &records)
        .await
        .map_err(|e| pipeline_error(PipelineError::Store(e)))?;

    tracing::info!(year, month, employees = records.len(), "Processed payroll");

    Ok(HttpResponse::Ok().json(ProcessPayrollResponse {
        success: true,
        message: "Payroll data processed and saved successfully.".to_string(),
        data: records,
    }))
}

/// Pay-structure creation payload. Every amount defaults to zero so sparse
/// structures stay one-screen simple on the admin side.
#[derive(Deserialize, ToSchema)]
pub struct CreatePayStructure {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "Staff")]
    pub category_name: String,

    #[serde(default)]
    pub basic_salary: f64,
    #[serde(default)]
    pub hra: f64,
    #[serde(default)]
    pub conveyance_allowance: f64,
    #[serde(default)]
    pub medical_allowance: f64,
    #[serde(default)]
    pub bonus: f64,
    #[serde(default)]
    pub special_allowance: f64,
    #[serde(default)]
    pub dearness_allowance: f64,
    #[serde(default)]
    pub shift_allowance: f64,
    #[serde(default)]
    pub city_compensatory_allowance: f64,
    #[serde(default)]
    pub project_allowance: f64,
    #[serde(default)]
    pub educational_allowance: f64,
    #[serde(default)]
    pub relocation_allowance: f64,
    #[serde(default)]
    pub joining_bonus: f64,
    #[serde(default)]
    pub retention_bonus: f64,
    #[serde(default)]
    pub project_compensation_bonus: f64,
    #[serde(default)]
    pub pf_contribution: f64,
    #[serde(default)]
    pub esi_contribution: f64,
    #[serde(default)]
    pub income_tax: f64,
    #[serde(default)]
    pub loan_deduction: f64,
    #[serde(default)]
    pub unpaid_leave_deduction: f64,
    #[serde(default)]
    pub penalties: f64,
    #[serde(default)]
    pub gratuity_contribution: f64,
    #[serde(default)]
    pub meal_plan_deduction: f64,
    #[serde(default)]
    pub transport_facility_deduction: f64,
    #[serde(default)]
    pub attendance_penalty: f64,
    #[serde(default)]
    pub loss_of_pay: f64,
    #[serde(default)]
    pub reimbursements: f64,
    #[serde(default)]
    pub incentives: f64,
    #[serde(default)]
    pub remarks: String,
}

impl CreatePayStructure {
    fn gross(&self) -> f64 {
        self.basic_salary
            + self.hra
            + self.conveyance_allowance
            + self.medical_allowance
            + self.bonus
            + self.special_allowance
            + self.dearness_allowance
            + self.shift_allowance
            + self.city_compensatory_allowance
            + self.project_allowance
            + self.educational_allowance
            + self.relocation_allowance
            + self.joining_bonus
            + self.retention_bonus
            + self.project_compensation_bonus
    }

    fn total_deductions(&self) -> f64 {
        self.pf_contribution
            + self.esi_contribution
            + self.income_tax
            + self.loan_deduction
            + self.unpaid_leave_deduction
            + self.penalties
            + self.gratuity_contribution
            + self.meal_plan_deduction
            + self.transport_facility_deduction
            + self.attendance_penalty
            + self.loss_of_pay
    }
}

/// Create a pay structure for one employee.
#[utoipa::path(
    post,
    path = "/api/pay-structures",
    request_body = CreatePayStructure,
    responses(
        (status = 201, description = "Pay structure added"),
        (status = 400, description = "Missing identity fields")
    ),
    tag = "Payroll"
)]
pub async fn create_pay_structure(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePayStructure>,
) -> actix_web::Result<impl Responder> {
    if payload.employee_id.trim().is_empty()
        || payload.employee_name.trim().is_empty()
        || payload.category_name.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Employee ID, Name, and category_name are required."
        })));
    }

    let gross = payload.gross();
    let deductions = payload.total_deductions();
    let net = gross - deductions;

    sqlx::query(
        r#"
        INSERT INTO pay_structure (
            employee_id, employee_name, category_name, basic_salary, hra,
            conveyance_allowance, medical_allowance, bonus, special_allowance,
            dearness_allowance, shift_allowance, city_compensatory_allowance,
            project_allowance, educational_allowance, relocation_allowance,
            joining_bonus, retention_bonus, project_compensation_bonus,
            gross_salary, pf_contribution, esi_contribution, income_tax,
            loan_deduction, unpaid_leave_deduction, penalties,
            gratuity_contribution, meal_plan_deduction,
            transport_facility_deduction, attendance_penalty, loss_of_pay,
            deductions, reimbursements, incentives, net_salary, remarks
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id.trim())
    .bind(payload.employee_name.trim())
    .bind(payload.category_name.trim())
    .bind(payload.basic_salary)
    .bind(payload.hra)
    .bind(payload.conveyance_allowance)
    .bind(payload.medical_allowance)
    .bind(payload.bonus)
    .bind(payload.special_allowance)
    .bind(payload.dearness_allowance)
    .bind(payload.shift_allowance)
    .bind(payload.city_compensatory_allowance)
    .bind(payload.project_allowance)
    .bind(payload.educational_allowance)
    .bind(payload.relocation_allowance)
    .bind(payload.joining_bonus)
    .bind(payload.retention_bonus)
    .bind(payload.project_compensation_bonus)
    .bind(gross)
    .bind(payload.pf_contribution)
    .bind(payload.esi_contribution)
    .bind(payload.income_tax)
    .bind(payload.loan_deduction)
    .bind(payload.unpaid_leave_deduction)
    .bind(payload.penalties)
    .bind(payload.gratuity_contribution)
    .bind(payload.meal_plan_deduction)
    .bind(payload.transport_facility_deduction)
    .bind(payload.attendance_penalty)
    .bind(payload.loss_of_pay)
    .bind(deductions)
    .bind(payload.reimbursements)
    .bind(payload.incentives)
    .bind(net)
    .bind(payload.remarks.trim())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to add pay structure");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Pay structure added successfully."
    })))
}

/// List every pay structure.
#[utoipa::path(
    get,
    path = "/api/pay-structures",
    responses(
        (status = 200, description = "All pay structures", body = [PayStructure])
    ),
    tag = "Payroll"
)]
pub async fn list_pay_structures(
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, PayStructure>("SELECT * FROM pay_structure")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch pay structures");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    Ok(HttpResponse::Ok().json(rows))
}
