use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-employee pay configuration, one row per employee. Reference data owned
/// by the pay-structure CRUD flow; the processor only reads it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayStructure {
    pub id: u64,
    pub employee_id: String,
    pub employee_name: String,
    pub category_name: String,

    // Earnings
    pub basic_salary: f64,
    pub hra: f64,
    pub conveyance_allowance: f64,
    pub medical_allowance: f64,
    pub bonus: f64,
    pub special_allowance: f64,
    pub dearness_allowance: f64,
    pub shift_allowance: f64,
    pub city_compensatory_allowance: f64,
    pub project_allowance: f64,
    pub educational_allowance: f64,
    pub relocation_allowance: f64,
    pub joining_bonus: f64,
    pub retention_bonus: f64,
    pub project_compensation_bonus: f64,
    pub gross_salary: f64,

    // Deductions
    pub pf_contribution: f64,
    pub esi_contribution: f64,
    pub income_tax: f64,
    pub loan_deduction: f64,
    pub unpaid_leave_deduction: f64,
    pub penalties: f64,
    pub gratuity_contribution: f64,
    pub meal_plan_deduction: f64,
    pub transport_facility_deduction: f64,
    pub attendance_penalty: f64,
    pub loss_of_pay: f64,
    pub deductions: f64,

    pub reimbursements: f64,
    pub incentives: f64,
    pub net_salary: f64,
    pub remarks: String,
}

/// Consolidated attendance inner-joined with the employee's pay structure,
/// the processor's working row for one employee and period.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollInputRow {
    pub employee_id: String,
    pub employee_name: String,
    pub total_present_days: f64,
    pub total_ot_hours: f64,
    pub basic_salary: f64,
    pub hra: f64,
    pub conveyance_allowance: f64,
    pub medical_allowance: f64,
    pub bonus: f64,
    pub special_allowance: f64,
    pub pf_contribution: f64,
    pub esi_contribution: f64,
    pub income_tax: f64,
    pub loan_deduction: f64,
    pub unpaid_leave_deduction: f64,
    pub penalties: f64,
    pub reimbursements: f64,
    pub incentives: f64,
    pub remarks: String,
}

/// One processed payroll row per (employee, month, year). Written by the
/// payroll processor; only the status field is touched afterwards, by the
/// payslip emitter.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollProcessingRecord {
    pub employee_id: String,
    pub employee_name: String,

    #[schema(example = 3)]
    pub month: u32,

    #[schema(example = 2024)]
    pub year: i32,

    /// Calendar days in the target month.
    pub month_days: u32,

    /// Number of Sundays in the target month; paid regardless of attendance.
    pub weekend: u32,

    pub total_present_days: f64,
    pub total_ot_hours: f64,
    pub payable_days: f64,

    // Prorated earnings (medical allowance and bonus pass through as-is)
    pub basic_salary: f64,
    pub hra: f64,
    pub conveyance_allowance: f64,
    pub medical_allowance: f64,
    pub bonus: f64,
    pub special_allowance: f64,
    pub gross_salary: f64,

    pub pf_contribution: f64,
    pub esi_contribution: f64,
    pub income_tax: f64,
    pub loan_deduction: f64,
    pub unpaid_leave_deduction: f64,
    pub penalties: f64,
    pub deductions: f64,

    pub reimbursements: f64,
    pub incentives: f64,
    pub net_salary: f64,
    pub remarks: String,

    /// Delivery status, "Pending" until the payslip emitter marks it "Sent".
    pub status: String,
}

/// A processed payroll row joined with the employee's delivery address, the
/// payslip emitter's unit of work.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PayslipRow {
    pub employee_id: String,
    pub employee_name: String,
    pub basic_salary: f64,
    pub hra: f64,
    pub conveyance_allowance: f64,
    pub special_allowance: f64,
    pub medical_allowance: f64,
    pub bonus: f64,
    pub total_ot_hours: f64,
    pub gross_salary: f64,
    pub pf_contribution: f64,
    pub esi_contribution: f64,
    pub income_tax: f64,
    pub loan_deduction: f64,
    pub unpaid_leave_deduction: f64,
    pub penalties: f64,
    pub deductions: f64,
    pub reimbursements: f64,
    pub incentives: f64,
    pub net_salary: f64,
    pub email: String,
}
