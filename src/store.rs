//! Persistence boundary for the attendance/payroll pipeline.
//!
//! Every multi-step write runs inside one transaction so an interrupted
//! request cannot leave a period half-replaced. The pool is handed in by the
//! caller; nothing here owns a connection.

use chrono::NaiveTime;
use sqlx::MySqlPool;

use crate::model::attendance::ConsolidatedAttendance;
use crate::model::payroll::{PayrollInputRow, PayrollProcessingRecord, PayslipRow};
use crate::model::shift::{ShiftMaster, ShiftWindow};

/// Resolves the shift mapped to one employee, if any. Overlapping mappings
/// are not reconciled; the most recently created mapping wins. Callers apply
/// the N/A 00:00-08:00 fallback for unmapped employees.
pub async fn shift_for_employee(
    pool: &MySqlPool,
    employee_id: &str,
) -> Result<Option<ShiftWindow>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, NaiveTime, NaiveTime)>(
        r#"
        SELECT sm.shift_name, sm.start_time, sm.end_time
        FROM shift_mapping m
        JOIN shift_master sm ON m.shift_id = sm.shift_id
        WHERE m.employee_id = ?
        ORDER BY m.id DESC
        LIMIT 1
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(name, start, end)| ShiftWindow::from_times(name, start, end)))
}

pub async fn list_shifts(pool: &MySqlPool) -> Result<Vec<ShiftMaster>, sqlx::Error> {
    sqlx::query_as::<_, ShiftMaster>(
        "SELECT shift_id, shift_name, start_time, end_time FROM shift_master",
    )
    .fetch_all(pool)
    .await
}

/// Full-period replace: deletes every consolidated row for (month, year) and
/// inserts the new batch, all inside one transaction. Re-running the
/// consolidation for the same period is therefore idempotent.
pub async fn replace_consolidated_attendance(
    pool: &MySqlPool,
    month: u32,
    year: i32,
    rows: &[ConsolidatedAttendance],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM consolidated_attendance WHERE month = ? AND year = ?")
        .bind(month)
        .bind(year)
        .execute(&mut *tx)
        .await?;

    for row in rows {
        sqlx::query(
            r#"
            INSERT INTO consolidated_attendance
            (employee_id, employee_name, month, year, total_present_days, total_ot_hours, location_name)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.employee_id)
        .bind(&row.employee_name)
        .bind(row.month)
        .bind(row.year)
        .bind(row.total_present_days)
        .bind(row.total_ot_hours)
        .bind(&row.location_name)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

pub async fn list_consolidated(
    pool: &MySqlPool,
) -> Result<Vec<ConsolidatedAttendance>, sqlx::Error> {
    sqlx::query_as::<_, ConsolidatedAttendance>(
        r#"
        SELECT employee_id, employee_name, month, year,
               total_present_days, total_ot_hours, location_name
        FROM consolidated_attendance
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Inner join of consolidated attendance with the pay structure for the
/// period. Employees missing a pay structure simply fall out of the join;
/// missing amount columns default to zero.
pub async fn consolidated_joined_with_pay_structure(
    pool: &MySqlPool,
    month: u32,
    year: i32,
) -> Result<Vec<PayrollInputRow>, sqlx::Error> {
    sqlx::query_as::<_, PayrollInputRow>(
        r#"
        SELECT
            ca.employee_id,
            ca.employee_name,
            ca.total_present_days,
            ca.total_ot_hours,
            COALESCE(ps.basic_salary, 0) AS basic_salary,
            COALESCE(ps.hra, 0) AS hra,
            COALESCE(ps.conveyance_allowance, 0) AS conveyance_allowance,
            COALESCE(ps.medical_allowance, 0) AS medical_allowance,
            COALESCE(ps.bonus, 0) AS bonus,
            COALESCE(ps.special_allowance, 0) AS special_allowance,
            COALESCE(ps.pf_contribution, 0) AS pf_contribution,
            COALESCE(ps.esi_contribution, 0) AS esi_contribution,
            COALESCE(ps.income_tax, 0) AS income_tax,
            COALESCE(ps.loan_deduction, 0) AS loan_deduction,
            COALESCE(ps.unpaid_leave_deduction, 0) AS unpaid_leave_deduction,
            COALESCE(ps.penalties, 0) AS penalties,
            COALESCE(ps.reimbursements, 0) AS reimbursements,
            COALESCE(ps.incentives, 0) AS incentives,
            COALESCE(ps.remarks, '') AS remarks
        FROM consolidated_attendance ca
        INNER JOIN pay_structure ps ON ca.employee_id = ps.employee_id
        WHERE ca.month = ? AND ca.year = ?
        "#,
    )
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await
}

/// Replaces any previously processed payroll rows for the period and inserts
/// the new batch, in one transaction. Mirrors the consolidation semantics so
/// re-processing a period is idempotent instead of stacking duplicates.
pub async fn replace_payroll_rows(
    pool: &MySqlPool,
    month: u32,
    year: i32,
    records: &[PayrollProcessingRecord],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM payroll_processing WHERE month = ? AND year = ?")
        .bind(month)
        .bind(year)
        .execute(&mut *tx)
        .await?;

    for r in records {
        sqlx::query(
            r#"
            INSERT INTO payroll_processing
            (employee_id, employee_name, month, year, month_days, weekend,
             total_present_days, total_ot_hours, payable_days, basic_salary, hra,
             conveyance_allowance, medical_allowance, bonus, special_allowance,
             gross_salary, pf_contribution, esi_contribution, income_tax,
             loan_deduction, unpaid_leave_deduction, penalties, deductions,
             reimbursements, incentives, net_salary, remarks, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&r.employee_id)
        .bind(&r.employee_name)
        .bind(r.month)
        .bind(r.year)
        .bind(r.month_days)
        .bind(r.weekend)
        .bind(r.total_present_days)
        .bind(r.total_ot_hours)
        .bind(r.payable_days)
        .bind(r.basic_salary)
        .bind(r.hra)
        .bind(r.conveyance_allowance)
        .bind(r.medical_allowance)
        .bind(r.bonus)
        .bind(r.special_allowance)
        .bind(r.gross_salary)
        .bind(r.pf_contribution)
        .bind(r.esi_contribution)
        .bind(r.income_tax)
        .bind(r.loan_deduction)
        .bind(r.unpaid_leave_deduction)
        .bind(r.penalties)
        .bind(r.deductions)
        .bind(r.reimbursements)
        .bind(r.incentives)
        .bind(r.net_salary)
        .bind(&r.remarks)
        .bind(&r.status)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Processed payroll rows joined with the employee's delivery address for
/// the payslip fan-out.
pub async fn payslip_rows(
    pool: &MySqlPool,
    month: u32,
    year: i32,
) -> Result<Vec<PayslipRow>, sqlx::Error> {
    sqlx::query_as::<_, PayslipRow>(
        r#"
        SELECT
            pp.employee_id, pp.employee_name, pp.basic_salary, pp.hra,
            pp.conveyance_allowance, pp.special_allowance, pp.medical_allowance,
            pp.bonus, pp.total_ot_hours, pp.gross_salary, pp.pf_contribution,
            pp.esi_contribution, pp.income_tax, pp.loan_deduction,
            pp.unpaid_leave_deduction, pp.penalties, pp.deductions,
            pp.reimbursements, pp.incentives, pp.net_salary,
            e.email
        FROM payroll_processing pp
        INNER JOIN employees e ON pp.employee_id = e.employee_id
        WHERE pp.month = ? AND pp.year = ?
        "#,
    )
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await
}

/// Marks one processed row as delivered. Only the payslip emitter calls
/// this, after a successful dispatch.
pub async fn mark_payroll_sent(
    pool: &MySqlPool,
    employee_id: &str,
    month: u32,
    year: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE payroll_processing SET status = 'Sent' WHERE employee_id = ? AND month = ? AND year = ?",
    )
    .bind(employee_id)
    .bind(month)
    .bind(year)
    .execute(pool)
    .await?;
    Ok(())
}
