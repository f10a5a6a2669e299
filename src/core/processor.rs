//! Prorated payroll computation for one (month, year).
//!
//! Sundays are paid regardless of attendance, so payable days are present
//! days plus the month's Sunday count, and the proration factor is payable
//! days over calendar days. The factor is not clamped to 1: a month with
//! many Sundays and full attendance can exceed it. See DESIGN.md.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::PipelineError;
use crate::model::payroll::{PayrollInputRow, PayrollProcessingRecord};

/// Calendar days in the given month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_first.signed_duration_since(first).num_days() as u32)
}

/// Number of Sundays in the given month.
pub fn sundays_in_month(year: i32, month: u32) -> Option<u32> {
    let days = days_in_month(year, month)?;
    let mut sundays = 0;
    for day in 1..=days {
        if NaiveDate::from_ymd_opt(year, month, day)?.weekday() == Weekday::Sun {
            sundays += 1;
        }
    }
    Some(sundays)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes one payroll-processing record from a joined attendance +
/// pay-structure row. Basic, HRA, conveyance and special allowance are
/// prorated; medical allowance and bonus pass through untouched.
pub fn process_row(
    row: &PayrollInputRow,
    month: u32,
    year: i32,
    month_days: u32,
    weekend: u32,
) -> PayrollProcessingRecord {
    let payable_days = row.total_present_days + weekend as f64;
    let factor = payable_days / month_days as f64;

    let basic = row.basic_salary * factor;
    let hra = row.hra * factor;
    let conveyance = row.conveyance_allowance * factor;
    let special = row.special_allowance * factor;

    let gross = basic + hra + conveyance + row.medical_allowance + row.bonus + special;
    let deductions = row.pf_contribution
        + row.esi_contribution
        + row.income_tax
        + row.loan_deduction
        + row.unpaid_leave_deduction
        + row.penalties;
    let net = gross - deductions;

    PayrollProcessingRecord {
        employee_id: row.employee_id.clone(),
        employee_name: row.employee_name.clone(),
        month,
        year,
        month_days,
        weekend,
        total_present_days: row.total_present_days,
        total_ot_hours: row.total_ot_hours,
        payable_days: round2(payable_days),
        basic_salary: round2(basic),
        hra: round2(hra),
        conveyance_allowance: round2(conveyance),
        medical_allowance: round2(row.medical_allowance),
        bonus: round2(row.bonus),
        special_allowance: round2(special),
        gross_salary: round2(gross),
        pf_contribution: round2(row.pf_contribution),
        esi_contribution: round2(row.esi_contribution),
        income_tax: round2(row.income_tax),
        loan_deduction: round2(row.loan_deduction),
        unpaid_leave_deduction: round2(row.unpaid_leave_deduction),
        penalties: round2(row.penalties),
        deductions: round2(deductions),
        reimbursements: round2(row.reimbursements),
        incentives: round2(row.incentives),
        net_salary: round2(net),
        remarks: row.remarks.clone(),
        status: "Pending".to_string(),
    }
}

/// Runs the proration over every joined row for the period. An invalid
/// period is a validation failure; an empty join means there is nothing to
/// process and the request is rejected rather than silently succeeding.
pub fn process_period(
    rows: &[PayrollInputRow],
    month: u32,
    year: i32,
) -> Result<Vec<PayrollProcessingRecord>, PipelineError> {
    let month_days = days_in_month(year, month).ok_or(PipelineError::InvalidField {
        field: "month",
        reason: format!("{year}-{month} is not a calendar month"),
    })?;
    // same validity domain as days_in_month, so this cannot fail here
    let weekend = sundays_in_month(year, month).unwrap_or(0);

    if rows.is_empty() {
        return Err(PipelineError::EmptyPeriod);
    }

    Ok(rows
        .iter()
        .map(|row| process_row(row, month, year, month_days, weekend))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(present: f64) -> PayrollInputRow {
        PayrollInputRow {
            employee_id: "EMP-001".to_string(),
            employee_name: "John Doe".to_string(),
            total_present_days: present,
            total_ot_hours: 6.5,
            basic_salary: 30_000.0,
            hra: 12_000.0,
            conveyance_allowance: 1_600.0,
            medical_allowance: 1_250.0,
            bonus: 2_000.0,
            special_allowance: 5_000.0,
            pf_contribution: 1_800.0,
            esi_contribution: 450.0,
            income_tax: 2_500.0,
            loan_deduction: 1_000.0,
            unpaid_leave_deduction: 0.0,
            penalties: 250.0,
            reimbursements: 500.0,
            incentives: 0.0,
            remarks: "".to_string(),
        }
    }

    #[test]
    fn calendar_helpers() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
        // January 2024: Sundays on the 7th, 14th, 21st and 28th
        assert_eq!(sundays_in_month(2024, 1), Some(4));
        // March 2024 has five Sundays
        assert_eq!(sundays_in_month(2024, 3), Some(5));
    }

    #[test]
    fn factor_of_exactly_one_reproduces_the_pay_structure() {
        // January 2024: 31 days, 4 Sundays; 27 present days -> payable 31
        let records = process_period(&[input(27.0)], 1, 2024).unwrap();
        let r = &records[0];
        assert_eq!(r.month_days, 31);
        assert_eq!(r.weekend, 4);
        assert_eq!(r.payable_days, 31.0);
        assert_eq!(r.basic_salary, 30_000.0);
        assert_eq!(r.hra, 12_000.0);
        assert_eq!(r.conveyance_allowance, 1_600.0);
        assert_eq!(r.special_allowance, 5_000.0);
        assert_eq!(r.gross_salary, 51_850.0);
    }

    #[test]
    fn partial_attendance_prorates_the_base_components() {
        // January 2024, 11.5 present days -> payable 15.5, factor 0.5
        let records = process_period(&[input(11.5)], 1, 2024).unwrap();
        let r = &records[0];
        assert_eq!(r.payable_days, 15.5);
        assert_eq!(r.basic_salary, 15_000.0);
        assert_eq!(r.hra, 6_000.0);
        assert_eq!(r.conveyance_allowance, 800.0);
        assert_eq!(r.special_allowance, 2_500.0);
        // medical and bonus are not prorated
        assert_eq!(r.medical_allowance, 1_250.0);
        assert_eq!(r.bonus, 2_000.0);
    }

    #[test]
    fn factor_is_not_clamped_above_one() {
        // March 2024: 31 days, 5 Sundays; full attendance overshoots
        let records = process_period(&[input(27.0)], 3, 2024).unwrap();
        let r = &records[0];
        assert_eq!(r.payable_days, 32.0);
        assert!(r.basic_salary > 30_000.0);
    }

    #[test]
    fn net_is_gross_minus_the_six_deductions() {
        for present in [5.0, 11.5, 20.0, 27.0] {
            let records = process_period(&[input(present)], 1, 2024).unwrap();
            let r = &records[0];
            let expected_deductions = 1_800.0 + 450.0 + 2_500.0 + 1_000.0 + 0.0 + 250.0;
            assert_eq!(r.deductions, expected_deductions);
            assert!((r.net_salary - (r.gross_salary - r.deductions)).abs() < 0.011);
            assert_eq!(r.status, "Pending");
        }
    }

    #[test]
    fn empty_join_is_rejected() {
        assert!(matches!(
            process_period(&[], 1, 2024),
            Err(PipelineError::EmptyPeriod)
        ));
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(matches!(
            process_period(&[input(1.0)], 0, 2024),
            Err(PipelineError::InvalidField { .. })
        ));
    }
}
