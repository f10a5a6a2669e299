//! Monthly aggregation of organized attendance rows.
//!
//! Consolidation itself is pure; the full-period replace (delete every row
//! for the month/year, then insert the new batch inside one transaction)
//! lives in the store layer and is what makes re-runs idempotent.

use std::collections::BTreeMap;

use crate::model::attendance::{ConsolidatedAttendance, OrganizedAttendanceRecord};

/// Groups the organized records by (employee id, employee name), summing
/// present-day fractions and final-OT hours. Output order is stable by key
/// so re-runs over the same input produce the identical batch.
pub fn consolidate(
    records: &[OrganizedAttendanceRecord],
    month: u32,
    year: i32,
    location_name: &str,
) -> Vec<ConsolidatedAttendance> {
    let mut by_employee: BTreeMap<(String, String), ConsolidatedAttendance> = BTreeMap::new();

    for record in records {
        let key = (record.employee_id.clone(), record.employee_name.clone());
        let entry = by_employee
            .entry(key)
            .or_insert_with(|| ConsolidatedAttendance {
                employee_id: record.employee_id.clone(),
                employee_name: record.employee_name.clone(),
                month,
                year,
                total_present_days: 0.0,
                total_ot_hours: 0.0,
                location_name: location_name.to_string(),
            });
        entry.total_present_days += record.present_days;
        entry.total_ot_hours += record.final_ot_hours;
    }

    by_employee.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timecalc::LateBy;

    fn record(id: &str, name: &str, present: f64, ot: f64) -> OrganizedAttendanceRecord {
        OrganizedAttendanceRecord {
            employee_id: id.to_string(),
            employee_name: name.to_string(),
            date: "1".to_string(),
            in_time: "09:00".to_string(),
            out_time: "18:00".to_string(),
            present_days: present,
            shift_name: "General".to_string(),
            late_by: LateBy::OnTime,
            ot_hours: "00:00".to_string(),
            final_ot_hours: ot,
        }
    }

    #[test]
    fn sums_present_days_and_ot_per_employee() {
        let records = vec![
            record("EMP-002", "Jane", 1.0, 0.5),
            record("EMP-001", "John", 1.0, 1.0),
            record("EMP-001", "John", 0.5, 0.0),
            record("EMP-001", "John", 1.0, 1.5),
        ];
        let rows = consolidate(&records, 3, 2024, "Chennai Plant");

        assert_eq!(rows.len(), 2);
        let john = rows.iter().find(|r| r.employee_id == "EMP-001").unwrap();
        assert_eq!(john.total_present_days, 2.5);
        assert_eq!(john.total_ot_hours, 2.5);
        assert_eq!(john.month, 3);
        assert_eq!(john.year, 2024);
        assert_eq!(john.location_name, "Chennai Plant");
    }

    #[test]
    fn one_row_per_employee_and_deterministic_across_runs() {
        let records = vec![
            record("EMP-001", "John", 1.0, 0.0),
            record("EMP-002", "Jane", 0.5, 0.5),
            record("EMP-001", "John", 1.0, 0.5),
        ];
        let first = consolidate(&records, 3, 2024, "HQ");
        let second = consolidate(&records, 3, 2024, "HQ");
        assert_eq!(first, second);
        assert_eq!(
            first
                .iter()
                .filter(|r| r.employee_id == "EMP-001")
                .count(),
            1
        );
    }

    #[test]
    fn empty_input_consolidates_to_nothing() {
        assert!(consolidate(&[], 1, 2024, "HQ").is_empty());
    }
}
