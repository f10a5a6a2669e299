//! Positional parser for the fixed-layout attendance report.
//!
//! The sheet is a machine-generated export: row 6 (0-based) holds the day
//! headers starting at column 2, and each employee block opens with a cell
//! containing the literal `Employee:` whose column-3 neighbour reads
//! `<code>:<name>`. Two and three rows below the marker sit the in-time and
//! out-time series, aligned column-for-column with the day headers. Nothing
//! about merged cells or shuffled rows is tolerated; a sheet that does not
//! match this contract aborts the whole organize run.

use crate::core::timecalc::{
    Punch, final_ot_hours, format_overtime, late_by, overtime_minutes, present_fraction,
    punch_from_excel_fraction, punch_from_hhmm, punch_to_hhmm,
};
use crate::error::PipelineError;
use crate::model::attendance::OrganizedAttendanceRecord;
use crate::model::shift::ShiftWindow;

pub const DAY_HEADER_ROW: usize = 6;
pub const FIRST_DAY_COLUMN: usize = 2;
const EMPLOYEE_MARKER: &str = "Employee:";
const DETAILS_COLUMN: usize = 3;
const IN_TIME_OFFSET: usize = 2;
const OUT_TIME_OFFSET: usize = 3;

/// A spreadsheet cell reduced to what the report can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

/// An owned, rectangularity-free snapshot of the worksheet. Rows may have
/// different lengths; out-of-range reads come back as `Empty`.
#[derive(Debug)]
pub struct SheetGrid {
    rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        SheetGrid { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Empty)
    }

    fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |r| r.len())
    }
}

/// One employee section found during the linear scan.
#[derive(Debug, PartialEq)]
pub struct EmployeeBlock {
    pub employee_id: String,
    pub employee_name: String,
    marker_row: usize,
}

/// A populated day-header column.
#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub column: usize,
    pub label: String,
}

/// Finds every employee block marker. Markers whose details cell is missing
/// the `code:name` shape are skipped, matching the report generator's habit
/// of emitting summary sections with the same marker token.
pub fn scan_employee_blocks(grid: &SheetGrid) -> Vec<EmployeeBlock> {
    let mut blocks = Vec::new();
    for row in 0..grid.row_count() {
        let CellValue::Text(marker) = grid.cell(row, 0) else {
            continue;
        };
        if marker.trim() != EMPLOYEE_MARKER {
            continue;
        }
        let CellValue::Text(details) = grid.cell(row, DETAILS_COLUMN) else {
            continue;
        };
        let Some((code, name)) = details.split_once(':') else {
            continue;
        };
        blocks.push(EmployeeBlock {
            employee_id: code.trim().to_string(),
            employee_name: name.trim().to_string(),
            marker_row: row,
        });
    }
    blocks
}

/// Reads the day-header row. At least one populated day column must exist,
/// otherwise the sheet is not the report we expect.
pub fn day_columns(grid: &SheetGrid) -> Result<Vec<DayColumn>, PipelineError> {
    let width = grid.row_len(DAY_HEADER_ROW);
    let mut days = Vec::new();
    for column in FIRST_DAY_COLUMN..width {
        let label = match grid.cell(DAY_HEADER_ROW, column) {
            CellValue::Empty => continue,
            CellValue::Text(s) if s.trim().is_empty() => continue,
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
        };
        days.push(DayColumn { column, label });
    }
    if days.is_empty() {
        return Err(PipelineError::Layout(
            "day header row has no populated day columns".to_string(),
        ));
    }
    Ok(days)
}

/// Normalizes one raw punch cell: numeric cells carry the spreadsheet
/// fractional-day encoding, text cells must be HH:MM, absent cells mean no
/// punch. Any other text aborts the parse.
fn punch_from_cell(cell: &CellValue, row: usize, col: usize) -> Result<Punch, PipelineError> {
    match cell {
        CellValue::Empty => Ok(None),
        CellValue::Number(v) => Ok(punch_from_excel_fraction(*v)),
        CellValue::Text(s) => punch_from_hhmm(s).ok_or_else(|| {
            PipelineError::Layout(format!(
                "unreadable time cell {s:?} at row {row}, column {col}"
            ))
        }),
    }
}

/// Builds the organized records for one employee block, one record per
/// populated day column, using the resolved shift for the time metrics.
pub fn build_block_records(
    grid: &SheetGrid,
    block: &EmployeeBlock,
    shift: &ShiftWindow,
    days: &[DayColumn],
) -> Result<Vec<OrganizedAttendanceRecord>, PipelineError> {
    let in_row = block.marker_row + IN_TIME_OFFSET;
    let out_row = block.marker_row + OUT_TIME_OFFSET;

    let mut records = Vec::with_capacity(days.len());
    for day in days {
        let in_punch = punch_from_cell(grid.cell(in_row, day.column), in_row, day.column)?;
        let out_punch = punch_from_cell(grid.cell(out_row, day.column), out_row, day.column)?;

        let present_days = present_fraction(in_punch, out_punch);
        let late = late_by(shift.start, in_punch);
        let ot_minutes = overtime_minutes(shift.end, out_punch, late);

        records.push(OrganizedAttendanceRecord {
            employee_id: block.employee_id.clone(),
            employee_name: block.employee_name.clone(),
            date: day.label.clone(),
            in_time: punch_to_hhmm(in_punch),
            out_time: punch_to_hhmm(out_punch),
            present_days,
            shift_name: shift.shift_name.clone(),
            late_by: late,
            ot_hours: format_overtime(ot_minutes),
            final_ot_hours: final_ot_hours(ot_minutes),
        });
    }
    Ok(records)
}

/// Converts a calamine worksheet range into the owned grid, with cell
/// coordinates preserved (calamine ranges do not start at A1 by default).
pub fn grid_from_range(range: &calamine::Range<calamine::Data>) -> SheetGrid {
    use calamine::Data;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let height = start_row as usize + range.height();
    let width = start_col as usize + range.width();

    let mut rows = vec![vec![CellValue::Empty; width]; height];
    for (row, col, value) in range.used_cells() {
        let cell = match value {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) => CellValue::Empty,
        };
        rows[start_row as usize + row][start_col as usize + col] = cell;
    }
    SheetGrid::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timecalc::{ClockTime, LateBy};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    /// A minimal report: day header on row 6, one employee block at row 8.
    fn sample_grid() -> SheetGrid {
        let mut rows = vec![Vec::new(); 12];
        rows[6] = vec![
            CellValue::Empty,
            CellValue::Empty,
            num(1.0),
            num(2.0),
            num(3.0),
        ];
        rows[8] = vec![
            text("Employee:"),
            CellValue::Empty,
            CellValue::Empty,
            text("EMP-001: John Doe"),
        ];
        // in-times: 09:00, 09:15 (fraction), missing
        rows[10] = vec![
            CellValue::Empty,
            CellValue::Empty,
            text("09:00"),
            num(0.385_416_666_7),
            CellValue::Empty,
        ];
        // out-times: 19:10, 00:00 sentinel, missing
        rows[11] = vec![
            CellValue::Empty,
            CellValue::Empty,
            text("19:10"),
            text("00:00"),
            CellValue::Empty,
        ];
        SheetGrid::new(rows)
    }

    fn general_shift() -> ShiftWindow {
        ShiftWindow {
            shift_name: "General".to_string(),
            start: ClockTime::from_hm(9, 0).unwrap(),
            end: ClockTime::from_hm(18, 0).unwrap(),
        }
    }

    #[test]
    fn scans_employee_blocks_and_skips_malformed_details() {
        let mut rows = vec![Vec::new(); 6];
        rows[1] = vec![
            text("Employee:"),
            CellValue::Empty,
            CellValue::Empty,
            text("EMP-001: John Doe"),
        ];
        rows[3] = vec![
            text("Employee:"),
            CellValue::Empty,
            CellValue::Empty,
            text("summary without separator"),
        ];
        rows[5] = vec![
            text("Employee:"),
            CellValue::Empty,
            CellValue::Empty,
            text("EMP-002:Jane Roe"),
        ];
        let blocks = scan_employee_blocks(&SheetGrid::new(rows));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].employee_id, "EMP-001");
        assert_eq!(blocks[0].employee_name, "John Doe");
        assert_eq!(blocks[1].employee_id, "EMP-002");
        assert_eq!(blocks[1].employee_name, "Jane Roe");
    }

    #[test]
    fn day_columns_reads_header_and_skips_gaps() {
        let grid = sample_grid();
        let days = day_columns(&grid).unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], DayColumn { column: 2, label: "1".to_string() });
        assert_eq!(days[2].label, "3");
    }

    #[test]
    fn day_columns_rejects_headerless_sheet() {
        let grid = SheetGrid::new(vec![vec![text("nothing here")]]);
        assert!(matches!(
            day_columns(&grid),
            Err(PipelineError::Layout(_))
        ));
    }

    #[test]
    fn builds_records_with_metrics_per_day() {
        let grid = sample_grid();
        let days = day_columns(&grid).unwrap();
        let blocks = scan_employee_blocks(&grid);
        assert_eq!(blocks.len(), 1);

        let records = build_block_records(&grid, &blocks[0], &general_shift(), &days).unwrap();
        assert_eq!(records.len(), 3);

        // Day 1: full day with 70 minutes overtime
        assert_eq!(records[0].in_time, "09:00");
        assert_eq!(records[0].out_time, "19:10");
        assert_eq!(records[0].present_days, 1.0);
        assert_eq!(records[0].late_by, LateBy::OnTime);
        assert_eq!(records[0].ot_hours, "01:10");
        assert_eq!(records[0].final_ot_hours, 1.0);

        // Day 2: open punch, 15 minutes late, half day
        assert_eq!(records[1].in_time, "09:15");
        assert_eq!(records[1].out_time, "00:00");
        assert_eq!(records[1].present_days, 0.5);
        assert_eq!(records[1].late_by, LateBy::Late(15));
        assert_eq!(records[1].final_ot_hours, 0.0);

        // Day 3: absent
        assert_eq!(records[2].in_time, "00:00");
        assert_eq!(records[2].out_time, "00:00");
        assert_eq!(records[2].present_days, 0.0);
        assert_eq!(records[2].shift_name, "General");
    }

    #[test]
    fn unmapped_shift_fallback_flows_through() {
        let grid = sample_grid();
        let days = day_columns(&grid).unwrap();
        let blocks = scan_employee_blocks(&grid);

        let records =
            build_block_records(&grid, &blocks[0], &ShiftWindow::unmapped(), &days).unwrap();
        assert_eq!(records[0].shift_name, "N/A");
        // 09:00 against a 00:00 expected start is nine hours late
        assert_eq!(records[0].late_by, LateBy::Late(540));
        // 19:10 out against the 08:00 default end, minus 540 late minutes
        assert_eq!(records[0].ot_hours, "02:10");
        assert_eq!(records[0].final_ot_hours, 2.0);
    }

    #[test]
    fn malformed_time_cell_aborts_the_parse() {
        let mut rows = vec![Vec::new(); 12];
        rows[6] = vec![CellValue::Empty, CellValue::Empty, num(1.0)];
        rows[8] = vec![
            text("Employee:"),
            CellValue::Empty,
            CellValue::Empty,
            text("EMP-001:John"),
        ];
        rows[10] = vec![CellValue::Empty, CellValue::Empty, text("not a time")];
        let grid = SheetGrid::new(rows);
        let days = day_columns(&grid).unwrap();
        let blocks = scan_employee_blocks(&grid);
        let result = build_block_records(&grid, &blocks[0], &general_shift(), &days);
        assert!(matches!(result, Err(PipelineError::Layout(_))));
    }
}
