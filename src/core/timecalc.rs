use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A clock time as minutes since midnight, 00:00..=23:59.
///
/// Spreadsheet reports use the literal "00:00" both for midnight and for
/// "no punch recorded". Internally we keep the two apart: a missing punch is
/// `None` at the `Punch` level, and `ClockTime` is always a real time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    minutes: u16,
}

pub const MINUTES_PER_DAY: u32 = 24 * 60;

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { minutes: 0 };

    pub fn from_hm(hours: u32, minutes: u32) -> Option<Self> {
        if hours >= 24 || minutes >= 60 {
            return None;
        }
        Some(ClockTime {
            minutes: (hours * 60 + minutes) as u16,
        })
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            return None;
        }
        Some(ClockTime {
            minutes: minutes as u16,
        })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes as u32
    }

    /// Clock time from a database TIME value; seconds are dropped.
    pub fn from_naive(time: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        ClockTime {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    /// Parses "HH:MM" (24-hour, zero padded or not).
    pub fn parse(value: &str) -> Option<Self> {
        let (h, m) = value.trim().split_once(':')?;
        let hours: u32 = h.trim().parse().ok()?;
        let minutes: u32 = m.trim().parse().ok()?;
        ClockTime::from_hm(hours, minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// A recorded punch. `None` means no punch was recorded for that slot;
/// on the wire it is rendered as the sheet's "00:00" sentinel.
pub type Punch = Option<ClockTime>;

/// Converts a spreadsheet fractional-day value into a punch.
///
/// Only the fractional part carries the time of day; the integer part is the
/// day serial. Missing, zero, non-finite and exact-midnight values all map to
/// "no punch"; the report format cannot express a true midnight punch.
pub fn punch_from_excel_fraction(value: f64) -> Punch {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    // a fraction rounding up to a full day wraps to minute 0 and reads as no
    // punch, the same as an exact midnight value
    let total = (value.fract() * MINUTES_PER_DAY as f64).round() as u32 % MINUTES_PER_DAY;
    if total == 0 {
        return None;
    }
    ClockTime::from_minutes(total)
}

/// Parses an "HH:MM" cell into a punch; "00:00" is the no-punch sentinel.
pub fn punch_from_hhmm(value: &str) -> Option<Punch> {
    let time = ClockTime::parse(value)?;
    if time.minutes() == 0 {
        Some(None)
    } else {
        Some(Some(time))
    }
}

/// Renders a punch the way the timesheet report does.
pub fn punch_to_hhmm(punch: Punch) -> String {
    match punch {
        Some(time) => time.to_string(),
        None => "00:00".to_string(),
    }
}

/// Lateness of an in-punch against the shift's expected start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateBy {
    OnTime,
    /// Positive lateness in minutes.
    Late(u32),
}

impl LateBy {
    pub fn minutes(&self) -> u32 {
        match self {
            LateBy::OnTime => 0,
            LateBy::Late(m) => *m,
        }
    }
}

impl fmt::Display for LateBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LateBy::OnTime => write!(f, "On Time"),
            LateBy::Late(m) => write!(f, "{:02}:{:02}", m / 60, m % 60),
        }
    }
}

impl Serialize for LateBy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LateBy {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == "On Time" {
            return Ok(LateBy::OnTime);
        }
        let time = ClockTime::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom("expected \"On Time\" or HH:MM"))?;
        Ok(if time.minutes() == 0 {
            LateBy::OnTime
        } else {
            LateBy::Late(time.minutes())
        })
    }
}

/// Lateness: actual minus expected, floored at zero. A missing punch can
/// never be late.
pub fn late_by(expected: ClockTime, actual: Punch) -> LateBy {
    let Some(actual) = actual else {
        return LateBy::OnTime;
    };
    let diff = actual.minutes() as i64 - expected.minutes() as i64;
    if diff <= 0 {
        LateBy::OnTime
    } else {
        LateBy::Late(diff as u32)
    }
}

/// Present-day fraction for one (in, out) punch pair.
///
/// Both missing -> 0; open punch (in set, out missing) -> 0.5; otherwise the
/// worked duration decides: >= 8h -> 1, >= 4h -> 0.5, else 0. An out punch
/// earlier than the in punch falls through the "< 4h" branch and yields 0.
pub fn present_fraction(in_punch: Punch, out_punch: Punch) -> f64 {
    match (in_punch, out_punch) {
        (None, None) => 0.0,
        (Some(_), None) => 0.5,
        _ => {
            let start = in_punch.map_or(0, |t| t.minutes()) as i64;
            let end = out_punch.map_or(0, |t| t.minutes()) as i64;
            let duration = end - start;
            if duration >= 480 {
                1.0
            } else if duration >= 240 {
                0.5
            } else {
                0.0
            }
        }
    }
}

/// Overtime in minutes past the shift end, reduced by the lateness minutes
/// and floored at zero. No out punch means no overtime.
pub fn overtime_minutes(shift_end: ClockTime, out_punch: Punch, late: LateBy) -> u32 {
    let Some(out) = out_punch else {
        return 0;
    };
    if out.minutes() <= shift_end.minutes() {
        return 0;
    }
    (out.minutes() - shift_end.minutes()).saturating_sub(late.minutes())
}

/// Raw overtime in the report's HH:MM form.
pub fn format_overtime(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Final overtime in decimal hours: a >=55-minute remainder carries the hour
/// up, >=30 adds a half hour, anything less is dropped.
pub fn final_ot_hours(minutes: u32) -> f64 {
    let hours = minutes / 60;
    let remainder = minutes % 60;
    if remainder >= 55 {
        (hours + 1) as f64
    } else if remainder >= 30 {
        hours as f64 + 0.5
    } else {
        hours as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct(h: u32, m: u32) -> ClockTime {
        ClockTime::from_hm(h, m).unwrap()
    }

    #[test]
    fn excel_fraction_converts_to_clock_time() {
        assert_eq!(punch_from_excel_fraction(0.375), Some(ct(9, 0)));
        assert_eq!(punch_from_excel_fraction(0.385_416_67), Some(ct(9, 15)));
        // day serial part is ignored, only time-of-day matters
        assert_eq!(punch_from_excel_fraction(45_000.375), Some(ct(9, 0)));
    }

    #[test]
    fn excel_fraction_sentinel_cases_yield_no_punch() {
        assert_eq!(punch_from_excel_fraction(0.0), None);
        assert_eq!(punch_from_excel_fraction(-1.5), None);
        assert_eq!(punch_from_excel_fraction(f64::NAN), None);
        // a pure date serial has no time-of-day component
        assert_eq!(punch_from_excel_fraction(45_000.0), None);
        // a fraction rounding up to a full day wraps to minute 0
        assert_eq!(punch_from_excel_fraction(0.999_999), None);
        // the closest representable time before the wrap survives
        assert_eq!(
            punch_from_excel_fraction(0.999_5),
            ClockTime::from_hm(23, 59)
        );
    }

    #[test]
    fn hhmm_parsing_and_sentinel() {
        assert_eq!(punch_from_hhmm("09:15"), Some(Some(ct(9, 15))));
        assert_eq!(punch_from_hhmm("00:00"), Some(None));
        assert_eq!(punch_from_hhmm("24:10"), None);
        assert_eq!(punch_from_hhmm("garbage"), None);
        assert_eq!(punch_to_hhmm(None), "00:00");
        assert_eq!(punch_to_hhmm(Some(ct(18, 5))), "18:05");
    }

    #[test]
    fn lateness_against_expected_start() {
        assert_eq!(late_by(ct(9, 0), Some(ct(9, 15))), LateBy::Late(15));
        assert_eq!(late_by(ct(9, 0), Some(ct(9, 15))).to_string(), "00:15");
        assert_eq!(late_by(ct(9, 0), Some(ct(8, 50))), LateBy::OnTime);
        assert_eq!(late_by(ct(9, 0), Some(ct(9, 0))), LateBy::OnTime);
        assert_eq!(late_by(ct(9, 0), None), LateBy::OnTime);
    }

    #[test]
    fn present_fraction_sentinel_pairs() {
        assert_eq!(present_fraction(None, None), 0.0);
        assert_eq!(present_fraction(Some(ct(9, 0)), None), 0.5);
    }

    #[test]
    fn present_fraction_duration_thresholds() {
        assert_eq!(present_fraction(Some(ct(9, 0)), Some(ct(17, 0))), 1.0);
        assert_eq!(present_fraction(Some(ct(9, 0)), Some(ct(13, 0))), 0.5);
        assert_eq!(present_fraction(Some(ct(9, 0)), Some(ct(12, 59))), 0.0);
        // out before in is not guarded, it just reads as a short day
        assert_eq!(present_fraction(Some(ct(17, 0)), Some(ct(9, 0))), 0.0);
    }

    #[test]
    fn overtime_past_shift_end() {
        let end = ct(18, 0);
        assert_eq!(overtime_minutes(end, Some(ct(19, 10)), LateBy::OnTime), 70);
        assert_eq!(format_overtime(70), "01:10");
        assert_eq!(overtime_minutes(end, Some(ct(18, 0)), LateBy::OnTime), 0);
        assert_eq!(overtime_minutes(end, None, LateBy::OnTime), 0);
    }

    #[test]
    fn overtime_reduced_by_lateness() {
        let end = ct(18, 0);
        assert_eq!(overtime_minutes(end, Some(ct(19, 10)), LateBy::Late(30)), 40);
        // lateness larger than the overrun floors at zero
        assert_eq!(overtime_minutes(end, Some(ct(18, 20)), LateBy::Late(45)), 0);
    }

    #[test]
    fn final_ot_rounding_thresholds() {
        // 18:00 -> 19:10 / 19:30 / 19:55 from the report examples
        assert_eq!(final_ot_hours(70), 1.0);
        assert_eq!(final_ot_hours(90), 1.5);
        assert_eq!(final_ot_hours(115), 2.0);
        assert_eq!(final_ot_hours(0), 0.0);
        assert_eq!(final_ot_hours(29), 0.0);
        assert_eq!(final_ot_hours(55), 1.0);
    }
}
