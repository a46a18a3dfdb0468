//! Display normalisation applied at render time.
//!
//! Rows keep their raw text; these helpers decide what the user sees for a
//! quantity, a storage bin, and an expiry that may be an ISO date, a
//! spreadsheet serial day count, or free text.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static regex"));

/// Serial values outside this open interval are not treated as dates.
const SERIAL_DISPLAY_RANGE: (f64, f64) = (20_000.0, 90_000.0);

/// Largest serial the 1900 date system represents (9999-12-31).
const SERIAL_MAX: f64 = 2_958_465.0;

/// Quantity label: empty or whitespace-only shows as `0`.
pub fn quantity_label(raw: &str) -> &str {
    match raw.trim() {
        "" => "0",
        s => s,
    }
}

/// Storage-bin label: empty shows as `-`.
pub fn bin_label(raw: &str) -> &str {
    match raw.trim() {
        "" => "-",
        s => s,
    }
}

/// Expiry label.
///
/// - empty → `-`
/// - already `YYYY-MM-DD` → unchanged
/// - a number strictly between 20000 and 90000 → the calendar date of that
///   serial day, `YYYY-MM-DD`
/// - anything else → verbatim
pub fn format_expiry(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return "-".to_string();
    }
    if ISO_DATE.is_match(s) {
        return s.to_string();
    }

    let (lo, hi) = SERIAL_DISPLAY_RANGE;
    match s.parse::<f64>() {
        Ok(n) if n > lo && n < hi => SerialDate::from_serial(n)
            .map(|d| d.to_string())
            .unwrap_or_else(|| s.to_string()),
        _ => s.to_string(),
    }
}

// ---------------------------------------------------------------------------
// SerialDate
// ---------------------------------------------------------------------------

/// A calendar date decoded from a 1900-system spreadsheet serial.
///
/// Kept as plain components rather than a `NaiveDate` because the 1900
/// system has two days no real calendar does: day 0 (`1900-01-00`) and the
/// phantom leap day 60 (`1900-02-29`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SerialDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl SerialDate {
    /// Decode a serial day count. The fractional part is a time of day;
    /// a remainder within 1e-4 of a whole second rounds up and may carry
    /// into the next day.
    ///
    /// Returns `None` for negative serials and those past 9999-12-31.
    pub fn from_serial(serial: f64) -> Option<Self> {
        if !(0.0..=SERIAL_MAX).contains(&serial) {
            return None;
        }

        let mut date = serial.trunc() as i64;
        let seconds = 86_400.0 * (serial - date as f64);
        let mut whole = seconds.floor();
        let mut frac = seconds - whole;
        if frac.abs() < 1e-6 {
            frac = 0.0;
        }
        if frac > 0.9999 {
            whole += 1.0;
            if whole >= 86_400.0 {
                date += 1;
            }
        }

        match date {
            0 => Some(Self { year: 1900, month: 1, day: 0 }),
            60 => Some(Self { year: 1900, month: 2, day: 29 }),
            d => {
                // Serial 61 is 1900-03-01: skip the phantom leap day.
                let d = if d > 60 { d - 1 } else { d };
                let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)?;
                let ymd = epoch.checked_add_signed(Duration::days(d - 1))?;
                Some(Self { year: ymd.year(), month: ymd.month(), day: ymd.day() })
            }
        }
    }
}

impl std::fmt::Display for SerialDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
