//! Date recovery for the "Date création" column.
//!
//! The tracking workbook mixes real date cells, raw serial numbers, and text
//! typed by hand in French day-first order. Everything that cannot be turned
//! into a calendar date is reported as `None` rather than an error.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::suivi::tools::model::Cell;

/// Parses source cells into calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    /// Year assumed for `DD/MM` text that omits it.
    pub reference_year: i32,
}

impl Default for DateParser {
    fn default() -> Self {
        Self {
            reference_year: Local::now().year(),
        }
    }
}

impl DateParser {
    pub fn with_reference_year(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn parse_cell(&self, cell: &Cell) -> Option<NaiveDate> {
        match cell {
            Cell::Empty | Cell::Bool(_) => None,
            Cell::Number(serial) | Cell::Date(serial) => from_excel_serial(*serial),
            Cell::Text(text) => self.parse_text(text),
        }
    }

    /// Accepts `D/M/YYYY`, `D/M/YY`, `D/M` and `YYYY-MM-DD`.
    pub fn parse_text(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() || text == "-" {
            return None;
        }

        if let Some(date) = parse_iso(text) {
            return Some(date);
        }

        let parts: Vec<&str> = text.split('/').collect();
        let (day, month, year) = match parts.as_slice() {
            [day, month] => (*day, *month, None),
            [day, month, year] => (*day, *month, Some(*year)),
            _ => return None,
        };

        if !is_digits(day, 1, 2) || !is_digits(month, 1, 2) {
            return None;
        }

        let year = match year {
            None => self.reference_year,
            Some(year) if is_digits(year, 4, 4) => year.parse().ok()?,
            Some(year) if is_digits(year, 2, 2) => 2000 + year.parse::<i32>().ok()?,
            Some(_) => return None,
        };

        NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
    }
}

/// Converts an Excel serial day count (1900 date system) into a date,
/// discarding the time-of-day fraction.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::try_days(serial.floor() as i64)?)
}

fn parse_iso(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || !is_digits(year, 4, 4)
        || !is_digits(month, 2, 2)
        || !is_digits(day, 2, 2)
    {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn is_digits(text: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&text.len()) && text.bytes().all(|byte| byte.is_ascii_digit())
}
