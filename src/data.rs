use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single cell of an uploaded table before any typing is applied.
///
/// Workbooks hand back typed cells (numbers, dates, booleans) while delimited
/// text only ever produces [`Cell::Text`] or [`Cell::Empty`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Spreadsheet error value such as `#DIV/0!`.
    Error(String),
}

impl Cell {
    pub fn from_text(raw: &str) -> Self {
        if raw.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Error(e) => e.clone(),
        }
    }

    /// Calendar date held by the cell, if it can be read as one.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::DateTime(dt) => Some(dt.date()),
            Cell::Text(s) => parse_naive_date(s.trim())
                .or_else(|_| parse_naive_datetime(s.trim()).map(|dt| dt.date()))
                .ok(),
            _ => None,
        }
    }

    /// Finite numeric value held by the cell.
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(f) => *f,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Whole-number value held by the cell; `5.0` is accepted, `2.5` is not.
    pub fn to_whole(&self) -> Option<i64> {
        let value = self.to_number()?;
        if value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(value as i64)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d/%m/%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_naive_date_supports_multiple_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        assert_eq!(parse_naive_date("2024-05-06").unwrap(), expected);
        assert_eq!(parse_naive_date("2024/05/06").unwrap(), expected);
        assert_eq!(parse_naive_date("05/06/2024").unwrap(), expected);
        assert!(parse_naive_date("N/A").is_err());
    }

    #[test]
    fn to_date_accepts_datetime_text_and_cells() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            Cell::Text("2024-01-05 13:45:00".into()).to_date(),
            Some(expected)
        );
        assert_eq!(Cell::Text(" 2024-01-05 ".into()).to_date(), Some(expected));
        let midday = expected.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(Cell::DateTime(midday).to_date(), Some(expected));
        assert_eq!(Cell::Number(45296.0).to_date(), None);
        assert_eq!(Cell::Empty.to_date(), None);
    }

    #[test]
    fn to_number_rejects_non_finite_and_non_numeric() {
        assert_eq!(Cell::Text(" 12.5 ".into()).to_number(), Some(12.5));
        assert_eq!(Cell::Number(3.0).to_number(), Some(3.0));
        assert_eq!(Cell::Text("NaN".into()).to_number(), None);
        assert_eq!(Cell::Text("inf".into()).to_number(), None);
        assert_eq!(Cell::Text("abc".into()).to_number(), None);
        assert_eq!(Cell::Bool(true).to_number(), None);
        assert_eq!(Cell::Error("#DIV/0!".into()).to_number(), None);
    }

    #[test]
    fn to_whole_requires_integral_values() {
        assert_eq!(Cell::Text("5".into()).to_whole(), Some(5));
        assert_eq!(Cell::Number(5.0).to_whole(), Some(5));
        assert_eq!(Cell::Text("2.5".into()).to_whole(), None);
    }

    #[test]
    fn as_display_drops_trailing_zero_fraction() {
        assert_eq!(Cell::Number(3.0).as_display(), "3");
        assert_eq!(Cell::Number(3.25).as_display(), "3.25");
        assert_eq!(Cell::from_text(""), Cell::Empty);
    }
}
