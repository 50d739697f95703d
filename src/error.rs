//! Error kinds raised by the sales pipeline.
//!
//! Every error is terminal for the current invocation. The presentation layer
//! is expected to show the `Display` text verbatim, so messages carry enough
//! detail (column names, row numbers) to fix the input file.

use chrono::NaiveDate;
use thiserror::Error;

use crate::schema::REQUIRED_COLUMNS;

/// Maximum number of row numbers spelled out in a [`DataError`] message.
const MAX_REPORTED_ROWS: usize = 10;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input is empty or has no header row")]
    Empty,
    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("workbook does not contain any worksheets")]
    NoWorksheets,
    #[error("worksheet '{0}' not found in workbook")]
    MissingSheet(String),
    #[error("could not parse delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("input is not valid {encoding} text")]
    Encoding { encoding: &'static str },
}

/// Required columns absent from the uploaded table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "uploaded file does not match the required dataset structure; missing required columns: {}; expected columns: {}",
    join_columns(.missing),
    REQUIRED_COLUMNS.join(", ")
)]
pub struct SchemaError {
    pub missing: Vec<String>,
}

impl SchemaError {
    pub fn expected(&self) -> &'static [&'static str] {
        &REQUIRED_COLUMNS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataErrorKind {
    InvalidDate,
    InvalidNumeric,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("some rows have invalid Date values (rows {})", format_rows(.rows))]
    InvalidDate { rows: Vec<usize> },
    #[error(
        "some rows have invalid numeric values in {} (rows {})",
        join_columns(.columns),
        format_rows(.rows)
    )]
    InvalidNumeric {
        rows: Vec<usize>,
        columns: Vec<String>,
    },
}

impl DataError {
    pub fn kind(&self) -> DataErrorKind {
        match self {
            DataError::InvalidDate { .. } => DataErrorKind::InvalidDate,
            DataError::InvalidNumeric { .. } => DataErrorKind::InvalidNumeric,
        }
    }

    /// Spreadsheet row numbers (header is row 1) that failed coercion.
    pub fn rows(&self) -> &[usize] {
        match self {
            DataError::InvalidDate { rows } | DataError::InvalidNumeric { rows, .. } => rows,
        }
    }
}

fn join_columns(columns: &[String]) -> String {
    columns.join(", ")
}

fn format_rows(rows: &[usize]) -> String {
    let shown = rows
        .iter()
        .take(MAX_REPORTED_ROWS)
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if rows.len() > MAX_REPORTED_ROWS {
        format!("{shown} and {} more", rows.len() - MAX_REPORTED_ROWS)
    } else {
        shown
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("please select a valid start and end date (got {endpoints} date(s))")]
    MalformedFilterRange { endpoints: usize },
    #[error("date range start {start} is after end {end}")]
    InvertedFilterRange { start: NaiveDate, end: NaiveDate },
    #[error("no values selected for {field}")]
    EmptySelection { field: &'static str },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Input(#[from] InputError),
}
