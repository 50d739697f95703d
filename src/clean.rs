//! Strict type coercion of the required columns.
//!
//! Cleaning is all-or-nothing: one unparseable date or number anywhere rejects
//! the whole upload. Row numbers in the resulting [`DataError`] use spreadsheet
//! numbering, so the header is row 1 and the first record is row 2.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    error::DataError,
    loader::RawTable,
    schema::{self, ColumnLayout},
};

/// One fully typed input row, restricted to the eight required columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Time of Day")]
    pub time_of_day: String,
    #[serde(rename = "Service Type")]
    pub service_type: String,
    #[serde(rename = "Ad Channel")]
    pub ad_channel: String,
    #[serde(rename = "Customer Type")]
    pub customer_type: String,
    #[serde(rename = "Ad Spend ($)")]
    pub ad_spend: f64,
    #[serde(rename = "Conversions")]
    pub conversions: i64,
    #[serde(rename = "Daily Revenue ($)")]
    pub daily_revenue: f64,
}

pub fn clean(table: &RawTable, layout: &ColumnLayout) -> Result<Vec<SalesRecord>, DataError> {
    let dates = parse_dates(table, layout)?;
    let numerics = parse_numerics(table, layout)?;

    Ok(dates
        .into_iter()
        .zip(numerics)
        .enumerate()
        .map(|(row, (date, (ad_spend, conversions, daily_revenue)))| SalesRecord {
            date,
            time_of_day: table.cell(row, layout.time_of_day).as_display(),
            service_type: table.cell(row, layout.service_type).as_display(),
            ad_channel: table.cell(row, layout.ad_channel).as_display(),
            customer_type: table.cell(row, layout.customer_type).as_display(),
            ad_spend,
            conversions,
            daily_revenue,
        })
        .collect())
}

fn parse_dates(table: &RawTable, layout: &ColumnLayout) -> Result<Vec<NaiveDate>, DataError> {
    let mut dates = Vec::with_capacity(table.row_count());
    let mut invalid = Vec::new();
    for row in 0..table.row_count() {
        match table.cell(row, layout.date).to_date() {
            Some(date) => dates.push(date),
            None => invalid.push(table.source_line(row)),
        }
    }
    if invalid.is_empty() {
        Ok(dates)
    } else {
        Err(DataError::InvalidDate { rows: invalid })
    }
}

fn parse_numerics(
    table: &RawTable,
    layout: &ColumnLayout,
) -> Result<Vec<(f64, i64, f64)>, DataError> {
    let mut values = Vec::with_capacity(table.row_count());
    let mut invalid_rows = Vec::new();
    let mut invalid_columns = [false; 3];
    for row in 0..table.row_count() {
        let ad_spend = table.cell(row, layout.ad_spend).to_number();
        let conversions = table.cell(row, layout.conversions).to_whole();
        let daily_revenue = table.cell(row, layout.daily_revenue).to_number();
        match (ad_spend, conversions, daily_revenue) {
            (Some(spend), Some(conv), Some(revenue)) => values.push((spend, conv, revenue)),
            _ => {
                invalid_rows.push(table.source_line(row));
                invalid_columns[0] |= ad_spend.is_none();
                invalid_columns[1] |= conversions.is_none();
                invalid_columns[2] |= daily_revenue.is_none();
            }
        }
    }
    if invalid_rows.is_empty() {
        return Ok(values);
    }
    let columns = [schema::AD_SPEND, schema::CONVERSIONS, schema::DAILY_REVENUE]
        .iter()
        .zip(invalid_columns)
        .filter(|(_, invalid)| *invalid)
        .map(|(name, _)| name.to_string())
        .collect();
    Err(DataError::InvalidNumeric {
        rows: invalid_rows,
        columns,
    })
}
