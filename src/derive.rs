//! Per-row derived metrics and the cleaned [`Dataset`].

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    clean::SalesRecord,
    schema::{DERIVED_COLUMNS, REQUIRED_COLUMNS},
};

const BUNDLED: &str = "bundled";

/// A cleaned sales row plus its two synthetic columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    pub sale: SalesRecord,
    #[serde(rename = "Revenue per Conversion")]
    pub revenue_per_conversion: f64,
    #[serde(rename = "Is Bundled")]
    pub is_bundled: bool,
}

impl Record {
    pub fn new(sale: SalesRecord) -> Self {
        let revenue_per_conversion = revenue_per_conversion(sale.daily_revenue, sale.conversions);
        let is_bundled = is_bundled(&sale.service_type);
        Self {
            sale,
            revenue_per_conversion,
            is_bundled,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.sale.date
    }

    /// Cell values in [`Dataset::columns`] order, formatted for display.
    pub fn display_cells(&self) -> Vec<String> {
        let sale = &self.sale;
        vec![
            sale.date.format("%Y-%m-%d").to_string(),
            sale.time_of_day.clone(),
            sale.service_type.clone(),
            sale.ad_channel.clone(),
            sale.customer_type.clone(),
            format!("{:.2}", sale.ad_spend),
            sale.conversions.to_string(),
            format!("{:.2}", sale.daily_revenue),
            format!("{:.2}", self.revenue_per_conversion),
            self.is_bundled.to_string(),
        ]
    }
}

/// Revenue earned per conversion; zero when there were no conversions.
pub fn revenue_per_conversion(daily_revenue: f64, conversions: i64) -> f64 {
    if conversions > 0 {
        daily_revenue / conversions as f64
    } else {
        0.0
    }
}

/// True when the service type is "bundled", ignoring case and outer whitespace.
pub fn is_bundled(service_type: &str) -> bool {
    service_type.trim().to_lowercase() == BUNDLED
}

/// Immutable, ordered collection of cleaned records.
///
/// Filtering produces a new `Dataset`; nothing mutates one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// The eight required columns followed by the two derived ones.
    pub fn columns() -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .iter()
            .chain(DERIVED_COLUMNS.iter())
            .copied()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

pub fn derive_metrics(sales: Vec<SalesRecord>) -> Dataset {
    Dataset::from_records(sales.into_iter().map(Record::new).collect())
}
