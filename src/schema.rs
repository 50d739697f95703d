//! Required sales schema and header validation.
//!
//! The upload must carry the eight columns in [`REQUIRED_COLUMNS`], matched by
//! exact name (units suffixes included) in any order. Anything else is an
//! extra column: reported, then never read again.

use serde::Serialize;

use crate::{error::SchemaError, loader::RawTable};

pub const DATE: &str = "Date";
pub const TIME_OF_DAY: &str = "Time of Day";
pub const SERVICE_TYPE: &str = "Service Type";
pub const AD_CHANNEL: &str = "Ad Channel";
pub const CUSTOMER_TYPE: &str = "Customer Type";
pub const AD_SPEND: &str = "Ad Spend ($)";
pub const CONVERSIONS: &str = "Conversions";
pub const DAILY_REVENUE: &str = "Daily Revenue ($)";

pub const REVENUE_PER_CONVERSION: &str = "Revenue per Conversion";
pub const IS_BUNDLED: &str = "Is Bundled";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    DATE,
    TIME_OF_DAY,
    SERVICE_TYPE,
    AD_CHANNEL,
    CUSTOMER_TYPE,
    AD_SPEND,
    CONVERSIONS,
    DAILY_REVENUE,
];

pub const DERIVED_COLUMNS: [&str; 2] = [REVENUE_PER_CONVERSION, IS_BUNDLED];

/// Outcome of comparing a header row against [`REQUIRED_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaCheck {
    /// Required columns absent from the table, in canonical order.
    pub missing: Vec<String>,
    /// Table columns outside the required set, in table order.
    pub extra: Vec<String>,
}

impl SchemaCheck {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn validate(headers: &[String]) -> SchemaCheck {
    let missing = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|header| header == *required))
        .map(|required| required.to_string())
        .collect();
    let extra = headers
        .iter()
        .filter(|header| !REQUIRED_COLUMNS.contains(&header.as_str()))
        .cloned()
        .collect();
    SchemaCheck { missing, extra }
}

/// Positions of the required columns inside a raw table.
///
/// Holding only these eight indices is what keeps extra columns out of every
/// downstream step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub time_of_day: usize,
    pub service_type: usize,
    pub ad_channel: usize,
    pub customer_type: usize,
    pub ad_spend: usize,
    pub conversions: usize,
    pub daily_revenue: usize,
}

impl ColumnLayout {
    pub fn resolve(table: &RawTable) -> Result<Self, SchemaError> {
        let check = validate(&table.headers);
        if !check.is_valid() {
            return Err(SchemaError {
                missing: check.missing,
            });
        }
        let index = |name: &str| table.column_index(name).ok_or_else(|| SchemaError {
            missing: vec![name.to_string()],
        });
        Ok(Self {
            date: index(DATE)?,
            time_of_day: index(TIME_OF_DAY)?,
            service_type: index(SERVICE_TYPE)?,
            ad_channel: index(AD_CHANNEL)?,
            customer_type: index(CUSTOMER_TYPE)?,
            ad_spend: index(AD_SPEND)?,
            conversions: index(CONVERSIONS)?,
            daily_revenue: index(DAILY_REVENUE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn validate_reports_missing_in_canonical_order() {
        let check = validate(&headers(&[
            "Daily Revenue ($)",
            "Date",
            "Ad Channel",
            "Customer Type",
            "Service Type",
        ]));
        assert_eq!(
            check.missing,
            vec!["Time of Day", "Ad Spend ($)", "Conversions"]
        );
        assert!(check.extra.is_empty());
        assert!(!check.is_valid());
    }

    #[test]
    fn validate_reports_extra_columns_in_table_order() {
        let mut names = REQUIRED_COLUMNS.to_vec();
        names.insert(2, "Store");
        names.push("Notes");
        let check = validate(&headers(&names));
        assert!(check.is_valid());
        assert_eq!(check.extra, vec!["Store", "Notes"]);
    }

    #[test]
    fn validate_matches_names_exactly() {
        let mut names = REQUIRED_COLUMNS.to_vec();
        names[5] = "Ad Spend";
        let check = validate(&headers(&names));
        assert_eq!(check.missing, vec!["Ad Spend ($)"]);
        assert_eq!(check.extra, vec!["Ad Spend"]);
    }
}
