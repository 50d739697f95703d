//! User selector state, from command-line flags and an optional YAML preset.
//!
//! Every field is optional. An unset field falls back to the dataset-derived
//! default in [`FilterOptions`]; a field set to an empty list is kept as-is so
//! that resolving it fails instead of silently selecting everything.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::InputError,
    filter::{DateRange, FilterCriteria, FilterOptions},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<Vec<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_channel: Option<Vec<String>>,
}

impl Selection {
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening filter preset {path:?}"))?;
        Self::from_yaml_str(&raw).with_context(|| format!("Parsing filter preset {path:?}"))
    }

    /// Layers `overrides` on top of `self`; any field set in `overrides` wins.
    pub fn overlay(self, overrides: Selection) -> Selection {
        Selection {
            date_range: overrides.date_range.or(self.date_range),
            time_of_day: overrides.time_of_day.or(self.time_of_day),
            service_type: overrides.service_type.or(self.service_type),
            customer_type: overrides.customer_type.or(self.customer_type),
            ad_channel: overrides.ad_channel.or(self.ad_channel),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Selection::default()
    }

    /// Resolves against the defaults offered for a dataset.
    pub fn resolve(&self, options: &FilterOptions) -> Result<FilterCriteria, InputError> {
        let date_range = match &self.date_range {
            Some(dates) => DateRange::from_selection(dates)?,
            None => options.date_range(),
        };
        let criteria = FilterCriteria::new(
            date_range,
            pick(&self.time_of_day, &options.time_of_day),
            pick(&self.service_type, &options.service_type),
            pick(&self.customer_type, &options.customer_type),
            pick(&self.ad_channel, &options.ad_channel),
        )?;
        debug!("Resolved filter criteria: {criteria:?}");
        Ok(criteria)
    }
}

fn pick<'a>(chosen: &'a Option<Vec<String>>, default: &'a [String]) -> &'a [String] {
    chosen.as_deref().unwrap_or(default)
}
