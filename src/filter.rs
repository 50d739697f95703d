//! Predicate filtering of a cleaned [`Dataset`].
//!
//! A record survives when its date lies inside the inclusive [`DateRange`] and
//! each categorical value is in the matching allowed set. Criteria are
//! validated on construction: a date selection must have exactly two endpoints
//! and an empty allowed set is rejected rather than read as "everything".

use std::collections::BTreeSet;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    derive::{Dataset, Record},
    error::InputError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InputError> {
        if start > end {
            return Err(InputError::InvertedFilterRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range from raw selector state, which must hold exactly two dates.
    pub fn from_selection(dates: &[NaiveDate]) -> Result<Self, InputError> {
        match dates {
            [start, end] => Self::new(*start, *end),
            other => Err(InputError::MalformedFilterRange {
                endpoints: other.len(),
            }),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub time_of_day: BTreeSet<String>,
    pub service_type: BTreeSet<String>,
    pub customer_type: BTreeSet<String>,
    pub ad_channel: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new<I, S>(
        date_range: DateRange,
        time_of_day: I,
        service_type: I,
        customer_type: I,
        ad_channel: I,
    ) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            date_range,
            time_of_day: allowed_set("Time of Day", time_of_day)?,
            service_type: allowed_set("Service Type", service_type)?,
            customer_type: allowed_set("Customer Type", customer_type)?,
            ad_channel: allowed_set("Ad Channel", ad_channel)?,
        })
    }

    pub fn matches(&self, record: &Record) -> bool {
        let sale = &record.sale;
        self.date_range.contains(sale.date)
            && self.time_of_day.contains(&sale.time_of_day)
            && self.service_type.contains(&sale.service_type)
            && self.customer_type.contains(&sale.customer_type)
            && self.ad_channel.contains(&sale.ad_channel)
    }
}

fn allowed_set<I, S>(field: &'static str, values: I) -> Result<BTreeSet<String>, InputError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set = values.into_iter().map(Into::into).collect::<BTreeSet<_>>();
    if set.is_empty() {
        return Err(InputError::EmptySelection { field });
    }
    Ok(set)
}

/// Returns the records passing `criteria`, preserving their relative order.
pub fn apply_filters(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    Dataset::from_records(
        dataset
            .iter()
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect(),
    )
}

/// Default selector state for a dataset: its full date span and every
/// distinct non-empty value of each categorical column, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub time_of_day: Vec<String>,
    pub service_type: Vec<String>,
    pub customer_type: Vec<String>,
    pub ad_channel: Vec<String>,
}

impl FilterOptions {
    /// `None` for an empty dataset, which has no date span to offer.
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        let (min_date, max_date) = dataset
            .iter()
            .map(Record::date)
            .minmax()
            .into_option()?;
        Some(Self {
            min_date,
            max_date,
            time_of_day: distinct_values(dataset.iter().map(|r| r.sale.time_of_day.as_str())),
            service_type: distinct_values(dataset.iter().map(|r| r.sale.service_type.as_str())),
            customer_type: distinct_values(dataset.iter().map(|r| r.sale.customer_type.as_str())),
            ad_channel: distinct_values(dataset.iter().map(|r| r.sale.ad_channel.as_str())),
        })
    }

    pub fn date_range(&self) -> DateRange {
        DateRange {
            start: self.min_date,
            end: self.max_date,
        }
    }

    /// Criteria with every option selected.
    pub fn default_criteria(&self) -> Result<FilterCriteria, InputError> {
        FilterCriteria::new(
            self.date_range(),
            self.time_of_day.clone(),
            self.service_type.clone(),
            self.customer_type.clone(),
            self.ad_channel.clone(),
        )
    }
}

fn distinct_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|value| !value.is_empty())
        .sorted()
        .dedup()
        .map(str::to_string)
        .collect()
}
