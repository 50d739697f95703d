//! Entry points the presentation layer calls, in pipeline order:
//! [`load`] → [`validate_and_clean`] → [`filter`] → [`aggregate`] →
//! [`select_insights`].
//!
//! [`Session`] bundles these with a [`LoadCache`], so one upload can be
//! re-filtered and re-aggregated repeatedly while being parsed only once.

use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::{
    aggregate::{self, Aggregates, UpsellRow},
    clean,
    derive::{self, Dataset},
    error::{LoadError, PipelineError},
    filter::{self, FilterCriteria},
    insight::{self, UpsellInsight},
    loader::{self, LoadCache, LoadOptions, RawTable},
    schema::{self, ColumnLayout},
};

/// A validated, cleaned and enriched dataset plus the columns that were dropped.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub dataset: Dataset,
    /// Extra columns present in the upload; never read past validation.
    pub ignored_columns: Vec<String>,
}

pub fn load(bytes: &[u8], options: &LoadOptions) -> Result<RawTable, LoadError> {
    loader::load(bytes, options)
}

/// Schema gate, strict cleaning and derived metrics in one step.
pub fn validate_and_clean(table: &RawTable) -> Result<CleanOutcome, PipelineError> {
    let check = schema::validate(&table.headers);
    if !check.extra.is_empty() {
        warn!(
            "Ignoring {} extra column(s): {}",
            check.extra.len(),
            check.extra.join(", ")
        );
    }
    let layout = ColumnLayout::resolve(table)?;
    let sales = clean::clean(table, &layout)?;
    let dataset = derive::derive_metrics(sales);
    info!("Loaded {} row(s)", dataset.len());
    Ok(CleanOutcome {
        dataset,
        ignored_columns: check.extra,
    })
}

pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let filtered = filter::apply_filters(dataset, criteria);
    info!(
        "Showing {} of {} row(s) after filters",
        filtered.len(),
        dataset.len()
    );
    filtered
}

pub fn aggregate(dataset: &Dataset) -> Aggregates {
    aggregate::aggregate(dataset)
}

pub fn select_insights(upsell: &[UpsellRow]) -> UpsellInsight {
    insight::select_best_worst(upsell)
}

/// Everything the presentation layer renders for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub loaded_rows: usize,
    pub filtered_rows: usize,
    pub ignored_columns: Vec<String>,
    pub aggregates: Aggregates,
    pub insight: UpsellInsight,
}

/// Filters, aggregates and selects insights from an already cleaned upload.
///
/// With no criteria the whole dataset is summarized.
pub fn render(outcome: &CleanOutcome, criteria: Option<&FilterCriteria>) -> Dashboard {
    let filtered = match criteria {
        Some(criteria) => filter(&outcome.dataset, criteria),
        None => outcome.dataset.clone(),
    };
    let aggregates = aggregate(&filtered);
    let insight = select_insights(&aggregates.upsell);
    Dashboard {
        loaded_rows: outcome.dataset.len(),
        filtered_rows: filtered.len(),
        ignored_columns: outcome.ignored_columns.clone(),
        aggregates,
        insight,
    }
}

/// One user's working state: a load cache scoped to their uploads.
#[derive(Debug, Default)]
pub struct Session {
    cache: LoadCache,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &mut self,
        bytes: &[u8],
        options: &LoadOptions,
    ) -> Result<Arc<RawTable>, LoadError> {
        self.cache.load(bytes, options)
    }

    pub fn prepare(
        &mut self,
        bytes: &[u8],
        options: &LoadOptions,
    ) -> Result<CleanOutcome, PipelineError> {
        let table = self.load(bytes, options)?;
        validate_and_clean(&table)
    }

    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }
}
