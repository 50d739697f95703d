//! Scalar KPIs and grouped summaries over a (filtered) [`Dataset`].
//!
//! Four independent views are produced:
//!
//! - [`ScalarKpis`]: totals, average revenue per converting row, and ROAS
//! - daily revenue trend, one row per date, ascending
//! - daily product mix, one row per date and service type, ascending
//! - time-of-day upsell summary, in canonical segment order
//!
//! Two averages of revenue per conversion exist on purpose. The KPI average
//! only counts rows with conversions, the per-segment average counts every row.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    derive::{Dataset, Record},
    segment,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScalarKpis {
    pub total_revenue: f64,
    pub total_conversions: i64,
    pub avg_revenue_per_conversion: f64,
    pub total_ad_spend: f64,
    pub roas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMixRow {
    pub date: NaiveDate,
    pub service_type: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsellRow {
    pub time_of_day: String,
    pub revenue: f64,
    pub conversions: i64,
    pub avg_revenue_per_conversion: f64,
    /// Fraction of rows (not revenue) whose service type is bundled.
    pub bundled_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub kpis: ScalarKpis,
    pub daily_trend: Vec<DailyRevenue>,
    pub product_mix: Vec<ProductMixRow>,
    pub upsell: Vec<UpsellRow>,
}

pub fn aggregate(dataset: &Dataset) -> Aggregates {
    Aggregates {
        kpis: scalar_kpis(dataset),
        daily_trend: daily_trend(dataset),
        product_mix: product_mix(dataset),
        upsell: upsell_summary(dataset),
    }
}

pub fn scalar_kpis(dataset: &Dataset) -> ScalarKpis {
    let mut kpis = ScalarKpis::default();
    let mut converting = MeanAccumulator::default();
    for record in dataset {
        let sale = &record.sale;
        kpis.total_revenue += sale.daily_revenue;
        kpis.total_conversions = kpis.total_conversions.saturating_add(sale.conversions);
        kpis.total_ad_spend += sale.ad_spend;
        if sale.conversions > 0 {
            converting.add(record.revenue_per_conversion);
        }
    }
    kpis.avg_revenue_per_conversion = converting.mean().unwrap_or(0.0);
    kpis.roas = if kpis.total_ad_spend > 0.0 {
        kpis.total_revenue / kpis.total_ad_spend
    } else {
        0.0
    };
    kpis
}

pub fn daily_trend(dataset: &Dataset) -> Vec<DailyRevenue> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in dataset {
        *by_date.entry(record.date()).or_insert(0.0) += record.sale.daily_revenue;
    }
    by_date
        .into_iter()
        .map(|(date, revenue)| DailyRevenue { date, revenue })
        .collect()
}

pub fn product_mix(dataset: &Dataset) -> Vec<ProductMixRow> {
    let mut by_key: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
    for record in dataset {
        *by_key
            .entry((record.date(), record.sale.service_type.as_str()))
            .or_insert(0.0) += record.sale.daily_revenue;
    }
    by_key
        .into_iter()
        .map(|((date, service_type), revenue)| ProductMixRow {
            date,
            service_type: service_type.to_string(),
            revenue,
        })
        .collect()
}

pub fn upsell_summary(dataset: &Dataset) -> Vec<UpsellRow> {
    let mut groups: HashMap<&str, SegmentAccumulator> = HashMap::new();
    for record in dataset {
        groups
            .entry(record.sale.time_of_day.as_str())
            .or_default()
            .ingest(record);
    }
    let mut rows = groups
        .into_iter()
        .map(|(time_of_day, stats)| stats.into_row(time_of_day))
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| segment::compare_segments(&a.time_of_day, &b.time_of_day));
    rows
}

#[derive(Debug, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.sum / self.count as f64)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
struct SegmentAccumulator {
    revenue: f64,
    conversions: i64,
    revenue_per_conversion: MeanAccumulator,
    bundled: MeanAccumulator,
}

impl SegmentAccumulator {
    fn ingest(&mut self, record: &Record) {
        self.revenue += record.sale.daily_revenue;
        self.conversions = self.conversions.saturating_add(record.sale.conversions);
        self.revenue_per_conversion.add(record.revenue_per_conversion);
        self.bundled.add(if record.is_bundled { 1.0 } else { 0.0 });
    }

    fn into_row(self, time_of_day: &str) -> UpsellRow {
        UpsellRow {
            time_of_day: time_of_day.to_string(),
            revenue: self.revenue,
            conversions: self.conversions,
            avg_revenue_per_conversion: self.revenue_per_conversion.mean().unwrap_or(0.0),
            bundled_share: self.bundled.mean().unwrap_or(0.0),
        }
    }
}
