mod common;

use sales_pulse::{
    aggregate::UpsellRow,
    filter::FilterCriteria,
    insight::{UpsellInsight, select_best_worst},
    pipeline,
};

use common::sample_outcome;

fn row(time_of_day: &str, bundled_share: f64) -> UpsellRow {
    UpsellRow {
        time_of_day: time_of_day.to_string(),
        revenue: 0.0,
        conversions: 0,
        avg_revenue_per_conversion: 0.0,
        bundled_share,
    }
}

fn best_and_worst(insight: &UpsellInsight) -> (&str, &str) {
    match insight {
        UpsellInsight::Available { best, worst } => {
            (best.time_of_day.as_str(), worst.time_of_day.as_str())
        }
        UpsellInsight::Unavailable => panic!("expected an insight"),
    }
}

#[test]
fn evening_beats_morning() {
    let insight = select_best_worst(&[row("Morning", 0.2), row("Evening", 0.6)]);
    assert_eq!(best_and_worst(&insight), ("Evening", "Morning"));
}

#[test]
fn sample_ties_resolve_in_time_of_day_order() {
    let outcome = sample_outcome();
    let dashboard = pipeline::render(&outcome, None);
    assert_eq!(best_and_worst(&dashboard.insight), ("Afternoon", "Morning"));
}

#[test]
fn single_segment_is_unavailable_not_an_error() {
    let outcome = sample_outcome();
    let options = sales_pulse::filter::FilterOptions::from_dataset(&outcome.dataset).unwrap();
    let criteria = FilterCriteria::new(
        options.date_range(),
        vec!["Evening".to_string()],
        options.service_type.clone(),
        options.customer_type.clone(),
        options.ad_channel.clone(),
    )
    .unwrap();
    let dashboard = pipeline::render(&outcome, Some(&criteria));
    assert_eq!(dashboard.filtered_rows, 2);
    assert_eq!(dashboard.aggregates.upsell.len(), 1);
    assert_eq!(dashboard.insight, UpsellInsight::Unavailable);
}

#[test]
fn unknown_segments_rank_after_night() {
    let insight = select_best_worst(&[row("Brunch", 0.9), row("Night", 0.9), row("Late", 0.1)]);
    assert_eq!(best_and_worst(&insight), ("Night", "Late"));
}
