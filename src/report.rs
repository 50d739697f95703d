//! Dashboard presentation: display rounding, one table per section, and the
//! JSON document.
//!
//! Values are only rounded here. Everything upstream keeps full precision,
//! and so does the JSON output.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use log::info;

use crate::{
    aggregate::{DailyRevenue, ProductMixRow, ScalarKpis, UpsellRow},
    cli::{OutputFormat, ReportArgs, Section},
    insight::UpsellInsight,
    pipeline::{self, Dashboard},
    table::{Align, Table},
};

const RECOMMENDATIONS: [&str; 4] = [
    "Replicate the best shift's upselling approach (scripts, offers, timing) across other shifts",
    "Set a minimum bundled share target (for example 35%) and track it daily",
    "Coach underperforming shifts on upgrading customers from Premium to Bundled",
    "Review days with a high Basic mix to reduce revenue volatility",
];

pub fn execute(args: &ReportArgs) -> Result<()> {
    let outcome = crate::prepare_input(&args.input)?;
    let criteria = crate::resolve_criteria(&outcome, &args.filters)?;
    let dashboard = pipeline::render(&outcome, criteria.as_ref());
    match args.format {
        OutputFormat::Json => {
            println!("{}", render_json(&dashboard)?);
        }
        OutputFormat::Table => {
            let sections = if args.sections.is_empty() {
                Section::ALL.to_vec()
            } else {
                args.sections.clone()
            };
            print!("{}", render_text(&dashboard, &sections));
        }
    }
    info!(
        "Reported on {} of {} row(s)",
        dashboard.filtered_rows, dashboard.loaded_rows
    );
    Ok(())
}

pub fn render_json(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).context("Serializing dashboard JSON")
}

pub fn render_text(dashboard: &Dashboard, sections: &[Section]) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Loaded {} row(s). Showing {} row(s) after filters.",
        format_count(dashboard.loaded_rows as i64),
        format_count(dashboard.filtered_rows as i64)
    );
    if !dashboard.ignored_columns.is_empty() {
        let _ = writeln!(
            output,
            "Ignored extra column(s): {}",
            dashboard.ignored_columns.join(", ")
        );
    }
    let aggregates = &dashboard.aggregates;
    for section in sections {
        let _ = writeln!(output);
        match section {
            Section::Kpis => {
                push_block(&mut output, "Key metrics", &kpi_table(&aggregates.kpis))
            }
            Section::Trend => push_block(
                &mut output,
                "Daily revenue trend",
                &trend_table(&aggregates.daily_trend),
            ),
            Section::Mix => push_block(
                &mut output,
                "Daily product mix (revenue by service type)",
                &mix_table(&aggregates.product_mix),
            ),
            Section::Upsell => push_block(
                &mut output,
                "Upselling performance by time of day (bundled share)",
                &upsell_table(&aggregates.upsell),
            ),
            Section::Insights => {
                let _ = writeln!(output, "Actionable insights");
                for line in insight_lines(&dashboard.insight) {
                    let _ = writeln!(output, "{line}");
                }
                let _ = writeln!(output, "\nRecommended actions");
                for line in RECOMMENDATIONS {
                    let _ = writeln!(output, "- {line}");
                }
            }
        }
    }
    output
}

fn push_block(output: &mut String, title: &str, table: &Table) {
    let _ = writeln!(output, "{title}");
    if table.is_empty() {
        let _ = writeln!(output, "(no rows)");
    } else {
        output.push_str(&table.render());
    }
}

pub fn kpi_table(kpis: &ScalarKpis) -> Table {
    let mut table = Table::new(["Metric", "Value"]).with_align(&[Align::Left, Align::Right]);
    table.push_row(vec![
        "Total Revenue".into(),
        format_currency_whole(kpis.total_revenue),
    ]);
    table.push_row(vec![
        "Conversions".into(),
        format_count(kpis.total_conversions),
    ]);
    table.push_row(vec![
        "Avg Rev / Conversion".into(),
        format_currency(kpis.avg_revenue_per_conversion),
    ]);
    table.push_row(vec![
        "Ad Spend".into(),
        format_currency_whole(kpis.total_ad_spend),
    ]);
    table.push_row(vec!["ROAS".into(), format_ratio(kpis.roas)]);
    table
}

pub fn trend_table(trend: &[DailyRevenue]) -> Table {
    let mut table =
        Table::new(["Date", "Daily Revenue ($)"]).with_align(&[Align::Left, Align::Right]);
    for day in trend {
        table.push_row(vec![day.date.to_string(), format_currency(day.revenue)]);
    }
    table
}

pub fn mix_table(mix: &[ProductMixRow]) -> Table {
    let mut table = Table::new(["Date", "Service Type", "Daily Revenue ($)"]).with_align(&[
        Align::Left,
        Align::Left,
        Align::Right,
    ]);
    for row in mix {
        table.push_row(vec![
            row.date.to_string(),
            row.service_type.clone(),
            format_currency(row.revenue),
        ]);
    }
    table
}

pub fn upsell_table(upsell: &[UpsellRow]) -> Table {
    let mut table = Table::new([
        "Time of Day",
        "Revenue",
        "Conversions",
        "Avg Revenue per Conversion",
        "Bundled Share",
    ])
    .with_align(&[
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
    ]);
    for row in upsell {
        table.push_row(vec![
            row.time_of_day.clone(),
            format_currency(row.revenue),
            format_count(row.conversions),
            format_currency(row.avg_revenue_per_conversion),
            format_percent(row.bundled_share),
        ]);
    }
    table
}

pub fn insight_lines(insight: &UpsellInsight) -> Vec<String> {
    match insight {
        UpsellInsight::Available { best, worst } => vec![
            format!(
                "Best upselling shift: {} ({} bundled share).",
                best.time_of_day,
                format_percent(best.bundled_share)
            ),
            format!(
                "Needs improvement: {} ({} bundled share).",
                worst.time_of_day,
                format_percent(worst.bundled_share)
            ),
        ],
        UpsellInsight::Unavailable => vec![
            "Not enough time-of-day categories in the filtered data to compare upselling performance."
                .to_string(),
        ],
    }
}

/// `$1,234`: currency rounded to whole units.
pub fn format_currency_whole(value: f64) -> String {
    currency(value, 0)
}

/// `$1,234.56`: currency rounded to cents.
pub fn format_currency(value: f64) -> String {
    currency(value, 2)
}

pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}

/// Formats a 0..=1 share as a percentage with one decimal, e.g. `12.5%`.
pub fn format_percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

pub fn format_count(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn currency(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match rendered.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rendered.as_str(), None),
    };
    let mut out = String::new();
    // "-0" after rounding is shown as zero.
    if value < 0.0 && rendered.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
