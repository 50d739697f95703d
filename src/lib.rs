pub mod aggregate;
pub mod clean;
pub mod cli;
pub mod data;
pub mod derive;
pub mod error;
pub mod filter;
pub mod insight;
pub mod io_utils;
pub mod loader;
pub mod pipeline;
pub mod preview;
pub mod report;
pub mod schema;
pub mod segment;
pub mod selection;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::{
    cli::{Cli, Commands, FilterArgs, InputArgs, OutputFormat},
    filter::{FilterCriteria, FilterOptions},
    loader::RawTable,
    pipeline::CleanOutcome,
    table::{Align, Table},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sales_pulse", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => report::execute(&args),
        Commands::Validate(args) => handle_validate(&args),
        Commands::Options(args) => handle_options(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}

fn handle_validate(args: &cli::ValidateArgs) -> Result<()> {
    let table = load_table(&args.input)?;
    let check = schema::validate(&table.headers);
    let mut summary = Table::new(["Check", "Result"]);
    summary.push_row(vec![
        "Required columns present".into(),
        format!(
            "{} of {}",
            schema::REQUIRED_COLUMNS.len() - check.missing.len(),
            schema::REQUIRED_COLUMNS.len()
        ),
    ]);
    summary.push_row(vec!["Missing columns".into(), list_or_none(&check.missing)]);
    summary.push_row(vec![
        "Ignored extra columns".into(),
        list_or_none(&check.extra),
    ]);
    table::print_table(&summary);

    let outcome = pipeline::validate_and_clean(&table)
        .with_context(|| format!("Validating {:?}", args.input.input))?;
    println!(
        "OK: {} row(s) passed validation.",
        report::format_count(outcome.dataset.len() as i64)
    );
    Ok(())
}

fn handle_options(args: &cli::OptionsArgs) -> Result<()> {
    let outcome = prepare_input(&args.input)?;
    let Some(options) = FilterOptions::from_dataset(&outcome.dataset) else {
        println!("No rows loaded; nothing to filter.");
        return Ok(());
    };
    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&options)
                .context("Serializing filter options JSON")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let mut listing = Table::new(["Filter", "Values"]).with_align(&[Align::Left]);
            listing.push_row(vec![
                "Date range".into(),
                format!("{} to {}", options.min_date, options.max_date),
            ]);
            listing.push_row(vec![
                schema::TIME_OF_DAY.into(),
                options.time_of_day.join(", "),
            ]);
            listing.push_row(vec![
                schema::SERVICE_TYPE.into(),
                options.service_type.join(", "),
            ]);
            listing.push_row(vec![
                schema::CUSTOMER_TYPE.into(),
                options.customer_type.join(", "),
            ]);
            listing.push_row(vec![
                schema::AD_CHANNEL.into(),
                options.ad_channel.join(", "),
            ]);
            table::print_table(&listing);
        }
    }
    Ok(())
}

fn list_or_none(columns: &[String]) -> String {
    if columns.is_empty() {
        "(none)".to_string()
    } else {
        columns.join(", ")
    }
}

fn load_table(args: &InputArgs) -> Result<RawTable> {
    info!("Loading '{}'", args.input.display());
    let options = args.load_options()?;
    let bytes = io_utils::read_input_bytes(&args.input)?;
    let table = pipeline::load(&bytes, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    Ok(table)
}

/// Loads, validates and cleans the input named on the command line.
pub(crate) fn prepare_input(args: &InputArgs) -> Result<CleanOutcome> {
    let table = load_table(args)?;
    pipeline::validate_and_clean(&table).with_context(|| format!("Validating {:?}", args.input))
}

/// `None` when the dataset is empty: there is nothing to select from, so
/// filtering is skipped.
pub(crate) fn resolve_criteria(
    outcome: &CleanOutcome,
    filters: &FilterArgs,
) -> Result<Option<FilterCriteria>> {
    let selection = filters.selection()?;
    match FilterOptions::from_dataset(&outcome.dataset) {
        Some(options) => {
            let criteria = selection
                .resolve(&options)
                .context("Resolving filter selection")?;
            Ok(Some(criteria))
        }
        None => {
            if !selection.is_empty() {
                warn!("Upload has no rows; ignoring filter selection");
            }
            debug!("Skipping filters for empty dataset");
            Ok(None)
        }
    }
}
