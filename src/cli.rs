use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    io_utils,
    loader::{LoadOptions, SheetSelector},
    selection::Selection,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Validate sales spreadsheets and summarize KPIs, product mix, and upselling",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print KPIs, daily trend, product mix, upselling summary, and insights
    Report(ReportArgs),
    /// Check an upload against the required columns and cleaning rules
    Validate(ValidateArgs),
    /// List the date span and distinct values available for filtering
    Options(OptionsArgs),
    /// Preview the cleaned, filtered rows with derived columns
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Sales workbook (.xlsx, .xls, .ods) or CSV/TSV file; use '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Worksheet name or 0-based index (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

impl InputArgs {
    pub fn load_options(&self) -> Result<LoadOptions> {
        Ok(LoadOptions {
            sheet: self.sheet.as_deref().map(SheetSelector::parse),
            delimiter: io_utils::resolve_input_delimiter(&self.input, self.delimiter),
            encoding: io_utils::resolve_encoding(self.input_encoding.as_deref())?,
        })
    }
}

#[derive(Debug, Args, Default)]
pub struct FilterArgs {
    /// YAML filter preset; flags given on the command line take precedence
    #[arg(long = "filters")]
    pub preset: Option<PathBuf>,
    /// Inclusive date range as START,END (YYYY-MM-DD)
    #[arg(long = "date-range", value_delimiter = ',', num_args = 1..)]
    pub date_range: Option<Vec<NaiveDate>>,
    /// Allowed Time of Day values (repeatable or comma-separated)
    #[arg(long = "time-of-day", value_delimiter = ',')]
    pub time_of_day: Option<Vec<String>>,
    /// Allowed Service Type values (repeatable or comma-separated)
    #[arg(long = "service-type", value_delimiter = ',')]
    pub service_type: Option<Vec<String>>,
    /// Allowed Customer Type values (repeatable or comma-separated)
    #[arg(long = "customer-type", value_delimiter = ',')]
    pub customer_type: Option<Vec<String>>,
    /// Allowed Ad Channel values (repeatable or comma-separated)
    #[arg(long = "ad-channel", value_delimiter = ',')]
    pub ad_channel: Option<Vec<String>>,
}

impl FilterArgs {
    /// Preset (if any) with the command-line flags layered on top.
    pub fn selection(&self) -> Result<Selection> {
        let preset = match &self.preset {
            Some(path) => Selection::load(path)?,
            None => Selection::default(),
        };
        let flags = Selection {
            date_range: self.date_range.clone(),
            time_of_day: self.time_of_day.clone(),
            service_type: self.service_type.clone(),
            customer_type: self.customer_type.clone(),
            ad_channel: self.ad_channel.clone(),
        };
        Ok(preset.overlay(flags))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
#[value(rename_all = "kebab-case")]
pub enum Section {
    Kpis,
    Trend,
    Mix,
    Upsell,
    Insights,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Kpis,
        Section::Trend,
        Section::Mix,
        Section::Upsell,
        Section::Insights,
    ];
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// Sections to print (defaults to all); ignored for JSON output
    #[arg(long = "section", value_enum, value_delimiter = ',')]
    pub sections: Vec<Section>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
