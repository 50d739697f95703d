//! Input acquisition and text decoding helpers.
//!
//! The pipeline core only ever sees bytes. This module is where the CLI turns a
//! path into those bytes and where delimited text gets decoded:
//!
//! - **stdin**: the `-` path convention reads the upload from standard input.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Delimiter resolution**: extension-based detection (`.tsv` → tab) with
//!   manual override support.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

use crate::error::LoadError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Reads the whole upload into memory; `-` reads from stdin.
pub fn read_input_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("Reading input file {path:?}"))?;
    Ok(bytes)
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

/// Decodes text input; a leading BOM selects its own encoding and is stripped.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String, LoadError> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(LoadError::Encoding {
            encoding: used.name(),
        })
    } else {
        Ok(text.into_owned())
    }
}
