//! Raw table loading from uploaded bytes.
//!
//! Workbooks (xlsx, xlsm, xls, ods) are read through `calamine`; everything
//! else is treated as delimited text. The result is an untyped [`RawTable`]
//! whose first row supplied the column names. [`LoadCache`] memoizes this step
//! for the most recent upload so re-filtering it never re-parses it.

use std::{io::Cursor, sync::Arc};

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use encoding_rs::{Encoding, UTF_8};
use log::debug;
use sha2::{Digest, Sha256};

use crate::{data::Cell, error::LoadError, io_utils};

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const OLE_SIGNATURE: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// 1-based line (or sheet row) each entry of `rows` came from.
    pub source_lines: Vec<usize>,
}

impl RawTable {
    /// Spreadsheet row number of `row`, counting skipped blank lines.
    pub fn source_line(&self, row: usize) -> usize {
        self.source_lines.get(row).copied().unwrap_or(row + 2)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&Cell::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Delimited,
}

impl SourceFormat {
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_SIGNATURE) || bytes.starts_with(OLE_SIGNATURE) {
            SourceFormat::Workbook
        } else {
            SourceFormat::Delimited
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl SheetSelector {
    /// Numeric selectors address sheets by 0-based position, anything else by name.
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<usize>() {
            Ok(idx) => SheetSelector::Index(idx),
            Err(_) => SheetSelector::Name(value.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub sheet: Option<SheetSelector>,
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

pub fn load(bytes: &[u8], options: &LoadOptions) -> Result<RawTable, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::Empty);
    }
    let table = match SourceFormat::detect(bytes) {
        SourceFormat::Workbook => load_workbook(bytes, options.sheet.as_ref())?,
        SourceFormat::Delimited => load_delimited(bytes, options.delimiter, options.encoding)?,
    };
    if table.headers.is_empty() {
        return Err(LoadError::Empty);
    }
    debug!(
        "Parsed {} column(s) and {} row(s)",
        table.headers.len(),
        table.row_count()
    );
    Ok(table)
}

fn load_workbook(bytes: &[u8], sheet: Option<&SheetSelector>) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(LoadError::NoWorksheets);
    }
    let range = match sheet {
        None => workbook
            .worksheet_range_at(0)
            .ok_or(LoadError::NoWorksheets)??,
        Some(SheetSelector::Index(idx)) => workbook
            .worksheet_range_at(*idx)
            .ok_or_else(|| LoadError::MissingSheet(idx.to_string()))??,
        Some(SheetSelector::Name(name)) => {
            if !sheet_names.iter().any(|candidate| candidate == name) {
                return Err(LoadError::MissingSheet(name.clone()));
            }
            workbook.worksheet_range(name)?
        }
    };

    // Ranges begin at the first used row, which need not be sheet row 1.
    let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(LoadError::Empty);
    };
    let headers = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(idx, &cell.to_string()))
        .collect();
    let mut cells_by_row = Vec::new();
    let mut source_lines = Vec::new();
    for (offset, row) in rows.enumerate() {
        let cells = row.iter().map(cell_from_workbook).collect::<Vec<_>>();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        cells_by_row.push(cells);
        source_lines.push(header_line + offset + 1);
    }
    Ok(RawTable {
        headers,
        rows: cells_by_row,
        source_lines,
    })
}

fn cell_from_workbook(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(data.to_string())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

fn load_delimited(
    bytes: &[u8],
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<RawTable, LoadError> {
    let text = io_utils::decode_bytes(bytes, encoding)?;
    let mut reader = io_utils::open_csv_reader(text.as_bytes(), delimiter);
    let headers = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| header_name(idx, name))
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    let mut source_lines = Vec::new();
    let mut lines = LineCursor::new(text.as_bytes());
    for record in reader.records() {
        let record = record?;
        let line = match record.position() {
            Some(position) => lines.line_at(position.byte() as usize),
            None => rows.len() + 2,
        };
        let cells = record.iter().map(Cell::from_text).collect::<Vec<_>>();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        rows.push(cells);
        source_lines.push(line);
    }
    Ok(RawTable {
        headers,
        rows,
        source_lines,
    })
}

/// Maps record byte offsets to 1-based line numbers.
///
/// A record's reported offset sits before any empty lines the reader skipped
/// on the way to it, so those are stepped over before counting.
struct LineCursor<'a> {
    text: &'a [u8],
    byte: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self {
            text,
            byte: 0,
            line: 1,
        }
    }

    /// Offsets must be passed in increasing order.
    fn line_at(&mut self, offset: usize) -> usize {
        let offset = offset.clamp(self.byte, self.text.len());
        let start = offset
            + self.text[offset..]
                .iter()
                .take_while(|byte| matches!(**byte, b'\r' | b'\n'))
                .count();
        self.line += self.text[self.byte..start]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count();
        self.byte = start;
        self.line
    }
}

fn header_name(idx: usize, raw: &str) -> String {
    if raw.is_empty() {
        format!("Unnamed: {idx}")
    } else {
        raw.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    digest: [u8; 32],
    sheet: Option<SheetSelector>,
    delimiter: u8,
    encoding: &'static str,
}

impl CacheKey {
    fn new(bytes: &[u8], options: &LoadOptions) -> Self {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(bytes));
        Self {
            digest,
            sheet: options.sheet.clone(),
            delimiter: options.delimiter,
            encoding: options.encoding.name(),
        }
    }
}

/// Content-addressed memo of the latest parsed upload.
///
/// Loading different bytes (or the same bytes with other options) replaces
/// the held table, so memory stays bounded by one upload. Only the raw parse
/// is cached; validation, cleaning, filtering and aggregation always run
/// fresh on the returned table.
#[derive(Debug, Default)]
pub struct LoadCache {
    latest: Option<(CacheKey, Arc<RawTable>)>,
    hits: usize,
    misses: usize,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &mut self,
        bytes: &[u8],
        options: &LoadOptions,
    ) -> Result<Arc<RawTable>, LoadError> {
        let key = CacheKey::new(bytes, options);
        if let Some((_, table)) = self.latest.as_ref().filter(|(cached, _)| *cached == key) {
            self.hits += 1;
            debug!("Load cache hit ({} byte(s))", bytes.len());
            return Ok(Arc::clone(table));
        }
        self.misses += 1;
        debug!("Load cache miss ({} byte(s))", bytes.len());
        let table = Arc::new(load(bytes, options)?);
        self.latest = Some((key, Arc::clone(&table)));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        usize::from(self.latest.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}
