//! Table reader: turns an uploaded byte blob into ordered [`RawRow`]s.
//!
//! CSV input is decoded with the configured encoding and parsed with the
//! first record as headers; quoted fields may contain delimiters, quotes, and
//! newlines. Records shorter than the header simply omit the trailing
//! headers, and surplus fields beyond the header are ignored.
//!
//! Workbooks are opened with `calamine`, which sniffs xlsx/xlsm/xlsb/xls/ods
//! from the bytes. Only the first sheet is read. Its first row supplies the
//! headers, empty cells are left out of the row, and rows with no populated
//! cell are skipped.
//!
//! In both formats blank headers are labelled `__EMPTY` and repeated headers
//! get a numeric suffix (`name`, `name_1`, ...), so every header in a row is
//! unique before normalization.

use std::{collections::HashSet, io::Cursor};

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use encoding_rs::Encoding;
use log::debug;

use crate::{
    data::{RawRow, Value},
    error::PipelineError,
    io_utils,
    pipeline::SourceFormat,
};

const BLANK_HEADER: &str = "__EMPTY";

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: encoding_rs::UTF_8,
        }
    }
}

pub fn read_table(
    bytes: &[u8],
    format: SourceFormat,
    options: &ReadOptions,
) -> Result<Vec<RawRow>, PipelineError> {
    let rows = match format {
        SourceFormat::Csv => read_csv(bytes, options)?,
        SourceFormat::Spreadsheet => read_spreadsheet(bytes)?,
    };
    debug!("Read {} {format} record(s)", rows.len());
    Ok(rows)
}

fn read_csv(bytes: &[u8], options: &ReadOptions) -> Result<Vec<RawRow>, PipelineError> {
    let text = io_utils::decode_text(bytes, options.encoding)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| PipelineError::parse(SourceFormat::Csv, format!("header row: {err}")))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let headers = label_headers(headers);

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            PipelineError::parse(SourceFormat::Csv, format!("row {}: {err}", row_idx + 2))
        })?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.clone(), Some(Value::Text(field.to_string()))))
            .collect::<RawRow>();
        rows.push(row);
    }
    Ok(rows)
}

fn read_spreadsheet(bytes: &[u8]) -> Result<Vec<RawRow>, PipelineError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| PipelineError::parse(SourceFormat::Spreadsheet, err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::parse(SourceFormat::Spreadsheet, "workbook has no sheets"))?
        .map_err(|err| PipelineError::parse(SourceFormat::Spreadsheet, err.to_string()))?;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers = label_headers(header_cells.iter().map(header_text).collect());

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let row = headers
            .iter()
            .zip(cells)
            .filter_map(|(header, cell)| cell_value(cell).map(|value| (header.clone(), Some(value))))
            .collect::<RawRow>();
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(Value::Text(s.clone())),
        Data::Float(f) => Some(Value::Number(*f)),
        Data::Int(i) => Some(Value::Number(*i as f64)),
        Data::Bool(b) => Some(Value::Boolean(*b)),
        // Date cells render as their serial number; ISO strings and errors stay text.
        other => Some(Value::Text(other.to_string())),
    }
}

fn label_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .map(|header| {
            let base = if header.trim().is_empty() {
                BLANK_HEADER.to_string()
            } else {
                header
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}
