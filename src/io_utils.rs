//! I/O utilities for reading uploads, decoding text, and writing reports.
//!
//! The pipeline itself never touches the filesystem. Everything that does
//! (reading the input blob, resolving encodings and delimiters, emitting JSON)
//! lives here so the command handlers stay thin:
//!
//! - **Input**: whole-file reads, with the `-` path convention routing through stdin.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8 and
//!   dropping a leading byte-order mark.
//! - **Delimiter resolution**: `.tsv` → tab, everything else → comma, with
//!   manual override support.
//! - **Output**: buffered file or stdout writers for JSON reports.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::{error::PipelineError, pipeline::SourceFormat};

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

pub fn resolve_input_delimiter(name: &str, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match Path::new(name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if is_dash(path) {
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .context("Reading input from stdin")?;
    } else {
        File::open(path)
            .with_context(|| format!("Opening input file {path:?}"))?
            .read_to_end(&mut buffer)
            .with_context(|| format!("Reading input file {path:?}"))?;
    }
    Ok(buffer)
}

/// Decodes a CSV payload, sniffing a byte-order mark before falling back to `encoding`.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Result<String, PipelineError> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(PipelineError::parse(
            SourceFormat::Csv,
            format!("input is not valid {}", used.name()),
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn open_output_writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };
    Ok(writer)
}

pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let mut writer = open_output_writer(path)?;
    serde_json::to_writer_pretty(&mut writer, value).context("Serializing JSON output")?;
    writeln!(writer)?;
    writer.flush().context("Flushing output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn resolve_input_delimiter_prefers_override_then_extension() {
        assert_eq!(resolve_input_delimiter("sales.tsv", None), b'\t');
        assert_eq!(resolve_input_delimiter("sales.TSV", None), b'\t');
        assert_eq!(resolve_input_delimiter("sales.csv", None), b',');
        assert_eq!(resolve_input_delimiter("sales.tsv", Some(b';')), b';');
    }

    #[test]
    fn decode_text_strips_utf8_bom() {
        let decoded = decode_text(b"\xEF\xBB\xBFname\nAda\n", UTF_8).unwrap();
        assert_eq!(decoded, "name\nAda\n");
    }

    #[test]
    fn decode_text_rejects_invalid_utf8() {
        let err = decode_text(b"name\n\xFF\xFE\xFD\n", UTF_8).unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
    }

    #[test]
    fn decode_text_honours_legacy_encodings() {
        let decoded = decode_text(b"caf\xE9", WINDOWS_1252).unwrap();
        assert_eq!(decoded, "café");
    }

    #[test]
    fn resolve_encoding_rejects_unknown_labels() {
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(resolve_encoding(Some(" latin1 ")).unwrap(), WINDOWS_1252);
    }
}
