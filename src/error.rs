//! Error taxonomy for the ingestion pipeline.
//!
//! Only the table reader can fail. Every later stage (normalization,
//! classification, summarization, insight and chart derivation) is total over
//! its input and falls back to documented defaults instead of erroring.

use thiserror::Error;

use crate::pipeline::SourceFormat;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The file extension or declared format tag is not one the reader understands.
    #[error("Unsupported file format '{0}' (expected .csv, .tsv, .xlsx, .xls, .xlsm, .xlsb or .ods)")]
    Format(String),
    /// The bytes could not be decoded as the declared format.
    #[error("Failed to parse {format} input: {message}")]
    Parse {
        format: SourceFormat,
        message: String,
    },
}

impl PipelineError {
    pub(crate) fn parse(format: SourceFormat, message: impl Into<String>) -> Self {
        PipelineError::Parse {
            format,
            message: message.into(),
        }
    }
}
