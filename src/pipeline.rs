//! End-to-end ingestion: bytes in, dataset descriptor, insights, and charts out.
//!
//! [`Pipeline::describe`] runs read → normalize → classify → summarize and
//! returns an immutable [`DatasetDescriptor`]. Insights and chart specs are
//! derived from a descriptor on demand; [`Pipeline::analyze`] bundles all three.
//! A pipeline holds only its configuration, so one instance can be reused for
//! any number of uploads without state carrying over.

use std::{fmt, path::Path, str::FromStr};

use log::{debug, info};
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    charts::{ChartSpec, generate_charts},
    classify::{ColumnKind, classify_columns},
    config::PipelineConfig,
    error::PipelineError,
    insights::{Insight, generate_insights},
    normalize::{NormalizedDataset, NormalizedRow, normalize},
    reader::{ReadOptions, read_table},
    summary::{DatasetSummary, summarize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    /// Detects the format from a file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self, PipelineError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| PipelineError::Format(name.to_string()))?;
        match extension.as_str() {
            "csv" | "tsv" => Ok(SourceFormat::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Ok(SourceFormat::Spreadsheet),
            _ => Err(PipelineError::Format(name.to_string())),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = PipelineError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "spreadsheet" => Ok(SourceFormat::Spreadsheet),
            other => Err(PipelineError::Format(other.to_string())),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "csv"),
            SourceFormat::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

/// Normalized dataset plus its column summary, as produced for one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetDescriptor {
    name: String,
    dataset: NormalizedDataset,
    kinds: Vec<ColumnKind>,
    summary: DatasetSummary,
    preview_rows: usize,
}

impl DatasetDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.dataset.column_count()
    }

    pub fn columns(&self) -> &[String] {
        self.dataset.columns()
    }

    pub fn dataset(&self) -> &NormalizedDataset {
        &self.dataset
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        self.dataset.rows()
    }

    pub fn preview(&self) -> &[NormalizedRow] {
        let rows = self.dataset.rows();
        &rows[..rows.len().min(self.preview_rows)]
    }

    pub fn column_kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn summary(&self) -> &DatasetSummary {
        &self.summary
    }

    pub fn insights(&self) -> Vec<Insight> {
        generate_insights(&self.dataset, &self.kinds)
    }

    pub fn charts(&self) -> Vec<ChartSpec> {
        generate_charts(&self.dataset, &self.kinds)
    }
}

impl Serialize for DatasetDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DatasetDescriptor", 7)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("rowCount", &self.row_count())?;
        state.serialize_field("columnCount", &self.column_count())?;
        state.serialize_field("columns", self.columns())?;
        state.serialize_field("preview", &self.dataset.rows_view(self.preview()))?;
        state.serialize_field("data", &self.dataset.rows_view(self.rows()))?;
        state.serialize_field("summary", &self.summary)?;
        state.end()
    }
}

/// Everything one upload produces.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub dataset: DatasetDescriptor,
    pub insights: Vec<Insight>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Detects the format from `name` and describes `bytes`.
    pub fn describe(&self, name: &str, bytes: &[u8]) -> Result<DatasetDescriptor, PipelineError> {
        let format = SourceFormat::from_file_name(name)?;
        self.describe_as(name, bytes, format)
    }

    pub fn describe_as(
        &self,
        name: &str,
        bytes: &[u8],
        format: SourceFormat,
    ) -> Result<DatasetDescriptor, PipelineError> {
        let options = ReadOptions {
            delimiter: self.config.delimiter_for(name),
            encoding: self.config.encoding,
        };
        let raw_rows = read_table(bytes, format, &options)?;
        let dataset = normalize(&raw_rows, self.config.schema_policy.policy());
        let kinds = classify_columns(&dataset);
        debug!(
            "Classified {} numeric and {} categorical column(s)",
            kinds.iter().filter(|k| k.is_numeric()).count(),
            kinds.iter().filter(|k| !k.is_numeric()).count()
        );
        let summary = summarize(&dataset, &kinds);
        info!(
            "Described '{}' ({format}): {} row(s), {} column(s)",
            name,
            dataset.row_count(),
            dataset.column_count()
        );
        Ok(DatasetDescriptor {
            name: name.to_string(),
            dataset,
            kinds,
            summary,
            preview_rows: self.config.preview_rows,
        })
    }

    pub fn analyze(&self, name: &str, bytes: &[u8]) -> Result<Analysis, PipelineError> {
        let format = SourceFormat::from_file_name(name)?;
        self.analyze_as(name, bytes, format)
    }

    pub fn analyze_as(
        &self,
        name: &str,
        bytes: &[u8],
        format: SourceFormat,
    ) -> Result<Analysis, PipelineError> {
        let dataset = self.describe_as(name, bytes, format)?;
        let insights = dataset.insights();
        let charts = dataset.charts();
        Ok(Analysis {
            dataset,
            insights,
            charts,
        })
    }
}
