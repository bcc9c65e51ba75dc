use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{normalize::SchemaPolicyKind, pipeline::SourceFormat};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Summarize CSV and spreadsheet exports into statistics, insights, and chart specs",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Describe a dataset and print per-column summary statistics
    Summarize(SummarizeArgs),
    /// Print headline insights (averages, totals, record count)
    Insights(InsightsArgs),
    /// Emit chart specifications as JSON
    Charts(ChartsArgs),
    /// Show the first normalized rows of a dataset
    Preview(PreviewArgs),
    /// Build the question-answering context, or the full prompt for a question
    Context(ContextArgs),
    /// Write the full JSON report: dataset descriptor, insights, and charts
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Input file (.csv, .tsv, .xlsx, .xls, .xlsm, .xlsb, .ods); `-` reads stdin
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Treat the input as this format instead of detecting it from the extension
    #[arg(long = "source-format", value_enum)]
    pub source_format: Option<SourceFormat>,
    /// YAML settings file with pipeline defaults
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// How to pick columns when rows disagree on headers
    #[arg(long = "schema-policy", value_enum)]
    pub schema_policy: Option<SchemaPolicyKind>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output style
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct InsightsArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output style
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ChartsArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Number of rows to display (defaults to the configured preview size)
    #[arg(long)]
    pub rows: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ContextArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Question to embed; prints the assembled prompt instead of the JSON context
    #[arg(short = 'q', long = "question")]
    pub question: Option<String>,
    /// Emit the question as chat-completion messages (JSON) instead of plain prompt text
    #[arg(long, requires = "question")]
    pub chat: bool,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
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
