pub mod charts;
pub mod classify;
pub mod cli;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod frequency;
pub mod insights;
pub mod io_utils;
pub mod normalize;
pub mod pipeline;
pub mod preview;
pub mod reader;
pub mod stats;
pub mod summary;
pub mod table;

use std::{env, io::Write as _, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, InputArgs, OutputFormat},
    config::PipelineConfig,
    context::QuestionContext,
    pipeline::{DatasetDescriptor, Pipeline, SourceFormat},
};

pub use crate::error::PipelineError;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("dataset_insights", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Summarize(args) => handle_summarize(&args),
        Commands::Insights(args) => handle_insights(&args),
        Commands::Charts(args) => handle_charts(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Context(args) => handle_context(&args),
        Commands::Analyze(args) => handle_analyze(&args),
    }
}

/// Loads settings, reads the input, and runs the pipeline up to the descriptor.
pub(crate) fn describe_input(source: &InputArgs) -> Result<DatasetDescriptor> {
    let (pipeline, name, format, bytes) = prepare(source)?;
    pipeline
        .describe_as(&name, &bytes, format)
        .with_context(|| format!("Describing {:?}", source.input))
}

fn prepare(source: &InputArgs) -> Result<(Pipeline, String, SourceFormat, Vec<u8>)> {
    let config = match &source.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    }
    .with_overrides(
        source.schema_policy,
        source.delimiter,
        source.input_encoding.as_deref(),
    )?;
    debug!("Pipeline configuration: {config:?}");

    let name = display_name(&source.input);
    let format = match source.source_format {
        Some(format) => format,
        None => SourceFormat::from_file_name(&name)
            .with_context(|| format!("Detecting format of {:?}", source.input))?,
    };
    info!("Reading '{}' as {format}", source.input.display());
    let bytes = io_utils::read_input(&source.input)?;
    Ok((Pipeline::new(config), name, format, bytes))
}

fn display_name(path: &Path) -> String {
    if io_utils::is_dash(path) {
        return "stdin".to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn handle_summarize(args: &cli::SummarizeArgs) -> Result<()> {
    let descriptor = describe_input(&args.source)?;
    match args.format {
        OutputFormat::Json => io_utils::write_json(None, descriptor.summary())?,
        OutputFormat::Table => {
            println!(
                "{}: {} row(s), {} column(s)",
                descriptor.name(),
                descriptor.row_count(),
                descriptor.column_count()
            );
            table::print_table(
                &table::headers(&summary::SUMMARY_TABLE_HEADERS),
                &descriptor.summary().render_rows(),
            );
        }
    }
    info!(
        "Summarized {} column(s) from {:?}",
        descriptor.summary().len(),
        args.source.input
    );
    Ok(())
}

fn handle_insights(args: &cli::InsightsArgs) -> Result<()> {
    let descriptor = describe_input(&args.source)?;
    let insights = descriptor.insights();
    match args.format {
        OutputFormat::Json => io_utils::write_json(None, &insights)?,
        OutputFormat::Table => {
            let rows = insights
                .iter()
                .map(|insight| vec![insight.title.clone(), insight.value.as_display()])
                .collect::<Vec<_>>();
            table::print_table(&table::headers(&["insight", "value"]), &rows);
        }
    }
    info!("Generated {} insight(s)", insights.len());
    Ok(())
}

fn handle_charts(args: &cli::ChartsArgs) -> Result<()> {
    let descriptor = describe_input(&args.source)?;
    let charts = descriptor.charts();
    io_utils::write_json(args.output.as_deref(), &charts)?;
    info!("Generated {} chart specification(s)", charts.len());
    Ok(())
}

fn handle_context(args: &cli::ContextArgs) -> Result<()> {
    let descriptor = describe_input(&args.source)?;
    let context = QuestionContext::new(&descriptor);
    match &args.question {
        Some(question) if args.chat => {
            let messages = context
                .messages(question)
                .context("Building chat messages")?;
            io_utils::write_json(args.output.as_deref(), &messages)?;
        }
        Some(question) => {
            let prompt = context
                .build_prompt(question)
                .context("Building question prompt")?;
            let mut writer = io_utils::open_output_writer(args.output.as_deref())?;
            writeln!(writer, "{prompt}")?;
            writer.flush()?;
        }
        None => io_utils::write_json(args.output.as_deref(), &context)?,
    }
    info!(
        "Built question context for '{}' ({} sample row(s))",
        descriptor.name(),
        descriptor.preview().len()
    );
    Ok(())
}

fn handle_analyze(args: &cli::AnalyzeArgs) -> Result<()> {
    let (pipeline, name, format, bytes) = prepare(&args.source)?;
    let analysis = pipeline
        .analyze_as(&name, &bytes, format)
        .with_context(|| format!("Analyzing {:?}", args.source.input))?;
    io_utils::write_json(args.output.as_deref(), &analysis)?;
    info!(
        "Analysis of '{}' produced {} insight(s) and {} chart(s)",
        name,
        analysis.insights.len(),
        analysis.charts.len()
    );
    Ok(())
}
