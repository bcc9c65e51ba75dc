//! Pipeline configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional YAML settings file, and command-line flags. A settings file
//! looks like:
//!
//! ```yaml
//! schema_policy: union
//! preview_rows: 10
//! delimiter: semicolon
//! input_encoding: windows-1252
//! ```

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use serde::Deserialize;

use crate::{cli::parse_delimiter, io_utils, normalize::SchemaPolicyKind};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub schema_policy: SchemaPolicyKind,
    pub preview_rows: usize,
    /// Explicit CSV delimiter; `None` picks one from the file extension.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema_policy: SchemaPolicyKind::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

impl PipelineConfig {
    pub fn delimiter_for(&self, name: &str) -> u8 {
        io_utils::resolve_input_delimiter(name, self.delimiter)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening settings file {path:?}"))?;
        let settings: SettingsFile = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing settings file {path:?}"))?;
        settings.resolve()
    }

    /// Applies command-line overrides on top of the current values.
    pub fn with_overrides(
        mut self,
        schema_policy: Option<SchemaPolicyKind>,
        delimiter: Option<u8>,
        input_encoding: Option<&str>,
    ) -> Result<Self> {
        if let Some(policy) = schema_policy {
            self.schema_policy = policy;
        }
        if delimiter.is_some() {
            self.delimiter = delimiter;
        }
        if input_encoding.is_some() {
            self.encoding = io_utils::resolve_encoding(input_encoding)?;
        }
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    schema_policy: Option<SchemaPolicyKind>,
    #[serde(default)]
    preview_rows: Option<usize>,
    #[serde(default)]
    delimiter: Option<String>,
    #[serde(default)]
    input_encoding: Option<String>,
}

impl SettingsFile {
    fn resolve(self) -> Result<PipelineConfig> {
        let defaults = PipelineConfig::default();
        let delimiter = self
            .delimiter
            .as_deref()
            .map(parse_delimiter)
            .transpose()
            .map_err(|err| anyhow!("Invalid delimiter in settings: {err}"))?;
        Ok(PipelineConfig {
            schema_policy: self.schema_policy.unwrap_or(defaults.schema_policy),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            delimiter,
            encoding: io_utils::resolve_encoding(self.input_encoding.as_deref())?,
        })
    }
}
