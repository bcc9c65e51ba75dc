//! Per-column descriptive statistics.
//!
//! Numeric columns summarize only the cells that coerce to a number, so a
//! mixed column can report a `count` smaller than its non-null count.
//! Categorical columns count every non-null cell by its string
//! representation.

use log::debug;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    classify::ColumnKind,
    data::coerce,
    frequency::FrequencyCounter,
    normalize::NormalizedDataset,
    stats::NumericAccumulator,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostCommon {
    pub value: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub most_common: MostCommon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

impl ColumnSummary {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnSummary::Numeric(_) => ColumnKind::Numeric,
            ColumnSummary::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericSummary> {
        match self {
            ColumnSummary::Numeric(summary) => Some(summary),
            ColumnSummary::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalSummary> {
        match self {
            ColumnSummary::Categorical(summary) => Some(summary),
            ColumnSummary::Numeric(_) => None,
        }
    }
}

/// Column summaries keyed by column, in dataset column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    entries: Vec<(String, ColumnSummary)>,
}

impl DatasetSummary {
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, summary)| summary)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnSummary)> {
        self.entries
            .iter()
            .map(|(name, summary)| (name.as_str(), summary))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One table row per column for terminal output.
    pub fn render_rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|(name, summary)| match summary {
                ColumnSummary::Numeric(s) => vec![
                    name.to_string(),
                    "numeric".to_string(),
                    s.count.to_string(),
                    format_number(s.mean),
                    format_number(s.median),
                    format_number(s.min),
                    format_number(s.max),
                    format_number(s.std),
                    String::new(),
                    String::new(),
                ],
                ColumnSummary::Categorical(s) => vec![
                    name.to_string(),
                    "categorical".to_string(),
                    s.count.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    s.unique.to_string(),
                    s.most_common
                        .value
                        .as_ref()
                        .map(|value| format!("{value} ({})", s.most_common.count))
                        .unwrap_or_default(),
                ],
            })
            .collect()
    }
}

pub const SUMMARY_TABLE_HEADERS: [&str; 10] = [
    "column",
    "kind",
    "count",
    "mean",
    "median",
    "min",
    "max",
    "std",
    "unique",
    "most_common",
];

impl Serialize for DatasetSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, summary) in &self.entries {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}

pub fn summarize(dataset: &NormalizedDataset, kinds: &[ColumnKind]) -> DatasetSummary {
    if dataset.is_empty() {
        return DatasetSummary::default();
    }
    let entries = dataset
        .columns()
        .iter()
        .zip(kinds)
        .enumerate()
        .map(|(column, (name, kind))| {
            let summary = match kind {
                ColumnKind::Numeric => summarize_numeric(dataset, column),
                ColumnKind::Categorical => summarize_categorical(dataset, column),
            };
            debug!("Summarized column '{name}' as {kind:?}");
            (name.clone(), summary)
        })
        .collect();
    DatasetSummary { entries }
}

fn summarize_numeric(dataset: &NormalizedDataset, column: usize) -> ColumnSummary {
    let mut acc = NumericAccumulator::new();
    acc.extend(
        dataset
            .column_values(column)
            .filter_map(|value| coerce(value).as_f64()),
    );
    match (acc.mean(), acc.median(), acc.min(), acc.max(), acc.std_dev()) {
        (Some(mean), Some(median), Some(min), Some(max), Some(std)) => {
            ColumnSummary::Numeric(NumericSummary {
                count: acc.count(),
                mean,
                median,
                min,
                max,
                std,
            })
        }
        // Only reachable when a column was forced numeric without coercible values.
        _ => summarize_categorical(dataset, column),
    }
}

fn summarize_categorical(dataset: &NormalizedDataset, column: usize) -> ColumnSummary {
    let counter = dataset
        .column_values(column)
        .flatten()
        .map(|value| value.as_display())
        .collect::<FrequencyCounter>();
    let most_common = match counter.most_common() {
        Some((value, count)) => MostCommon {
            value: Some(value.to_string()),
            count,
        },
        None => MostCommon {
            value: None,
            count: 0,
        },
    };
    ColumnSummary::Categorical(CategoricalSummary {
        count: counter.total(),
        unique: counter.distinct(),
        most_common,
    })
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}
