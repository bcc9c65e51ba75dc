use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    classify::ColumnKind,
    data::coerce,
    normalize::NormalizedDataset,
    stats::NumericAccumulator,
};

pub const TOTAL_RECORDS_TITLE: &str = "Total Records";
/// Shown in place of a total that does not fit in an `f64`.
pub const OUT_OF_RANGE: &str = "out of range";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsightValue {
    Count(usize),
    Text(String),
}

impl InsightValue {
    pub fn as_display(&self) -> String {
        match self {
            InsightValue::Count(count) => count.to_string(),
            InsightValue::Text(text) => text.clone(),
        }
    }
}

/// A single headline fact about a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub value: InsightValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

impl Insight {
    fn neutral(title: String, value: InsightValue) -> Self {
        Self {
            title,
            value,
            change: None,
            trend: Some(Trend::Neutral),
        }
    }
}

/// Average and total for each numeric column, then the record count.
///
/// Averages and totals use the same coercion as the summarizer and are
/// rendered with two decimals. A total beyond `f64` range is reported as
/// [`OUT_OF_RANGE`]. An empty dataset produces no insights at all.
pub fn generate_insights(dataset: &NormalizedDataset, kinds: &[ColumnKind]) -> Vec<Insight> {
    if dataset.is_empty() {
        return Vec::new();
    }
    let mut insights = Vec::new();
    for (column, (name, kind)) in dataset.columns().iter().zip(kinds).enumerate() {
        if !kind.is_numeric() {
            continue;
        }
        let mut acc = NumericAccumulator::new();
        acc.extend(
            dataset
                .column_values(column)
                .filter_map(|value| coerce(value).as_f64()),
        );
        let Some(mean) = acc.mean() else {
            continue;
        };
        insights.push(Insight::neutral(
            format!("Average {name}"),
            InsightValue::Text(format!("{mean:.2}")),
        ));
        let total = match acc.sum() {
            Some(sum) => format!("{sum:.2}"),
            None => {
                warn!("Total of column '{name}' overflows; reporting it as {OUT_OF_RANGE:?}");
                OUT_OF_RANGE.to_string()
            }
        };
        insights.push(Insight::neutral(
            format!("Total {name}"),
            InsightValue::Text(total),
        ));
    }
    insights.push(Insight::neutral(
        TOTAL_RECORDS_TITLE.to_string(),
        InsightValue::Count(dataset.row_count()),
    ));
    insights
}
