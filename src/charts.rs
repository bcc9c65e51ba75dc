//! Renderer-agnostic chart specifications.
//!
//! Numeric columns become line charts of value against original row index.
//! Categorical columns become pie charts of category counts. Ids are derived
//! from the column key, so the same dataset always yields the same ids.

use serde::{Deserialize, Serialize};

use crate::{
    classify::ColumnKind,
    data::coerce,
    frequency::FrequencyCounter,
    normalize::NormalizedDataset,
};

pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Scatter,
    Histogram,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: usize,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ChartData {
    Series {
        label: String,
        points: Vec<SeriesPoint>,
    },
    Categories {
        label: String,
        categories: Vec<CategoryCount>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub data: ChartData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ChartOptions>,
}

pub fn trend_chart_id(column: &str) -> String {
    format!("{column}-trend")
}

pub fn distribution_chart_id(column: &str) -> String {
    format!("{column}-distribution")
}

/// Line charts for every numeric column, then pie charts for every categorical one.
pub fn generate_charts(dataset: &NormalizedDataset, kinds: &[ColumnKind]) -> Vec<ChartSpec> {
    if dataset.is_empty() {
        return Vec::new();
    }
    let columns = dataset.columns().iter().zip(kinds).enumerate();
    let mut charts = columns
        .clone()
        .filter(|(_, (_, kind))| kind.is_numeric())
        .map(|(column, (name, _))| trend_chart(dataset, column, name))
        .collect::<Vec<_>>();
    charts.extend(
        columns
            .filter(|(_, (_, kind))| !kind.is_numeric())
            .map(|(column, (name, _))| distribution_chart(dataset, column, name)),
    );
    charts
}

fn trend_chart(dataset: &NormalizedDataset, column: usize, name: &str) -> ChartSpec {
    let points = dataset
        .column_values(column)
        .enumerate()
        .filter_map(|(x, value)| coerce(value).as_f64().map(|y| SeriesPoint { x, y }))
        .collect();
    ChartSpec {
        id: trend_chart_id(name),
        kind: ChartKind::Line,
        title: format!("{name} Trend"),
        data: ChartData::Series {
            label: name.to_string(),
            points,
        },
        options: Some(ChartOptions {
            caption: format!("{name} Over Time"),
        }),
    }
}

fn distribution_chart(dataset: &NormalizedDataset, column: usize, name: &str) -> ChartSpec {
    let counter = dataset
        .column_values(column)
        .map(|value| {
            value
                .map(|v| v.as_display())
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
        })
        .collect::<FrequencyCounter>();
    let categories = counter
        .into_entries()
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    ChartSpec {
        id: distribution_chart_id(name),
        kind: ChartKind::Pie,
        title: format!("{name} Distribution"),
        data: ChartData::Categories {
            label: name.to_string(),
            categories,
        },
        options: Some(ChartOptions {
            caption: format!("Distribution of {name}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify::classify_columns, data::Value, normalize::NormalizedRow};

    fn text(value: &str) -> Option<Value> {
        Some(Value::Text(value.to_string()))
    }

    fn charts_for(dataset: &NormalizedDataset) -> Vec<ChartSpec> {
        generate_charts(dataset, &classify_columns(dataset))
    }

    fn sample() -> NormalizedDataset {
        let rows = vec![
            NormalizedRow::new(vec![text("open"), text("100")]),
            NormalizedRow::new(vec![None, text("n/a")]),
            NormalizedRow::new(vec![text("closed"), text("250.5")]),
            NormalizedRow::new(vec![text("open"), None]),
            NormalizedRow::new(vec![text("pending"), text("75")]),
        ];
        NormalizedDataset::new(vec!["status".into(), "revenue".into()], rows)
    }

    #[test]
    fn numeric_line_charts_precede_categorical_pies() {
        let charts = charts_for(&sample());
        let ids = charts.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["revenue-trend", "status-distribution"]);
        assert_eq!(charts[0].kind, ChartKind::Line);
        assert_eq!(charts[1].kind, ChartKind::Pie);
        assert_eq!(charts[0].title, "revenue Trend");
    }

    #[test]
    fn trend_points_keep_original_row_indices() {
        let charts = charts_for(&sample());
        let ChartData::Series { points, .. } = &charts[0].data else {
            panic!("expected series data");
        };
        let xs = points.iter().map(|p| p.x).collect::<Vec<_>>();
        assert_eq!(xs, vec![0, 2, 4]);
        assert_eq!(points[1].y, 250.5);
    }

    #[test]
    fn distribution_counts_nulls_as_unknown_in_first_seen_order() {
        let charts = charts_for(&sample());
        let ChartData::Categories { categories, .. } = &charts[1].data else {
            panic!("expected category data");
        };
        let pairs = categories
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![("open", 2), ("Unknown", 1), ("closed", 1), ("pending", 1)]
        );
    }

    #[test]
    fn empty_dataset_has_no_charts() {
        let ds = NormalizedDataset::new(vec!["status".into()], Vec::new());
        assert!(charts_for(&ds).is_empty());
    }

    #[test]
    fn chart_spec_serializes_type_and_shape_tags() {
        let rows = vec![NormalizedRow::new(vec![text("4")])];
        let ds = NormalizedDataset::new(vec!["qty".into()], rows);
        let json = serde_json::to_value(&charts_for(&ds)[0]).unwrap();
        assert_eq!(json["id"], "qty-trend");
        assert_eq!(json["type"], "line");
        assert_eq!(json["data"]["shape"], "series");
        assert_eq!(json["data"]["points"][0]["y"], 4.0);
        assert_eq!(json["options"]["caption"], "qty Over Time");
    }
}
