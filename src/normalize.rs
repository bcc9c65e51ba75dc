//! Header canonicalization, null collapsing, and column-set policies.
//!
//! Each raw row has its own headers canonicalized (lower-cased, every run of
//! whitespace replaced by a single `_`). A [`SchemaPolicy`] then decides the
//! dataset's column keys and every row is projected onto them, so all
//! [`NormalizedRow`]s share one key set. Cells a row does not carry, explicit
//! nulls, and empty strings all become `None`.

use std::collections::HashSet;

use clap::ValueEnum;
use log::debug;
use serde::{
    Deserialize, Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

use crate::data::{RawRow, Value};

/// Lower-cases `header` and replaces each whitespace run with one underscore.
pub fn canonicalize_header(header: &str) -> String {
    let mut key = String::with_capacity(header.len());
    let mut in_whitespace = false;
    for ch in header.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                key.push('_');
            }
            in_whitespace = true;
        } else {
            key.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }
    key
}

/// `None` and `""` are null-like; everything else is kept verbatim.
pub fn collapse_null(value: Option<&Value>) -> Option<Value> {
    match value {
        Some(v) if !v.is_empty_text() => Some(v.clone()),
        _ => None,
    }
}

/// A raw row after header canonicalization, before projection onto the column set.
#[derive(Debug, Clone, Default)]
pub struct CanonicalRow {
    fields: Vec<(String, Option<Value>)>,
}

impl CanonicalRow {
    /// Headers that canonicalize to the same key keep the first key position and the last value.
    pub fn from_raw(raw: &RawRow) -> Self {
        let mut fields: Vec<(String, Option<Value>)> = Vec::with_capacity(raw.len());
        for (header, value) in &raw.fields {
            let key = canonicalize_header(header);
            let value = collapse_null(value.as_ref());
            match fields.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => fields.push((key, value)),
            }
        }
        Self { fields }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    fn take(&mut self, key: &str) -> Option<Value> {
        self.fields
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .and_then(|(_, value)| value.take())
    }
}

/// Decides which canonical keys make up a dataset's columns.
pub trait SchemaPolicy {
    fn name(&self) -> &'static str;
    fn columns(&self, rows: &[CanonicalRow]) -> Vec<String>;
}

/// Columns are the first row's keys; keys seen only in later rows are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstRowSchema;

impl SchemaPolicy for FirstRowSchema {
    fn name(&self) -> &'static str {
        "first-row"
    }

    fn columns(&self, rows: &[CanonicalRow]) -> Vec<String> {
        rows.first()
            .map(|row| row.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Columns are the union of every row's keys, in order of first appearance.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionSchema;

impl SchemaPolicy for UnionSchema {
    fn name(&self) -> &'static str {
        "union"
    }

    fn columns(&self, rows: &[CanonicalRow]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for key in rows.iter().flat_map(CanonicalRow::keys) {
            if seen.insert(key) {
                columns.push(key.to_string());
            }
        }
        columns
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SchemaPolicyKind {
    #[default]
    FirstRow,
    Union,
}

impl SchemaPolicyKind {
    pub fn policy(self) -> &'static dyn SchemaPolicy {
        match self {
            SchemaPolicyKind::FirstRow => &FirstRowSchema,
            SchemaPolicyKind::Union => &UnionSchema,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    cells: Vec<Option<Value>>,
}

impl NormalizedRow {
    pub fn new(cells: Vec<Option<Value>>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: usize) -> Option<&Value> {
        self.cells.get(column).and_then(Option::as_ref)
    }

    pub fn cells(&self) -> &[Option<Value>] {
        &self.cells
    }
}

/// Rectangular dataset: ordered column keys plus rows aligned to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedDataset {
    columns: Vec<String>,
    rows: Vec<NormalizedRow>,
}

impl NormalizedDataset {
    pub fn new(columns: Vec<String>, rows: Vec<NormalizedRow>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    /// Cells of one column in row order; `None` marks a null.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Serializes `rows` as JSON objects keyed by column, in column order.
    pub fn rows_view<'a>(&'a self, rows: &'a [NormalizedRow]) -> RowsView<'a> {
        RowsView {
            columns: &self.columns,
            rows,
        }
    }
}

pub fn normalize(raw_rows: &[RawRow], policy: &dyn SchemaPolicy) -> NormalizedDataset {
    let mut canonical = raw_rows.iter().map(CanonicalRow::from_raw).collect::<Vec<_>>();
    let columns = policy.columns(&canonical);
    let rows = canonical
        .iter_mut()
        .map(|row| NormalizedRow::new(columns.iter().map(|key| row.take(key)).collect()))
        .collect::<Vec<_>>();
    debug!(
        "Normalized {} row(s) into {} column(s) using the {} schema policy",
        rows.len(),
        columns.len(),
        policy.name()
    );
    NormalizedDataset::new(columns, rows)
}

pub struct RowsView<'a> {
    columns: &'a [String],
    rows: &'a [NormalizedRow],
}

impl Serialize for RowsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&RowView {
                columns: self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

struct RowView<'a> {
    columns: &'a [String],
    row: &'a NormalizedRow,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (idx, column) in self.columns.iter().enumerate() {
            map.serialize_entry(column, &self.row.get(idx))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(fields: &[(&str, Option<&str>)]) -> RawRow {
        fields
            .iter()
            .map(|(header, value)| {
                (
                    header.to_string(),
                    value.map(|v| Value::Text(v.to_string())),
                )
            })
            .collect()
    }

    #[test]
    fn canonicalize_header_lowercases_and_collapses_whitespace() {
        assert_eq!(canonicalize_header("Total Sales"), "total_sales");
        assert_eq!(canonicalize_header("Region  ID"), "region_id");
        assert_eq!(canonicalize_header("  Region  ID"), "_region_id");
        assert_eq!(canonicalize_header("Unit\tPrice\n"), "unit_price_");
        assert_eq!(canonicalize_header("ÉTAT"), "état");
    }

    #[test]
    fn normalize_collapses_empty_and_null_cells() {
        let rows = vec![raw(&[("Age", Some("")), ("City", None), ("Name", Some("Ann"))])];
        let dataset = normalize(&rows, &FirstRowSchema);
        assert_eq!(dataset.columns(), ["age", "city", "name"]);
        assert_eq!(dataset.rows()[0].get(0), None);
        assert_eq!(dataset.rows()[0].get(1), None);
        assert_eq!(
            dataset.rows()[0].get(2),
            Some(&Value::Text("Ann".to_string()))
        );
    }

    #[test]
    fn first_row_schema_drops_late_columns_and_nulls_missing_ones() {
        let rows = vec![
            raw(&[("a", Some("1")), ("b", Some("2"))]),
            raw(&[("a", Some("3")), ("c", Some("9"))]),
        ];
        let dataset = normalize(&rows, &FirstRowSchema);
        assert_eq!(dataset.columns(), ["a", "b"]);
        assert_eq!(dataset.rows()[1].cells(), &[Some(Value::Text("3".into())), None]);
    }

    #[test]
    fn union_schema_keeps_every_key_in_first_seen_order() {
        let rows = vec![
            raw(&[("a", Some("1")), ("b", Some("2"))]),
            raw(&[("c", Some("9")), ("a", Some("3"))]),
        ];
        let dataset = normalize(&rows, &UnionSchema);
        assert_eq!(dataset.columns(), ["a", "b", "c"]);
        assert_eq!(dataset.rows()[0].get(2), None);
        assert_eq!(dataset.rows()[1].get(2), Some(&Value::Text("9".into())));
    }

    #[test]
    fn colliding_headers_keep_last_value() {
        let rows = vec![raw(&[("Unit Price", Some("1")), ("unit  price", Some("2"))])];
        let dataset = normalize(&rows, &FirstRowSchema);
        assert_eq!(dataset.columns(), ["unit_price"]);
        assert_eq!(dataset.rows()[0].get(0), Some(&Value::Text("2".into())));
    }

    #[test]
    fn empty_input_yields_empty_dataset() {
        let dataset = normalize(&[], &FirstRowSchema);
        assert_eq!(dataset.row_count(), 0);
        assert_eq!(dataset.column_count(), 0);
    }

    #[test]
    fn rows_view_serializes_in_column_order_with_nulls() {
        let rows = vec![raw(&[("zeta", Some("z")), ("alpha", Some(""))])];
        let dataset = normalize(&rows, &FirstRowSchema);
        let json = serde_json::to_string(&dataset.rows_view(dataset.rows())).unwrap();
        assert_eq!(json, r#"[{"zeta":"z","alpha":null}]"#);
    }
}
