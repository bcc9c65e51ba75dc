use serde::{Deserialize, Serialize};

use crate::{data::coerce, normalize::NormalizedDataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        self == ColumnKind::Numeric
    }
}

/// Numeric when any non-null cell coerces to a finite number.
///
/// A single coercible value is enough, so a mostly-text column with one
/// number in it is still numeric. All-null columns are categorical.
pub fn classify_column(dataset: &NormalizedDataset, column: usize) -> ColumnKind {
    if dataset
        .column_values(column)
        .any(|value| coerce(value).is_numeric())
    {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

pub fn classify_columns(dataset: &NormalizedDataset) -> Vec<ColumnKind> {
    (0..dataset.column_count())
        .map(|column| classify_column(dataset, column))
        .collect()
}
