use dataset_insights::{
    classify::{ColumnKind, classify_columns},
    data::{Coercion, Value, coerce},
    normalize::{FirstRowSchema, canonicalize_header, normalize},
    pipeline::Pipeline,
    stats::NumericAccumulator,
    summary::{ColumnSummary, summarize},
};
use proptest::prelude::*;

#[test]
fn coercion_rejects_non_decimal_spellings() {
    for text in ["0x1A", "inf", "NaN", "1,000", "$5", "   ", "1e999"] {
        assert_eq!(
            coerce(Some(&Value::Text(text.to_string()))),
            Coercion::NotNumeric,
            "{text}"
        );
    }
    assert_eq!(coerce(Some(&Value::Boolean(true))), Coercion::NotNumeric);
    assert_eq!(coerce(None), Coercion::NotNumeric);
}

proptest! {
    #[test]
    fn canonical_headers_are_lowercase_without_whitespace(header in "[A-Za-z0-9 \t_-]{0,16}") {
        let key = canonicalize_header(&header);
        prop_assert!(!key.chars().any(char::is_whitespace));
        prop_assert!(!key.chars().any(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(canonicalize_header(&key), key.clone());
    }

    #[test]
    fn formatted_integers_always_coerce_to_themselves(value in -1_000_000i64..1_000_000) {
        let cell = Value::Text(format!("  {value} "));
        prop_assert_eq!(coerce(Some(&cell)), Coercion::Numeric(value as f64));
    }

    #[test]
    fn coercion_never_yields_non_finite_numbers(text in "\\PC{0,12}") {
        if let Coercion::Numeric(n) = coerce(Some(&Value::Text(text))) {
            prop_assert!(n.is_finite());
        }
    }

    #[test]
    fn numeric_summaries_stay_within_bounds(values in proptest::collection::vec(-500i32..500, 1..40)) {
        let mut csv = String::from("Amount\n");
        for value in &values {
            csv.push_str(&value.to_string());
            csv.push('\n');
        }
        let descriptor = Pipeline::default()
            .describe("amounts.csv", csv.as_bytes())
            .expect("describe");
        let summary = descriptor
            .summary()
            .get("amount")
            .and_then(ColumnSummary::as_numeric)
            .expect("numeric summary");
        prop_assert_eq!(summary.count, values.len());
        prop_assert!(summary.min <= summary.median && summary.median <= summary.max);
        prop_assert!(summary.min <= summary.mean + 1e-9 && summary.mean <= summary.max + 1e-9);
        prop_assert!(summary.std >= 0.0);
        prop_assert_eq!(summary.min, f64::from(*values.iter().min().unwrap()));
        prop_assert_eq!(summary.max, f64::from(*values.iter().max().unwrap()));
    }

    #[test]
    fn rows_keep_first_row_column_order(cells in proptest::collection::vec("[a-z]{1,6}", 1..6)) {
        let mut raw = dataset_insights::data::RawRow::new();
        for (idx, cell) in cells.iter().enumerate() {
            raw.push(format!("Col {idx}"), Some(Value::Text(cell.clone())));
        }
        let dataset = normalize(&[raw], &FirstRowSchema);
        let expected = (0..cells.len()).map(|idx| format!("col_{idx}")).collect::<Vec<_>>();
        prop_assert_eq!(dataset.columns(), expected.as_slice());
        let kinds = classify_columns(&dataset);
        prop_assert!(kinds.iter().all(|kind| *kind == ColumnKind::Categorical));
        prop_assert_eq!(summarize(&dataset, &kinds).len(), cells.len());
    }

    #[test]
    fn accumulator_metrics_stay_finite_for_any_finite_input(
        values in proptest::collection::vec(-8e307..8e307, 1..30)
    ) {
        let mut acc = NumericAccumulator::new();
        acc.extend(values.iter().copied());
        for metric in [acc.mean(), acc.median(), acc.std_dev(), acc.min(), acc.max()] {
            prop_assert!(metric.is_some_and(f64::is_finite));
        }
    }
}
