use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, data::Value, describe_input, table};

const NULL_MARKER: &str = "<null>";

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let descriptor = describe_input(&args.source)?;
    let rows = match args.rows {
        Some(limit) => &descriptor.rows()[..descriptor.row_count().min(limit)],
        None => descriptor.preview(),
    };
    let rendered = render_rows(rows.iter().map(|row| row.cells()));
    table::print_table(descriptor.columns(), &rendered);
    info!(
        "Displayed {} of {} row(s) from {:?}",
        rows.len(),
        descriptor.row_count(),
        args.source.input
    );
    Ok(())
}

fn render_rows<'a>(
    rows: impl Iterator<Item = &'a [Option<Value>]>,
) -> Vec<Vec<String>> {
    rows.map(|cells| {
        cells
            .iter()
            .map(|cell| match cell {
                Some(value) => value.as_display(),
                None => NULL_MARKER.to_string(),
            })
            .collect()
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_render_with_marker() {
        let cells = vec![Some(Value::Text("Ann".into())), None, Some(Value::Number(4.0))];
        let rendered = render_rows(std::iter::once(cells.as_slice()));
        assert_eq!(rendered, vec![vec!["Ann", "<null>", "4"]]);
    }
}
