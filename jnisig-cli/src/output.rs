use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Print a borderless table, indented by two spaces, with two spaces between columns.
pub fn print_table<R>(columns: &[(&str, CellAlignment)], rows: R)
where
    R: IntoIterator<Item = Vec<String>>,
{
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(|(name, _)| *name));

    let last = columns.len().saturating_sub(1);
    for (i, (_, align)) in columns.iter().enumerate() {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(*align);
            col.set_padding((u16::from(i != 0), u16::from(i != last)));
        }
    }

    for row in rows {
        table.add_row(row);
    }

    for line in table.to_string().lines() {
        println!("  {}", line.trim_end());
    }
}
