//! 🍽️ Dataset preview — a borderless table for the logs, no index column.
//!
//! What you see in the CI log is what lands in the bucket: cells are rendered
//! with the same `CellValue::render` the CSV composer uses.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING};

use crate::dataset::Dataset;

/// 📊 Render `dataset` as a right-aligned, borderless text table.
pub fn render_preview(dataset: &Dataset) -> String {
    // -- NOTHING preset because we're minimalists. and also the borders looked bad.
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(
            dataset
                .columns()
                .iter()
                .map(|name| Cell::new(name).set_alignment(CellAlignment::Right)),
        );

    for row in dataset.rows() {
        table.add_row(
            row.iter()
                .map(|cell| Cell::new(cell.render()).set_alignment(CellAlignment::Right)),
        );
    }

    table.to_string()
}
