// Table rendering for pages and filter results, independent of any
// terminal state

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::data::datatable::{ColumnSummary, DataRow, DataValue};

const NULL_MARKER: &str = "NULL";

fn header_cells<'a>(headers: impl IntoIterator<Item = &'a str>) -> Vec<Cell> {
    headers
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect()
}

fn value_cell(value: &DataValue) -> Cell {
    match value {
        DataValue::Null => Cell::new(NULL_MARKER).add_attribute(Attribute::Dim),
        DataValue::Integer(_) | DataValue::Float(_) => {
            Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
        }
        DataValue::String(s) => Cell::new(s),
    }
}

/// Build a table of row records under the given column headers
pub fn render_rows(columns: &[String], rows: &[DataRow]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header_cells(columns.iter().map(String::as_str)));

    for row in rows {
        table.add_row(row.values.iter().map(value_cell).collect::<Vec<_>>());
    }

    table
}

/// Build the per-column quality report
pub fn render_column_summaries(summaries: &[ColumnSummary]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header_cells(["#", "Coluna", "Tipo", "Nulos", "Distintos"]));

    for summary in summaries {
        table.add_row(vec![
            Cell::new(summary.index).set_alignment(CellAlignment::Right),
            Cell::new(&summary.name),
            Cell::new(summary.data_type),
            Cell::new(summary.null_count).set_alignment(CellAlignment::Right),
            Cell::new(summary.unique_values).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}
