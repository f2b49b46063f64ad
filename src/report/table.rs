use anyhow::Result;
use comfy_table::presets::{ASCII_FULL, ASCII_HORIZONTAL_ONLY, ASCII_MARKDOWN, NOTHING, UTF8_FULL};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use super::TableFormat;
use crate::models::ReportRow;

/// Render `rows` (header first) in the requested format.
pub fn render(rows: &[ReportRow], format: TableFormat) -> Result<String> {
    let preset = match format {
        TableFormat::Json => return Ok(serde_json::to_string_pretty(rows)?),
        TableFormat::Pipe => ASCII_MARKDOWN,
        TableFormat::Grid => ASCII_FULL,
        TableFormat::Simple => ASCII_HORIZONTAL_ONLY,
        TableFormat::Plain => NOTHING,
        TableFormat::Fancy => UTF8_FULL,
    };

    let mut table = Table::new();
    table.load_preset(preset);

    let Some((header, body)) = rows.split_first() else {
        return Ok(String::new());
    };

    if format == TableFormat::Fancy {
        table
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header.iter().map(|h| Cell::new(h).add_attribute(Attribute::Bold)));
    } else {
        table.set_header(header);
    }

    for row in body {
        table.add_row(row.iter().map(|value| status_cell(value)));
    }

    Ok(table.to_string())
}

/// Status values get a colour; comfy-table drops it when stdout is not a tty.
fn status_cell(value: &str) -> Cell {
    let color = match value {
        "Allowed" => Some(Color::Green),
        "Banned" => Some(Color::Red),
        "Unknown" => Some(Color::Yellow),
        "Manually validated" => Some(Color::Cyan),
        "Not found" => Some(Color::DarkGrey),
        _ => None,
    };
    match color {
        Some(color) => Cell::new(value).fg(color),
        None => Cell::new(value),
    }
}
