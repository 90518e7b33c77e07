//! CSV rendering.

use super::table::Table;
use crate::error::Result;
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// UTF-8 byte-order mark; spreadsheet tools use it to detect the encoding
pub const BOM: &str = "\u{feff}";

/// Render tables as CSV.
///
/// Every field is double-quoted with inner quotes doubled. Titled tables get
/// their title on a line of its own, and consecutive tables are separated by
/// an empty line. The output starts with [`BOM`].
///
/// # Errors
///
/// [`crate::error::TriageError::ExportFailure`] if writing fails.
pub fn render(tables: &[Table]) -> Result<Vec<u8>> {
    let mut out = BOM.as_bytes().to_vec();

    for (index, table) in tables.iter().enumerate() {
        if index > 0 {
            out.push(b'\n');
        }
        out.extend(render_table(table)?);
    }
    Ok(out)
}

fn render_table(table: &Table) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    if let Some(title) = &table.title {
        writer.write_record([title])?;
    }
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|error| crate::error::TriageError::ExportFailure(error.to_string()))
}
