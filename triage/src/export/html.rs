//! HTML table rendering that spreadsheet software opens as a workbook.

use super::table::Table;
use crate::error::{Result, TriageError};
use std::fmt::{self, Write as _};

const STYLE: &str = "body { font-family: Arial, sans-serif; } \
table { border-collapse: collapse; margin: 16px 0; } \
th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; vertical-align: top; } \
th { background-color: #28c4a1; color: #ffffff; }";

const ODD_ROW: &str = "#ffffff";
const EVEN_ROW: &str = "#f3f6f8";

/// Render a standalone document: a heading, a subtitle line and one
/// `<table>` per section, with alternating row backgrounds.
///
/// # Errors
///
/// [`TriageError::ExportFailure`] if the document cannot be formatted.
pub fn render(heading: &str, subtitle: &str, tables: &[Table]) -> Result<Vec<u8>> {
    let mut out = String::new();
    write_document(&mut out, heading, subtitle, tables)
        .map_err(|_| TriageError::ExportFailure(format!("could not format {heading:?} as HTML")))?;
    Ok(out.into_bytes())
}

fn write_document(out: &mut String, heading: &str, subtitle: &str, tables: &[Table]) -> fmt::Result {
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    writeln!(out, "<title>{}</title>", escape_html(heading))?;
    writeln!(out, "<style>{STYLE}</style>")?;
    out.push_str("</head>\n<body>\n");
    writeln!(out, "<h1>{}</h1>", escape_html(heading))?;
    writeln!(out, "<p>{}</p>", escape_html(subtitle))?;

    for table in tables {
        if let Some(title) = &table.title {
            writeln!(out, "<h2>{}</h2>", escape_html(title))?;
        }
        write_table(out, table)?;
    }

    out.push_str("</body>\n</html>\n");
    Ok(())
}

fn write_table(out: &mut String, table: &Table) -> fmt::Result {
    out.push_str("<table>\n<thead>\n<tr>");
    for column in &table.columns {
        write!(out, "<th>{}</th>", escape_html(column))?;
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for (index, row) in table.rows.iter().enumerate() {
        let background = if index % 2 == 0 { ODD_ROW } else { EVEN_ROW };
        write!(out, "<tr style=\"background-color: {background}\">")?;
        for cell in row {
            write!(out, "<td>{}</td>", escape_html(cell))?;
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n");
    Ok(())
}

/// Escape text for element content and quoted attributes
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
