//! Aligned console table
//!
//! Cells are left aligned and padded to the widest value in their column,
//! measured in characters.

use crate::output::Row;

/// Formats rows as a bordered table; the first row is the header
///
/// # Example
///
/// ```
/// use pydocs_scraper::output::format_table;
///
/// let rows = vec![
///     vec!["Status".to_string(), "Count".to_string()],
///     vec!["Final".to_string(), "3".to_string()],
/// ];
/// let table = format_table(&rows);
/// assert!(table.contains("| Final  | 3     |"));
/// ```
pub fn format_table(rows: &[Row]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = border_line(&widths);
    let mut out = String::new();

    out.push_str(&border);
    out.push_str(&format_line(header, &widths));
    out.push_str(&border);
    for row in body {
        out.push_str(&format_line(row, &widths));
    }
    out.push_str(&border);

    out
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn format_line(row: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (i, width) in widths.iter().enumerate() {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        let pad = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}
