//! CSV writing and reading for result files
//!
//! Files use the unix dialect: comma separated, every field quoted, inner
//! quotes doubled, `\n` line endings, UTF-8.

use crate::output::Row;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::mem::take;
use std::path::Path;

const SEP: char = ',';
const QUOTE: char = '"';

/// Writes a single row, quoting every field
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", SEP)?;
        } else {
            first = false;
        }
        let escaped = cell.replace(QUOTE, "\"\"");
        write!(w, "{}{}{}", QUOTE, escaped, QUOTE)?;
    }
    w.write_all(b"\n")
}

/// Writes every row to `path`, replacing any existing file
pub fn write_csv(path: &Path, rows: &[Row]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for row in rows {
        write_row(&mut w, row)?;
    }
    w.flush()
}

/// Parses CSV text back into rows
///
/// Quoted fields may contain separators, doubled quotes and line breaks.
/// Both `\n` and `\r\n` end a record; blank lines are skipped.
pub fn parse_rows(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE => {
                if in_quotes {
                    if matches!(chars.peek(), Some(&QUOTE)) {
                        chars.next();
                        field.push(QUOTE);
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            SEP if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Last record without a trailing newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Reads a CSV file written by [`write_csv`]
pub fn read_csv(path: &Path) -> io::Result<Vec<Row>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_rows(&text))
}
