//! Plain-text table rendering.

use std::io::{self, Write};

/// Writes `rows` under `headers` with columns padded to their widest cell.
///
/// Prints `No records found.` instead of an empty table.
pub fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No records found.");
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
        })
        .collect();

    let separator = widths
        .iter()
        .map(|width| "-".repeat(width + 2))
        .collect::<Vec<_>>()
        .join("+");

    writeln!(out, "+{separator}+")?;
    write_row(out, headers.iter().copied(), &widths)?;
    writeln!(out, "+{separator}+")?;
    for row in rows {
        write_row(out, row.iter().map(String::as_str), &widths)?;
    }
    writeln!(out, "+{separator}+")
}

fn write_row<'a, W: Write>(
    out: &mut W,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> io::Result<()> {
    let padded = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "| {padded} |")
}

/// Renders an optional cell; missing values print empty.
pub fn opt_cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

pub fn money(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_print_placeholder() {
        let mut out = Vec::new();
        write_table(&mut out, &["ID", "Name"], &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No records found.\n");
    }

    #[test]
    fn columns_align_to_widest_cell() {
        let mut out = Vec::new();
        write_table(
            &mut out,
            &["ID", "Name"],
            &[
                vec!["1".to_string(), "Dr. A. Sen".to_string()],
                vec!["12".to_string(), "Bo".to_string()],
            ],
        )
        .unwrap();

        let expected = "\
+----+------------+
| ID | Name       |
+----+------------+
| 1  | Dr. A. Sen |
| 12 | Bo         |
+----+------------+
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn helpers_format_cells() {
        assert_eq!(opt_cell(None), "");
        assert_eq!(opt_cell(Some("Fever")), "Fever");
        assert_eq!(money(400.0), "400.00");
    }
}
