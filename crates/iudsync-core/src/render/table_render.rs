use crate::model::ChangeRecord;

const HEADERS: [&str; 6] = ["Field1", "Field2", "Field3", "Field4", "Field5", "IUD"];

/// Render stored rows as an aligned plain-text table
///
/// Columns are padded to the widest cell; a leading column holds the row
/// position, like a dataframe print. An empty table renders the header and
/// an `(empty)` marker.
pub fn render_table(rows: &[ChangeRecord]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.key.field1.to_string(),
                r.key.field2.clone(),
                r.field3.to_string(),
                r.field4.to_string(),
                r.field5.to_string(),
                r.status.code().to_string(),
            ]
        })
        .collect();

    let mut widths: [usize; 6] = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let index_width = rows.len().saturating_sub(1).to_string().len();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (header, width) in HEADERS.iter().zip(widths.iter()) {
        out.push_str(&format!("  {:>width$}", header, width = width));
    }
    out.push('\n');

    if cells.is_empty() {
        out.push_str("(empty)\n");
        return out;
    }

    for (i, row) in cells.iter().enumerate() {
        out.push_str(&format!("{:<width$}", i, width = index_width));
        for (cell, width) in row.iter().zip(widths.iter()) {
            out.push_str(&format!("  {:>width$}", cell, width = width));
        }
        out.push('\n');
    }
    out
}
