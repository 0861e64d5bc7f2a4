//! Renders the sparse QC index into a dense, row-major table for export.
//!
//! Every column of the QC table expands into three fields (rating, pass/fail and comment),
//! rows without an entity in a column get empty fields.
use std::collections::BTreeMap;
use tracing::warn;

use crate::qc_db::{EntityDetails, RowEntities};

const EMPTY_ENTRY: (&str, &str, &str) = ("", "", "");

/// Layout options of a rendered table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFormat {
    /// Header of the first column, holding the row names.
    pub row_label: String,
    pub delimiter: char,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            row_label: "row".to_string(),
            delimiter: ',',
        }
    }
}

/// Renders the header and one line per row, lines are joined by newlines.
///
/// columns must hold all column names in the order they should appear in.
/// Entities of a row may come in any order, they are placed by their column name.
pub fn render(columns: &[String], rows: &[RowEntities], format: &TableFormat) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header(columns, format));

    for row in rows {
        let by_column = entities_by_column(row);

        let mut fields = Vec::with_capacity(1 + 3 * columns.len());
        fields.push(quote(&row.name, format.delimiter));
        for column in columns {
            let (rating, passfail, comment) = by_column
                .get(column.as_str())
                .map_or(EMPTY_ENTRY, |details| details.table_entry());
            fields.push(quote(rating, format.delimiter));
            fields.push(quote(passfail, format.delimiter));
            fields.push(quote(comment, format.delimiter));
        }
        lines.push(fields.join(&format.delimiter.to_string()));
    }

    lines.join("\n")
}

fn header(columns: &[String], format: &TableFormat) -> String {
    let mut fields = Vec::with_capacity(1 + 3 * columns.len());
    fields.push(quote(&format.row_label, format.delimiter));
    for column in columns {
        for suffix in &["rating", "passfail", "comment"] {
            fields.push(quote(&format!("{}_{}", column, suffix), format.delimiter));
        }
    }

    fields.join(&format.delimiter.to_string())
}

// Places each entity of the row by its column name.
// With multiple entities in one column the lowest id wins.
fn entities_by_column(row: &RowEntities) -> BTreeMap<&str, &EntityDetails> {
    let mut by_column: BTreeMap<&str, &EntityDetails> = BTreeMap::new();
    for details in &row.entities {
        let column = details.entity.column_name.as_str();
        match by_column.get(column).cloned() {
            Some(existing) => {
                warn!(
                    "Row {} holds entities {} and {} in column {}, exporting only one",
                    row.name,
                    existing.id(),
                    details.id(),
                    column
                );
                if details.id() < existing.id() {
                    by_column.insert(column, details);
                }
            }
            None => {
                by_column.insert(column, details);
            }
        }
    }

    by_column
}

// CSV style quoting for fields containing the delimiter, quotes or line breaks.
fn quote(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests;
