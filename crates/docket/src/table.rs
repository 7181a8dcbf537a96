use serde_json::Value;

/// Columns shown before the table gets too wide for a terminal.
const MAX_COLUMNS: usize = 6;
const MAX_COLUMN_WIDTH: usize = 40;

/// Box-drawn table for a page of JSON records.
///
/// Columns come from the keys of the first object row, in key order.
/// Non-object rows render as a single `value` column.
pub struct TableFormatter {
    columns: Vec<String>,
    widths: Vec<usize>,
}

impl TableFormatter {
    pub fn new(rows: &[Value]) -> Self {
        let columns: Vec<String> = match rows.first() {
            Some(Value::Object(map)) => map.keys().take(MAX_COLUMNS).cloned().collect(),
            _ => vec!["value".to_string()],
        };

        let widths = columns
            .iter()
            .map(|column| {
                rows.iter()
                    .map(|row| cell(row, column).chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(5)
                    .clamp(3, MAX_COLUMN_WIDTH)
            })
            .collect();

        Self { columns, widths }
    }

    pub fn print_table(&self, rows: &[Value]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.row_line(self.columns.iter().map(String::as_str)));
        println!("{}", self.border('├', '┼', '┤'));
        for row in rows {
            let cells: Vec<String> = self.columns.iter().map(|c| cell(row, c)).collect();
            println!("{}", self.row_line(cells.iter().map(String::as_str)));
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn row_line<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let inner: Vec<String> = cells
            .zip(&self.widths)
            .map(|(text, width)| format!(" {} ", truncate(text, *width)))
            .collect();
        format!("│{}│", inner.join("│"))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

/// Display text of one cell. Strings print bare, nested values as JSON.
fn cell(row: &Value, column: &str) -> String {
    let value = match row {
        Value::Object(map) => map.get(column).unwrap_or(&Value::Null),
        other => other,
    };
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_pads_and_cuts() {
        assert_eq!(truncate("abc", 5), "abc  ");
        assert_eq!(truncate("contrato-largo", 8), "contr...");
        assert_eq!(truncate("ñandú", 5), "ñandú");
    }

    #[test]
    fn test_columns_from_first_object() {
        let rows = vec![
            json!({"id": 1, "titulo": "Contrato", "estado": null}),
            json!({"id": 22, "titulo": "Factura"}),
        ];
        let table = TableFormatter::new(&rows);
        assert_eq!(table.columns, vec!["estado", "id", "titulo"]);
        assert_eq!(table.widths, vec![6, 3, 8]);
    }

    #[test]
    fn test_scalar_rows_use_value_column() {
        let rows = vec![json!("a"), json!("b")];
        let table = TableFormatter::new(&rows);
        assert_eq!(table.columns, vec!["value"]);
        assert_eq!(cell(&rows[0], "value"), "a");
    }

    #[test]
    fn test_border_matches_widths() {
        let rows = vec![json!({"id": 1})];
        let table = TableFormatter::new(&rows);
        assert_eq!(table.border('┌', '┬', '┐'), "┌─────┐");
    }
}
