//! CSV rendering for query results.

use serde_json::Value;

use crate::db::QueryResult;

/// Renders a result set as CSV: a header row of column names, then one line
/// per row in column order. NULL renders empty; numbers and booleans render
/// bare; strings are quoted when they contain a comma, a quote, or a line
/// break, with inner quotes doubled.
pub fn render_csv(result: &QueryResult) -> String {
    let mut out = String::new();
    let header: Vec<String> = result.columns.iter().map(|name| csv_field(name)).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in &result.rows {
        let fields: Vec<String> = result
            .columns
            .iter()
            .map(|column| match row.get(column) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(text)) => csv_field(text),
                Some(other) => other.to_string(),
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Attachment filename for an export, stamped with the current UTC date.
pub fn export_filename() -> String {
    format!("query_results_{}.csv", chrono::Utc::now().format("%Y-%m-%d"))
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
