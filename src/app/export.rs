use serde_json::Value;

use crate::domain::{Resource, Row};

/// Tabular view of backend rows, ready for a spreadsheet writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// With `columns`, that order is kept and other keys are dropped.
    /// Without it, columns are every key seen, in first-seen order.
    pub fn from_rows(rows: &[Row], columns: Option<&[String]>) -> Self {
        let columns = match columns {
            Some(cols) => cols.to_vec(),
            None => {
                let mut seen: Vec<String> = Vec::new();
                for key in rows.iter().flat_map(|row| row.keys()) {
                    if !seen.contains(key) {
                        seen.push(key.clone());
                    }
                }
                seen
            }
        };

        let rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| row.get(col).map_or_else(String::new, render_cell))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

pub fn default_file_name(resource: Resource) -> String {
    format!("{}.csv", resource.table_name())
}
