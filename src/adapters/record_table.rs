use crate::domain::model::Record;
use crate::utils::error::{GatewayError, Result};
use serde_json::Value;
use std::path::Path;

/// In-memory table of records: the record source the bundled backends query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    name: String,
    rows: Vec<Record>,
}

impl RecordTable {
    pub fn from_records(name: &str, rows: Vec<Record>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }

    /// 從 JSON 檔案載入資料表
    pub fn from_json_file<P: AsRef<Path>>(name: &str, path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!(
            "Loaded {} bytes of records from {}",
            content.len(),
            path.as_ref().display()
        );
        Self::from_json_str(name, &content)
    }

    pub fn from_json_str(name: &str, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_json_value(name, value)
    }

    /// Accepts an array of objects, or one object as a single row.
    pub fn from_json_value(name: &str, value: Value) -> Result<Self> {
        let mut rows = Vec::new();

        match value {
            Value::Array(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    let Value::Object(obj) = item else {
                        return Err(GatewayError::ProcessingError {
                            message: format!("row {} of table `{}` is not an object", index, name),
                        });
                    };
                    rows.push(Record::from(obj));
                }
            }
            Value::Object(obj) => rows.push(Record::from(obj)),
            other => {
                return Err(GatewayError::ProcessingError {
                    message: format!(
                        "table `{}` must be a JSON array of objects, got {}",
                        name,
                        json_kind(&other)
                    ),
                });
            }
        }

        tracing::debug!("Table {} holds {} rows", name, rows.len());
        Ok(Self::from_records(name, rows))
    }

    /// First row whose `field` equals `value`.
    pub fn find_by(&self, field: &str, value: &Value) -> Option<Record> {
        self.rows
            .iter()
            .find(|row| row.get(field) == Some(value))
            .cloned()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
