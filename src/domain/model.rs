use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A raw row as handed back by a backend. Its readable fields are its keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(obj: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut data = HashMap::new();
        for (key, value) in obj {
            data.insert(key, value);
        }
        Record { data }
    }
}
