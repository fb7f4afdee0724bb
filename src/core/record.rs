use crate::core::{PipelineError, Result, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One row of sleep data, keyed by column name. Field order is carried by the
/// accompanying [`Schema`], not by the map itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_data(data: HashMap<String, Value>) -> Self {
        Self { data }
    }

    pub fn set_field(&mut self, name: String, value: Value) {
        self.data.insert(name, value);
    }

    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Returns the field as a string slice, erroring when it is absent or not
    /// string-valued. Every column read from the export is string-typed.
    pub fn require_str(&self, name: &str) -> Result<&str> {
        match self.data.get(name) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(PipelineError::Schema(format!(
                "field '{name}' is not a string: {other}"
            ))),
            None => Err(PipelineError::Schema(format!("field '{name}' is missing"))),
        }
    }

    /// A field counts as missing when it is absent, null, or blank. Empty CSV
    /// cells arrive as empty strings, so all three mean "no measurement".
    pub fn is_missing(&self, name: &str) -> bool {
        match self.data.get(name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    pub fn validate_against_schema(&self, schema: &Schema) -> Result<()> {
        for field in &schema.fields {
            if !field.nullable && self.is_missing(&field.name) {
                return Err(PipelineError::Schema(format!(
                    "Required field '{}' is missing",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}
