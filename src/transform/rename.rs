use crate::core::{DataType, Field, PipelineError, Record, Result, Schema, Transform};
use async_trait::async_trait;
use std::collections::HashMap;

/// Renames source columns to canonical names and fixes the output order:
/// duration-like columns first, percentage-like columns last. Pure name
/// mapping, nothing data-dependent.
pub struct SchemaMapper {
    /// `(source, canonical)` pairs, in canonical output order.
    mapping: Vec<(String, String)>,
}

impl SchemaMapper {
    pub fn new(mapping: Vec<(String, String)>) -> Self {
        Self { mapping }
    }

    /// The fixed AutoSleep column mapping.
    pub fn autosleep() -> Self {
        let pairs = [
            ("toDate", "date"),
            ("waketime", "wakeup_time"),
            ("asleep", "hours_slept"),
            ("quality", "quality_sleep_time"),
            ("deep", "deep_sleep_time"),
            ("efficiency", "sleep_efficiency"),
            ("SpO2Avg", "oxygen_saturation_average"),
        ];
        Self::new(
            pairs
                .iter()
                .map(|(s, c)| (s.to_string(), c.to_string()))
                .collect(),
        )
    }

    fn canonical_type(name: &str) -> DataType {
        match name {
            "date" => DataType::Date,
            "wakeup_time" | "hours_slept" | "quality_sleep_time" | "deep_sleep_time" => {
                DataType::Time
            }
            _ => DataType::String,
        }
    }
}

#[async_trait]
impl Transform for SchemaMapper {
    async fn transform(&self, record: Record) -> Result<Vec<Record>> {
        let mut data = HashMap::with_capacity(self.mapping.len());
        for (source, canonical) in &self.mapping {
            let value = record.get_field(source).cloned().ok_or_else(|| {
                PipelineError::Schema(format!("source column '{source}' missing from record"))
            })?;
            data.insert(canonical.clone(), value);
        }
        Ok(vec![Record::with_data(data)])
    }

    async fn get_output_schema(&self, _input_schema: &Schema) -> Result<Schema> {
        let fields = self
            .mapping
            .iter()
            .map(|(_, canonical)| Field {
                name: canonical.clone(),
                data_type: Self::canonical_type(canonical),
                // A missing measurement never fails the rename; only the
                // completeness filter narrows nullability.
                nullable: true,
            })
            .collect();
        Ok(Schema::new(fields))
    }
}
