use crate::core::{Record, Result, Schema, Transform};
use async_trait::async_trait;

/// Drops records without a blood-oxygen reading. SpO2 is absent whenever the
/// watch's Sleep focus was off for the night; no other column is treated as
/// essential, so nothing else participates in the filter.
pub struct Spo2Filter;

const OXYGEN_COLUMN: &str = "oxygen_saturation_average";

#[async_trait]
impl Transform for Spo2Filter {
    async fn transform(&self, record: Record) -> Result<Vec<Record>> {
        if record.is_missing(OXYGEN_COLUMN) {
            tracing::debug!(
                date = record.get_field("date").and_then(|v| v.as_str()),
                "dropping row without oxygen saturation"
            );
            return Ok(vec![]);
        }
        Ok(vec![record])
    }

    async fn get_output_schema(&self, input_schema: &Schema) -> Result<Schema> {
        let mut schema = input_schema.clone();
        // Non-null by construction once the filter has run.
        if let Some(field) = schema
            .fields
            .iter_mut()
            .find(|f| f.name == OXYGEN_COLUMN)
        {
            field.nullable = false;
        }
        Ok(schema)
    }
}
