use crate::config;
use crate::core::{DataType, Field, PipelineError, Record, RecordStream, Result, Schema, Source};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reads one AutoSleep export and projects it down to the fixed source
/// columns, preserving row order and row count. No row is filtered here.
///
/// `toDate` values carry a comma inside a quoted field
/// (`"31st Jan 2023, 07:15:00"`), so rows go through a real CSV parser
/// rather than a line split.
pub struct CsvSource {
    file_path: PathBuf,
    columns: Vec<String>,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            columns: config::SOURCE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    fn open_reader(&self) -> Result<::csv::Reader<std::fs::File>> {
        Ok(::csv::Reader::from_path(&self.file_path)?)
    }

    /// Maps each projected column to its position in the file header.
    fn column_indices(&self, headers: &::csv::StringRecord) -> Result<Vec<(String, usize)>> {
        self.columns
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h == name)
                    .map(|idx| (name.clone(), idx))
                    .ok_or_else(|| {
                        PipelineError::Schema(format!(
                            "source column '{}' missing from {}",
                            name,
                            self.file_path.display()
                        ))
                    })
            })
            .collect()
    }
}

#[async_trait]
impl Source for CsvSource {
    async fn get_schema(&self) -> Result<Schema> {
        let mut reader = self.open_reader()?;
        let headers = reader.headers()?.clone();
        let fields = self
            .column_indices(&headers)?
            .into_iter()
            .map(|(name, _)| Field {
                name,
                data_type: DataType::String,
                nullable: true,
            })
            .collect();
        Ok(Schema::new(fields))
    }

    async fn read(&self) -> Result<RecordStream> {
        let mut reader = self.open_reader()?;
        let headers = reader.headers()?.clone();
        let indices = self.column_indices(&headers)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut data = HashMap::new();
            for (name, idx) in &indices {
                let value = row.get(*idx).unwrap_or("").trim();
                data.insert(name.clone(), Value::String(value.to_string()));
            }
            records.push(Ok(Record::with_data(data)));
        }

        tracing::info!(
            rows = records.len(),
            file = %self.file_path.display(),
            "extracted source rows"
        );
        Ok(Box::pin(futures::stream::iter(records)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::io::Write;

    fn write_export(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write export");
        file
    }

    const EXPORT: &str = "\
toDate,waketime,asleep,efficiency,quality,deep,SpO2Avg,notes
\"31st Jan 2023, 07:15:00\",2023-01-31T07:15:00,7:30,91%,5:45,1:20,96,slept fine
\"1st Feb 2023, 06:50:00\",2023-02-01T06:50:00,6:10,88%,4:30,0:55,,woke early
";

    #[tokio::test]
    async fn projects_to_the_seven_source_columns() {
        let file = write_export(EXPORT);
        let source = CsvSource::new(file.path());

        let schema = source.get_schema().await.expect("schema");
        assert_eq!(schema.field_names(), config::SOURCE_COLUMNS.to_vec());

        let rows: Vec<Record> = source
            .read()
            .await
            .expect("stream")
            .map(|r| r.expect("record"))
            .collect()
            .await;

        // Row order and count preserved; the extra column is gone.
        assert_eq!(rows.len(), 2);
        assert!(rows[0].get_field("notes").is_none());
        assert_eq!(
            rows[0].require_str("toDate").unwrap(),
            "31st Jan 2023, 07:15:00"
        );
        assert_eq!(rows[1].require_str("SpO2Avg").unwrap(), "");
    }

    #[tokio::test]
    async fn projection_order_is_fixed_regardless_of_file_order() {
        let file = write_export(
            "SpO2Avg,deep,quality,efficiency,asleep,waketime,toDate\n\
             96,1:20,5:45,91%,7:30,2023-01-31T07:15:00,\"31st Jan 2023, 07:15:00\"\n",
        );
        let source = CsvSource::new(file.path());

        let schema = source.get_schema().await.expect("schema");
        assert_eq!(schema.field_names(), config::SOURCE_COLUMNS.to_vec());

        let rows: Vec<Record> = source
            .read()
            .await
            .expect("stream")
            .map(|r| r.expect("record"))
            .collect()
            .await;
        assert_eq!(rows[0].require_str("SpO2Avg").unwrap(), "96");
        assert_eq!(rows[0].require_str("asleep").unwrap(), "7:30");
    }

    #[tokio::test]
    async fn missing_column_is_a_schema_error() {
        let file = write_export("toDate,waketime\nx,y\n");
        let source = CsvSource::new(file.path());

        let err = source.get_schema().await.unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[tokio::test]
    async fn missing_file_propagates_without_retry() {
        let source = CsvSource::new("no/such/export.csv");
        assert!(source.read().await.is_err());
    }
}
