use crate::core::{Result, Sink, Source, Transform};

/// Drives one run: source stream through the transform chain into the sink.
/// A transform may fan a record out to zero records, which is how filtered
/// rows disappear.
pub struct Pipeline {
    source: Box<dyn Source>,
    transforms: Vec<Box<dyn Transform>>,
    sink: Box<dyn Sink>,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn Source>,
        transforms: Vec<Box<dyn Transform>>,
        sink: Box<dyn Sink>,
    ) -> Self {
        Self {
            source,
            transforms,
            sink,
        }
    }

    /// Runs the pipeline to completion and returns the number of records
    /// written. The output schema is derived by folding each transform over
    /// the source schema, and every sink-bound record is validated against
    /// it. Any error aborts the run; the sink's resources are released on
    /// drop even then.
    pub async fn run(mut self) -> Result<usize> {
        let mut schema = self.source.get_schema().await?;
        for transform in &self.transforms {
            schema = transform.get_output_schema(&schema).await?;
        }

        let mut stream = self.source.read().await?;
        let mut written = 0usize;
        let mut dropped = 0usize;

        while let Some(record_result) = futures::StreamExt::next(&mut stream).await {
            let mut batch = vec![record_result?];

            for transform in &self.transforms {
                let mut next = Vec::with_capacity(batch.len());
                for record in batch {
                    next.extend(transform.transform(record).await?);
                }
                batch = next;
            }

            if batch.is_empty() {
                dropped += 1;
            }
            for record in batch {
                record.validate_against_schema(&schema)?;
                self.sink.write(record).await?;
                written += 1;
            }
        }

        self.sink.close().await?;
        self.source.close().await?;

        tracing::info!(written, dropped, "pipeline run complete");
        Ok(written)
    }
}
