use crate::core::{PipelineError, Result};
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;

/// Uploads a local export file to the S3 drop bucket.
///
/// One `PutObject` call per run: no retry, no multipart, no existence check,
/// no timeout. Auth, network, or bucket failures abort the run.
pub struct S3Uploader {
    client: aws_sdk_s3::Client,
}

impl S3Uploader {
    /// Builds a client from the ambient AWS environment (profile, env vars,
    /// instance role).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
        }
    }

    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        file: P,
        key: &str,
        bucket: &str,
    ) -> Result<()> {
        let file = file.as_ref();
        let body = ByteStream::from_path(file).await.map_err(|e| {
            PipelineError::Upload(format!("cannot read {}: {e}", file.display()))
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| PipelineError::Upload(e.to_string()))?;

        tracing::info!(bucket, key, file = %file.display(), "uploaded export file");
        Ok(())
    }
}
