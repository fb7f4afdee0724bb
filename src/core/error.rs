use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
