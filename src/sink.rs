pub mod print;
pub mod s3;
pub mod sqlite;

pub use self::print::PrintSink;
pub use self::s3::S3Uploader;
pub use self::sqlite::SqliteSink;
