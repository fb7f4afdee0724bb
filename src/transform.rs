pub mod datetime;
pub mod filter;
pub mod rename;

pub use self::datetime::DateTimeNormalizer;
pub use self::filter::Spo2Filter;
pub use self::rename::SchemaMapper;
