pub mod error;
pub mod record;
pub mod schema;
pub mod traits;

pub use self::error::*;
pub use self::record::*;
pub use self::schema::*;
pub use self::traits::*;
