//! Domain types for normalized chemical data

pub mod query_result;
pub mod record;

pub use query_result::*;
pub use record::*;
