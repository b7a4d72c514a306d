pub mod models;
pub mod pool;

pub use pool::{apply_schema, connect, DatabaseError};
