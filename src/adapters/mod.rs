//! Adapters: the SQLite `Storage` implementation and the log sanitizer.

pub mod sanitize;
pub mod sqlite;

pub use sqlite::StorageError;
