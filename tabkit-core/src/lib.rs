//! Typed tabular containers for ML data pipelines
//!
//! This crate provides the data model every other tabkit crate builds upon:
//! cell values, schemas, columns, rows and tables. All containers are
//! immutable; operations that change structure return new instances.

#![warn(missing_docs)]

pub mod column;
pub mod error;
pub mod row;
pub mod schema;
pub mod table;
pub mod tagged_table;
pub mod value;

// Re-export key types for convenience
pub use column::Column;
pub use error::{Error, Result};
pub use row::Row;
pub use schema::{ColumnType, Field, Schema};
pub use table::Table;
pub use tagged_table::TaggedTable;
pub use value::Value;
