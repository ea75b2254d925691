//! File readers and writers for tabkit tables
//!
//! This crate loads tables from delimited text files, inferring a schema from
//! the header and the cell contents, and writes tables back out.

mod error;

pub mod common;

#[cfg(feature = "csv")]
pub mod csv;

pub use common::{ReaderOptions, SchemaInference};
pub use error::{Error, Result};

#[cfg(feature = "csv")]
pub use crate::csv::{CsvReader, CsvReaderOptions, CsvTableExt, CsvWriter, CsvWriterOptions};
