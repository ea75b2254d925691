//! CSV loading and saving for tables
//!
//! This module provides a CSV reader that infers a schema from the header and
//! the cell contents, a matching writer, and [`CsvTableExt`] which adds
//! `from_csv_file`/`to_csv_file` to [`Table`].

mod parser;
mod reader;
mod writer;

use std::path::Path;

use tabkit_core::Table;
use tracing::debug;

use crate::error::Result;

pub use parser::CsvParser;
pub use reader::{CsvReader, CsvReaderOptions};
pub use writer::{CsvWriter, CsvWriterOptions};

/// CSV file support for [`Table`]
pub trait CsvTableExt: Sized {
    /// Load a table from a CSV file with a header row
    fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Save a table to a CSV file with a header row
    fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl CsvTableExt for Table {
    fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "loading CSV file");
        CsvReader::from_path(path, CsvReaderOptions::default())?.read_table()
    }

    fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        debug!(path = %path.as_ref().display(), "saving CSV file");
        CsvWriter::from_path(path, CsvWriterOptions::default())?.write_table(self)
    }
}
