//! CSV writer implementation

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tabkit_core::{Table, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// Options for CSV writer
#[derive(Debug, Clone)]
pub struct CsvWriterOptions {
    /// Whether to write a header row
    pub write_header: bool,

    /// Delimiter character
    pub delimiter: u8,

    /// Quote character
    pub quote: u8,

    /// Whether to quote all fields
    pub quote_all: bool,

    /// Cell written for missing values
    ///
    /// Should be one of the reader's `null_values`. A non-missing value that
    /// would be written as this marker is rejected.
    pub null_value: String,
}

impl Default for CsvWriterOptions {
    fn default() -> Self {
        Self {
            write_header: true,
            delimiter: b',',
            quote: b'"',
            quote_all: false,
            null_value: String::new(),
        }
    }
}

/// CSV writer
pub struct CsvWriter<W: Write> {
    /// Inner CSV writer
    writer: csv::Writer<W>,

    /// Writer options
    options: CsvWriterOptions,
}

impl CsvWriter<File> {
    /// Create or truncate a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P, options: CsvWriterOptions) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(file, options))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Create a new CSV writer
    pub fn new(writer: W, options: CsvWriterOptions) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .quote_style(if options.quote_all {
                csv::QuoteStyle::Always
            } else {
                csv::QuoteStyle::Necessary
            })
            .from_writer(writer);

        Self { writer, options }
    }

    /// Write a table to CSV
    ///
    /// Missing values become the null marker and floats keep a decimal point
    /// so that they are read back as floats. Nothing is written if a value
    /// would be indistinguishable from a missing one.
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        self.check_null_marker(table)?;
        if self.options.write_header {
            self.writer.write_record(table.column_names())?;
        }

        let null_value = self.options.null_value.as_str();
        for row in table.rows() {
            self.writer
                .write_record(row.values().iter().map(|value| format_value(value, null_value)))?;
        }

        self.writer.flush()?;
        debug!(
            rows = table.count_rows(),
            columns = table.count_columns(),
            "wrote CSV table"
        );
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| std::io::Error::new(err.error().kind(), err.to_string()).into())
    }

    fn check_null_marker(&self, table: &Table) -> Result<()> {
        for column in table.columns() {
            let clash = column
                .iter()
                .position(|value| !value.is_null() && value.to_string() == self.options.null_value);
            if let Some(index) = clash {
                return Err(Error::Format(format!(
                    "value at index {} of column '{}' would be written as the null marker '{}'",
                    index,
                    column.name(),
                    self.options.null_value
                )));
            }
        }
        Ok(())
    }
}

fn format_value(value: &Value, null_value: &str) -> String {
    match value {
        Value::Null => null_value.to_string(),
        other => other.to_string(),
    }
}
