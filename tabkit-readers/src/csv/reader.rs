//! CSV reader implementation

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tabkit_core::Table;
use tracing::debug;

use crate::common::ReaderOptions;
use crate::error::{Error, Result};

use super::parser::CsvParser;

/// Options for CSV reader
#[derive(Debug, Clone)]
pub struct CsvReaderOptions {
    /// Whether the CSV has a header row
    pub has_header: bool,

    /// Delimiter character
    pub delimiter: u8,

    /// Quote character
    pub quote: u8,

    /// Whether to trim whitespace
    pub trim: bool,

    /// Core reader options
    pub reader_options: ReaderOptions,
}

impl Default for CsvReaderOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            trim: false,
            reader_options: ReaderOptions::default(),
        }
    }
}

/// CSV reader producing a whole table
///
/// A record whose field count differs from the header (or, without header,
/// from the first record) is a fatal [`Error::Format`].
pub struct CsvReader<R: Read> {
    /// Inner CSV reader
    reader: csv::Reader<R>,

    /// Reader options
    options: CsvReaderOptions,
}

impl CsvReader<File> {
    /// Open a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P, options: CsvReaderOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(file, options))
    }
}

impl<R: Read> CsvReader<R> {
    /// Create a new CSV reader
    pub fn new(reader: R, options: CsvReaderOptions) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .trim(if options.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            // Field counts are checked here to report the offending line.
            .flexible(true)
            .from_reader(reader);

        Self { reader, options }
    }

    /// Read all records into a table
    pub fn read_table(mut self) -> Result<Table> {
        let header: Option<Vec<String>> = if self.options.has_header {
            Some(self.reader.headers()?.iter().map(str::to_string).collect())
        } else {
            None
        };

        let mut records: Vec<StringRecord> = Vec::new();
        let mut expected = header.as_ref().map(Vec::len);
        for record in self.reader.records() {
            let record = record?;
            let width = *expected.get_or_insert(record.len());
            if record.len() != width {
                let line = record.position().map_or(0, csv::Position::line);
                return Err(Error::Format(format!(
                    "record on line {} has {} fields, expected {}",
                    line,
                    record.len(),
                    width
                )));
            }
            records.push(record);
        }

        let names = header.unwrap_or_else(|| {
            (0..expected.unwrap_or(0))
                .map(|i| format!("column_{}", i))
                .collect()
        });

        let table = CsvParser::new(names, self.options.reader_options).parse_records(&records)?;
        debug!(
            rows = table.count_rows(),
            columns = table.count_columns(),
            "read CSV table"
        );
        Ok(table)
    }
}
