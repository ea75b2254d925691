//! CSV parser for converting string records to typed columns

use csv::StringRecord;
use tabkit_core::{Column, Table, Value};

use crate::common::{ReaderOptions, SchemaInference};
use crate::error::Result;

/// CSV parser that converts string records to a typed table
pub struct CsvParser {
    /// Column names, in file order
    names: Vec<String>,

    /// Cell interpretation options
    options: ReaderOptions,
}

impl CsvParser {
    /// Create a new CSV parser
    pub fn new(names: Vec<String>, options: ReaderOptions) -> Self {
        Self { names, options }
    }

    /// Column names this parser produces
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn is_null(&self, cell: &str) -> bool {
        self.options.null_values.iter().any(|null| null == cell)
    }

    /// Parse records into a table
    ///
    /// Every record must already have one field per column name.
    pub fn parse_records(&self, records: &[StringRecord]) -> Result<Table> {
        let columns = self
            .names
            .iter()
            .enumerate()
            .map(|(index, name)| self.parse_column(records, index, name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Table::from_columns(columns)?)
    }

    /// Parse a single column from string records
    fn parse_column(&self, records: &[StringRecord], index: usize, name: &str) -> Result<Column> {
        let cells: Vec<Option<&str>> = records
            .iter()
            .map(|record| record.get(index).filter(|cell| !self.is_null(cell)))
            .collect();

        let present: Vec<&str> = cells.iter().flatten().copied().collect();
        let column_type = SchemaInference::infer_column_type(&present, self.options.infer_booleans);

        let values = cells
            .into_iter()
            .map(|cell| cell.map_or(Value::Null, |cell| SchemaInference::parse_cell(cell, column_type)))
            .collect();

        Ok(Column::with_type(name, column_type, values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabkit_core::ColumnType;

    #[test]
    fn test_parse_records_infers_each_column() {
        let parser = CsvParser::new(
            vec!["id".into(), "score".into(), "name".into()],
            ReaderOptions::default(),
        );
        let records = vec![
            StringRecord::from(vec!["1", "0.5", "a"]),
            StringRecord::from(vec!["2", "", "b"]),
        ];
        let table = parser.parse_records(&records).unwrap();

        assert_eq!(table.get_type_of_column("id").unwrap(), ColumnType::Integer);
        assert_eq!(table.get_type_of_column("score").unwrap(), ColumnType::Float);
        assert_eq!(table.get_type_of_column("name").unwrap(), ColumnType::String);
        assert_eq!(table.get_column("score").unwrap().values()[1], Value::Null);
    }

    #[test]
    fn test_custom_null_values() {
        let options = ReaderOptions {
            null_values: vec!["NA".into()],
            ..Default::default()
        };
        let parser = CsvParser::new(vec!["x".into()], options);
        let records = vec![StringRecord::from(vec!["NA"]), StringRecord::from(vec!["3"])];
        let table = parser.parse_records(&records).unwrap();
        let column = table.get_column("x").unwrap();
        assert_eq!(column.column_type(), ColumnType::Integer);
        assert_eq!(column.missing_value_count(), 1);
    }
}
