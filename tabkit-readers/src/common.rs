//! Type inference for string cells shared by text-based readers

use tabkit_core::{ColumnType, Value};

/// Options shared by text-based readers
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Cell contents that are read as missing values
    pub null_values: Vec<String>,

    /// Whether `true`/`false` cells are read as booleans
    pub infer_booleans: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            null_values: vec![String::new()],
            infer_booleans: true,
        }
    }
}

/// Schema inference utilities for string cells
pub struct SchemaInference;

impl SchemaInference {
    /// Infer the type of a column of non-missing string cells
    ///
    /// Integer if every cell parses as `i64`, Float if every cell parses as
    /// `f64`, Boolean if every cell is `true`/`false` (any case), else String.
    /// A column without cells is `Any`.
    pub fn infer_column_type(cells: &[&str], infer_booleans: bool) -> ColumnType {
        if cells.is_empty() {
            return ColumnType::Any;
        }

        if cells.iter().all(|s| s.parse::<i64>().is_ok()) {
            return ColumnType::Integer;
        }

        if cells.iter().all(|s| s.parse::<f64>().is_ok()) {
            return ColumnType::Float;
        }

        if infer_booleans && cells.iter().all(|s| parse_bool(s).is_some()) {
            return ColumnType::Boolean;
        }

        ColumnType::String
    }

    /// Convert a non-missing cell into a value of the inferred type
    ///
    /// Cells that do not parse are kept as strings.
    pub fn parse_cell(cell: &str, column_type: ColumnType) -> Value {
        let parsed = match column_type {
            ColumnType::Integer => cell.parse::<i64>().ok().map(Value::Integer),
            ColumnType::Float => cell.parse::<f64>().ok().map(Value::Float),
            ColumnType::Boolean => parse_bool(cell).map(Value::Boolean),
            ColumnType::String | ColumnType::Any => None,
        };
        parsed.unwrap_or_else(|| Value::String(cell.to_string()))
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&["1", "-2"] => ColumnType::Integer; "integers")]
    #[test_case(&["1", "2.5"] => ColumnType::Float; "integers and floats")]
    #[test_case(&["1e3", "NaN"] => ColumnType::Float; "float notations")]
    #[test_case(&["true", "FALSE"] => ColumnType::Boolean; "booleans")]
    #[test_case(&["1", "yes"] => ColumnType::String; "mixed")]
    #[test_case(&[] => ColumnType::Any; "no cells")]
    fn test_infer_column_type(cells: &[&str]) -> ColumnType {
        SchemaInference::infer_column_type(cells, true)
    }

    #[test]
    fn test_booleans_can_be_disabled() {
        assert_eq!(SchemaInference::infer_column_type(&["true"], false), ColumnType::String);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(SchemaInference::parse_cell("1", ColumnType::Float), Value::Float(1.0));
        assert_eq!(SchemaInference::parse_cell("True", ColumnType::Boolean), Value::Boolean(true));
        assert_eq!(SchemaInference::parse_cell("7", ColumnType::String), Value::from("7"));
    }
}
