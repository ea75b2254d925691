//! Error types for tabular containers

use thiserror::Error;

/// Result type for tabular container operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tabular container operations
#[derive(Error, Debug)]
pub enum Error {
    /// One or more column names are not present in a schema, row or table
    #[error("Could not find column(s) '{}'", .0.join(", "))]
    UnknownColumnName(Vec<String>),

    /// Positional index outside `[0, length)`
    #[error("There is no element at index {index} (length is {length})")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of available elements
        length: usize,
    },

    /// Numeric operation requested on a non-numeric column
    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// Columns that must have equal lengths do not
    #[error("Column length mismatch: {0}")]
    ColumnLengthMismatch(String),

    /// Values or columns of incompatible types were combined
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A column name occurs more than once
    #[error("Duplicate column name '{0}'")]
    DuplicateColumnName(String),

    /// Structure of the data does not match the expected schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// An operation needs at least one non-missing value
    #[error("Column '{0}' has no non-missing values")]
    MissingValues(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

impl Error {
    /// Shorthand for a single unknown column
    pub fn unknown_column(name: &str) -> Self {
        Error::UnknownColumnName(vec![name.to_string()])
    }
}
