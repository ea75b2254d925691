//! Error types for table transformers

use thiserror::Error;

/// Error type for table transformers
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error (unknown columns, non-numeric columns, ...)
    #[error("Core error: {0}")]
    Core(#[from] tabkit_core::Error),

    /// A fitted-only operation was called on an unfitted transformer
    #[error("The transformer has not been fitted yet")]
    TransformerNotFitted,

    /// A value to transform was not seen while fitting
    #[error("Value '{value}' in column '{column}' was not present when the transformer was fitted")]
    ValueNotPresentWhenFitted {
        /// Column holding the value
        column: String,
        /// Display form of the value
        value: String,
    },

    /// A value to inverse-transform is not a valid encoding
    #[error("Value '{value}' in column '{column}' is not a valid encoding")]
    InvalidEncodedValue {
        /// Column holding the value
        column: String,
        /// Display form of the value
        value: String,
    },

    /// Two categories of a column would be encoded by the same indicator column
    #[error("Categories of column '{column}' map to the same indicator column '{indicator}'")]
    IndicatorNameClash {
        /// Column being encoded
        column: String,
        /// Indicator name produced more than once
        indicator: String,
    },

    /// Invalid hyperparameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for table transformers
pub type Result<T> = std::result::Result<T, Error>;
