//! Fit/transform table transformers for tabkit
//!
//! Every transformer follows the same life cycle: an unfitted instance learns
//! parameters with [`TableTransformer::fit`], which returns a new fitted
//! instance, and only the fitted instance can transform tables.

#![warn(missing_docs)]

mod error;
mod imputer;
mod label_encoder;
mod one_hot_encoder;
mod range_scaler;
mod scaling;
mod standard_scaler;
pub mod transformer;

pub use error::{Error, Result};
pub use imputer::{Imputer, ImputerStrategy};
pub use label_encoder::LabelEncoder;
pub use one_hot_encoder::OneHotEncoder;
pub use range_scaler::RangeScaler;
pub use standard_scaler::StandardScaler;
pub use transformer::{InvertibleTableTransformer, TableTransformer};
