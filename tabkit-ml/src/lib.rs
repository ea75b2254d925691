//! Model-wrapper boundary for tabkit
//!
//! Learning algorithms live outside this crate. They plug in through
//! [`ModelBackend`] and [`TrainedModel`], which see plain feature matrices,
//! while callers keep working with tagged tables.

#![warn(missing_docs)]

mod error;
pub mod metrics;
mod model;

pub use error::{Error, Result};
pub use model::{fit_model, predict_with_model, Model, ModelBackend, TrainedModel};
