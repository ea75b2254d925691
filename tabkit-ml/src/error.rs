//! Error types for the model boundary

use thiserror::Error;

/// Error type for model wrappers and metrics
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] tabkit_core::Error),

    /// Prediction was requested from a model that has not been fitted
    #[error("The model has not been fitted yet")]
    ModelNotFitted,

    /// The dataset to predict on already holds the target column
    #[error("Dataset already contains the target column '{0}'")]
    DatasetContainsTarget(String),

    /// The dataset to predict on lacks feature columns
    #[error("Dataset is missing the feature column(s) '{}'", .0.join(", "))]
    DatasetMissesFeatures(Vec<String>),

    /// Training failed, either on invalid input or inside the backend
    #[error("Error occurred while learning: {0:#}")]
    Learning(anyhow::Error),

    /// Prediction failed, either on invalid input or inside the backend
    #[error("Error occurred while predicting: {0:#}")]
    Prediction(anyhow::Error),
}

/// Result type for model wrappers and metrics
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_features_are_listed() {
        let err = Error::DatasetMissesFeatures(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Dataset is missing the feature column(s) 'a, b'");
    }

    #[test]
    fn test_backend_context_is_displayed() {
        let cause = anyhow::anyhow!("singular matrix").context("solver failed");
        let err = Error::Learning(cause);
        assert_eq!(err.to_string(), "Error occurred while learning: solver failed: singular matrix");
    }
}
