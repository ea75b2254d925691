//! Boundary between tables and model backends

use anyhow::{anyhow, bail};
use tabkit_core::{Column, Table, TaggedTable, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// A learning algorithm with its hyperparameters, before training
///
/// Features arrive row-major: one `Vec<f64>` per row, in feature order.
pub trait ModelBackend {
    /// The model produced by training
    type Trained: TrainedModel;

    /// Train on a feature matrix and the matching target values
    fn train(&self, features: &[Vec<f64>], target: &[Value]) -> anyhow::Result<Self::Trained>;
}

/// A trained model
pub trait TrainedModel {
    /// Predict one target value per feature row
    fn predict(&self, features: &[Vec<f64>]) -> anyhow::Result<Vec<Value>>;
}

/// Row-major matrix of the named columns
///
/// Every column must be numeric and free of missing values.
fn feature_matrix(table: &Table, feature_names: &[String]) -> anyhow::Result<Vec<Vec<f64>>> {
    let mut rows = vec![Vec::with_capacity(feature_names.len()); table.count_rows()];
    for name in feature_names {
        let column = table.get_column(name)?;
        if !column.column_type().is_numeric() {
            bail!("feature column '{}' is not numeric", name);
        }
        for (row, value) in rows.iter_mut().zip(column.iter()) {
            let number = value
                .as_f64()
                .ok_or_else(|| anyhow!("feature column '{}' contains missing values", name))?;
            row.push(number);
        }
    }
    Ok(rows)
}

/// Train a backend on a tagged table
///
/// Returns the trained model and the feature names it was trained on.
pub fn fit_model<B: ModelBackend>(backend: &B, training_set: &TaggedTable) -> Result<(B::Trained, Vec<String>)> {
    let feature_names = training_set.feature_names().to_vec();
    let features = feature_matrix(training_set.as_table(), &feature_names).map_err(Error::Learning)?;
    let target = training_set.target()?;
    if target.has_missing_values() {
        return Err(Error::Learning(anyhow!(
            "target column '{}' contains missing values",
            target.name()
        )));
    }

    debug!(
        features = ?feature_names,
        target = training_set.target_name(),
        rows = features.len(),
        "training model"
    );
    let trained = backend
        .train(&features, target.values())
        .map_err(Error::Learning)?;
    Ok((trained, feature_names))
}

/// Predict a target column for a dataset
///
/// The returned table is the dataset with the predicted column appended,
/// tagged with the given features and target.
pub fn predict_with_model<M: TrainedModel>(
    model: &M,
    dataset: &Table,
    feature_names: &[String],
    target_name: &str,
) -> Result<TaggedTable> {
    if dataset.has_column(target_name) {
        return Err(Error::DatasetContainsTarget(target_name.to_string()));
    }
    let missing: Vec<String> = feature_names
        .iter()
        .filter(|name| !dataset.has_column(name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(Error::DatasetMissesFeatures(missing));
    }

    let features = feature_matrix(dataset, feature_names).map_err(Error::Prediction)?;
    debug!(target = target_name, rows = features.len(), "predicting");
    let predictions = model.predict(&features).map_err(Error::Prediction)?;
    if predictions.len() != features.len() {
        return Err(Error::Prediction(anyhow!(
            "model returned {} predictions for {} rows",
            predictions.len(),
            features.len()
        )));
    }

    let result = dataset.add_column(Column::new(target_name, predictions))?;
    let feature_names: Vec<&str> = feature_names.iter().map(String::as_str).collect();
    Ok(TaggedTable::new(result, target_name, Some(&feature_names))?)
}

/// What a fitted [`Model`] remembers
struct Fitted<T> {
    trained: T,
    feature_names: Vec<String>,
    target_name: String,
}

/// A model backend wrapped with its fitted state
///
/// Like transformers, [`Model::fit`] leaves the receiver untouched and
/// returns a new fitted instance.
pub struct Model<B: ModelBackend> {
    backend: B,
    fitted: Option<Fitted<B::Trained>>,
}

impl<B: ModelBackend> Model<B> {
    /// Wrap an untrained backend
    pub fn new(backend: B) -> Self {
        Self { backend, fitted: None }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether this model has been fitted
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Train on a tagged table, returning a fitted copy of this model
    pub fn fit(&self, training_set: &TaggedTable) -> Result<Self>
    where
        B: Clone,
    {
        let (trained, feature_names) = fit_model(&self.backend, training_set)?;
        Ok(Self {
            backend: self.backend.clone(),
            fitted: Some(Fitted {
                trained,
                feature_names,
                target_name: training_set.target_name().to_string(),
            }),
        })
    }

    /// Predict the target for a dataset holding the fitted features
    pub fn predict(&self, dataset: &Table) -> Result<TaggedTable> {
        let fitted = self.fitted()?;
        predict_with_model(&fitted.trained, dataset, &fitted.feature_names, &fitted.target_name)
    }

    /// Feature names seen while fitting
    pub fn feature_names(&self) -> Result<&[String]> {
        Ok(&self.fitted()?.feature_names)
    }

    /// Target name seen while fitting
    pub fn target_name(&self) -> Result<&str> {
        Ok(&self.fitted()?.target_name)
    }

    fn fitted(&self) -> Result<&Fitted<B::Trained>> {
        self.fitted.as_ref().ok_or(Error::ModelNotFitted)
    }
}
