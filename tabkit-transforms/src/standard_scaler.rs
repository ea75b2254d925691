//! Standardization of numeric columns

use std::hash::{Hash, Hasher};

use tabkit_core::{Column, Table, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::scaling::{require_numeric, scale, unscale, LinearMap};
use crate::transformer::{hash_structure, resolve_column_names, InvertibleTableTransformer, TableTransformer};

/// Maps each fitted numeric column to zero mean and unit variance
///
/// Uses the population standard deviation. Columns with zero deviation are
/// only centred.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    fitted: Option<Vec<LinearMap>>,
}

impl StandardScaler {
    /// Create an unfitted scaler
    pub fn new() -> Self {
        Self::default()
    }

    fn fitted(&self) -> Result<&[LinearMap]> {
        self.fitted.as_deref().ok_or(Error::TransformerNotFitted)
    }
}

/// Mean and population standard deviation of the non-missing values
#[allow(clippy::cast_precision_loss)]
fn moments(column: &Column) -> Result<(f64, f64)> {
    require_numeric(column)?;
    let numbers: Vec<f64> = column.iter().filter_map(Value::as_f64).collect();
    if numbers.is_empty() {
        return Err(tabkit_core::Error::MissingValues(column.name().to_string()).into());
    }
    let n = numbers.len() as f64;
    let mean = numbers.iter().sum::<f64>() / n;
    let variance = numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Ok((mean, variance.sqrt()))
}

impl TableTransformer for StandardScaler {
    const KIND: &'static str = "StandardScaler";

    fn fit(&self, table: &Table, column_names: Option<&[&str]>) -> Result<Self> {
        let names = resolve_column_names(table, column_names)?;
        let mut maps = Vec::with_capacity(names.len());
        for name in &names {
            let column = table.get_column(name)?;
            let (mean, deviation) = moments(column)?;
            maps.push(LinearMap {
                name: name.clone(),
                column_type: column.column_type(),
                center: mean,
                factor: if deviation > 0.0 { deviation.recip() } else { 1.0 },
                base: 0.0,
            });
        }
        debug!(columns = ?names, "fitted standard scaler");
        Ok(Self { fitted: Some(maps) })
    }

    fn transform(&self, table: &Table) -> Result<Table> {
        scale(self.fitted()?, table)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn get_names_of_added_columns(&self) -> Result<Vec<String>> {
        self.fitted().map(|_| Vec::new())
    }

    fn get_names_of_changed_columns(&self) -> Result<Vec<String>> {
        Ok(self.fitted()?.iter().map(|map| map.name.clone()).collect())
    }

    fn get_names_of_removed_columns(&self) -> Result<Vec<String>> {
        self.fitted().map(|_| Vec::new())
    }
}

impl InvertibleTableTransformer for StandardScaler {
    fn inverse_transform(&self, transformed_table: &Table) -> Result<Table> {
        unscale(self.fitted()?, transformed_table)
    }
}

impl Hash for StandardScaler {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_structure(self, state);
    }
}
