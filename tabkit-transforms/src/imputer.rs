//! Replacement of missing values

use std::hash::{Hash, Hasher};

use tabkit_core::{Column, Table, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::transformer::{hash_structure, require_columns, resolve_column_names, TableTransformer};

/// How the replacement for missing values is chosen
#[derive(Debug, Clone, PartialEq)]
pub enum ImputerStrategy {
    /// A fixed value
    Constant(Value),
    /// Mean of the non-missing values; numeric columns only
    Mean,
    /// Median of the non-missing values; numeric columns only
    Median,
    /// Smallest of the most frequent non-missing values
    Mode,
}

impl ImputerStrategy {
    fn replacement_for(&self, column: &Column) -> Result<Value> {
        Ok(match self {
            ImputerStrategy::Constant(value) => value.clone(),
            ImputerStrategy::Mean => Value::Float(column.mean()?),
            ImputerStrategy::Median => Value::Float(column.median()?),
            ImputerStrategy::Mode => column
                .mode()
                .into_iter()
                .next()
                .ok_or_else(|| tabkit_core::Error::MissingValues(column.name().to_string()))?,
        })
    }
}

/// Replaces missing values in each fitted column
///
/// The column type is inferred again after imputation, so imputing the
/// mean of an Integer column yields a Float column. Not invertible.
#[derive(Debug, Clone)]
pub struct Imputer {
    strategy: ImputerStrategy,
    fitted: Option<Vec<(String, Value)>>,
}

impl Imputer {
    /// Create an unfitted imputer
    pub fn new(strategy: ImputerStrategy) -> Self {
        Self {
            strategy,
            fitted: None,
        }
    }

    /// The strategy choosing replacements
    pub fn strategy(&self) -> &ImputerStrategy {
        &self.strategy
    }

    /// Replacement learned for a column
    pub fn replacement(&self, column_name: &str) -> Result<&Value> {
        self.fitted()?
            .iter()
            .find(|(name, _)| name == column_name)
            .map(|(_, value)| value)
            .ok_or_else(|| tabkit_core::Error::unknown_column(column_name).into())
    }

    fn fitted(&self) -> Result<&[(String, Value)]> {
        self.fitted.as_deref().ok_or(Error::TransformerNotFitted)
    }
}

impl TableTransformer for Imputer {
    const KIND: &'static str = "Imputer";

    fn fit(&self, table: &Table, column_names: Option<&[&str]>) -> Result<Self> {
        let names = resolve_column_names(table, column_names)?;
        let mut replacements = Vec::with_capacity(names.len());
        for name in names {
            let column = table.get_column(&name)?;
            if !column.has_missing_values() {
                warn!(column = %name, "column has no missing values to impute");
            }
            replacements.push((name, self.strategy.replacement_for(column)?));
        }
        debug!(strategy = ?self.strategy, columns = replacements.len(), "fitted imputer");
        Ok(Self {
            strategy: self.strategy.clone(),
            fitted: Some(replacements),
        })
    }

    fn transform(&self, table: &Table) -> Result<Table> {
        let fitted = self.fitted()?;
        require_columns(table, fitted.iter().map(|(name, _)| name.as_str()))?;
        let mut result = table.clone();
        for (name, replacement) in fitted {
            result = result.transform_column(name, |value| match value {
                Value::Null => replacement.clone(),
                value => value.clone(),
            })?;
        }
        Ok(result)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn get_names_of_added_columns(&self) -> Result<Vec<String>> {
        self.fitted().map(|_| Vec::new())
    }

    fn get_names_of_changed_columns(&self) -> Result<Vec<String>> {
        Ok(self.fitted()?.iter().map(|(name, _)| name.clone()).collect())
    }

    fn get_names_of_removed_columns(&self) -> Result<Vec<String>> {
        self.fitted().map(|_| Vec::new())
    }
}

impl Hash for Imputer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_structure(self, state);
    }
}
