//! Transformer traits shared by every table transformer

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tabkit_core::Table;

use crate::error::{Error, Result};

/// A transformer that learns column-wise parameters from a table and applies
/// them to other tables
///
/// Fitting never changes the receiver: [`TableTransformer::fit`] returns a
/// new, fitted instance and the original stays unfitted and reusable.
pub trait TableTransformer: Sized {
    /// Name identifying the concrete transformer kind
    const KIND: &'static str;

    /// Learn parameters from the given columns, or from all columns if `None`
    fn fit(&self, table: &Table, column_names: Option<&[&str]>) -> Result<Self>;

    /// Apply the learned transformation, returning a new table
    fn transform(&self, table: &Table) -> Result<Table>;

    /// Whether this instance has been fitted
    fn is_fitted(&self) -> bool;

    /// Names of the columns the transformation adds, in output order
    fn get_names_of_added_columns(&self) -> Result<Vec<String>>;

    /// Names of the columns the transformation changes, in output order
    fn get_names_of_changed_columns(&self) -> Result<Vec<String>>;

    /// Names of the columns the transformation removes, in input order
    fn get_names_of_removed_columns(&self) -> Result<Vec<String>>;

    /// Fit on a table and transform that same table
    ///
    /// The fitted instance is discarded.
    fn fit_and_transform(&self, table: &Table, column_names: Option<&[&str]>) -> Result<Table> {
        self.fit(table, column_names)?.transform(table)
    }

    /// Hash of the transformer kind, fitted flag and column effects
    fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        hash_structure(self, &mut hasher);
        hasher.finish()
    }
}

/// A transformer whose effect can be undone
pub trait InvertibleTableTransformer: TableTransformer {
    /// Reconstruct the table that was passed to [`TableTransformer::transform`]
    fn inverse_transform(&self, transformed_table: &Table) -> Result<Table>;
}

/// Feed the structural identity of a transformer into a hasher
///
/// Unfitted transformers of one kind all hash the same. Fitted ones also
/// hash their added, changed and removed column names.
pub fn hash_structure<T: TableTransformer, H: Hasher>(transformer: &T, state: &mut H) {
    T::KIND.hash(state);
    transformer.is_fitted().hash(state);
    if transformer.is_fitted() {
        transformer
            .get_names_of_added_columns()
            .unwrap_or_default()
            .hash(state);
        transformer
            .get_names_of_changed_columns()
            .unwrap_or_default()
            .hash(state);
        transformer
            .get_names_of_removed_columns()
            .unwrap_or_default()
            .hash(state);
    }
}

/// Columns to fit on, in table order
///
/// `None` selects every column.
pub(crate) fn resolve_column_names(table: &Table, column_names: Option<&[&str]>) -> Result<Vec<String>> {
    let Some(names) = column_names else {
        return Ok(table.column_names());
    };
    require_columns(table, names.iter().copied())?;
    Ok(table
        .column_names()
        .into_iter()
        .filter(|name| names.contains(&name.as_str()))
        .collect())
}

/// Fail with the full list of names the table lacks
pub(crate) fn require_columns<'a, I>(table: &Table, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let missing: Vec<String> = names
        .into_iter()
        .filter(|name| !table.has_column(name))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Core(tabkit_core::Error::UnknownColumnName(missing)))
    }
}
