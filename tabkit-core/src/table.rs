//! Table: named columns of equal length sharing one schema

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::{ColumnType, Schema};
use crate::tagged_table::TaggedTable;
use crate::value::Value;

/// An immutable collection of named columns of equal length
///
/// Every structural operation returns a new table; the receiver is never
/// modified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    /// Schema describing the columns, in column order
    schema: Arc<Schema>,

    /// Columns in this table
    columns: Vec<Column>,

    /// Number of rows in this table
    row_count: usize,
}

impl Table {
    /// Create a new table from columns
    ///
    /// Column names must be unique and all columns must have the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let schema = Schema::new(columns.iter().map(Column::field).collect())?;

        let row_count = columns.first().map_or(0, Column::len);
        if let Some(first) = columns.first() {
            for column in &columns[1..] {
                if column.len() != row_count {
                    return Err(Error::ColumnLengthMismatch(format!(
                        "column '{}' has {} values but column '{}' has {}",
                        column.name(),
                        column.len(),
                        first.name(),
                        row_count
                    )));
                }
            }
        }

        Ok(Self {
            schema: Arc::new(schema),
            columns,
            row_count,
        })
    }

    /// Create a new table from name/values pairs
    pub fn from_dict<K, V, C, I>(data: I) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
        C: IntoIterator<Item = V>,
        I: IntoIterator<Item = (K, C)>,
    {
        Self::from_columns(
            data.into_iter()
                .map(|(name, values)| Column::from_values(name.as_ref(), values))
                .collect(),
        )
    }

    /// Create a new table from rows
    ///
    /// All rows must have the same column names. Column order follows the
    /// first row and column types are inferred from the collected values.
    pub fn from_rows(rows: &[Row]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };

        let names = first.get_column_names();
        let mut values: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for (index, row) in rows.iter().enumerate() {
            check_same_columns(&names, row, index)?;
            for (slot, name) in values.iter_mut().zip(&names) {
                slot.push(row.get_value(name)?.clone());
            }
        }

        Self::from_columns(
            names
                .iter()
                .zip(values)
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    /// Create a table without columns or rows
    pub fn empty() -> Self {
        Self {
            schema: Arc::new(Schema::empty()),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Get the schema of this table
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.schema.column_names()
    }

    /// Get the number of rows in this table
    pub fn count_rows(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns in this table
    pub fn count_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check whether the table has a column
    pub fn has_column(&self, name: &str) -> bool {
        self.schema.has_column(name)
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Result<&Column> {
        let index = self.schema.index_of(name)?;
        Ok(&self.columns[index])
    }

    /// Get the type of a column
    pub fn get_type_of_column(&self, name: &str) -> Result<ColumnType> {
        self.schema.get_type_of_column(name)
    }

    /// Borrow all columns in schema order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Copy all columns in schema order
    pub fn to_columns(&self) -> Vec<Column> {
        self.columns.clone()
    }

    /// Read the row at a position
    ///
    /// The row shares this table's schema and holds copies of the values.
    pub fn get_row(&self, index: usize) -> Result<Row> {
        if index >= self.row_count {
            return Err(Error::IndexOutOfBounds {
                index,
                length: self.row_count,
            });
        }
        Ok(self.row_at(index))
    }

    fn row_at(&self, index: usize) -> Row {
        Row::from_parts(
            Arc::clone(&self.schema),
            self.columns
                .iter()
                .map(|column| column.values()[index].clone())
                .collect(),
        )
    }

    /// Iterate over all rows
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.row_count).map(|index| self.row_at(index))
    }

    /// Copy all rows
    pub fn to_rows(&self) -> Vec<Row> {
        self.rows().collect()
    }

    /// Return a new table with an additional column
    pub fn add_column(&self, column: Column) -> Result<Self> {
        self.add_columns(vec![column])
    }

    /// Return a new table with additional columns
    ///
    /// Either every column is added or the call fails.
    pub fn add_columns(&self, columns: Vec<Column>) -> Result<Self> {
        for column in &columns {
            if self.has_column(column.name()) {
                return Err(Error::DuplicateColumnName(column.name().to_string()));
            }
            if !self.columns.is_empty() && column.len() != self.row_count {
                return Err(Error::ColumnLengthMismatch(format!(
                    "column '{}' has {} values but the table has {} rows",
                    column.name(),
                    column.len(),
                    self.row_count
                )));
            }
        }
        let mut all = self.columns.clone();
        all.extend(columns);
        Self::from_columns(all)
    }

    /// Return a new table with an additional row
    pub fn add_row(&self, row: &Row) -> Result<Self> {
        self.add_rows(std::slice::from_ref(row))
    }

    /// Return a new table with additional rows
    ///
    /// Every row must have exactly the table's column names. Either every row
    /// is added or the call fails.
    pub fn add_rows(&self, rows: &[Row]) -> Result<Self> {
        if self.columns.is_empty() {
            return Self::from_rows(rows);
        }

        let names = self.column_names();
        let mut values: Vec<Vec<Value>> = self
            .columns
            .iter()
            .map(|column| column.values().to_vec())
            .collect();
        for (index, row) in rows.iter().enumerate() {
            check_same_columns(&names, row, index)?;
            for (slot, name) in values.iter_mut().zip(&names) {
                slot.push(row.get_value(name)?.clone());
            }
        }

        Self::from_columns(
            names
                .iter()
                .zip(values)
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    fn check_columns_exist(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| (*name).to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::UnknownColumnName(missing))
        }
    }

    /// Return a new table without the given columns
    pub fn remove_columns(&self, names: &[&str]) -> Result<Self> {
        self.check_columns_exist(names)?;
        let removed: HashSet<&str> = names.iter().copied().collect();
        Self::from_columns(
            self.columns
                .iter()
                .filter(|column| !removed.contains(column.name()))
                .cloned()
                .collect(),
        )
    }

    /// Return a new table with only the given columns, in table order
    pub fn keep_only_columns(&self, names: &[&str]) -> Result<Self> {
        self.check_columns_exist(names)?;
        let kept: HashSet<&str> = names.iter().copied().collect();
        let columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|column| kept.contains(column.name()))
            .cloned()
            .collect();
        if columns.is_empty() {
            return Ok(Self::empty());
        }
        Self::from_columns(columns)
    }

    /// Return a new table with a column renamed
    pub fn rename_column(&self, old_name: &str, new_name: &str) -> Result<Self> {
        let index = self.schema.index_of(old_name)?;
        if old_name != new_name && self.has_column(new_name) {
            return Err(Error::DuplicateColumnName(new_name.to_string()));
        }
        let mut columns = self.columns.clone();
        columns[index] = columns[index].rename(new_name);
        Self::from_columns(columns)
    }

    /// Return a new table where one column is replaced by zero or more columns
    ///
    /// The new columns take the position of the replaced one.
    pub fn replace_column(&self, old_name: &str, new_columns: Vec<Column>) -> Result<Self> {
        let index = self.schema.index_of(old_name)?;
        for column in &new_columns {
            if column.name() != old_name && self.has_column(column.name()) {
                return Err(Error::DuplicateColumnName(column.name().to_string()));
            }
            if column.len() != self.row_count {
                return Err(Error::ColumnLengthMismatch(format!(
                    "column '{}' has {} values but the table has {} rows",
                    column.name(),
                    column.len(),
                    self.row_count
                )));
            }
        }
        let mut columns = self.columns.clone();
        columns.splice(index..=index, new_columns);
        if columns.is_empty() {
            return Ok(Self::empty());
        }
        Self::from_columns(columns)
    }

    /// Return a new table where one column is passed through a function
    pub fn transform_column<F>(&self, name: &str, f: F) -> Result<Self>
    where
        F: Fn(&Value) -> Value,
    {
        let column = self.get_column(name)?.transform(f);
        self.replace_column(name, vec![column])
    }

    fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
            row_count: indices.len(),
        }
        .with_refreshed_schema()
    }

    // Nullability may change when rows are dropped.
    fn with_refreshed_schema(mut self) -> Self {
        if let Ok(schema) = Schema::new(self.columns.iter().map(Column::field).collect()) {
            self.schema = Arc::new(schema);
        }
        self
    }

    /// Return a new table with the rows matching a predicate
    pub fn filter_rows<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool,
    {
        let indices: Vec<usize> = (0..self.row_count)
            .filter(|&index| predicate(&self.row_at(index)))
            .collect();
        trace!(kept = indices.len(), total = self.row_count, "filtered rows");
        self.select_rows(&indices)
    }

    /// Return a new table with the rows in `start..end`
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<Self> {
        if end > self.row_count {
            return Err(Error::IndexOutOfBounds {
                index: end,
                length: self.row_count,
            });
        }
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "slice start {} is after slice end {}",
                start, end
            )));
        }
        let indices: Vec<usize> = (start..end).collect();
        Ok(self.select_rows(&indices))
    }

    /// Return a new table with rows ordered by a comparator
    pub fn sort_rows<C>(&self, comparator: C) -> Self
    where
        C: Fn(&Row, &Row) -> Ordering,
    {
        let rows = self.to_rows();
        let mut indices: Vec<usize> = (0..self.row_count).collect();
        indices.sort_by(|&a, &b| comparator(&rows[a], &rows[b]));
        self.select_rows(&indices)
    }

    /// Split the rows into a leading and a trailing table
    ///
    /// The first table receives `round(fraction * rows)` rows.
    pub fn split_rows(&self, fraction: f64) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(Error::InvalidArgument(format!(
                "split fraction must be in [0, 1], got {}",
                fraction
            )));
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let split = ((self.row_count as f64) * fraction).round() as usize;
        Ok((
            self.slice_rows(0, split)?,
            self.slice_rows(split, self.row_count)?,
        ))
    }

    /// Split the table into a target column and feature columns
    ///
    /// Without explicit feature names every other column is a feature.
    pub fn tag_columns(&self, target_name: &str, feature_names: Option<&[&str]>) -> Result<TaggedTable> {
        TaggedTable::new(self.clone(), target_name, feature_names)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::empty()
    }
}

fn check_same_columns(names: &[String], row: &Row, index: usize) -> Result<()> {
    let same = row.count() == names.len() && names.iter().all(|name| row.has_column(name));
    if same {
        Ok(())
    } else {
        Err(Error::SchemaMismatch(format!(
            "row {} has columns [{}], expected [{}]",
            index,
            row.get_column_names().join(", "),
            names.join(", ")
        )))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.column_names().join("\t"))?;
        for row in self.rows() {
            let cells: Vec<String> = row.values().iter().map(ToString::to_string).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
