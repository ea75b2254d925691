//! Row: a read-only mapping from column name to value

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::schema::{ColumnType, Field, Schema};
use crate::value::Value;

/// One record of a table
///
/// The schema is shared with the table the row was read from. Equality and
/// hashing consider column names, types and values, but neither column order
/// nor whether a column is nullable.
#[derive(Debug, Clone)]
pub struct Row {
    /// Schema describing the values
    schema: Arc<Schema>,

    /// Values in schema order
    values: Vec<Value>,
}

impl Row {
    /// Create a row from values and an optional schema
    ///
    /// Without a schema the columns are named `column_0`, `column_1`, ... and
    /// their types are inferred from the values.
    pub fn new(values: Vec<Value>, schema: Option<Schema>) -> Result<Self> {
        let schema = match schema {
            Some(schema) => schema,
            None => Schema::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, value)| Field::infer(&format!("column_{}", i), [value]))
                    .collect(),
            )?,
        };
        Self::with_schema(Arc::new(schema), values)
    }

    /// Create a row from values and a shared schema, validating both
    pub fn with_schema(schema: Arc<Schema>, values: Vec<Value>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(Error::SchemaMismatch(format!(
                "row has {} values but the schema has {} columns",
                values.len(),
                schema.len()
            )));
        }
        for (field, value) in schema.fields().iter().zip(&values) {
            if !field.accepts(value) {
                return Err(Error::TypeMismatch(format!(
                    "value '{}' does not fit column '{}' of type {}",
                    value, field.name, field.column_type
                )));
            }
        }
        Ok(Self { schema, values })
    }

    /// Create a row from name/value pairs, inferring the schema
    pub fn from_dict<K, V, I>(data: I) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut fields = Vec::new();
        let mut values = Vec::new();
        for (name, value) in data {
            let value = value.into();
            fields.push(Field::infer(name.as_ref(), [&value]));
            values.push(value);
        }
        Ok(Self {
            schema: Arc::new(Schema::new(fields)?),
            values,
        })
    }

    /// Build a row from parts already known to be consistent
    pub(crate) fn from_parts(schema: Arc<Schema>, values: Vec<Value>) -> Self {
        Self { schema, values }
    }

    /// Get the schema of this row
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Values in schema order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get the value of a column
    pub fn get_value(&self, name: &str) -> Result<&Value> {
        let index = self.schema.index_of(name)?;
        Ok(&self.values[index])
    }

    /// Check whether the row has a column
    pub fn has_column(&self, name: &str) -> bool {
        self.schema.has_column(name)
    }

    /// Column names in schema order
    pub fn get_column_names(&self) -> Vec<String> {
        self.schema.column_names()
    }

    /// Get the type of a column
    pub fn get_type_of_column(&self, name: &str) -> Result<ColumnType> {
        self.schema.get_type_of_column(name)
    }

    /// Number of columns
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Copy the row into a map from column name to value
    pub fn to_dict(&self) -> HashMap<String, Value> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Iterate over column names in schema order
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema.fields().iter().map(Field::name)
    }

    /// Iterate over `(column name, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.column_names().zip(&self.values)
    }
}

impl Row {
    /// `(name, type, value)` for each column, sorted by name
    fn entries(&self) -> Vec<(&str, ColumnType, &Value)> {
        let mut entries: Vec<_> = self
            .schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.name(), field.column_type(), value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl Eq for Row {}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries().hash(state);
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.column_names())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}
