//! Schema definition for tabular data

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// 64-bit signed integers
    Integer,

    /// 64-bit floating point numbers (integers are accepted as well)
    Float,

    /// UTF-8 strings
    String,

    /// Booleans
    Boolean,

    /// Mixed or unknown values
    Any,
}

impl ColumnType {
    /// Check if this type is a numeric type
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Check whether a non-null value conforms to this type
    ///
    /// Integers conform to `Float`; nothing is converted.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (ColumnType::Any, _) => true,
            (ColumnType::Float, Value::Integer(_) | Value::Float(_)) => true,
            (expected, value) => value.column_type() == Some(expected),
        }
    }

    /// Infer the type of a sequence of values, inspecting each value once
    ///
    /// Returns the inferred type and whether a missing value was seen. Nulls
    /// do not participate in inference; a sequence without any non-null value
    /// is `Any`.
    pub fn infer<'a, I>(values: I) -> (ColumnType, bool)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut inferred: Option<ColumnType> = None;
        let mut nullable = false;

        for value in values {
            let Some(value_type) = value.column_type() else {
                nullable = true;
                continue;
            };

            inferred = Some(match inferred {
                None => value_type,
                Some(current) if current == value_type => current,
                Some(ColumnType::Integer | ColumnType::Float)
                    if value_type.is_numeric() =>
                {
                    ColumnType::Float
                }
                Some(_) => ColumnType::Any,
            });
        }

        (inferred.unwrap_or(ColumnType::Any), nullable)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "Integer"),
            ColumnType::Float => write!(f, "Float"),
            ColumnType::String => write!(f, "String"),
            ColumnType::Boolean => write!(f, "Boolean"),
            ColumnType::Any => write!(f, "Any"),
        }
    }
}

/// A field in a schema, with a name, column type, and nullability
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Name of the field
    pub name: String,

    /// Semantic type of the field
    pub column_type: ColumnType,

    /// Whether the field can hold missing values
    pub nullable: bool,
}

impl Field {
    /// Create a new field
    pub fn new(name: &str, column_type: ColumnType, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            nullable,
        }
    }

    /// Create a field by inferring its type from values
    pub fn infer<'a, I>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let (column_type, nullable) = ColumnType::infer(values);
        Self::new(name, column_type, nullable)
    }

    /// Get the name of this field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the type of this field
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Check if this field is nullable
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Check whether a value may be stored in this field
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            self.nullable
        } else {
            self.column_type.accepts(value)
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}: {} (nullable)", self.name, self.column_type)
        } else {
            write!(f, "{}: {}", self.name, self.column_type)
        }
    }
}

/// Ordered mapping from column name to column type
///
/// Field order is significant for iteration and display but not for
/// equality or hashing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    /// Fields in this schema
    fields: Vec<Field>,

    /// Field indices by name for faster lookup
    field_indices: HashMap<String, usize>,
}

impl Schema {
    /// Create a new schema with the given fields
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut field_indices = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if field_indices.insert(field.name.clone(), i).is_some() {
                return Err(Error::DuplicateColumnName(field.name.clone()));
            }
        }

        Ok(Self {
            fields,
            field_indices,
        })
    }

    /// Create a schema of non-nullable fields from name/type pairs
    pub fn from_types<'a, I>(types: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, ColumnType)>,
    {
        Self::new(
            types
                .into_iter()
                .map(|(name, column_type)| Field::new(name, column_type, false))
                .collect(),
        )
    }

    /// Create a schema without fields
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether the schema contains a column
    pub fn has_column(&self, name: &str) -> bool {
        self.field_indices.contains_key(name)
    }

    /// Get the type of a column
    pub fn get_type_of_column(&self, name: &str) -> Result<ColumnType> {
        self.field(name).map(Field::column_type)
    }

    /// Get all fields in this schema
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Result<&Field> {
        let index = self.index_of(name)?;
        Ok(&self.fields[index])
    }

    /// Get the position of a field by name
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.field_indices
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_column(name))
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Get the number of fields in this schema
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if this schema is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a projection of this schema with only the specified field names
    pub fn project(&self, names: &[&str]) -> Result<Self> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::UnknownColumnName(missing));
        }

        Self::new(
            names
                .iter()
                .map(|name| self.fields[self.field_indices[*name]].clone())
                .collect(),
        )
    }

    /// Serialize this schema to a binary format
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(Error::Serialization)
    }

    /// Deserialize a schema from a binary format
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(Error::Serialization)
    }

    fn sorted_fields(&self) -> Vec<&Field> {
        let mut fields: Vec<&Field> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        fields
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().all(|field| {
                other
                    .field_indices
                    .get(&field.name)
                    .is_some_and(|&i| other.fields[i] == *field)
            })
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_fields().hash(state);
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = Error;

    fn try_from(fields: Vec<Field>) -> Result<Self> {
        Self::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema: {} fields", self.fields.len())?;
        for field in &self.fields {
            writeln!(f, "  {}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use test_case::test_case;

    fn hash_of(schema: &Schema) -> u64 {
        let mut hasher = DefaultHasher::new();
        schema.hash(&mut hasher);
        hasher.finish()
    }

    fn two_columns() -> Schema {
        Schema::from_types([("a", ColumnType::Integer), ("b", ColumnType::String)]).unwrap()
    }

    #[test_case(vec![Value::from(1), Value::from(2)] => (ColumnType::Integer, false); "integers")]
    #[test_case(vec![Value::from(1), Value::from(2.5)] => (ColumnType::Float, false); "numeric widening")]
    #[test_case(vec![Value::from("a"), Value::Null] => (ColumnType::String, true); "nullable string")]
    #[test_case(vec![Value::from(true)] => (ColumnType::Boolean, false); "boolean")]
    #[test_case(vec![Value::from(0), Value::from("1")] => (ColumnType::Any, false); "mixed")]
    #[test_case(vec![Value::Null] => (ColumnType::Any, true); "only missing")]
    #[test_case(vec![] => (ColumnType::Any, false); "empty")]
    fn test_infer(values: Vec<Value>) -> (ColumnType, bool) {
        ColumnType::infer(&values)
    }

    #[test]
    fn test_has_column() {
        let schema = two_columns();
        assert!(schema.has_column("a"));
        assert!(schema.has_column("b"));
        assert!(!schema.has_column("c"));
    }

    #[test]
    fn test_get_type_of_column() {
        let schema = two_columns();
        assert_eq!(schema.get_type_of_column("b").unwrap(), ColumnType::String);
        match schema.get_type_of_column("c") {
            Err(Error::UnknownColumnName(names)) => assert_eq!(names, vec!["c".to_string()]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = Schema::from_types([("a", ColumnType::Integer), ("a", ColumnType::Float)]);
        assert!(matches!(result, Err(Error::DuplicateColumnName(name)) if name == "a"));
    }

    #[test]
    fn test_equality_ignores_order() {
        let reordered =
            Schema::from_types([("b", ColumnType::String), ("a", ColumnType::Integer)]).unwrap();
        assert_eq!(two_columns(), reordered);
        assert_eq!(hash_of(&two_columns()), hash_of(&reordered));
        assert_ne!(two_columns().column_names(), reordered.column_names());
    }

    #[test]
    fn test_equality_respects_types() {
        let other =
            Schema::from_types([("a", ColumnType::Float), ("b", ColumnType::String)]).unwrap();
        assert_ne!(two_columns(), other);
        assert_ne!(Schema::empty(), two_columns());
    }

    #[test]
    fn test_project() {
        let projected = two_columns().project(&["b"]).unwrap();
        assert_eq!(projected.column_names(), vec!["b".to_string()]);
        assert!(matches!(
            two_columns().project(&["b", "x"]),
            Err(Error::UnknownColumnName(names)) if names == vec!["x".to_string()]
        ));
    }

    #[test]
    fn test_bincode_round_trip_rebuilds_index() {
        let schema = two_columns();
        let decoded = Schema::deserialize(&schema.serialize().unwrap()).unwrap();
        assert_eq!(decoded.index_of("b").unwrap(), 1);
        assert_eq!(decoded, schema);
    }

    #[test]
    fn test_serde_rejects_duplicate_fields() {
        let json = r#"[{"name":"a","column_type":"Integer","nullable":false},
                       {"name":"a","column_type":"String","nullable":false}]"#;
        assert!(serde_json::from_str::<Schema>(json).is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_has_column_iff_constructed(names in proptest::collection::hash_set("[a-z]{1,6}", 0..8), probe in "[a-z]{1,6}") {
            let names: Vec<String> = names.into_iter().collect();
            let schema = Schema::from_types(names.iter().map(|n| (n.as_str(), ColumnType::Any))).unwrap();
            proptest::prop_assert_eq!(schema.has_column(&probe), names.contains(&probe));
            for name in &names {
                proptest::prop_assert!(schema.has_column(name));
            }
        }
    }
}
