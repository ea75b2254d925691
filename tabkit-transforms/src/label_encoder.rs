//! Label encoding: distinct values to integer codes

use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

use tabkit_core::{Column, ColumnType, Table, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::transformer::{
    hash_structure, require_columns, resolve_column_names, InvertibleTableTransformer, TableTransformer,
};

/// Codes learned for one column
#[derive(Debug, Clone)]
struct EncodedColumn {
    name: String,
    column_type: ColumnType,
    /// Distinct non-null values, sorted; a value's code is its position
    labels: Vec<Value>,
    codes: HashMap<Value, i64>,
}

impl EncodedColumn {
    fn fit(column: &Column) -> Self {
        let labels: Vec<Value> = column
            .iter()
            .filter(|value| !value.is_null())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let codes = labels
            .iter()
            .zip(0_i64..)
            .map(|(label, code)| (label.clone(), code))
            .collect();
        Self {
            name: column.name().to_string(),
            column_type: column.column_type(),
            labels,
            codes,
        }
    }

    fn encode(&self, column: &Column) -> Result<Column> {
        let values = column
            .iter()
            .map(|value| match value {
                Value::Null => Ok(Value::Null),
                value => self
                    .codes
                    .get(value)
                    .map(|&code| Value::Integer(code))
                    .ok_or_else(|| Error::ValueNotPresentWhenFitted {
                        column: self.name.clone(),
                        value: value.to_string(),
                    }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Column::with_type(&self.name, ColumnType::Integer, values)?)
    }

    fn decode(&self, column: &Column) -> Result<Column> {
        let values = column
            .iter()
            .map(|value| match value {
                Value::Null => Ok(Value::Null),
                value => value
                    .as_i64()
                    .and_then(|code| usize::try_from(code).ok())
                    .and_then(|index| self.labels.get(index))
                    .cloned()
                    .ok_or_else(|| Error::InvalidEncodedValue {
                        column: self.name.clone(),
                        value: value.to_string(),
                    }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Column::with_type(&self.name, self.column_type, values)?)
    }
}

/// Replaces the values of each fitted column by integer codes
///
/// The distinct non-null values of a column, in ascending order, are coded
/// `0, 1, 2, ...`. Missing values stay missing.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    fitted: Option<Vec<EncodedColumn>>,
}

impl LabelEncoder {
    /// Create an unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes learned for a column, in code order
    pub fn labels(&self, column_name: &str) -> Result<&[Value]> {
        self.fitted()?
            .iter()
            .find(|encoded| encoded.name == column_name)
            .map(|encoded| encoded.labels.as_slice())
            .ok_or_else(|| tabkit_core::Error::unknown_column(column_name).into())
    }

    fn fitted(&self) -> Result<&[EncodedColumn]> {
        self.fitted.as_deref().ok_or(Error::TransformerNotFitted)
    }

    fn apply<F>(&self, table: &Table, f: F) -> Result<Table>
    where
        F: Fn(&EncodedColumn, &Column) -> Result<Column>,
    {
        let fitted = self.fitted()?;
        require_columns(table, fitted.iter().map(|encoded| encoded.name.as_str()))?;
        let mut result = table.clone();
        for encoded in fitted {
            let column = f(encoded, table.get_column(&encoded.name)?)?;
            result = result.replace_column(&encoded.name, vec![column])?;
        }
        Ok(result)
    }
}

impl TableTransformer for LabelEncoder {
    const KIND: &'static str = "LabelEncoder";

    fn fit(&self, table: &Table, column_names: Option<&[&str]>) -> Result<Self> {
        let names = resolve_column_names(table, column_names)?;
        let fitted = names
            .iter()
            .map(|name| Ok(EncodedColumn::fit(table.get_column(name)?)))
            .collect::<Result<Vec<_>>>()?;
        debug!(columns = ?names, "fitted label encoder");
        Ok(Self { fitted: Some(fitted) })
    }

    fn transform(&self, table: &Table) -> Result<Table> {
        self.apply(table, EncodedColumn::encode)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn get_names_of_added_columns(&self) -> Result<Vec<String>> {
        self.fitted().map(|_| Vec::new())
    }

    fn get_names_of_changed_columns(&self) -> Result<Vec<String>> {
        Ok(self.fitted()?.iter().map(|encoded| encoded.name.clone()).collect())
    }

    fn get_names_of_removed_columns(&self) -> Result<Vec<String>> {
        self.fitted().map(|_| Vec::new())
    }
}

impl InvertibleTableTransformer for LabelEncoder {
    fn inverse_transform(&self, transformed_table: &Table) -> Result<Table> {
        self.apply(transformed_table, EncodedColumn::decode)
    }
}

impl Hash for LabelEncoder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_structure(self, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn colors() -> Table {
        Table::from_dict([
            ("color", vec![Value::from("red"), Value::from("blue"), Value::Null, Value::from("red")]),
            ("size", vec![Value::from(3), Value::from(1), Value::from(2), Value::from(1)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_fit_returns_new_instance() {
        let encoder = LabelEncoder::new();
        let fitted = encoder.fit(&colors(), None).unwrap();
        assert!(!encoder.is_fitted());
        assert!(fitted.is_fitted());
    }

    #[test]
    fn test_codes_follow_sorted_values() {
        let fitted = LabelEncoder::new().fit(&colors(), Some(&["color"])).unwrap();
        assert_eq!(fitted.labels("color").unwrap(), [Value::from("blue"), Value::from("red")]);

        let transformed = fitted.transform(&colors()).unwrap();
        let color = transformed.get_column("color").unwrap();
        assert_eq!(color.column_type(), ColumnType::Integer);
        assert_eq!(
            color.values(),
            [Value::from(1), Value::from(0), Value::Null, Value::from(1)]
        );
        assert_eq!(transformed.get_column("size").unwrap(), colors().get_column("size").unwrap());
    }

    #[test]
    fn test_column_names() {
        let fitted = LabelEncoder::new().fit(&colors(), None).unwrap();
        assert!(fitted.get_names_of_added_columns().unwrap().is_empty());
        assert_eq!(fitted.get_names_of_changed_columns().unwrap(), vec!["color", "size"]);
        assert!(fitted.get_names_of_removed_columns().unwrap().is_empty());
    }

    #[test]
    fn test_unfitted_operations_fail() {
        let encoder = LabelEncoder::new();
        assert!(matches!(encoder.transform(&colors()), Err(Error::TransformerNotFitted)));
        assert!(matches!(encoder.inverse_transform(&colors()), Err(Error::TransformerNotFitted)));
        assert!(matches!(encoder.get_names_of_added_columns(), Err(Error::TransformerNotFitted)));
        assert!(matches!(encoder.get_names_of_changed_columns(), Err(Error::TransformerNotFitted)));
        assert!(matches!(encoder.get_names_of_removed_columns(), Err(Error::TransformerNotFitted)));
    }

    #[test]
    fn test_fit_rejects_unknown_column() {
        assert!(matches!(
            LabelEncoder::new().fit(&colors(), Some(&["weight"])),
            Err(Error::Core(tabkit_core::Error::UnknownColumnName(_)))
        ));
    }

    #[test]
    fn test_transform_requires_fitted_columns() {
        let fitted = LabelEncoder::new().fit(&colors(), None).unwrap();
        let without_size = colors().remove_columns(&["size"]).unwrap();
        assert!(matches!(
            fitted.transform(&without_size),
            Err(Error::Core(tabkit_core::Error::UnknownColumnName(names))) if names == vec!["size"]
        ));
    }

    #[test]
    fn test_transform_rejects_unseen_value() {
        let fitted = LabelEncoder::new().fit(&colors(), Some(&["color"])).unwrap();
        let other = Table::from_dict([("color", vec!["green"])]).unwrap();
        assert!(matches!(
            fitted.transform(&other),
            Err(Error::ValueNotPresentWhenFitted { column, value }) if column == "color" && value == "green"
        ));
    }

    #[test]
    fn test_inverse_rejects_unknown_code() {
        let fitted = LabelEncoder::new().fit(&colors(), Some(&["color"])).unwrap();
        let codes = Table::from_dict([("color", vec![0, 7])]).unwrap();
        assert!(matches!(
            fitted.inverse_transform(&codes),
            Err(Error::InvalidEncodedValue { value, .. }) if value == "7"
        ));
    }

    #[test]
    fn test_inverse_restores_table() {
        let fitted = LabelEncoder::new().fit(&colors(), None).unwrap();
        let restored = fitted.inverse_transform(&fitted.transform(&colors()).unwrap()).unwrap();
        assert_eq!(restored, colors());
    }

    #[test]
    fn test_fit_and_transform_matches_two_steps() {
        let encoder = LabelEncoder::new();
        let direct = encoder.fit_and_transform(&colors(), None).unwrap();
        let stepwise = encoder.fit(&colors(), None).unwrap().transform(&colors()).unwrap();
        assert_eq!(direct, stepwise);
        assert!(!encoder.is_fitted());
    }

    #[test]
    fn test_unfitted_encoders_hash_equally() {
        assert_eq!(LabelEncoder::new().structural_hash(), LabelEncoder::default().structural_hash());
    }

    proptest! {
        #[test]
        fn prop_inverse_undoes_transform(values in prop::collection::vec(prop::option::of(-5i64..5), 1..20)) {
            let table = Table::from_dict([("x", values)]).unwrap();
            let fitted = LabelEncoder::new().fit(&table, None).unwrap();
            let restored = fitted.inverse_transform(&fitted.transform(&table).unwrap()).unwrap();
            prop_assert_eq!(restored, table);
        }
    }
}
