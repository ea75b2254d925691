//! Column implementation for storing named sequences of values

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::schema::{ColumnType, Field};
use crate::value::Value;

/// A named, immutable sequence of values with a single semantic type
///
/// Every value is either accepted by the column type or `Null`. Equality is
/// order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    /// Name of the column
    name: String,

    /// Semantic type of the column
    column_type: ColumnType,

    /// Whether any value is missing
    nullable: bool,

    /// The values, in order
    values: Vec<Value>,
}

impl Column {
    /// Create a new column, inferring its type from the values
    pub fn new(name: &str, values: Vec<Value>) -> Self {
        let (column_type, nullable) = ColumnType::infer(&values);
        Self {
            name: name.to_string(),
            column_type,
            nullable,
            values,
        }
    }

    /// Create a new column from anything convertible to values
    pub fn from_values<V, I>(name: &str, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    /// Create a new column with a declared type
    ///
    /// Fails with [`Error::TypeMismatch`] if a non-null value does not
    /// conform to the declared type.
    pub fn with_type(name: &str, column_type: ColumnType, values: Vec<Value>) -> Result<Self> {
        let mut nullable = false;
        for (index, value) in values.iter().enumerate() {
            if value.is_null() {
                nullable = true;
            } else if !column_type.accepts(value) {
                return Err(Error::TypeMismatch(format!(
                    "value '{}' at index {} of column '{}' is not of type {}",
                    value, index, name, column_type
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            column_type,
            nullable,
            values,
        })
    }

    /// Get the name of this column
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the semantic type of this column
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Whether this column holds missing values
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Schema field describing this column
    pub fn field(&self) -> Field {
        Field::new(&self.name, self.column_type, self.nullable)
    }

    /// Get the length of this column (number of values)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if this column is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate over the values
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Get the value at a position
    pub fn get_value(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            length: self.values.len(),
        })
    }

    /// Consume the column and return its values
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Create a column of the values at the given positions, keeping the type
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        let values: Vec<Value> = indices.iter().map(|&i| self.values[i].clone()).collect();
        Self {
            name: self.name.clone(),
            column_type: self.column_type,
            nullable: values.iter().any(Value::is_null),
            values,
        }
    }

    /// Create a copy of this column with another name
    #[must_use]
    pub fn rename(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    /// Create a new column by applying a function to every value
    #[must_use]
    pub fn transform<F>(&self, f: F) -> Self
    where
        F: Fn(&Value) -> Value,
    {
        Self::new(&self.name, self.values.iter().map(f).collect())
    }

    /// Whether any value is missing
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(Value::is_null)
    }

    /// Number of missing values
    pub fn missing_value_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    fn is_all_missing(&self) -> bool {
        self.values.iter().all(Value::is_null)
    }

    /// Share of missing values, `0.0` for an empty column
    #[allow(clippy::cast_precision_loss)]
    pub fn missing_value_ratio(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.missing_value_count() as f64 / self.values.len() as f64
    }

    /// Non-missing values as floats
    ///
    /// Fails if the column type is not numeric or a non-numeric value is
    /// present. A column holding only missing values passes whatever its type.
    fn numeric_values(&self) -> Result<Vec<f64>> {
        if !self.column_type.is_numeric() && !self.is_all_missing() {
            return Err(Error::NonNumericColumn(self.name.clone()));
        }

        let mut numbers = Vec::with_capacity(self.values.len());
        for value in &self.values {
            match value {
                Value::Null => {}
                other => numbers.push(
                    other
                        .as_f64()
                        .ok_or_else(|| Error::NonNumericColumn(self.name.clone()))?,
                ),
            }
        }
        Ok(numbers)
    }

    fn non_empty_numeric_values(&self) -> Result<Vec<f64>> {
        let numbers = self.numeric_values()?;
        if numbers.is_empty() {
            return Err(Error::MissingValues(self.name.clone()));
        }
        Ok(numbers)
    }

    /// Arithmetic mean of the non-missing values
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Result<f64> {
        let numbers = self.non_empty_numeric_values()?;
        Ok(numbers.iter().sum::<f64>() / numbers.len() as f64)
    }

    /// Median of the non-missing values
    pub fn median(&self) -> Result<f64> {
        let mut numbers = self.non_empty_numeric_values()?;
        numbers.sort_by(f64::total_cmp);
        let middle = numbers.len() / 2;
        if numbers.len() % 2 == 0 {
            Ok((numbers[middle - 1] + numbers[middle]) / 2.0)
        } else {
            Ok(numbers[middle])
        }
    }

    /// Sum of the non-missing values, `0.0` if there are none
    pub fn sum(&self) -> Result<f64> {
        Ok(self.numeric_values()?.iter().sum())
    }

    /// Smallest non-missing value
    pub fn minimum(&self) -> Result<Value> {
        self.extreme(std::cmp::Ordering::Less)
    }

    /// Largest non-missing value
    pub fn maximum(&self) -> Result<Value> {
        self.extreme(std::cmp::Ordering::Greater)
    }

    fn extreme(&self, wanted: std::cmp::Ordering) -> Result<Value> {
        self.numeric_values()?;
        let mut best: Option<(&Value, f64)> = None;
        for value in &self.values {
            let Some(number) = value.as_f64() else {
                continue;
            };
            match best {
                Some((_, current)) if number.total_cmp(&current) != wanted => {}
                _ => best = Some((value, number)),
            }
        }
        best.map(|(value, _)| value.clone())
            .ok_or_else(|| Error::MissingValues(self.name.clone()))
    }

    /// Sample variance of the non-missing values
    ///
    /// A single value has a variance of `0.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self) -> Result<f64> {
        let numbers = self.non_empty_numeric_values()?;
        if numbers.len() == 1 {
            return Ok(0.0);
        }
        let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
        let squares: f64 = numbers.iter().map(|x| (x - mean).powi(2)).sum();
        Ok(squares / (numbers.len() - 1) as f64)
    }

    /// Sample standard deviation of the non-missing values
    pub fn standard_deviation(&self) -> Result<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Pearson correlation with another numeric column of equal length
    ///
    /// Neither column may contain missing values or be constant.
    pub fn correlation_with(&self, other: &Column) -> Result<f64> {
        if self.len() != other.len() {
            return Err(Error::ColumnLengthMismatch(format!(
                "'{}' has {} values, '{}' has {}",
                self.name,
                self.len(),
                other.name,
                other.len()
            )));
        }
        let xs = self.non_empty_numeric_values()?;
        let ys = other.non_empty_numeric_values()?;
        for (column, numbers) in [(self, &xs), (other, &ys)] {
            if numbers.len() != column.len() {
                return Err(Error::MissingValues(column.name.clone()));
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let mut covariance = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in xs.iter().zip(&ys) {
            covariance += (x - mean_x) * (y - mean_y);
            var_x += (x - mean_x).powi(2);
            var_y += (y - mean_y).powi(2);
        }
        for (column, variance) in [(self, var_x), (other, var_y)] {
            if variance <= 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "column '{}' is constant, its correlation is undefined",
                    column.name
                )));
            }
        }
        Ok(covariance / (var_x * var_y).sqrt())
    }

    fn value_counts(&self) -> HashMap<&Value, usize> {
        let mut counts = HashMap::new();
        for value in self.values.iter().filter(|v| !v.is_null()) {
            *counts.entry(value).or_insert(0) += 1;
        }
        counts
    }

    /// Most frequent non-missing values, sorted
    pub fn mode(&self) -> Vec<Value> {
        let counts = self.value_counts();
        let Some(&top) = counts.values().max() else {
            return Vec::new();
        };
        let mut modes: Vec<Value> = counts
            .into_iter()
            .filter(|&(_, count)| count == top)
            .map(|(value, _)| value.clone())
            .collect();
        modes.sort();
        modes
    }

    /// Share of non-missing values equal to the most common one
    #[allow(clippy::cast_precision_loss)]
    pub fn stability(&self) -> Result<f64> {
        let counts = self.value_counts();
        let total: usize = counts.values().sum();
        let top = counts
            .values()
            .max()
            .copied()
            .ok_or_else(|| Error::MissingValues(self.name.clone()))?;
        Ok(top as f64 / total as f64)
    }

    /// Number of distinct values (missing included) divided by length
    #[allow(clippy::cast_precision_loss)]
    pub fn idness(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(Error::MissingValues(self.name.clone()));
        }
        Ok(self.distinct_values().len() as f64 / self.values.len() as f64)
    }

    /// Distinct values in order of first occurrence
    pub fn distinct_values(&self) -> Vec<Value> {
        let mut seen = std::collections::HashSet::new();
        self.values
            .iter()
            .filter(|v| seen.insert(*v))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): [", self.name, self.column_type)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn numbers(values: &[i64]) -> Column {
        Column::from_values("col1", values.iter().copied())
    }

    #[test]
    fn test_get_value_valid() {
        let column = Column::new("testColumn", vec![Value::from(0), Value::from("1")]);
        assert_eq!(column.get_value(0).unwrap(), &Value::Integer(0));
        assert_eq!(column.get_value(1).unwrap(), &Value::from("1"));
        assert_eq!(column.column_type(), ColumnType::Any);
    }

    #[test]
    fn test_get_value_invalid() {
        let column = Column::new("testColumn", vec![Value::from(0), Value::from("1")]);
        assert!(matches!(
            column.get_value(2),
            Err(Error::IndexOutOfBounds { index: 2, length: 2 })
        ));
        assert!(matches!(
            column.get_value(usize::MAX),
            Err(Error::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_mean_valid() {
        assert_eq!(numbers(&[1, 2, 3, 4]).mean().unwrap(), 2.5);
    }

    #[test]
    fn test_mean_invalid() {
        let column = Column::new("col1", vec![Value::from("col1_1"), Value::from(2)]);
        assert!(matches!(column.mean(), Err(Error::NonNumericColumn(name)) if name == "col1"));
    }

    #[test]
    fn test_mean_skips_missing_values() {
        let column = Column::new("c", vec![Value::from(1), Value::Null, Value::from(3)]);
        assert_eq!(column.mean().unwrap(), 2.0);
        let empty = Column::new("c", vec![Value::Null]);
        assert_eq!(empty.column_type(), ColumnType::Any);
        assert!(matches!(empty.mean(), Err(Error::MissingValues(name)) if name == "c"));
        assert_eq!(empty.sum().unwrap(), 0.0);
        let text = Column::from_values("c", ["a"]);
        assert!(matches!(text.mean(), Err(Error::NonNumericColumn(_))));
        let typed = Column::with_type("c", ColumnType::Integer, vec![Value::Null]).unwrap();
        assert!(matches!(typed.mean(), Err(Error::MissingValues(name)) if name == "c"));
    }

    #[test_case(&[1, 2, 3] => 2.0; "odd")]
    #[test_case(&[4, 1, 3, 2] => 2.5; "even")]
    fn test_median(values: &[i64]) -> f64 {
        numbers(values).median().unwrap()
    }

    #[test]
    fn test_minimum_and_maximum_keep_variant() {
        let column = Column::new("c", vec![Value::from(3), Value::from(-1.5), Value::Null]);
        assert_eq!(column.minimum().unwrap(), Value::Float(-1.5));
        assert_eq!(column.maximum().unwrap(), Value::Integer(3));
    }

    #[test]
    fn test_variance_and_standard_deviation() {
        let column = numbers(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert!((column.variance().unwrap() - 32.0 / 7.0).abs() < 1e-12);
        assert!((column.standard_deviation().unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(numbers(&[5]).variance().unwrap(), 0.0);
    }

    #[test]
    fn test_sum_of_strings_fails() {
        let column = Column::from_values("s", ["a", "b"]);
        assert!(matches!(column.sum(), Err(Error::NonNumericColumn(_))));
    }

    #[test]
    fn test_correlation() {
        let a = numbers(&[1, 2, 3]);
        let b = numbers(&[2, 4, 6]);
        assert!((a.correlation_with(&b).unwrap() - 1.0).abs() < 1e-12);
        assert!(matches!(
            a.correlation_with(&numbers(&[1, 2])),
            Err(Error::ColumnLengthMismatch(_))
        ));
    }

    #[test]
    fn test_correlation_with_constant_column() {
        let constant = Column::from_values("flat", [1, 1, 1]);
        let varying = numbers(&[1, 2, 3]);
        for result in [varying.correlation_with(&constant), constant.correlation_with(&varying)] {
            assert!(matches!(
                result,
                Err(Error::InvalidArgument(message)) if message.contains("'flat' is constant")
            ));
        }
    }

    #[test]
    fn test_mode_stability_idness() {
        let column = Column::from_values("c", ["a", "b", "b", "a", "c"]);
        assert_eq!(column.mode(), vec![Value::from("a"), Value::from("b")]);
        assert!((column.stability().unwrap() - 0.4).abs() < 1e-12);
        assert!((column.idness().unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_missing_values() {
        let column = Column::new("c", vec![Value::Null, Value::from(1), Value::Null, Value::from(2)]);
        assert!(column.has_missing_values());
        assert!(column.is_nullable());
        assert_eq!(column.missing_value_count(), 2);
        assert_eq!(column.missing_value_ratio(), 0.5);
    }

    #[test]
    fn test_with_type_rejects_foreign_values() {
        let result = Column::with_type("c", ColumnType::Integer, vec![Value::from(1), Value::from("x")]);
        assert!(matches!(result, Err(Error::TypeMismatch(msg)) if msg.contains("index 1")));
        let widened = Column::with_type("c", ColumnType::Float, vec![Value::from(1), Value::from(0.5)]);
        assert!(widened.is_ok());
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        assert_eq!(numbers(&[1, 2]), numbers(&[1, 2]));
        assert_ne!(numbers(&[1, 2]), numbers(&[2, 1]));
        assert_ne!(numbers(&[1, 2]), numbers(&[1, 2]).rename("other"));
    }

    #[test]
    fn test_transform_reinfers_type() {
        let column = numbers(&[1, 2]).transform(|v| Value::from(v.to_string()));
        assert_eq!(column.column_type(), ColumnType::String);
        assert_eq!(column.name(), "col1");
    }
}
