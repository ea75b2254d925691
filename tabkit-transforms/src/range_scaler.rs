//! Min-max scaling of numeric columns

use std::hash::{Hash, Hasher};

use tabkit_core::Table;
use tracing::debug;

use crate::error::{Error, Result};
use crate::scaling::{require_numeric, scale, unscale, LinearMap};
use crate::transformer::{hash_structure, resolve_column_names, InvertibleTableTransformer, TableTransformer};

/// Maps each fitted numeric column linearly from its fitted `[min, max]` to
/// a target range
///
/// A column whose values are all equal maps to the lower end of the range.
/// Missing values stay missing.
#[derive(Debug, Clone)]
pub struct RangeScaler {
    min: f64,
    max: f64,
    fitted: Option<Vec<LinearMap>>,
}

impl Default for RangeScaler {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            fitted: None,
        }
    }
}

impl RangeScaler {
    /// Create an unfitted scaler targeting `[0, 1]`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unfitted scaler targeting `[min, max]`
    pub fn with_range(min: f64, max: f64) -> Result<Self> {
        if !(min < max) {
            return Err(Error::InvalidParameter(format!(
                "range minimum {} must be smaller than maximum {}",
                min, max
            )));
        }
        Ok(Self {
            min,
            max,
            fitted: None,
        })
    }

    /// Lower end of the target range
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper end of the target range
    pub fn max(&self) -> f64 {
        self.max
    }

    fn fitted(&self) -> Result<&[LinearMap]> {
        self.fitted.as_deref().ok_or(Error::TransformerNotFitted)
    }
}

impl TableTransformer for RangeScaler {
    const KIND: &'static str = "RangeScaler";

    fn fit(&self, table: &Table, column_names: Option<&[&str]>) -> Result<Self> {
        let names = resolve_column_names(table, column_names)?;
        let mut maps = Vec::with_capacity(names.len());
        for name in &names {
            let column = table.get_column(name)?;
            require_numeric(column)?;
            let low = column.minimum()?.as_f64().unwrap_or_default();
            let high = column.maximum()?.as_f64().unwrap_or_default();
            let factor = if high > low {
                (self.max - self.min) / (high - low)
            } else {
                0.0
            };
            maps.push(LinearMap {
                name: name.clone(),
                column_type: column.column_type(),
                center: low,
                factor,
                base: self.min,
            });
        }
        debug!(columns = ?names, min = self.min, max = self.max, "fitted range scaler");
        Ok(Self {
            fitted: Some(maps),
            ..self.clone()
        })
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

impl InvertibleTableTransformer for RangeScaler {
    fn inverse_transform(&self, transformed_table: &Table) -> Result<Table> {
        unscale(self.fitted()?, transformed_table)
    }
}

impl Hash for RangeScaler {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_structure(self, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tabkit_core::{ColumnType, Value};
    use test_case::test_case;

    fn numbers() -> Table {
        Table::from_dict([
            ("a", vec![Value::from(0), Value::from(2), Value::Null, Value::from(4)]),
            ("b", vec![Value::from(1.0), Value::from(1.0), Value::from(1.0), Value::from(1.0)]),
            ("c", vec![Value::from("x"), Value::from("y"), Value::from("z"), Value::from("w")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_range() {
        let fitted = RangeScaler::new().fit(&numbers(), Some(&["a"])).unwrap();
        let scaled = fitted.transform(&numbers()).unwrap();
        let a = scaled.get_column("a").unwrap();
        assert_eq!(a.column_type(), ColumnType::Float);
        assert_eq!(
            a.values(),
            [Value::from(0.0), Value::from(0.5), Value::Null, Value::from(1.0)]
        );
    }

    #[test]
    fn test_custom_range() {
        let fitted = RangeScaler::with_range(-1.0, 1.0)
            .unwrap()
            .fit(&numbers(), Some(&["a"]))
            .unwrap();
        let scaled = fitted.transform(&numbers()).unwrap();
        assert_eq!(
            scaled.get_column("a").unwrap().values(),
            [Value::from(-1.0), Value::from(0.0), Value::Null, Value::from(1.0)]
        );
    }

    #[test]
    fn test_constant_column_maps_to_minimum() {
        let fitted = RangeScaler::with_range(2.0, 3.0).unwrap().fit(&numbers(), Some(&["b"])).unwrap();
        let scaled = fitted.transform(&numbers()).unwrap();
        assert!(scaled.get_column("b").unwrap().iter().all(|v| *v == Value::from(2.0)));
        assert_eq!(fitted.inverse_transform(&scaled).unwrap(), numbers());
    }

    #[test_case(1.0, 1.0; "empty range")]
    #[test_case(2.0, 1.0; "reversed range")]
    #[test_case(f64::NAN, 1.0; "not a number")]
    fn test_with_range_rejects(min: f64, max: f64) {
        assert!(matches!(RangeScaler::with_range(min, max), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_fit_rejects_non_numeric_column() {
        assert!(matches!(
            RangeScaler::new().fit(&numbers(), None),
            Err(Error::Core(tabkit_core::Error::NonNumericColumn(name))) if name == "c"
        ));
    }

    #[test]
    fn test_fit_keeps_range_and_receiver() {
        let scaler = RangeScaler::with_range(5.0, 6.0).unwrap();
        let fitted = scaler.fit(&numbers(), Some(&["a"])).unwrap();
        assert!(!scaler.is_fitted());
        assert_eq!((fitted.min(), fitted.max()), (5.0, 6.0));
        assert_eq!(fitted.get_names_of_changed_columns().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_unfitted_transform_fails() {
        assert!(matches!(RangeScaler::new().transform(&numbers()), Err(Error::TransformerNotFitted)));
        assert!(matches!(
            RangeScaler::new().inverse_transform(&numbers()),
            Err(Error::TransformerNotFitted)
        ));
    }

    #[test]
    fn test_unfitted_scalers_hash_equally() {
        let custom = RangeScaler::with_range(-3.0, 3.0).unwrap();
        assert_eq!(custom.structural_hash(), RangeScaler::new().structural_hash());
    }

    proptest! {
        #[test]
        fn prop_inverse_undoes_transform(values in prop::collection::vec(-1000i64..1000, 1..30)) {
            let table = Table::from_dict([("x", values)]).unwrap();
            let fitted = RangeScaler::new().fit(&table, None).unwrap();
            let restored = fitted.inverse_transform(&fitted.transform(&table).unwrap()).unwrap();
            prop_assert_eq!(restored, table);
        }
    }
}
