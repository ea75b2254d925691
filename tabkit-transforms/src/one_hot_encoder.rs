//! One-hot encoding: one indicator column per distinct value

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

use tabkit_core::{Column, ColumnType, Table, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::transformer::{
    hash_structure, require_columns, resolve_column_names, InvertibleTableTransformer, TableTransformer,
};

/// Categories learned for one column
#[derive(Debug, Clone)]
struct CategoricalColumn {
    name: String,
    column_type: ColumnType,
    /// Index of the column in the fitted table
    position: usize,
    /// Distinct values, missing included, sorted
    categories: Vec<Value>,
    /// Name of the indicator column of each category
    indicator_names: Vec<String>,
    positions: HashMap<Value, usize>,
}

impl CategoricalColumn {
    /// Fails if two categories display alike and would share an indicator
    fn fit(column: &Column, position: usize) -> Result<Self> {
        let categories: Vec<Value> = column
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let indicator_names: Vec<String> = categories
            .iter()
            .map(|category| indicator_name(column.name(), category))
            .collect();
        let mut seen = HashSet::with_capacity(indicator_names.len());
        if let Some(clash) = indicator_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(Error::IndicatorNameClash {
                column: column.name().to_string(),
                indicator: clash.clone(),
            });
        }
        let positions = categories
            .iter()
            .enumerate()
            .map(|(position, category)| (category.clone(), position))
            .collect();
        Ok(Self {
            name: column.name().to_string(),
            column_type: column.column_type(),
            position,
            categories,
            indicator_names,
            positions,
        })
    }

    fn encode(&self, column: &Column) -> Result<Vec<Column>> {
        let mut indicators = vec![vec![Value::Integer(0); column.len()]; self.categories.len()];
        for (row, value) in column.iter().enumerate() {
            let position = self
                .positions
                .get(value)
                .ok_or_else(|| Error::ValueNotPresentWhenFitted {
                    column: self.name.clone(),
                    value: value.to_string(),
                })?;
            indicators[*position][row] = Value::Integer(1);
        }
        self.indicator_names
            .iter()
            .zip(indicators)
            .map(|(name, values)| Ok(Column::with_type(name, ColumnType::Integer, values)?))
            .collect::<Result<Vec<_>>>()
    }

    fn decode(&self, table: &Table) -> Result<Column> {
        let indicators = self
            .indicator_names
            .iter()
            .map(|name| table.get_column(name))
            .collect::<tabkit_core::Result<Vec<_>>>()?;

        let mut values = Vec::with_capacity(table.count_rows());
        for row in 0..table.count_rows() {
            let mut hot = None;
            for (position, indicator) in indicators.iter().enumerate() {
                match indicator.get_value(row)? {
                    Value::Integer(0) => {}
                    Value::Integer(1) if hot.is_none() => hot = Some(position),
                    _ => return Err(self.invalid_row(&indicators, row)),
                }
            }
            let position = hot.ok_or_else(|| self.invalid_row(&indicators, row))?;
            values.push(self.categories[position].clone());
        }
        Ok(Column::with_type(&self.name, self.column_type, values)?)
    }

    fn invalid_row(&self, indicators: &[&Column], row: usize) -> Error {
        let flags: Vec<String> = indicators
            .iter()
            .map(|indicator| indicator.values()[row].to_string())
            .collect();
        Error::InvalidEncodedValue {
            column: self.name.clone(),
            value: format!("[{}]", flags.join(", ")),
        }
    }
}

fn indicator_name(column_name: &str, category: &Value) -> String {
    format!("{}__{}", column_name, category)
}

/// Replaces each fitted column by one `0`/`1` column per distinct value
///
/// Indicator columns are named `<column>__<value>`, with `null` for the
/// missing value, and take the position of the column they replace.
#[derive(Debug, Clone, Default)]
pub struct OneHotEncoder {
    fitted: Option<Vec<CategoricalColumn>>,
}

impl OneHotEncoder {
    /// Create an unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    fn fitted(&self) -> Result<&[CategoricalColumn]> {
        self.fitted.as_deref().ok_or(Error::TransformerNotFitted)
    }
}

impl TableTransformer for OneHotEncoder {
    const KIND: &'static str = "OneHotEncoder";

    fn fit(&self, table: &Table, column_names: Option<&[&str]>) -> Result<Self> {
        let names = resolve_column_names(table, column_names)?;
        let fitted = names
            .iter()
            .map(|name| CategoricalColumn::fit(table.get_column(name)?, table.schema().index_of(name)?))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            columns = ?names,
            indicators = fitted.iter().map(|c| c.categories.len()).sum::<usize>(),
            "fitted one-hot encoder"
        );
        Ok(Self { fitted: Some(fitted) })
    }

    fn transform(&self, table: &Table) -> Result<Table> {
        let fitted = self.fitted()?;
        require_columns(table, fitted.iter().map(|c| c.name.as_str()))?;
        let mut result = table.clone();
        for categorical in fitted {
            let indicators = categorical.encode(table.get_column(&categorical.name)?)?;
            result = result.replace_column(&categorical.name, indicators)?;
        }
        Ok(result)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn get_names_of_added_columns(&self) -> Result<Vec<String>> {
        Ok(self
            .fitted()?
            .iter()
            .flat_map(|c| c.indicator_names.iter().cloned())
            .collect())
    }

    fn get_names_of_changed_columns(&self) -> Result<Vec<String>> {
        self.fitted().map(|_| Vec::new())
    }

    fn get_names_of_removed_columns(&self) -> Result<Vec<String>> {
        Ok(self.fitted()?.iter().map(|c| c.name.clone()).collect())
    }
}

impl InvertibleTableTransformer for OneHotEncoder {
    fn inverse_transform(&self, transformed_table: &Table) -> Result<Table> {
        let fitted = self.fitted()?;
        require_columns(
            transformed_table,
            fitted
                .iter()
                .flat_map(|c| c.indicator_names.iter().map(String::as_str)),
        )?;

        let mut result = transformed_table.clone();
        for categorical in fitted {
            let restored = categorical.decode(transformed_table)?;
            let Some((first, rest)) = categorical.indicator_names.split_first() else {
                // Only a table without rows yields no categories.
                let mut columns = result.to_columns();
                columns.insert(categorical.position.min(columns.len()), restored);
                result = Table::from_columns(columns)?;
                continue;
            };
            let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
            result = result
                .remove_columns(&rest)?
                .replace_column(first, vec![restored])?;
        }
        Ok(result)
    }
}

impl Hash for OneHotEncoder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_structure(self, state);
    }
}
