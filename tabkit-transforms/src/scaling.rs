//! Linear maps shared by the numeric scalers

use tabkit_core::{Column, ColumnType, Table, Value};

use crate::error::Result;
use crate::transformer::require_columns;

/// `x' = (x - center) * factor + base` learned for one column
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinearMap {
    pub(crate) name: String,
    pub(crate) column_type: ColumnType,
    pub(crate) center: f64,
    pub(crate) factor: f64,
    pub(crate) base: f64,
}

impl LinearMap {
    fn forward(&self, x: f64) -> f64 {
        (x - self.center) * self.factor + self.base
    }

    // A zero factor collapses every value, so only the center can be restored.
    fn backward(&self, y: f64) -> f64 {
        if self.factor == 0.0 {
            self.center
        } else {
            (y - self.base) / self.factor + self.center
        }
    }

    fn apply(&self, column: &Column) -> Result<Column> {
        let values = map_numbers(column, |x| Value::Float(self.forward(x)))?;
        Ok(Column::with_type(&self.name, ColumnType::Float, values)?)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn unapply(&self, column: &Column) -> Result<Column> {
        let values = map_numbers(column, |y| {
            let x = self.backward(y);
            if self.column_type == ColumnType::Integer && x.is_finite() {
                Value::Integer(x.round() as i64)
            } else {
                Value::Float(x)
            }
        })?;
        Ok(Column::with_type(&self.name, self.column_type, values)?)
    }
}

/// Fail unless the column is numeric
pub(crate) fn require_numeric(column: &Column) -> Result<()> {
    if column.column_type().is_numeric() {
        Ok(())
    } else {
        Err(tabkit_core::Error::NonNumericColumn(column.name().to_string()).into())
    }
}

fn map_numbers<F>(column: &Column, f: F) -> Result<Vec<Value>>
where
    F: Fn(f64) -> Value,
{
    column
        .iter()
        .map(|value| match value {
            Value::Null => Ok(Value::Null),
            value => value
                .as_f64()
                .map(&f)
                .ok_or_else(|| tabkit_core::Error::NonNumericColumn(column.name().to_string()).into()),
        })
        .collect()
}

/// Map every fitted column forwards
pub(crate) fn scale(maps: &[LinearMap], table: &Table) -> Result<Table> {
    rebuild(maps, table, LinearMap::apply)
}

/// Map every fitted column backwards
pub(crate) fn unscale(maps: &[LinearMap], table: &Table) -> Result<Table> {
    rebuild(maps, table, LinearMap::unapply)
}

fn rebuild<F>(maps: &[LinearMap], table: &Table, f: F) -> Result<Table>
where
    F: Fn(&LinearMap, &Column) -> Result<Column>,
{
    require_columns(table, maps.iter().map(|map| map.name.as_str()))?;
    let mut result = table.clone();
    for map in maps {
        let column = f(map, table.get_column(&map.name)?)?;
        result = result.replace_column(&map.name, vec![column])?;
    }
    Ok(result)
}
