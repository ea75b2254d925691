//! Metrics comparing predicted and expected columns

use tabkit_core::{Column, Error as CoreError};

use crate::error::Result;

/// Check that two columns can be compared by a regression metric
///
/// Both must be numeric and of equal length.
pub fn check_metrics_preconditions(actual: &Column, expected: &Column) -> Result<()> {
    for column in [actual, expected] {
        if !column.column_type().is_numeric() {
            return Err(CoreError::TypeMismatch(format!(
                "column '{}' has type {} but a numeric column is required",
                column.name(),
                column.column_type()
            ))
            .into());
        }
    }
    check_lengths(actual, expected)
}

fn check_lengths(actual: &Column, expected: &Column) -> Result<()> {
    if actual.len() == expected.len() {
        return Ok(());
    }
    Err(CoreError::ColumnLengthMismatch(format!(
        "'{}' has {} values, '{}' has {}",
        actual.name(),
        actual.len(),
        expected.name(),
        expected.len()
    ))
    .into())
}

/// Paired numbers, failing on missing values or empty columns
fn numeric_pairs(actual: &Column, expected: &Column) -> Result<Vec<(f64, f64)>> {
    check_metrics_preconditions(actual, expected)?;
    if actual.is_empty() {
        return Err(CoreError::MissingValues(actual.name().to_string()).into());
    }
    actual
        .iter()
        .zip(expected.iter())
        .map(|(a, e)| match (a.as_f64(), e.as_f64()) {
            (Some(a), Some(e)) => Ok((a, e)),
            (None, _) => Err(CoreError::MissingValues(actual.name().to_string()).into()),
            (_, None) => Err(CoreError::MissingValues(expected.name().to_string()).into()),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean_of<F: Fn(f64) -> f64>(pairs: &[(f64, f64)], f: F) -> f64 {
    pairs.iter().map(|(a, e)| f(a - e)).sum::<f64>() / pairs.len() as f64
}

/// Mean of the squared differences
pub fn mean_squared_error(actual: &Column, expected: &Column) -> Result<f64> {
    Ok(mean_of(&numeric_pairs(actual, expected)?, |d| d * d))
}

/// Mean of the absolute differences
pub fn mean_absolute_error(actual: &Column, expected: &Column) -> Result<f64> {
    Ok(mean_of(&numeric_pairs(actual, expected)?, f64::abs))
}

/// Share of positions where both columns hold the same value
///
/// Works on columns of any type. Values of different types never match.
#[allow(clippy::cast_precision_loss)]
pub fn accuracy(actual: &Column, expected: &Column) -> Result<f64> {
    check_lengths(actual, expected)?;
    if actual.is_empty() {
        return Err(CoreError::MissingValues(actual.name().to_string()).into());
    }
    let hits = actual.iter().zip(expected.iter()).filter(|(a, e)| a == e).count();
    Ok(hits as f64 / actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tabkit_core::Value;
    use test_case::test_case;

    fn column(name: &str, values: Vec<Value>) -> Column {
        Column::new(name, values)
    }

    #[test_case(vec!["A".into(), "B".into()], vec![1.into(), 2.into()]; "actual not numeric")]
    #[test_case(vec![1.into(), 2.into()], vec!["A".into(), "B".into()]; "expected not numeric")]
    fn test_preconditions_reject_non_numeric(actual: Vec<Value>, expected: Vec<Value>) {
        let result = check_metrics_preconditions(&column("actual", actual), &column("expected", expected));
        assert!(matches!(result, Err(Error::Core(CoreError::TypeMismatch(_)))));
    }

    #[test]
    fn test_preconditions_reject_length_mismatch() {
        let actual = column("actual", vec![1.into(), 2.into(), 3.into()]);
        let expected = column("expected", vec![1.into(), 2.into()]);
        assert!(matches!(
            check_metrics_preconditions(&actual, &expected),
            Err(Error::Core(CoreError::ColumnLengthMismatch(message))) if message.contains("'actual' has 3")
        ));
    }

    #[test_case(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0] => 0.0; "perfect")]
    #[test_case(vec![1.0, 2.0], vec![2.0, 4.0] => 2.5; "off")]
    #[test_case(vec![0.0], vec![-3.0] => 9.0; "single")]
    fn test_mean_squared_error(actual: Vec<f64>, expected: Vec<f64>) -> f64 {
        mean_squared_error(
            &Column::from_values("actual", actual),
            &Column::from_values("expected", expected),
        )
        .unwrap()
    }

    #[test_case(vec![1, 2], vec![2, 4] => 1.5; "integers")]
    #[test_case(vec![-1, 1], vec![1, -1] => 2.0; "signs")]
    fn test_mean_absolute_error(actual: Vec<i64>, expected: Vec<i64>) -> f64 {
        mean_absolute_error(
            &Column::from_values("actual", actual),
            &Column::from_values("expected", expected),
        )
        .unwrap()
    }

    #[test]
    fn test_errors_reject_missing_values() {
        let actual = column("actual", vec![1.into(), Value::Null]);
        let expected = column("expected", vec![1.into(), 2.into()]);
        assert!(matches!(
            mean_squared_error(&actual, &expected),
            Err(Error::Core(CoreError::MissingValues(name))) if name == "actual"
        ));
    }

    #[test]
    fn test_errors_reject_empty_columns() {
        let empty = column("actual", vec![]);
        assert!(mean_absolute_error(&empty, &empty).is_err());
        assert!(accuracy(&empty, &empty).is_err());
    }

    #[test]
    fn test_accuracy() {
        let actual = column("actual", vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        let expected = column("expected", vec!["a".into(), "b".into(), "x".into(), "d".into()]);
        assert_eq!(accuracy(&actual, &expected).unwrap(), 0.75);
    }

    #[test]
    fn test_accuracy_does_not_coerce_types() {
        let actual = column("actual", vec![1.into()]);
        let expected = column("expected", vec![1.0.into()]);
        assert_eq!(accuracy(&actual, &expected).unwrap(), 0.0);
    }
}
