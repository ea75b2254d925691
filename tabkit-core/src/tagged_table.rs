//! Tables split into feature columns and a target column

use crate::column::Column;
use crate::error::{Error, Result};
use crate::table::Table;

/// A table with one designated target column and a list of feature columns
///
/// This is the input contract of model wrappers: they train on the features
/// and learn to predict the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedTable {
    /// Underlying table
    table: Table,

    /// Name of the target column
    target_name: String,

    /// Names of the feature columns, in table order
    feature_names: Vec<String>,
}

impl TaggedTable {
    /// Tag the columns of a table
    ///
    /// Without explicit feature names every non-target column is a feature.
    pub fn new(table: Table, target_name: &str, feature_names: Option<&[&str]>) -> Result<Self> {
        if !table.has_column(target_name) {
            return Err(Error::unknown_column(target_name));
        }

        let feature_names: Vec<String> = match feature_names {
            Some(names) => {
                let missing: Vec<String> = names
                    .iter()
                    .filter(|name| !table.has_column(name))
                    .map(|name| (*name).to_string())
                    .collect();
                if !missing.is_empty() {
                    return Err(Error::UnknownColumnName(missing));
                }
                if names.contains(&target_name) {
                    return Err(Error::InvalidArgument(format!(
                        "target column '{}' cannot also be a feature",
                        target_name
                    )));
                }
                names.iter().map(|name| (*name).to_string()).collect()
            }
            None => table
                .column_names()
                .into_iter()
                .filter(|name| name != target_name)
                .collect(),
        };

        if feature_names.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one feature column is required".into(),
            ));
        }

        Ok(Self {
            table,
            target_name: target_name.to_string(),
            feature_names,
        })
    }

    /// Name of the target column
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Names of the feature columns
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// The target column
    pub fn target(&self) -> Result<&Column> {
        self.table.get_column(&self.target_name)
    }

    /// A table of only the feature columns
    pub fn features(&self) -> Result<Table> {
        let names: Vec<&str> = self.feature_names.iter().map(String::as_str).collect();
        self.table.keep_only_columns(&names)
    }

    /// The full underlying table
    pub fn as_table(&self) -> &Table {
        &self.table
    }

    /// Consume and return the underlying table
    pub fn into_table(self) -> Table {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_dict([("col1", vec![1, 2, 3, 4]), ("col2", vec![1, 2, 3, 4]), ("col3", vec![0, 0, 1, 1])]).unwrap()
    }

    #[test]
    fn test_tag_with_explicit_features() {
        let tagged = table().tag_columns("col1", Some(&["col2"])).unwrap();
        assert_eq!(tagged.target_name(), "col1");
        assert_eq!(tagged.feature_names(), ["col2".to_string()]);
        assert_eq!(tagged.features().unwrap().column_names(), vec!["col2"]);
        assert_eq!(tagged.target().unwrap().len(), 4);
    }

    #[test]
    fn test_tag_defaults_to_all_other_columns() {
        let tagged = table().tag_columns("col2", None).unwrap();
        assert_eq!(tagged.feature_names(), ["col1".to_string(), "col3".to_string()]);
    }

    #[test]
    fn test_tag_rejects_unknown_target() {
        assert!(matches!(
            table().tag_columns("nope", None),
            Err(Error::UnknownColumnName(names)) if names == vec!["nope".to_string()]
        ));
    }

    #[test]
    fn test_tag_rejects_unknown_feature() {
        assert!(matches!(
            table().tag_columns("col1", Some(&["col2", "x"])),
            Err(Error::UnknownColumnName(names)) if names == vec!["x".to_string()]
        ));
    }

    #[test]
    fn test_tag_rejects_target_as_feature() {
        assert!(matches!(
            table().tag_columns("col1", Some(&["col1", "col2"])),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_tag_requires_a_feature() {
        let single = Table::from_dict([("t", vec![1])]).unwrap();
        assert!(matches!(single.tag_columns("t", None), Err(Error::InvalidArgument(_))));
    }
}
