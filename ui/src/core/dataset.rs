//! Cache entries and the errors raised while resolving them.

use std::rc::Rc;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

pub use api::model::{Cell, Dataset, ScalarDict, ScalarValue, IMAGE_DATA_PREFIX};

/// Cache key of the summary scalars used by the text views.
pub const BASICS_KEY: &str = "basics_dict";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Couldn't load `{name}`: {message}")]
    Fetch { name: String, message: String },
    #[error("`{name}` is not valid JSON: {message}")]
    Malformed { name: String, message: String },
    #[error("`{name}` is not a {expected}")]
    WrongKind { name: String, expected: &'static str },
    #[error("Row {row} of `{name}` has {found} cells, expected {expected}")]
    RaggedRow {
        name: String,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("Column `{column}` not found in `{name}`")]
    MissingColumn { name: String, column: String },
}

/// A cached value: a table-shaped dataset or a flat scalar dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Dataset(Rc<Dataset>),
    Scalars(Rc<ScalarDict>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Dataset(Dataset),
    Scalars(ScalarDict),
}

impl CacheEntry {
    /// Parse a named JSON resource and check the row shape.
    pub fn from_json(name: &str, raw: &str) -> Result<Self, DataError> {
        let parsed: RawEntry = serde_json::from_str(raw).map_err(|err| DataError::Malformed {
            name: name.to_string(),
            message: err.to_string(),
        })?;

        match parsed {
            RawEntry::Dataset(dataset) => Self::checked_dataset(name, dataset),
            RawEntry::Scalars(scalars) => Ok(CacheEntry::Scalars(Rc::new(scalars))),
        }
    }

    pub fn checked_dataset(name: &str, dataset: Dataset) -> Result<Self, DataError> {
        if let Some((row, found)) = dataset.ragged_row() {
            return Err(DataError::RaggedRow {
                name: name.to_string(),
                row,
                found,
                expected: dataset.columns.len(),
            });
        }
        Ok(CacheEntry::Dataset(Rc::new(dataset)))
    }

    pub fn into_dataset(self, name: &str) -> Result<Rc<Dataset>, DataError> {
        match self {
            CacheEntry::Dataset(dataset) => Ok(dataset),
            CacheEntry::Scalars(_) => Err(DataError::WrongKind {
                name: name.to_string(),
                expected: "dataset",
            }),
        }
    }

    pub fn into_scalars(self, name: &str) -> Result<Rc<ScalarDict>, DataError> {
        match self {
            CacheEntry::Scalars(scalars) => Ok(scalars),
            CacheEntry::Dataset(_) => Err(DataError::WrongKind {
                name: name.to_string(),
                expected: "scalar dictionary",
            }),
        }
    }
}

impl From<Dataset> for CacheEntry {
    fn from(dataset: Dataset) -> Self {
        CacheEntry::Dataset(Rc::new(dataset))
    }
}

impl From<ScalarDict> for CacheEntry {
    fn from(scalars: ScalarDict) -> Self {
        CacheEntry::Scalars(Rc::new(scalars))
    }
}

impl Serialize for CacheEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CacheEntry::Dataset(dataset) => dataset.as_ref().serialize(serializer),
            CacheEntry::Scalars(scalars) => scalars.as_ref().serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_json_becomes_dataset() {
        let entry = CacheEntry::from_json(
            "avg_track_length_monthly",
            r#"{"columns": ["month", "minutes"], "data": [["2020-01", 3.5]]}"#,
        )
        .unwrap();
        let dataset = entry.into_dataset("avg_track_length_monthly").unwrap();
        assert_eq!(dataset.columns, vec!["month", "minutes"]);
    }

    #[test]
    fn flat_json_becomes_scalars() {
        let entry =
            CacheEntry::from_json(BASICS_KEY, r#"{"played_songs": 12, "first_day": "2015-06-24"}"#)
                .unwrap();
        assert!(matches!(entry, CacheEntry::Scalars(_)));
        assert!(entry.into_dataset(BASICS_KEY).is_err());
    }

    #[test]
    fn ragged_dataset_is_rejected() {
        let err = CacheEntry::from_json("x", r#"{"columns": ["a", "b"], "data": [[1]]}"#)
            .unwrap_err();
        assert_eq!(
            err,
            DataError::RaggedRow {
                name: "x".into(),
                row: 0,
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = CacheEntry::from_json("x", "<html>404</html>").unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let entry = CacheEntry::from(Dataset::new(
            vec!["a".into()],
            vec![vec![Cell::Number(1.0)], vec![Cell::Null]],
        ));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"columns": ["a"], "data": [[1.0], [null]]}));
    }
}
