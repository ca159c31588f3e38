//! Wire shapes for datasets and scalar dictionaries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of string cells that carry an embedded bitmap instead of text.
pub const IMAGE_DATA_PREFIX: &str = "data:image/bmp;base64,";

/// A single table cell.
///
/// `Bool` only shows up in the raw sample rows the pipeline emits; the
/// aggregated datasets stick to numbers, strings and nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Text cell holding a `data:image/bmp;base64,` payload.
    pub fn is_image(&self) -> bool {
        self.as_text()
            .map(|text| text.starts_with(IMAGE_DATA_PREFIX))
            .unwrap_or(false)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Column-labelled tabular data (`{ "columns": [...], "data": [[...], ...] }`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, data: Vec<Vec<Cell>>) -> Self {
        Self { columns, data }
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Values of one column in row order, `None` if the column is unknown.
    pub fn column(&self, column: &str) -> Option<Vec<Cell>> {
        let index = self.column_index(column)?;
        Some(
            self.data
                .iter()
                .map(|row| row.get(index).cloned().unwrap_or(Cell::Null))
                .collect(),
        )
    }

    /// First row whose length differs from the header, as `(row, len)`.
    pub fn ragged_row(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.columns.len())
            .map(|(index, row)| (index, row.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A scalar used for template substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Number(value) => write!(f, "{value}"),
            ScalarValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

/// Flat key → scalar mapping. No nesting.
pub type ScalarDict = BTreeMap<String, ScalarValue>;
