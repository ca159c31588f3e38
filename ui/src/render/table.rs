//! Row-wise tables with an optional rank column.
//!
//! Every cell carries the text shown to the reader and a typed sort key
//! decided here, once, from the dataset. The sort engine never looks at the
//! rendered text.

use std::collections::BTreeSet;

use crate::core::dataset::{Cell, Dataset};
use crate::core::format::{format_number, hours_to_str};
use crate::core::DashboardContext;
use crate::core::DataError;

/// Column shown as `H:MMh` / `12h` instead of a plain number.
pub const HOURS_COLUMN: &str = "hours played";
/// Header of the synthetic rank column.
pub const RANK_HEADER: &str = "rank";
/// Columns excluded from sorting unless configured otherwise (prefix match).
pub const DEFAULT_UNSORTABLE: &[&str] = &["monthly play count"];

#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub show_rank: bool,
    pub sortable: bool,
    pub unsortable_columns: BTreeSet<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            show_rank: false,
            sortable: true,
            unsortable_columns: DEFAULT_UNSORTABLE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TableOptions {
    pub fn ranked() -> Self {
        Self {
            show_rank: true,
            ..Self::default()
        }
    }

    pub fn unsorted() -> Self {
        Self {
            sortable: false,
            ..Self::default()
        }
    }

    fn column_sortable(&self, column: &str) -> bool {
        self.sortable
            && !self
                .unsortable_columns
                .iter()
                .any(|prefix| column.starts_with(prefix.as_str()))
    }
}

/// How a column compares when sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Number,
    Duration,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    Image { src: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub content: CellContent,
    pub key: SortKey,
}

impl TableCell {
    /// Text a reader would copy out of the cell. Images yield their source.
    pub fn text(&self) -> &str {
        match &self.content {
            CellContent::Text(text) => text,
            CellContent::Image { src } => src,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    /// Column name as produced by the pipeline; may contain `<br>`.
    pub label: String,
    pub kind: ColumnKind,
    pub sortable: bool,
}

impl TableHeader {
    /// Label split at its `<br>` line breaks.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.label.split("<br>").map(str::trim)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub title: String,
    pub headers: Vec<TableHeader>,
    pub rows: Vec<Vec<TableCell>>,
}

impl TableModel {
    pub fn build(title: &str, dataset: &Dataset, options: &TableOptions) -> Self {
        let mut headers = Vec::with_capacity(dataset.columns.len() + 1);
        if options.show_rank {
            headers.push(TableHeader {
                label: RANK_HEADER.to_string(),
                kind: ColumnKind::Number,
                sortable: false,
            });
        }
        for (idx, column) in dataset.columns.iter().enumerate() {
            headers.push(TableHeader {
                label: column.clone(),
                kind: column_kind(column, dataset, idx),
                sortable: options.column_sortable(column),
            });
        }

        let rows = dataset
            .data
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let mut cells = Vec::with_capacity(row.len() + 1);
                if options.show_rank {
                    let rank = row_idx + 1;
                    cells.push(TableCell {
                        content: CellContent::Text(rank.to_string()),
                        key: SortKey::Number(rank as f64),
                    });
                }
                for (column, cell) in dataset.columns.iter().zip(row) {
                    cells.push(table_cell(column, cell));
                }
                cells
            })
            .collect();

        Self {
            title: title.to_string(),
            headers,
            rows,
        }
    }

    /// Displayed text of every body cell, in model order.
    pub fn cell_texts(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.text().to_string()).collect())
            .collect()
    }

    /// Copy with the body rows in `order` (indices into `rows`).
    pub fn reordered(&self, order: &[usize]) -> Self {
        Self {
            title: self.title.clone(),
            headers: self.headers.clone(),
            rows: order.iter().filter_map(|idx| self.rows.get(*idx).cloned()).collect(),
        }
    }
}

fn column_kind(column: &str, dataset: &Dataset, idx: usize) -> ColumnKind {
    if column == HOURS_COLUMN {
        return ColumnKind::Duration;
    }
    let mut values = dataset
        .data
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|cell| !matches!(cell, Cell::Null))
        .peekable();
    if values.peek().is_some() && values.all(|cell| matches!(cell, Cell::Number(_))) {
        ColumnKind::Number
    } else {
        ColumnKind::Text
    }
}

fn table_cell(column: &str, cell: &Cell) -> TableCell {
    match cell {
        Cell::Number(value) => {
            let text = if column == HOURS_COLUMN {
                hours_to_str(*value)
            } else {
                format_number(*value)
            };
            TableCell {
                content: CellContent::Text(text),
                key: SortKey::Number(*value),
            }
        }
        Cell::Text(text) if cell.is_image() => TableCell {
            content: CellContent::Image { src: text.clone() },
            key: SortKey::Empty,
        },
        Cell::Text(text) => TableCell {
            content: CellContent::Text(text.clone()),
            key: SortKey::Text(text.clone()),
        },
        Cell::Bool(flag) => TableCell {
            content: CellContent::Text(flag.to_string()),
            key: SortKey::Text(flag.to_string()),
        },
        Cell::Null => TableCell {
            content: CellContent::Text(String::new()),
            key: SortKey::Empty,
        },
    }
}

/// Renderer binding a named dataset to a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRenderer {
    pub title: String,
    pub dataset: String,
    pub options: TableOptions,
}

impl TableRenderer {
    pub fn new(title: impl Into<String>, dataset: impl Into<String>, options: TableOptions) -> Self {
        Self {
            title: title.into(),
            dataset: dataset.into(),
            options,
        }
    }

    pub async fn render(&self, ctx: &DashboardContext) -> Result<TableModel, DataError> {
        let dataset = ctx.cache().dataset(&self.dataset).await?;
        Ok(TableModel::build(&self.title, &dataset, &self.options))
    }
}
