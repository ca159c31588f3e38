//! Click-to-sort state for a rendered table.
//!
//! Each sortable header cycles unsorted -> ascending -> descending ->
//! ascending. Clicking one header puts every other sortable header back to
//! unsorted without moving rows. Rows are re-ordered starting from the order
//! currently on screen with a stable sort, so equal keys keep their relative
//! position.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::table::{SortKey, TableCell, TableModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortState {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortState {
    pub fn next(self) -> Self {
        match self {
            SortState::Unsorted | SortState::Descending => SortState::Ascending,
            SortState::Ascending => SortState::Descending,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SortState::Unsorted => "sorting",
            SortState::Ascending => "sortingAsc",
            SortState::Descending => "sortingDesc",
        }
    }
}

/// Ascending order of two keys. Blank cells sort first.
pub fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Empty, SortKey::Empty) => Ordering::Equal,
        (SortKey::Empty, _) => Ordering::Less,
        (_, SortKey::Empty) => Ordering::Greater,
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => compare_text(x, y),
        (SortKey::Number(x), SortKey::Text(y)) => compare_text(&x.to_string(), y),
        (SortKey::Text(x), SortKey::Number(y)) => compare_text(x, &y.to_string()),
    }
}

/// Accents and case ignored first (`Ångström` next to `Angst`), then
/// case-insensitive, then exact text as tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn sort_key(model: &TableModel, row: usize, column: usize) -> &SortKey {
    static EMPTY: SortKey = SortKey::Empty;
    model
        .rows
        .get(row)
        .and_then(|cells| cells.get(column))
        .map(|cell| &cell.key)
        .unwrap_or(&EMPTY)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSorter {
    /// `None` for headers without a click handler.
    states: Vec<Option<SortState>>,
    order: Vec<usize>,
}

impl TableSorter {
    pub fn new(model: &TableModel) -> Self {
        Self {
            states: model
                .headers
                .iter()
                .map(|h| h.sortable.then_some(SortState::Unsorted))
                .collect(),
            order: (0..model.rows.len()).collect(),
        }
    }

    pub fn state(&self, column: usize) -> Option<SortState> {
        self.states.get(column).copied().flatten()
    }

    /// Class for the header cell; `None` when the column is not sortable.
    pub fn header_class(&self, column: usize) -> Option<&'static str> {
        self.state(column).map(SortState::css_class)
    }

    /// Handle a click on header `column`. Returns the new state, or `None`
    /// when the column has no handler (nothing changes then).
    pub fn click(&mut self, model: &TableModel, column: usize) -> Option<SortState> {
        let next = self.state(column)?.next();

        for (idx, state) in self.states.iter_mut().enumerate() {
            if let Some(state) = state {
                *state = if idx == column {
                    next
                } else {
                    SortState::Unsorted
                };
            }
        }

        let key = |row: usize| sort_key(model, row, column);
        match next {
            SortState::Descending => self
                .order
                .sort_by(|a, b| compare_keys(key(*b), key(*a))),
            _ => self.order.sort_by(|a, b| compare_keys(key(*a), key(*b))),
        }

        tracing::debug!(column, state = ?next, "table sorted");
        Some(next)
    }

    /// Row indices into `model.rows` in display order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn ordered_rows<'a>(
        &'a self,
        model: &'a TableModel,
    ) -> impl Iterator<Item = &'a Vec<TableCell>> + 'a {
        self.order.iter().filter_map(|idx| model.rows.get(*idx))
    }

    /// The table in display order, for snapshots.
    pub fn sorted_model(&self, model: &TableModel) -> TableModel {
        model.reordered(&self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::{Cell, Dataset};
    use crate::render::table::{TableOptions, HOURS_COLUMN};

    fn model() -> TableModel {
        let dataset = Dataset::new(
            vec!["song".into(), "play count".into(), HOURS_COLUMN.into()],
            vec![
                vec!["nikes".into(), Cell::Number(120.0), Cell::Number(9.5)],
                vec!["Füchse".into(), Cell::Number(1500.0), Cell::Number(12.0)],
                vec!["Alaska".into(), Cell::Number(120.0), Cell::Number(0.5)],
                vec!["alaska".into(), Cell::Number(7.0), Cell::Number(10.2)],
            ],
        );
        TableModel::build("songs", &dataset, &TableOptions::ranked())
    }

    fn column_texts(sorter: &TableSorter, model: &TableModel, column: usize) -> Vec<String> {
        sorter
            .ordered_rows(model)
            .map(|row| row[column].text().to_string())
            .collect()
    }

    #[test]
    fn states_cycle_and_reset_other_columns() {
        let model = model();
        let mut sorter = TableSorter::new(&model);

        assert_eq!(sorter.click(&model, 2), Some(SortState::Ascending));
        assert_eq!(sorter.click(&model, 2), Some(SortState::Descending));
        assert_eq!(sorter.click(&model, 2), Some(SortState::Ascending));

        assert_eq!(sorter.click(&model, 1), Some(SortState::Ascending));
        assert_eq!(sorter.state(2), Some(SortState::Unsorted));
        assert_eq!(sorter.header_class(2), Some("sorting"));
        assert_eq!(sorter.header_class(1), Some("sortingAsc"));
    }

    #[test]
    fn rank_column_has_no_handler() {
        let model = model();
        let mut sorter = TableSorter::new(&model);
        assert_eq!(sorter.click(&model, 0), None);
        assert_eq!(sorter.header_class(0), None);
        assert_eq!(sorter.order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn numeric_descending_reverses_ascending() {
        let model = model();
        let mut sorter = TableSorter::new(&model);

        sorter.click(&model, 3);
        let ascending = column_texts(&sorter, &model, 3);
        assert_eq!(ascending, vec!["0:30h", "9:30h", "10h", "12h"]);

        sorter.click(&model, 3);
        let mut descending = column_texts(&sorter, &model, 3);
        descending.reverse();
        assert_eq!(descending, ascending);
    }

    #[test]
    fn numbers_compare_numerically_not_as_text() {
        let model = model();
        let mut sorter = TableSorter::new(&model);
        sorter.click(&model, 2);
        assert_eq!(
            column_texts(&sorter, &model, 2),
            vec!["7", "120", "120", "1,500"]
        );
    }

    #[test]
    fn equal_keys_keep_their_order() {
        let model = model();
        let mut sorter = TableSorter::new(&model);
        sorter.click(&model, 2);
        // both 120 rows, in dataset order
        assert_eq!(column_texts(&sorter, &model, 1)[1..3], ["nikes", "Alaska"]);

        sorter.click(&model, 2);
        assert_eq!(column_texts(&sorter, &model, 1)[1..3], ["nikes", "Alaska"]);
    }

    #[test]
    fn text_sort_is_case_insensitive_and_stable() {
        let model = model();
        let mut sorter = TableSorter::new(&model);
        sorter.click(&model, 1);
        assert_eq!(
            column_texts(&sorter, &model, 1),
            vec!["Alaska", "alaska", "Füchse", "nikes"]
        );
    }

    #[test]
    fn accented_initials_sort_with_their_base_letter() {
        assert_eq!(compare_text("Ångström", "Zebra"), Ordering::Less);
        assert_eq!(compare_text("Élan", "Ezra"), Ordering::Less);
        assert_eq!(compare_text("Éclair", "eclair"), Ordering::Greater);

        let dataset = Dataset::new(
            vec!["artist".into()],
            vec![
                vec!["Zedd".into()],
                vec!["Ólafur Arnalds".into()],
                vec!["Beyoncé".into()],
            ],
        );
        let model = TableModel::build("artists", &dataset, &TableOptions::default());
        let mut sorter = TableSorter::new(&model);
        sorter.click(&model, 0);
        assert_eq!(
            column_texts(&sorter, &model, 0),
            vec!["Beyoncé", "Ólafur Arnalds", "Zedd"]
        );
    }

    #[test]
    fn rank_stays_with_its_row() {
        let model = model();
        let mut sorter = TableSorter::new(&model);
        sorter.click(&model, 2);
        assert_eq!(column_texts(&sorter, &model, 0), vec!["4", "1", "3", "2"]);
        assert_eq!(sorter.sorted_model(&model).rows[0][1].text(), "alaska");
    }
}
