use std::cmp::Ordering;

use tracing::debug;

use crate::model::Table;
use crate::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One link of the sort chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortColumn {
    pub column_key: String,
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn asc(column_key: impl Into<String>) -> Self {
        SortColumn {
            column_key: column_key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_key: impl Into<String>) -> Self {
        SortColumn {
            column_key: column_key.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Compares two rows on a single key, before the direction is applied.
/// Missing data is less than any value, two missing cells are equal.
fn compare_on(a: &Row, b: &Row, key: &str) -> Ordering {
    match (a.get(key), b.get(key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.compare(y),
    }
}

/// Lexicographic comparison along the sort chain.
pub fn compare_rows(a: &Row, b: &Row, order: &[SortColumn]) -> Ordering {
    for sort_column in order {
        let ordering = compare_on(a, b, &sort_column.column_key);
        let ordering = match sort_column.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Row indices ordered by `order`. Ties keep their source order.
pub fn sorted_indices(rows: &[Row], order: &[SortColumn]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    if !order.is_empty() {
        // sort_by is stable
        indices.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], order));
    }
    indices
}

impl Table {
    /// Sorts by a single column, ascending, replacing any previous sort.
    pub fn sort_by_asc(self, column_key: impl Into<String>) -> Self {
        self.with_sort_order(vec![SortColumn::asc(column_key)])
    }

    /// Sorts by a single column, descending, replacing any previous sort.
    pub fn sort_by_desc(self, column_key: impl Into<String>) -> Self {
        self.with_sort_order(vec![SortColumn::desc(column_key)])
    }

    /// Breaks ties of the current sort with another column, ascending.
    pub fn then_sort_by_asc(mut self, column_key: impl Into<String>) -> Self {
        let mut order = std::mem::take(&mut self.sort_order);
        order.push(SortColumn::asc(column_key));
        self.with_sort_order(order)
    }

    /// Breaks ties of the current sort with another column, descending.
    pub fn then_sort_by_desc(mut self, column_key: impl Into<String>) -> Self {
        let mut order = std::mem::take(&mut self.sort_order);
        order.push(SortColumn::desc(column_key));
        self.with_sort_order(order)
    }

    pub fn with_sort_order(mut self, order: Vec<SortColumn>) -> Self {
        debug!("Sort order {:?}", order);
        self.sort_order = order;
        self.invalidate_sorted();
        self
    }

    pub fn sort_order(&self) -> &[SortColumn] {
        &self.sort_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::column::Column;
    use crate::model::tests::ids;
    use ratatui::style::{Style, Stylize};

    #[test]
    fn single_column_asc_and_desc_with_missing_data() {
        let rows = vec![
            row!["id" => "b"],
            row!["id" => CellValue::styled("c", Style::new().bold())],
            row!["id" => "a"],
            Row::default(),
        ];
        let table = Table::new(vec![Column::new("id", "ID", 3)])
            .with_rows(rows)
            .sort_by_asc("id");
        assert_eq!(table.sorted_rows().len(), 4);
        assert_eq!(ids(&table, "id"), vec!["", "a", "b", "c"]);
        assert_eq!(table.sorted_rows()[0].get("id"), None);

        let table = table.sort_by_desc("id");
        assert_eq!(ids(&table, "id"), vec!["c", "b", "a", ""]);
        assert_eq!(table.sorted_rows()[3].get("id"), None);
    }

    #[test]
    fn single_column_ints() {
        let rows = vec![
            row!["id" => 13],
            row!["id" => CellValue::styled(1, Style::new().bold())],
            row!["id" => 2],
        ];
        let table = Table::new(vec![Column::new("id", "ID", 3)])
            .with_rows(rows)
            .sort_by_asc("id");
        assert_eq!(ids(&table, "id"), vec!["1", "2", "13"]);
    }

    fn scored(name: &str, score: i64) -> Row {
        row!["name" => name, "score" => score]
    }

    fn name_score(table: &Table) -> Vec<(String, String)> {
        ids(table, "name")
            .into_iter()
            .zip(ids(table, "score"))
            .collect()
    }

    #[test]
    fn two_columns_asc_desc_mix() {
        let table = Table::new(vec![
            Column::new("name", "Name", 8),
            Column::new("score", "Score", 8),
        ])
        .with_rows(vec![
            scored("c", 50),
            scored("a", 75),
            scored("b", 101),
            scored("a", 100),
        ])
        .sort_by_asc("name")
        .then_sort_by_desc("score");

        let expected = [("a", "100"), ("a", "75"), ("b", "101"), ("c", "50")];
        assert_eq!(
            name_score(&table),
            expected.map(|(n, s)| (n.to_string(), s.to_string()))
        );

        let table = table.sort_by_desc("name").then_sort_by_asc("score");
        let expected = [("c", "50"), ("b", "101"), ("a", "75"), ("a", "100")];
        assert_eq!(
            name_score(&table),
            expected.map(|(n, s)| (n.to_string(), s.to_string()))
        );
        assert_eq!(table.sort_order().len(), 2);
    }

    #[test]
    fn ties_keep_source_order_in_both_directions() {
        let rows = vec![
            row!["k" => 1, "tag" => "first"],
            row!["k" => 2, "tag" => "x"],
            row!["k" => 1, "tag" => "second"],
            row!["k" => 0, "tag" => "y"],
            row!["k" => 1, "tag" => "third"],
        ];
        let table = Table::new(vec![Column::new("k", "K", 3)]).with_rows(rows);

        let asc = table.clone().sort_by_asc("k");
        assert_eq!(ids(&asc, "tag"), vec!["y", "first", "second", "third", "x"]);

        let desc = asc.sort_by_desc("k");
        assert_eq!(ids(&desc, "tag"), vec!["x", "first", "second", "third", "y"]);
    }

    #[test]
    fn desc_reverses_asc_for_distinct_values() {
        let rows: Vec<Row> = [5, 3, 9, 1, 7].into_iter().map(|v| row!["v" => v]).collect();
        let table = Table::new(vec![Column::new("v", "V", 3)]).with_rows(rows);
        let asc = ids(&table.clone().sort_by_asc("v"), "v");
        let mut desc = ids(&table.sort_by_desc("v"), "v");
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn unsorted_table_keeps_source_order() {
        let rows = vec![row!["id" => "b"], row!["id" => "a"]];
        assert_eq!(sorted_indices(&rows, &[]), vec![0, 1]);
    }

    #[test]
    fn mixed_kinds_sort_by_kind_then_value() {
        let rows = vec![
            row!["v" => "text"],
            row!["v" => 2.5],
            row!["v" => true],
            row!["v" => 2],
        ];
        assert_eq!(sorted_indices(&rows, &[SortColumn::asc("v")]), vec![2, 3, 1, 0]);
    }
}
