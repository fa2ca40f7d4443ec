use tracing::debug;

use crate::column::Column;
use crate::model::Table;
use crate::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterCase {
    #[default]
    Insensitive,
    Sensitive,
}

/// True if any filterable column of `row` contains `query`.
pub fn row_matches(row: &Row, columns: &[Column], query: &str, case: FilterCase) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = match case {
        FilterCase::Insensitive => query.to_lowercase(),
        FilterCase::Sensitive => query.to_string(),
    };
    columns
        .iter()
        .filter(|c| c.is_filterable())
        .filter_map(|c| row.get(c.key()))
        .any(|cell| {
            let text = cell.render();
            match case {
                FilterCase::Insensitive => text.to_lowercase().contains(&query),
                FilterCase::Sensitive => text.contains(&query),
            }
        })
}

/// The subsequence of `sorted` whose rows match `query`, order preserved.
pub fn filter_indices(
    rows: &[Row],
    columns: &[Column],
    sorted: &[usize],
    query: &str,
    case: FilterCase,
) -> Vec<usize> {
    sorted
        .iter()
        .copied()
        .filter(|&idx| row_matches(&rows[idx], columns, query, case))
        .collect()
}

impl Table {
    /// Enables the filter. While disabled the query is ignored and the filter
    /// bindings do nothing.
    pub fn with_filtered(mut self, filtered: bool) -> Self {
        if self.filtered != filtered {
            self.filtered = filtered;
            self.filter_changed();
        }
        self
    }

    pub fn with_filter_case(mut self, case: FilterCase) -> Self {
        if self.filter_case != case {
            self.filter_case = case;
            self.filter_changed();
        }
        self
    }

    /// Sets the filter query as if the user had typed it.
    pub fn with_filter_input_value(mut self, value: &str) -> Self {
        if self.filter_input.value() != value {
            self.filter_input.set(value);
            self.filter_changed();
        }
        self
    }

    pub fn filter_text(&self) -> &str {
        self.filter_input.value()
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    pub fn is_filter_focused(&self) -> bool {
        self.filter_input.is_focused()
    }

    /// Drops the visible row cache and returns to the first page.
    pub(crate) fn filter_changed(&mut self) {
        debug!("Filter changed to '{}'", self.filter_input.value());
        self.invalidate_visible();
        self.page_first();
    }

    pub(crate) fn clear_filter(&mut self) {
        if !self.filter_input.value().is_empty() {
            self.filter_input.reset();
            self.filter_changed();
        }
    }
}
