use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::column::Column;
use crate::domain::UserEvent;
use crate::model::Table;
use crate::row::Row;

impl Table {
    /// Adds or removes the select column in front of the configured columns.
    pub fn with_selectable_rows(mut self, selectable: bool) -> Self {
        if self.selectable_rows == selectable {
            return self;
        }
        self.selectable_rows = selectable;
        if selectable {
            let column = self.select_column();
            self.columns.insert(0, column);
        } else {
            self.columns.retain(|c| !c.is_select());
        }
        self.column_cursor = self.column_cursor_index();
        self
    }

    /// Texts drawn in the select column for unselected and selected rows.
    pub fn with_selected_text(
        mut self,
        unselected: impl Into<String>,
        selected: impl Into<String>,
    ) -> Self {
        self.unselected_text = unselected.into();
        self.selected_text = selected.into();
        if self.selectable_rows {
            let column = self.select_column();
            if let Some(existing) = self.columns.iter_mut().find(|c| c.is_select()) {
                *existing = column;
            }
        }
        self
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable_rows
    }

    /// Rows flagged selected, in source order.
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.rows.iter().filter(|r| r.is_selected()).collect()
    }

    /// Text drawn in the select column for `row`.
    pub(crate) fn selection_text(&self, row: &Row) -> &str {
        if row.is_selected() {
            &self.selected_text
        } else {
            &self.unselected_text
        }
    }

    /// Flips the selection of the highlighted row.
    ///
    /// Rows are reached through the visible order, so the sorted and visible
    /// caches stay valid.
    pub fn toggle_select(&mut self) -> Option<UserEvent> {
        if !self.selectable_rows {
            return None;
        }
        let row_index = self.row_cursor_index();
        let source = self.source_index(row_index)?;
        let is_selected = self.rows[source].toggle_selected();
        debug!("Row {} selected: {}", source, is_selected);
        Some(UserEvent::RowSelectToggled {
            row_index,
            is_selected,
        })
    }

    fn select_column(&self) -> Column {
        let width = self
            .selected_text
            .width()
            .max(self.unselected_text.width())
            .max(1);
        Column::select(self.selected_text.clone(), width)
    }
}
