use std::ops::Range;

use tracing::trace;

use crate::model::Table;

/// Number of pages for `rows` visible rows, at least one.
pub fn max_pages(rows: usize, page_size: usize) -> usize {
    if page_size == 0 || rows == 0 {
        1
    } else {
        rows.div_ceil(page_size)
    }
}

/// Zero based page containing visible row `row`.
pub fn page_for_row(row: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { row / page_size }
}

/// Visible row range shown on zero based `page`.
pub fn page_bounds(page: usize, page_size: usize, rows: usize) -> Range<usize> {
    if page_size == 0 {
        return 0..rows;
    }
    let start = (page * page_size).min(rows);
    let end = ((page + 1) * page_size).min(rows);
    start..end
}

impl Table {
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Rows per page once the height budget is taken into account.
    ///
    /// Without a height budget this is the configured page size. With one, it
    /// is the number of body rows that fit below the frame, header and footer,
    /// capped by the configured page size when that is set.
    pub fn effective_page_size(&self) -> usize {
        if self.max_height == 0 {
            return self.page_size;
        }
        let fit = self
            .max_height
            .saturating_sub(self.chrome_height())
            .max(1);
        match self.page_size {
            0 => fit,
            p => p.min(fit),
        }
    }

    /// One based page of the row cursor.
    pub fn current_page(&self) -> usize {
        page_for_row(self.row_cursor_index(), self.effective_page_size()) + 1
    }

    pub fn max_pages(&self) -> usize {
        max_pages(self.visible_row_count(), self.effective_page_size())
    }

    /// Visible row positions drawn for the current page.
    pub fn visible_page_range(&self) -> Range<usize> {
        let page_size = self.effective_page_size();
        page_bounds(
            page_for_row(self.row_cursor_index(), page_size),
            page_size,
            self.visible_row_count(),
        )
    }

    pub(crate) fn page_first(&mut self) {
        self.row_cursor = 0;
    }

    pub(crate) fn page_last(&mut self) {
        let page_size = self.effective_page_size();
        let last_page = self.max_pages() - 1;
        self.row_cursor = page_bounds(last_page, page_size, self.visible_row_count()).start;
        trace!("Last page {}, cursor {}", last_page + 1, self.row_cursor);
    }

    pub(crate) fn page_up(&mut self) {
        let page_size = self.effective_page_size();
        if page_size == 0 {
            self.row_cursor = 0;
            return;
        }
        let page = page_for_row(self.row_cursor_index(), page_size);
        self.row_cursor = page.saturating_sub(1) * page_size;
        trace!("Page up to {}, cursor {}", page, self.row_cursor);
    }

    pub(crate) fn page_down(&mut self) {
        let rows = self.visible_row_count();
        let page_size = self.effective_page_size();
        let last_row = rows.saturating_sub(1);
        if page_size == 0 {
            self.row_cursor = last_row;
            return;
        }
        let next = (page_for_row(self.row_cursor_index(), page_size) + 1) * page_size;
        self.row_cursor = next.min(last_row);
        trace!("Page down, cursor {}", self.row_cursor);
    }
}
