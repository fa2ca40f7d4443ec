use tracing::trace;

use crate::model::Table;

/// Border cells each rendered column adds on its right edge.
pub(crate) const BORDER_WIDTH: usize = 1;
/// Content width of the left overflow indicator.
pub(crate) const OVERFLOW_LEFT_WIDTH: usize = 1;
/// Room kept free for the right overflow indicator, content plus border.
pub(crate) const OVERFLOW_RESERVE: usize = 2;
/// Narrowest budget that still fits a framed overflow indicator.
pub(crate) const MIN_TOTAL_WIDTH: usize = 3;

/// One rendered slot of the header and body rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Column { index: usize, width: usize },
    OverflowLeft,
    OverflowRight { width: usize },
}

impl Slot {
    pub fn width(&self) -> usize {
        match *self {
            Slot::Column { width, .. } => width,
            Slot::OverflowLeft => OVERFLOW_LEFT_WIDTH,
            Slot::OverflowRight { width } => width,
        }
    }
}

/// The columns that fit the width budget for one scroll offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWindow {
    pub slots: Vec<Slot>,
    /// Last column rendered at full width.
    pub last_shown: Option<usize>,
    /// Rendered width including all borders.
    pub total_width: usize,
}

impl ColumnWindow {
    pub fn shows(&self, column: usize) -> bool {
        self.slots
            .iter()
            .any(|s| matches!(s, Slot::Column { index, .. } if *index == column))
    }

    pub fn has_overflow_right(&self) -> bool {
        matches!(self.slots.last(), Some(Slot::OverflowRight { .. }))
    }
}

/// Lays out frozen columns, the left indicator and scrolled columns within `max_total_width`.
///
/// Every item costs its content width plus one border cell, the frame starts with
/// one more. Items must leave room for a right indicator, except the final column,
/// which may use the whole budget. The first item that does not fit is replaced by
/// the right indicator taking all remaining width. `max_total_width == 0` disables
/// the budget.
pub fn compute_window(
    widths: &[usize],
    frozen: usize,
    offset: usize,
    max_total_width: usize,
) -> ColumnWindow {
    let frozen = frozen.min(widths.len());
    if widths.is_empty() || (max_total_width > 0 && max_total_width < MIN_TOTAL_WIDTH) {
        return ColumnWindow::default();
    }

    let mut candidates: Vec<Slot> = (0..frozen)
        .map(|index| Slot::Column { index, width: widths[index] })
        .collect();
    if offset > 0 && frozen + offset < widths.len() {
        candidates.push(Slot::OverflowLeft);
    }
    candidates.extend(
        (frozen + offset..widths.len()).map(|index| Slot::Column { index, width: widths[index] }),
    );

    let last_column = widths.len() - 1;
    let mut window = ColumnWindow {
        slots: Vec::with_capacity(candidates.len()),
        last_shown: None,
        total_width: BORDER_WIDTH,
    };
    for slot in candidates {
        let rendered = slot.width() + BORDER_WIDTH;
        if max_total_width > 0 {
            let is_final = matches!(slot, Slot::Column { index, .. } if index == last_column);
            let target = if is_final {
                max_total_width
            } else {
                max_total_width - OVERFLOW_RESERVE
            };
            if window.total_width + rendered > target {
                let width = max_total_width - window.total_width - BORDER_WIDTH;
                window.slots.push(Slot::OverflowRight { width });
                window.total_width = max_total_width;
                return window;
            }
        }
        window.total_width += rendered;
        if let Slot::Column { index, .. } = slot {
            window.last_shown = Some(index);
        }
        window.slots.push(slot);
    }
    window
}

/// Smallest scroll offset at which the final column is fully visible.
///
/// Scrolling further would only drop columns on the left. When the final column
/// never fits completely the last non-frozen offset is returned, so at least one
/// scrolled column always stays in the window.
pub fn max_scroll_offset(widths: &[usize], frozen: usize, max_total_width: usize) -> usize {
    let frozen = frozen.min(widths.len());
    let scrollable = widths.len() - frozen;
    if max_total_width == 0 || scrollable == 0 {
        return 0;
    }
    let rendered = |range: std::ops::Range<usize>| -> usize {
        widths[range].iter().map(|w| w + BORDER_WIDTH).sum()
    };
    let frozen_width = BORDER_WIDTH + rendered(0..frozen);
    for offset in 0..scrollable {
        let indicator = if offset > 0 { OVERFLOW_LEFT_WIDTH + BORDER_WIDTH } else { 0 };
        if frozen_width + indicator + rendered(frozen + offset..widths.len()) <= max_total_width {
            return offset;
        }
    }
    scrollable - 1
}

impl Table {
    /// Columns rendered for the current scroll offset and width budget.
    pub fn column_window(&self) -> ColumnWindow {
        compute_window(
            &self.column_widths(),
            self.horizontal_freeze_column_count,
            self.horizontal_scroll_offset(),
            self.max_total_width,
        )
    }

    /// Scroll offset into the non-frozen columns, clamped to the current budget.
    pub fn horizontal_scroll_offset(&self) -> usize {
        self.horizontal_scroll_offset
            .min(self.max_horizontal_column_index())
    }

    pub fn max_horizontal_column_index(&self) -> usize {
        max_scroll_offset(
            &self.column_widths(),
            self.horizontal_freeze_column_count,
            self.max_total_width,
        )
    }

    /// Last column rendered at full width, 0 when none is.
    pub fn last_shown_column_index(&self) -> usize {
        self.column_window().last_shown.unwrap_or(0)
    }

    pub fn horizontal_freeze_column_count(&self) -> usize {
        self.horizontal_freeze_column_count
    }

    pub(crate) fn scroll_right(&mut self) {
        let offset = self.horizontal_scroll_offset();
        if offset < self.max_horizontal_column_index() {
            self.horizontal_scroll_offset = offset + 1;
        }
        trace!("Scroll right, offset {}", self.horizontal_scroll_offset);
    }

    pub(crate) fn scroll_left(&mut self) {
        self.horizontal_scroll_offset = self.horizontal_scroll_offset().saturating_sub(1);
        trace!("Scroll left, offset {}", self.horizontal_scroll_offset);
    }

    pub(crate) fn move_highlight_left(&mut self) {
        self.column_cursor = self.column_cursor_index().saturating_sub(1);
        self.scroll_to_column_cursor();
    }

    pub(crate) fn move_highlight_right(&mut self) {
        let last = self.columns.len().saturating_sub(1);
        self.column_cursor = (self.column_cursor_index() + 1).min(last);
        self.scroll_to_column_cursor();
    }

    pub(crate) fn move_highlighted_row_start(&mut self) {
        self.column_cursor = 0;
        self.horizontal_scroll_offset = 0;
    }

    pub(crate) fn move_highlighted_row_end(&mut self) {
        self.column_cursor = self.columns.len().saturating_sub(1);
        self.horizontal_scroll_offset = self.max_horizontal_column_index();
    }

    /// Scrolls until the column cursor is rendered at full width.
    fn scroll_to_column_cursor(&mut self) {
        let frozen = self.horizontal_freeze_column_count;
        let cursor = self.column_cursor;
        if cursor < frozen {
            return;
        }
        if cursor < frozen + self.horizontal_scroll_offset() {
            self.horizontal_scroll_offset = cursor - frozen;
        } else {
            while self.column_window().last_shown.is_none_or(|last| cursor > last)
                && self.horizontal_scroll_offset() < self.max_horizontal_column_index()
            {
                self.scroll_right();
            }
        }
        trace!(
            "Column cursor {}, offset {}",
            self.column_cursor,
            self.horizontal_scroll_offset
        );
    }
}
