use std::cell::OnceCell;
use std::time::Instant;

use derive_setters::Setters;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Style};
use tracing::debug;

use crate::cell::CellValue;
use crate::column::{self, Column};
use crate::filter::{self, FilterCase};
use crate::inputter::Inputter;
use crate::keys::KeyMap;
use crate::render::{Border, Footer};
use crate::row::Row;
use crate::sort::{self, SortColumn};

pub(crate) const DEFAULT_SELECTED_TEXT: &str = "[x]";
pub(crate) const DEFAULT_UNSELECTED_TEXT: &str = "[ ]";
pub(crate) const FILTER_PROMPT: &str = "/";

/// Table state: data, derived row orders, cursors and presentation options.
///
/// Configuration consumes the table and hands it back (`with_*`), the host keeps
/// exactly one owner and threads it through [`Table::update`]. Sorted and visible
/// row orders are indices into `rows`, cached in `OnceCell`s that are emptied
/// whenever the rows, the sort order or the filter query change and refilled on
/// the next read.
#[derive(Debug, Clone, Setters)]
#[setters(generate = false, prefix = "with_")]
pub struct Table {
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<Row>,
    pub(crate) sort_order: Vec<SortColumn>,
    sorted_cache: OnceCell<Vec<usize>>, // Mapping of sorted position to row index
    visible_cache: OnceCell<Vec<usize>>, // Sorted row indices left after filtering

    pub(crate) row_cursor: usize,
    pub(crate) column_cursor: usize,
    #[setters(generate)]
    pub(crate) page_size: usize,
    pub(crate) horizontal_scroll_offset: usize,
    #[setters(generate)]
    pub(crate) horizontal_freeze_column_count: usize,
    /// Upper bound of the rendered width, 0 for unlimited.
    #[setters(generate)]
    pub(crate) max_total_width: usize,
    /// Width flex columns grow to fill, 0 to keep them at their minimum.
    #[setters(generate)]
    pub(crate) target_width: usize,
    /// Upper bound of the rendered height, 0 for unlimited.
    #[setters(generate)]
    pub(crate) max_height: usize,

    pub(crate) selectable_rows: bool,
    pub(crate) selected_text: String,
    pub(crate) unselected_text: String,
    #[setters(generate)]
    pub(crate) focused: bool,
    #[setters(generate)]
    pub(crate) key_map: KeyMap,

    pub(crate) filtered: bool,
    pub(crate) filter_case: FilterCase,
    pub(crate) filter_input: Inputter,

    pub(crate) footer: Footer,
    #[setters(generate, into)]
    pub(crate) missing_data_indicator: CellValue,
    #[setters(generate)]
    pub(crate) base_style: Style,
    #[setters(generate)]
    pub(crate) header_style: Style,
    #[setters(generate)]
    pub(crate) highlight_style: Style,
    #[setters(generate)]
    pub(crate) border: Border,
    #[setters(generate)]
    pub(crate) border_style: Style,
    #[setters(generate)]
    pub(crate) base_alignment: Alignment,
    #[setters(generate)]
    pub(crate) header_visibility: bool,
}

impl Table {
    /// An empty, unfocused, unselectable table with the given columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
            sort_order: Vec::new(),
            sorted_cache: OnceCell::new(),
            visible_cache: OnceCell::new(),
            row_cursor: 0,
            column_cursor: 0,
            page_size: 0,
            horizontal_scroll_offset: 0,
            horizontal_freeze_column_count: 0,
            max_total_width: 0,
            target_width: 0,
            max_height: 0,
            selectable_rows: false,
            selected_text: DEFAULT_SELECTED_TEXT.to_string(),
            unselected_text: DEFAULT_UNSELECTED_TEXT.to_string(),
            focused: false,
            key_map: KeyMap::default(),
            filtered: false,
            filter_case: FilterCase::default(),
            filter_input: Inputter::new(FILTER_PROMPT),
            footer: Footer::default(),
            missing_data_indicator: CellValue::from(""),
            base_style: Style::default(),
            header_style: Style::default(),
            highlight_style: Style::new()
                .fg(Color::Rgb(0xdd, 0xdd, 0xdd))
                .bg(Color::Rgb(0x33, 0x33, 0x44)),
            border: Border::THICK,
            border_style: Style::default(),
            base_alignment: Alignment::Right,
            header_visibility: true,
        }
    }

    /// Replaces the source rows. The row cursor is clamped into the new visible range.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        debug!("Setting {} rows", rows.len());
        self.rows = rows;
        self.invalidate_sorted();
        self.clamp_row_cursor();
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Columns in display order, including the select column of selectable tables.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn header_visibility(&self) -> bool {
        self.header_visibility
    }

    pub fn max_total_width(&self) -> usize {
        self.max_total_width
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Content widths after resolving flex columns.
    pub fn column_widths(&self) -> Vec<usize> {
        column::resolve_widths(&self.columns, self.target_width)
    }

    pub fn row_cursor_index(&self) -> usize {
        self.row_cursor
            .min(self.visible_indices().len().saturating_sub(1))
    }

    pub fn column_cursor_index(&self) -> usize {
        self.column_cursor.min(self.columns.len().saturating_sub(1))
    }

    /// The row under the cursor, `None` while no row is visible.
    pub fn highlighted_row(&self) -> Option<&Row> {
        let idx = *self.visible_indices().get(self.row_cursor_index())?;
        self.rows.get(idx)
    }

    /// Rows in sort order, filter not applied.
    pub fn sorted_rows(&self) -> Vec<&Row> {
        self.sorted_indices().iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows left after filtering, in sort order.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.visible_indices().iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn visible_row_count(&self) -> usize {
        self.visible_indices().len()
    }

    pub(crate) fn sorted_indices(&self) -> &[usize] {
        self.sorted_cache.get_or_init(|| {
            let start_time = Instant::now();
            let sorted = sort::sorted_indices(&self.rows, &self.sort_order);
            debug!(
                "Sorted {} rows by {} keys in {}us",
                sorted.len(),
                self.sort_order.len(),
                start_time.elapsed().as_micros()
            );
            sorted
        })
    }

    pub(crate) fn visible_indices(&self) -> &[usize] {
        self.visible_cache.get_or_init(|| {
            let sorted = self.sorted_indices();
            let query = self.filter_input.value();
            if !self.filtered || query.is_empty() {
                return sorted.to_vec();
            }
            let start_time = Instant::now();
            let visible =
                filter::filter_indices(&self.rows, &self.columns, sorted, query, self.filter_case);
            debug!(
                "Filter '{}' kept {}/{} rows in {}us",
                query,
                visible.len(),
                sorted.len(),
                start_time.elapsed().as_micros()
            );
            visible
        })
    }

    /// Source index of the row at visible position `visible_idx`.
    pub(crate) fn source_index(&self, visible_idx: usize) -> Option<usize> {
        self.visible_indices().get(visible_idx).copied()
    }

    /// Rows, sort order or filter query changed.
    pub(crate) fn invalidate_sorted(&mut self) {
        self.sorted_cache.take();
        self.visible_cache.take();
    }

    /// Filter query or filter options changed.
    pub(crate) fn invalidate_visible(&mut self) {
        self.visible_cache.take();
    }

    pub(crate) fn clamp_row_cursor(&mut self) {
        self.row_cursor = self.row_cursor_index();
    }
}
