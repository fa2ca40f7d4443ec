use std::fmt;
use std::sync::Arc;

use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::symbols::line;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::column::Column;
use crate::model::Table;
use crate::row::Row;
use crate::scroll::{ColumnWindow, Slot};

const ELLIPSIS: &str = "…";
const OVERFLOW_LEFT_TEXT: &str = "<";
const OVERFLOW_RIGHT_TEXT: &str = ">";

/// Box drawing characters of the table frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub vertical: &'static str,
    pub horizontal: &'static str,
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub vertical_left: &'static str,
    pub vertical_right: &'static str,
    pub horizontal_down: &'static str,
    pub horizontal_up: &'static str,
    pub cross: &'static str,
}

macro_rules! border_from_line_set {
    ($set:expr) => {
        Border {
            vertical: $set.vertical,
            horizontal: $set.horizontal,
            top_left: $set.top_left,
            top_right: $set.top_right,
            bottom_left: $set.bottom_left,
            bottom_right: $set.bottom_right,
            vertical_left: $set.vertical_left,
            vertical_right: $set.vertical_right,
            horizontal_down: $set.horizontal_down,
            horizontal_up: $set.horizontal_up,
            cross: $set.cross,
        }
    };
}

impl Border {
    pub const THICK: Border = border_from_line_set!(line::THICK);
    pub const NORMAL: Border = border_from_line_set!(line::NORMAL);
    pub const ROUNDED: Border = border_from_line_set!(line::ROUNDED);
    pub const DOUBLE: Border = border_from_line_set!(line::DOUBLE);
}

impl Default for Border {
    fn default() -> Self {
        Border::THICK
    }
}

pub type FooterFn = Arc<dyn Fn(&Table) -> String + Send + Sync>;

/// Text shown below the body.
#[derive(Clone, Default)]
pub enum Footer {
    /// Filter input and page counter, whichever applies.
    #[default]
    Auto,
    Static(String),
    Dynamic(FooterFn),
}

impl fmt::Debug for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Footer::Auto => write!(f, "Auto"),
            Footer::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Footer::Dynamic(_) => write!(f, "Dynamic(..)"),
        }
    }
}

/// Cuts `text` at the first newline and shortens it to `width` cells, marking
/// both with a trailing ellipsis.
pub fn limit_str(text: &str, width: usize) -> String {
    let text = match text.split_once('\n') {
        Some((first, _)) => format!("{first}{ELLIPSIS}"),
        None => text.to_string(),
    };
    if text.width() <= width {
        return text;
    }
    if width == 0 {
        return String::new();
    }
    let budget = width - ELLIPSIS.width();
    let mut limited = String::with_capacity(text.len());
    for c in text.chars() {
        // a variation selector can widen the character before it
        limited.push(c);
        if limited.width() > budget {
            limited.pop();
            break;
        }
    }
    limited.push_str(ELLIPSIS);
    limited
}

/// Pads `text`, already at most `width` cells wide, to exactly `width` cells.
fn align(text: &str, width: usize, alignment: Alignment) -> String {
    let padding = width.saturating_sub(text.width());
    let (left, right) = match alignment {
        Alignment::Left => (0, padding),
        Alignment::Right => (padding, 0),
        Alignment::Center => (padding / 2, padding - padding / 2),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn fit(text: &str, width: usize, alignment: Alignment) -> String {
    align(&limit_str(text, width), width, alignment)
}

impl Table {
    pub fn with_static_footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Footer::Static(text.into());
        self
    }

    /// Footer computed from the table on every render.
    pub fn with_dynamic_footer<F>(mut self, footer: F) -> Self
    where
        F: Fn(&Table) -> String + Send + Sync + 'static,
    {
        self.footer = Footer::Dynamic(Arc::new(footer));
        self
    }

    /// Drops static and dynamic footers in favour of the automatic one.
    pub fn with_auto_footer(mut self) -> Self {
        self.footer = Footer::Auto;
        self
    }

    pub(crate) fn has_footer(&self) -> bool {
        match &self.footer {
            Footer::Static(text) => !text.is_empty(),
            Footer::Dynamic(_) => true,
            Footer::Auto => {
                let filter_shown = self.filtered
                    && (self.filter_input.is_focused() || !self.filter_input.value().is_empty());
                filter_shown || self.page_size > 0 || self.max_height > 0
            }
        }
    }

    /// Lines drawn around the body: frame, header with separator, footer with separator.
    pub(crate) fn chrome_height(&self) -> usize {
        let header = if self.header_visibility { 2 } else { 0 };
        let footer = if self.has_footer() { 2 } else { 0 };
        2 + header + footer
    }

    /// Renders the current page within the width budget.
    pub fn view(&self) -> Text<'static> {
        let window = self.column_window();
        if window.slots.is_empty() {
            return Text::default();
        }
        let widths = self.column_widths();
        let mut lines = Vec::new();

        lines.push(self.border_line(
            &window,
            self.border.top_left,
            self.border.horizontal_down,
            self.border.top_right,
        ));
        if self.header_visibility {
            lines.push(self.header_line(&window));
            lines.push(self.border_line(
                &window,
                self.border.vertical_right,
                self.border.cross,
                self.border.vertical_left,
            ));
        }

        let highlighted = self.row_cursor_index();
        for position in self.visible_page_range() {
            if let Some(source) = self.source_index(position) {
                let is_highlighted = self.focused && position == highlighted;
                lines.push(self.row_line(&window, &widths, &self.rows[source], is_highlighted));
            }
        }

        if self.has_footer() {
            lines.push(self.border_line(
                &window,
                self.border.vertical_right,
                self.border.horizontal_up,
                self.border.vertical_left,
            ));
            lines.push(self.footer_line(window.total_width));
            let inner = self.border.horizontal.repeat(window.total_width.saturating_sub(2));
            lines.push(Line::from(Span::styled(
                format!("{}{}{}", self.border.bottom_left, inner, self.border.bottom_right),
                self.border_style,
            )));
        } else {
            lines.push(self.border_line(
                &window,
                self.border.bottom_left,
                self.border.horizontal_up,
                self.border.bottom_right,
            ));
        }
        Text::from(lines)
    }

    /// The rendered block without styling, one line per row.
    pub fn view_string(&self) -> String {
        self.view()
            .lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn border_line(
        &self,
        window: &ColumnWindow,
        left: &str,
        join: &str,
        right: &str,
    ) -> Line<'static> {
        let runs: Vec<String> = window
            .slots
            .iter()
            .map(|slot| self.border.horizontal.repeat(slot.width()))
            .collect();
        Line::from(Span::styled(
            format!("{left}{}{right}", runs.join(join)),
            self.border_style,
        ))
    }

    fn separator(&self) -> Span<'static> {
        Span::styled(self.border.vertical, self.border_style)
    }

    fn column_alignment(&self, column: &Column) -> Alignment {
        column.alignment().unwrap_or(self.base_alignment)
    }

    fn column_style(&self, column: &Column) -> Style {
        self.base_style.patch(column.style().unwrap_or_default())
    }

    fn header_line(&self, window: &ColumnWindow) -> Line<'static> {
        let mut spans = vec![self.separator()];
        for slot in &window.slots {
            let span = match *slot {
                Slot::Column { index, width } => {
                    let column = &self.columns[index];
                    Span::styled(
                        fit(column.title(), width, self.column_alignment(column)),
                        self.column_style(column).patch(self.header_style),
                    )
                }
                Slot::OverflowLeft => self.overflow_span(OVERFLOW_LEFT_TEXT, 1, self.header_style),
                Slot::OverflowRight { width } => {
                    self.overflow_span(OVERFLOW_RIGHT_TEXT, width, self.header_style)
                }
            };
            spans.push(span);
            spans.push(self.separator());
        }
        Line::from(spans)
    }

    fn row_line(
        &self,
        window: &ColumnWindow,
        widths: &[usize],
        row: &Row,
        is_highlighted: bool,
    ) -> Line<'static> {
        let mut row_style = row.style().unwrap_or_default();
        if is_highlighted {
            row_style = row_style.patch(self.highlight_style);
        }
        let mut spans = vec![self.separator()];
        for slot in &window.slots {
            let span = match *slot {
                Slot::Column { index, .. } => {
                    let column = &self.columns[index];
                    let (text, cell_style) = if column.is_select() {
                        (self.selection_text(row).to_string(), None)
                    } else {
                        let cell = row.get(column.key()).unwrap_or(&self.missing_data_indicator);
                        (cell.render(), cell.style())
                    };
                    let style = self
                        .column_style(column)
                        .patch(row_style)
                        .patch(cell_style.unwrap_or_default());
                    Span::styled(fit(&text, widths[index], self.column_alignment(column)), style)
                }
                Slot::OverflowLeft => self.overflow_span(OVERFLOW_LEFT_TEXT, 1, row_style),
                Slot::OverflowRight { width } => {
                    self.overflow_span(OVERFLOW_RIGHT_TEXT, width, row_style)
                }
            };
            spans.push(span);
            spans.push(self.separator());
        }
        Line::from(spans)
    }

    fn overflow_span(&self, text: &str, width: usize, style: Style) -> Span<'static> {
        Span::styled(
            fit(text, width, self.base_alignment),
            self.base_style.patch(style),
        )
    }

    fn footer_line(&self, total_width: usize) -> Line<'static> {
        let inner = total_width.saturating_sub(2);
        let plain_width = |spans: &[Span<'static>]| {
            spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect::<String>()
                .width()
        };
        let mut content = self.footer_spans();
        if plain_width(&content) > inner {
            let plain: String = content.iter().map(|s| s.content.as_ref()).collect();
            content = vec![Span::styled(limit_str(&plain, inner), self.base_style)];
        }
        let used = plain_width(&content);

        let mut spans = vec![self.separator()];
        spans.push(Span::styled(" ".repeat(inner.saturating_sub(used)), self.base_style));
        spans.extend(content);
        spans.push(self.separator());
        Line::from(spans)
    }

    fn footer_spans(&self) -> Vec<Span<'static>> {
        match &self.footer {
            Footer::Static(text) => vec![Span::styled(limit_str(text, usize::MAX), self.base_style)],
            Footer::Dynamic(footer) => {
                vec![Span::styled(limit_str(&footer(self), usize::MAX), self.base_style)]
            }
            Footer::Auto => {
                let mut spans = Vec::new();
                if self.filtered
                    && (self.filter_input.is_focused() || !self.filter_input.value().is_empty())
                {
                    spans.extend(self.filter_input.view(self.base_style));
                }
                if self.page_size > 0 || self.max_height > 0 {
                    if !spans.is_empty() {
                        spans.push(Span::styled(" ", self.base_style));
                    }
                    spans.push(Span::styled(
                        format!("{}/{}", self.current_page(), self.max_pages()),
                        self.base_style,
                    ));
                }
                spans
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use proptest::prelude::*;
    use ratatui::style::{Color, Stylize};

    const PIECES: [&str; 8] = ["a", "日", "\u{2764}", "\u{FE0F}", "\u{2764}\u{FE0F}", "é", "\n", "👍"];

    fn people() -> Table {
        Table::new(vec![
            Column::new("name", "Name", 5),
            Column::new("age", "Age", 3),
        ])
        .with_rows(vec![
            row!["name" => "Ann", "age" => 31],
            row!["name" => "Bartholomew", "age" => 7],
        ])
        .with_border(Border::NORMAL)
    }

    fn lines(table: &Table) -> Vec<String> {
        table.view_string().lines().map(str::to_string).collect()
    }

    #[test]
    fn limit_str_truncates_with_ellipsis() {
        assert_eq!(limit_str("hello", 5), "hello");
        assert_eq!(limit_str("hello world", 5), "hell…");
        assert_eq!(limit_str("two\nlines", 10), "two…");
        assert_eq!(limit_str("two\nlines", 3), "tw…");
        assert_eq!(limit_str("abc", 0), "");
        assert_eq!(limit_str("日本語", 4), "日…");

        let hearts = "\u{2764}\u{FE0F}".repeat(10);
        assert_eq!(limit_str(&hearts, 5), "\u{2764}\u{FE0F}\u{2764}\u{FE0F}…");
        assert!(limit_str(&hearts, 4).width() <= 4);
    }

    #[test]
    fn align_pads_to_width() {
        assert_eq!(fit("ab", 4, Alignment::Left), "ab  ");
        assert_eq!(fit("ab", 4, Alignment::Right), "  ab");
        assert_eq!(fit("ab", 5, Alignment::Center), " ab  ");
    }

    #[test]
    fn renders_framed_table() {
        assert_eq!(
            lines(&people()),
            vec![
                "┌─────┬───┐",
                "│ Name│Age│",
                "├─────┼───┤",
                "│  Ann│ 31│",
                "│Bart…│  7│",
                "└─────┴───┘",
            ]
        );
    }

    #[test]
    fn hidden_header_and_missing_data() {
        let table = people()
            .with_rows(vec![row!["name" => "Ann"]])
            .with_missing_data_indicator("-")
            .with_header_visibility(false)
            .with_base_alignment(Alignment::Left);
        assert_eq!(
            lines(&table),
            vec!["┌─────┬───┐", "│Ann  │-  │", "└─────┴───┘"]
        );
    }

    #[test]
    fn paged_table_shows_page_footer() {
        let table = people().with_page_size(1);
        assert_eq!(
            lines(&table),
            vec![
                "┌─────┬───┐",
                "│ Name│Age│",
                "├─────┼───┤",
                "│  Ann│ 31│",
                "├─────┴───┤",
                "│      1/2│",
                "└─────────┘",
            ]
        );
    }

    #[test]
    fn static_and_dynamic_footers() {
        let table = people().with_static_footer("hi");
        assert_eq!(lines(&table)[5], "├─────┴───┤");
        assert_eq!(lines(&table)[6], "│       hi│");

        let table = people().with_dynamic_footer(|t| format!("{} rows", t.visible_row_count()));
        assert_eq!(lines(&table)[6], "│   2 rows│");
        assert_eq!(table.chrome_height(), 6);
    }

    #[test]
    fn overflow_columns_render_indicators() {
        let table = Table::new(vec![
            Column::new("a", "A", 2),
            Column::new("b", "B", 2),
            Column::new("c", "C", 2),
            Column::new("d", "D", 2),
        ])
        .with_rows(vec![row!["a" => 1, "b" => 2, "c" => 3, "d" => 4]])
        .with_border(Border::NORMAL)
        .with_max_total_width(9);
        // 1 + 3 + 3 leaves 2 cells for the indicator and its border
        assert_eq!(
            lines(&table),
            vec!["┌──┬──┬─┐", "│ A│ B│>│", "├──┼──┼─┤", "│ 1│ 2│>│", "└──┴──┴─┘"]
        );

        let mut table = table.with_horizontal_freeze_column_count(1);
        table.scroll_right();
        table.scroll_right();
        assert_eq!(table.horizontal_scroll_offset(), 2);
        assert_eq!(
            lines(&table),
            vec!["┌──┬─┬──┐", "│ A│<│ D│", "├──┼─┼──┤", "│ 1│<│ 4│", "└──┴─┴──┘"]
        );
    }

    #[test]
    fn budget_under_three_cells_renders_nothing() {
        let table = people().with_max_total_width(2);
        assert!(table.view().lines.is_empty());
        assert_eq!(table.view_string(), "");
    }

    #[test]
    fn highlight_applies_only_when_focused() {
        let table = people();
        let body = &table.view().lines[3];
        assert_eq!(body.spans[1].style.bg, None);

        let table = table.with_focused(true);
        let highlight_bg = Some(Color::Rgb(0x33, 0x33, 0x44));
        assert_eq!(table.view().lines[3].spans[1].style.bg, highlight_bg);
        assert_eq!(table.view().lines[4].spans[1].style.bg, None);
    }

    #[test]
    fn cell_style_wins_over_row_and_column() {
        let table = Table::new(vec![Column::new("v", "V", 3).with_style(Style::new().fg(Color::Red))])
            .with_rows(vec![
                row!["v" => CellValue::styled(1, Style::new().fg(Color::Green))]
                    .with_style(Style::new().fg(Color::Blue).bold()),
                row!["v" => 2].with_style(Style::new().fg(Color::Blue)),
                row!["v" => 3],
            ]);
        let text = table.view();
        let style = text.lines[3].spans[1].style;
        assert_eq!(style.fg, Some(Color::Green));
        assert!(style.add_modifier.contains(ratatui::style::Modifier::BOLD));
        assert_eq!(text.lines[4].spans[1].style.fg, Some(Color::Blue));
        assert_eq!(text.lines[5].spans[1].style.fg, Some(Color::Red));
        // header: column style below header style
        let header = table.with_header_style(Style::new().fg(Color::Yellow)).view();
        assert_eq!(header.lines[1].spans[1].style.fg, Some(Color::Yellow));
    }

    #[test]
    fn select_column_renders_selection_text() {
        let table = people()
            .with_rows(vec![row!["name" => "Ann", "age" => 31].selected(true), row!["name" => "Bo", "age" => 4]])
            .with_selectable_rows(true);
        let rendered = lines(&table);
        assert_eq!(rendered[1], "│[x]│ Name│Age│");
        assert_eq!(rendered[3], "│[x]│  Ann│ 31│");
        assert_eq!(rendered[4], "│[ ]│   Bo│  4│");
    }

    #[test]
    fn emoji_presentation_stays_inside_frame() {
        let hearts = "\u{2764}\u{FE0F}".repeat(10);
        let t = Table::new(vec![Column::new("a", "A", 5)])
            .with_rows(vec![row!["a" => hearts.as_str()]])
            .with_max_total_width(7)
            .with_static_footer(hearts.as_str());
        let shown = lines(&t);
        assert_eq!(shown[3], "┃\u{2764}\u{FE0F}\u{2764}\u{FE0F}…┃");
        assert_eq!(shown[5], "┃\u{2764}\u{FE0F}\u{2764}\u{FE0F}…┃");
        assert!(shown.iter().all(|line| line.width() == 7));
    }

    proptest! {
        #[test]
        fn rendered_lines_fit_width_budget(
            widths in prop::collection::vec(1usize..8, 1..5),
            texts in prop::collection::vec(
                prop::collection::vec(prop::sample::select(PIECES.to_vec()), 0..10),
                1..5,
            ),
            footer in prop::collection::vec(prop::sample::select(PIECES.to_vec()), 0..12),
            max_total_width in 3usize..40,
        ) {
            let columns: Vec<Column> = widths
                .iter()
                .enumerate()
                .map(|(i, &w)| Column::new(format!("c{i}"), format!("C{i}"), w))
                .collect();
            let rows: Vec<Row> = (0..texts.len())
                .map(|r| {
                    (0..widths.len())
                        .map(|c| (format!("c{c}"), CellValue::from(texts[(r + c) % texts.len()].concat())))
                        .collect()
                })
                .collect();
            let t = Table::new(columns)
                .with_rows(rows)
                .with_max_total_width(max_total_width)
                .with_static_footer(footer.concat());
            for line in t.view_string().lines() {
                prop_assert!(line.width() <= max_total_width, "{:?} wider than {}", line, max_total_width);
            }
        }
    }
}
