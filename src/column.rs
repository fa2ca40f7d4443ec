use derive_setters::Setters;
use ratatui::layout::Alignment;
use ratatui::style::Style;

/// Key of the synthetic column prepended to selectable tables.
pub const SELECT_COLUMN_KEY: &str = "___select___";

#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(generate = false, prefix = "with_", strip_option)]
pub struct Column {
    key: String,
    title: String,
    width: usize,
    flex_factor: usize,
    #[setters(generate)]
    style: Option<Style>,
    #[setters(generate)]
    alignment: Option<Alignment>,
    #[setters(generate)]
    filtered: bool,
}

impl Column {
    /// A fixed width column.
    pub fn new(key: impl Into<String>, title: impl Into<String>, width: usize) -> Self {
        Column {
            key: key.into(),
            title: title.into(),
            width,
            flex_factor: 0,
            style: None,
            alignment: None,
            filtered: true,
        }
    }

    /// A column that takes a share of the target width proportional to `flex_factor`.
    pub fn flex(key: impl Into<String>, title: impl Into<String>, flex_factor: usize) -> Self {
        Column {
            flex_factor: flex_factor.max(1),
            ..Column::new(key, title, 1)
        }
    }

    pub(crate) fn select(title: impl Into<String>, width: usize) -> Self {
        Column::new(SELECT_COLUMN_KEY, title, width).with_filtered(false)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Configured width. Flex columns report their resolved width through the table.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn flex_factor(&self) -> usize {
        self.flex_factor
    }

    pub fn is_flex(&self) -> bool {
        self.flex_factor > 0
    }

    pub fn style(&self) -> Option<Style> {
        self.style
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    pub fn is_filterable(&self) -> bool {
        self.filtered
    }

    pub(crate) fn is_select(&self) -> bool {
        self.key == SELECT_COLUMN_KEY
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Content widths of all columns once flex columns are resolved against `target_width`.
///
/// Flex columns share what is left of the target after fixed columns and one border
/// cell per column plus the outer edge. Leftover cells go to the first flex columns.
/// Without a target width (0) flex columns are one cell wide.
pub(crate) fn resolve_widths(columns: &[Column], target_width: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.width).collect();
    if target_width == 0 {
        return widths;
    }

    let fixed: usize = columns.iter().filter(|c| !c.is_flex()).map(|c| c.width).sum();
    let flex_gcd = columns
        .iter()
        .filter(|c| c.is_flex())
        .fold(0, |acc, c| gcd(acc, c.flex_factor));
    if flex_gcd == 0 {
        return widths;
    }
    let total_factor: usize = columns
        .iter()
        .filter(|c| c.is_flex())
        .map(|c| c.flex_factor / flex_gcd)
        .sum();

    let flex_width = target_width.saturating_sub(fixed + columns.len() + 1);
    let unit = flex_width / total_factor;
    let mut leftover = flex_width % total_factor;

    for (width, column) in widths.iter_mut().zip(columns) {
        if !column.is_flex() {
            continue;
        }
        let mut w = unit * (column.flex_factor / flex_gcd);
        if leftover > 0 {
            w += 1;
            leftover -= 1;
        }
        *width = w.max(1);
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_presentation_options() {
        let column = Column::new("id", "ID", 4)
            .with_style(Style::new())
            .with_alignment(Alignment::Left)
            .with_filtered(false);
        assert_eq!(column.key(), "id");
        assert_eq!(column.title(), "ID");
        assert_eq!(column.width(), 4);
        assert_eq!(column.alignment(), Some(Alignment::Left));
        assert!(!column.is_filterable());
        assert!(!column.is_flex());
    }

    #[test]
    fn fixed_widths_ignore_target() {
        let columns = vec![Column::new("a", "A", 3), Column::new("b", "B", 5)];
        assert_eq!(resolve_widths(&columns, 0), vec![3, 5]);
        assert_eq!(resolve_widths(&columns, 100), vec![3, 5]);
    }

    #[test]
    fn flex_columns_fill_target_width() {
        let columns = vec![
            Column::new("id", "ID", 4),
            Column::flex("name", "Name", 1),
            Column::flex("desc", "Description", 2),
        ];
        // 30 - 4 fixed - 4 borders = 22 → unit 7, leftover 1
        let widths = resolve_widths(&columns, 30);
        assert_eq!(widths, vec![4, 8, 14]);
        let total: usize = widths.iter().map(|w| w + 1).sum::<usize>() + 1;
        assert_eq!(total, 30);
    }

    #[test]
    fn flex_columns_never_collapse_below_one() {
        let columns = vec![Column::new("id", "ID", 20), Column::flex("name", "Name", 1)];
        assert_eq!(resolve_widths(&columns, 10), vec![20, 1]);
        assert_eq!(resolve_widths(&columns, 0), vec![20, 1]);
    }
}
