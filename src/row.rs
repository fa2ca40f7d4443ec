use std::collections::HashMap;

use derive_setters::Setters;
use ratatui::style::Style;

use crate::cell::CellValue;

/// Cell values of a row keyed by column key.
pub type RowData = HashMap<String, CellValue>;

/// One record of the table.
///
/// A column without an entry in `data` is missing data and renders with the
/// table's missing-data indicator.
#[derive(Debug, Clone, PartialEq, Default, Setters)]
#[setters(generate = false, prefix = "with_", strip_option)]
pub struct Row {
    data: RowData,
    #[setters(generate)]
    style: Option<Style>,
    selected: bool,
}

impl Row {
    pub fn new(data: RowData) -> Self {
        Row {
            data,
            style: None,
            selected: false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.data.get(key)
    }

    pub fn data(&self) -> &RowData {
        &self.data
    }

    pub fn style(&self) -> Option<Style> {
        self.style
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Marks the row selected before it is handed to a table.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub(crate) fn toggle_selected(&mut self) -> bool {
        self.selected = !self.selected;
        self.selected
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
