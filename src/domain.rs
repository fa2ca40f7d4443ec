use ratatui::crossterm::event::KeyEvent;

/// Input forwarded by the host to [`crate::Table::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Key(KeyEvent),
    Resize { width: usize, height: usize },
    Other,
}

impl From<KeyEvent> for TableEvent {
    fn from(key: KeyEvent) -> Self {
        TableEvent::Key(key)
    }
}

/// Semantic change produced by a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    /// The row cursor moved. Not reported for keys typed into the filter input,
    /// even when the new filter text resets the cursor.
    HighlightedIndexChanged {
        previous_row_index: usize,
        selected_row_index: usize,
    },
    RowSelectToggled {
        row_index: usize,
        is_selected: bool,
    },
    FilterInputFocused,
    FilterInputUnfocused,
}

/// Request the table makes of its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Quit,
}

/// Everything a single call to `update` reports besides the new table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub events: Vec<UserEvent>,
    pub effect: Option<Effect>,
}

impl Dispatch {
    pub(crate) fn push(&mut self, event: UserEvent) {
        self.events.push(event);
    }

    pub fn quit_requested(&self) -> bool {
        self.effect == Some(Effect::Quit)
    }
}
