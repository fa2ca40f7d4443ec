use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tvtable::{Table, TableEvent};

use crate::error::ViewerError;
use crate::ui::STATUS_LINE_HEIGHT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Forwarded to the table unchanged.
    Table(TableEvent),
    CopyRow,
    Quit,
}

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(event_poll_time: u64) -> Self {
        Self { event_poll_time }
    }

    pub fn handle_event(&self, table: &Table) -> Result<Option<Message>, ViewerError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(None);
        }
        let message = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Self::handle_key(key, table)),
            Event::Resize(width, height) => Some(Self::resize(width, height)),
            _ => None,
        };
        Ok(message)
    }

    /// The table area is the terminal minus the status line.
    pub fn resize(width: u16, height: u16) -> Message {
        Message::Table(TableEvent::Resize {
            width: width as usize,
            height: (height as usize).saturating_sub(STATUS_LINE_HEIGHT),
        })
    }

    /// Viewer keys apply only while the filter is not being typed into.
    fn handle_key(key: KeyEvent, table: &Table) -> Message {
        let message = match (key.code, key.modifiers) {
            _ if table.is_filter_focused() => Message::Table(key.into()),
            (KeyCode::Char('q'), KeyModifiers::NONE) => Message::Quit,
            (KeyCode::Char('y'), KeyModifiers::NONE) => Message::CopyRow,
            _ => Message::Table(key.into()),
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
