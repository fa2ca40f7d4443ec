use arboard::Clipboard;
use tracing::{debug, trace};

use tvtable::{Table, UserEvent};

use crate::controller::Message;
use crate::loader::wrap_cell_content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Quitting,
}

pub struct App {
    name: String,
    table: Table,
    status: Status,
    status_message: String,
    clipboard: Option<Clipboard>,
}

impl App {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        let clipboard = Clipboard::new()
            .inspect_err(|e| debug!("Clipboard unavailable: {e}"))
            .ok();
        App {
            name: name.into(),
            table,
            status: Status::Ready,
            status_message: String::new(),
            clipboard,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn update(mut self, message: Message) -> Self {
        match message {
            Message::Quit => self.status = Status::Quitting,
            Message::CopyRow => self.copy_highlighted_row(),
            Message::Table(event) => {
                let (table, dispatch) = self.table.update(&event);
                self.table = table;
                for event in &dispatch.events {
                    trace!("Table event {:?}", event);
                    self.status_message = match event {
                        UserEvent::RowSelectToggled { is_selected: true, .. } => "row selected".into(),
                        UserEvent::RowSelectToggled { is_selected: false, .. } => {
                            "row deselected".into()
                        }
                        UserEvent::FilterInputFocused => "typing filter, enter to apply".into(),
                        UserEvent::FilterInputUnfocused => String::new(),
                        UserEvent::HighlightedIndexChanged { .. } => continue,
                    };
                }
                if dispatch.quit_requested() {
                    self.status = Status::Quitting;
                }
            }
        }
        self
    }

    fn copy_highlighted_row(&mut self) {
        let Some(content) = highlighted_row_csv(&self.table) else {
            return;
        };
        let Some(clipboard) = self.clipboard.as_mut() else {
            self.status_message = "no clipboard available".into();
            return;
        };
        match clipboard.set_text(content) {
            Ok(_) => {
                trace!("Copied row content to clipboard.");
                self.status_message = "row copied".into();
            }
            Err(e) => {
                debug!("Error copying to clipboard: {:?}", e);
                self.status_message = "copy failed".into();
            }
        }
    }
}

/// The highlighted row as one comma separated line, select column excluded.
pub fn highlighted_row_csv(table: &Table) -> Option<String> {
    let row = table.highlighted_row()?;
    let content = table
        .columns()
        .iter()
        .filter(|c| c.key() != tvtable::SELECT_COLUMN_KEY)
        .map(|c| {
            row.get(c.key())
                .map(|v| wrap_cell_content(&v.render()))
                .unwrap_or_default()
        })
        .collect::<Vec<String>>();
    Some(content.join(","))
}
