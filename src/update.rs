use ratatui::crossterm::event::{KeyEvent, KeyEventKind};
use tracing::{debug, trace};

use crate::domain::{Dispatch, Effect, TableEvent, UserEvent};
use crate::keys::{Action, key_token};
use crate::model::Table;

impl Table {
    /// Applies one event and returns the new table with what happened during it.
    pub fn update(mut self, event: &TableEvent) -> (Self, Dispatch) {
        let mut dispatch = Dispatch::default();
        match event {
            TableEvent::Key(key) => {
                if self.focused && key.kind == KeyEventKind::Press {
                    // keys typed into the filter only report focus changes
                    let typing = self.filter_input.is_focused();
                    let previous = self.row_cursor_index();
                    self.handle_key(key, &mut dispatch);
                    let current = self.row_cursor_index();
                    if !typing && previous != current {
                        dispatch.push(UserEvent::HighlightedIndexChanged {
                            previous_row_index: previous,
                            selected_row_index: current,
                        });
                    }
                }
            }
            TableEvent::Resize { width, height } => self.resize(*width, *height),
            TableEvent::Other => {}
        }
        (self, dispatch)
    }

    fn resize(&mut self, width: usize, height: usize) {
        debug!("Resize to {}x{}", width, height);
        self.max_total_width = width;
        self.max_height = height;
        if self.target_width > 0 {
            self.target_width = width;
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, dispatch: &mut Dispatch) {
        let token = key_token(key);
        if self.filter_input.is_focused() {
            let blur = token
                .as_deref()
                .is_some_and(|t| self.key_map.filter_blur.matches(t));
            if blur {
                self.filter_input.blur();
                dispatch.push(UserEvent::FilterInputUnfocused);
            } else if self.filter_input.read(key) {
                self.filter_changed();
            }
            return;
        }

        let Some(token) = token else {
            return;
        };
        for action in self.key_map.actions(&token) {
            trace!("Key '{}' triggers {:?}", token, action);
            self.apply(action, dispatch);
        }
    }

    fn apply(&mut self, action: Action, dispatch: &mut Dispatch) {
        match action {
            Action::RowDown => self.move_highlight_down(),
            Action::RowUp => self.move_highlight_up(),
            Action::RowLeft => self.move_highlight_left(),
            Action::RowRight => self.move_highlight_right(),
            Action::RowStart => self.move_highlighted_row_start(),
            Action::RowEnd => self.move_highlighted_row_end(),
            Action::RowTop => self.row_cursor = 0,
            Action::RowBottom => self.row_cursor = self.visible_row_count().saturating_sub(1),
            Action::RowSelectToggle => {
                if let Some(event) = self.toggle_select() {
                    dispatch.push(event);
                }
            }
            Action::PageDown => self.page_down(),
            Action::PageUp => self.page_up(),
            Action::PageFirst => self.page_first(),
            Action::PageLast => self.page_last(),
            Action::Filter => {
                if self.filtered {
                    self.filter_input.focus();
                    dispatch.push(UserEvent::FilterInputFocused);
                }
            }
            // only meaningful while the filter is focused
            Action::FilterBlur => {}
            Action::FilterClear => self.clear_filter(),
            Action::ScrollRight => self.scroll_right(),
            Action::ScrollLeft => self.scroll_left(),
            Action::Quit => dispatch.effect = Some(Effect::Quit),
        }
    }

    fn move_highlight_down(&mut self) {
        let last = self.visible_row_count().saturating_sub(1);
        self.row_cursor = (self.row_cursor_index() + 1).min(last);
        trace!("Row cursor {}", self.row_cursor);
    }

    fn move_highlight_up(&mut self) {
        self.row_cursor = self.row_cursor_index().saturating_sub(1);
        trace!("Row cursor {}", self.row_cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::keys::{Binding, KeyMap};
    use crate::row::Row;
    use ratatui::crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> TableEvent {
        TableEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ch(c: char) -> TableEvent {
        press(KeyCode::Char(c))
    }

    fn table(rows: i64) -> Table {
        let rows: Vec<Row> = (0..rows)
            .map(|i| row!["id" => i, "name" => format!("row {i}")])
            .collect();
        Table::new(vec![Column::new("id", "ID", 3), Column::new("name", "Name", 8)])
            .with_rows(rows)
            .with_focused(true)
    }

    fn run(mut table: Table, events: &[TableEvent]) -> (Table, Vec<Dispatch>) {
        let mut dispatches = Vec::new();
        for event in events {
            let (next, dispatch) = table.update(event);
            table = next;
            dispatches.push(dispatch);
        }
        (table, dispatches)
    }

    #[test]
    fn row_movement_saturates_and_reports_changes() {
        let (t, d) = table(3).update(&press(KeyCode::Down));
        assert_eq!(t.row_cursor_index(), 1);
        assert_eq!(
            d.events,
            vec![UserEvent::HighlightedIndexChanged {
                previous_row_index: 0,
                selected_row_index: 1
            }]
        );

        let (t, d) = run(t, &[ch('j'), ch('j'), ch('j')]);
        assert_eq!(t.row_cursor_index(), 2);
        assert!(d[2].events.is_empty());

        let (t, d) = t.update(&ch('g'));
        assert_eq!(t.row_cursor_index(), 0);
        assert_eq!(d.events.len(), 1);
        let (t, d) = t.update(&press(KeyCode::Up));
        assert_eq!(t.row_cursor_index(), 0);
        assert!(d.events.is_empty());
        let (t, _) = t.update(&ch('G'));
        assert_eq!(t.row_cursor_index(), 2);
    }

    #[test]
    fn unfocused_tables_ignore_keys_but_not_resize() {
        let t = table(3).with_focused(false);
        let (t, d) = t.update(&press(KeyCode::Down));
        assert_eq!(t.row_cursor_index(), 0);
        assert_eq!(d, Dispatch::default());

        let (t, _) = t.update(&TableEvent::Resize { width: 40, height: 10 });
        assert_eq!((t.max_total_width(), t.max_height()), (40, 10));
    }

    #[test]
    fn key_releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        let (t, _) = table(3).update(&TableEvent::Key(release));
        assert_eq!(t.row_cursor_index(), 0);
    }

    #[test]
    fn paging_moves_cursor_by_page() {
        let t = table(10).with_page_size(3);
        let (t, d) = t.update(&press(KeyCode::PageDown));
        assert_eq!((t.row_cursor_index(), t.current_page()), (3, 2));
        assert_eq!(d.events.len(), 1);
        let (t, _) = t.update(&press(KeyCode::End));
        assert_eq!(t.current_page(), 4);
        let (t, _) = t.update(&press(KeyCode::PageUp));
        assert_eq!(t.current_page(), 3);
        let (t, _) = t.update(&press(KeyCode::Home));
        assert_eq!(t.row_cursor_index(), 0);
    }

    #[test]
    fn select_toggle_emits_event() {
        let t = table(3).with_selectable_rows(true);
        let (t, d) = run(t, &[ch('j'), ch(' ')]);
        assert_eq!(
            d[1].events,
            vec![UserEvent::RowSelectToggled {
                row_index: 1,
                is_selected: true
            }]
        );
        assert_eq!(t.selected_rows().len(), 1);

        let (t, d) = t.update(&ch(' '));
        assert!(t.selected_rows().is_empty());
        assert_eq!(d.events.len(), 1);

        // not selectable: nothing happens
        let (_, d) = table(3).update(&ch(' '));
        assert!(d.events.is_empty());
    }

    #[test]
    fn filter_input_captures_keys_until_blurred() {
        let t = table(12).with_filtered(true);
        let (t, d) = t.update(&ch('/'));
        assert!(t.is_filter_focused());
        assert_eq!(d.events, vec![UserEvent::FilterInputFocused]);

        // "j" and "1" are typed, not navigation
        let (t, _) = run(t, &[ch('1'), ch('j')]);
        assert_eq!(t.filter_text(), "1j");
        assert_eq!(t.visible_row_count(), 0);
        let (t, _) = t.update(&press(KeyCode::Backspace));
        assert_eq!(t.filter_text(), "1");
        assert_eq!(t.visible_row_count(), 3);

        let (t, d) = t.update(&press(KeyCode::Enter));
        assert!(!t.is_filter_focused());
        assert_eq!(d.events, vec![UserEvent::FilterInputUnfocused]);
        assert_eq!(t.filter_text(), "1");

        let (t, _) = t.update(&ch('j'));
        assert_eq!(t.row_cursor_index(), 1);

        let (t, d) = t.update(&press(KeyCode::Esc));
        assert_eq!(t.filter_text(), "");
        assert_eq!(t.visible_row_count(), 12);
        assert_eq!(t.row_cursor_index(), 0);
        assert_eq!(d.events.len(), 1);
    }

    #[test]
    fn typing_into_filter_reports_no_highlight_change() {
        let t = table(12).with_filtered(true);
        let (t, _) = run(t, &[ch('j'), ch('j'), ch('/')]);
        assert_eq!(t.row_cursor_index(), 2);
        let (t, d) = t.update(&ch('1'));
        assert_eq!(t.row_cursor_index(), 0);
        assert!(d.events.is_empty());
        let (_, d) = t.update(&press(KeyCode::Esc));
        assert_eq!(d.events, vec![UserEvent::FilterInputUnfocused]);
    }

    #[test]
    fn resize_round_trip_restores_view() {
        let columns = (0..6)
            .map(|i| Column::new(format!("c{i}"), format!("C{i}"), 4))
            .collect();
        let rows: Vec<Row> = (0..10i64).map(|i| row!["c0" => i, "c3" => i * 10]).collect();
        let t = Table::new(columns).with_rows(rows).with_focused(true);
        let (t, _) = t.update(&TableEvent::Resize { width: 20, height: 9 });
        let (t, _) = run(t, &[ch('l'), ch('l'), ch('l'), ch('j'), ch('j'), ch('j'), ch('j')]);
        assert_eq!((t.current_page(), t.horizontal_scroll_offset()), (2, 1));
        let before = t.view_string();

        let (t, _) = t.update(&TableEvent::Resize { width: 80, height: 40 });
        assert_eq!((t.current_page(), t.horizontal_scroll_offset()), (1, 0));
        assert_ne!(t.view_string(), before);

        let (t, _) = t.update(&TableEvent::Resize { width: 20, height: 9 });
        assert_eq!(t.view_string(), before);
        assert_eq!(t.row_cursor_index(), 4);
    }

    #[test]
    fn filter_binding_needs_filtering_enabled() {
        let (t, d) = table(3).update(&ch('/'));
        assert!(!t.is_filter_focused());
        assert!(d.events.is_empty());
    }

    #[test]
    fn quit_is_reported_except_while_typing() {
        let ctrl_c = TableEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let (t, d) = table(2).with_filtered(true).update(&ctrl_c);
        assert!(d.quit_requested());

        let (t, _) = t.update(&ch('/'));
        let (_, d) = t.update(&ctrl_c);
        assert!(!d.quit_requested());
    }

    #[test]
    fn rebound_keys_drive_same_transitions() {
        let keys = KeyMap::default().with_row_down(Binding::new(["s"]));
        let (t, _) = table(3).with_key_map(keys).update(&ch('s'));
        assert_eq!(t.row_cursor_index(), 1);
        let (t, _) = t.update(&ch('j'));
        assert_eq!(t.row_cursor_index(), 1);
    }

    #[test]
    fn horizontal_keys_move_column_cursor_and_scroll() {
        let columns = (0..5)
            .map(|i| Column::new(format!("c{i}"), format!("C{i}"), 4))
            .collect();
        let t = Table::new(columns).with_focused(true).with_max_total_width(15);
        let (t, _) = run(t, &[ch('l'), ch('l'), ch('l')]);
        assert_eq!(t.column_cursor_index(), 3);
        assert_eq!(t.horizontal_scroll_offset(), 2);

        let (t, _) = t.update(&ch('0'));
        assert_eq!((t.column_cursor_index(), t.horizontal_scroll_offset()), (0, 0));
        let (t, _) = t.update(&ch('$'));
        assert_eq!(t.column_cursor_index(), 4);
        assert_eq!(t.horizontal_scroll_offset(), t.max_horizontal_column_index());

        let shift_left = TableEvent::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT));
        let (t, _) = t.update(&shift_left);
        assert_eq!(t.horizontal_scroll_offset(), 2);
    }

    #[test]
    fn resize_keeps_cursor_and_selection() {
        let t = table(5).with_selectable_rows(true).with_target_width(30);
        let (t, _) = run(t, &[ch('j'), ch(' ')]);
        let (t, d) = t.update(&TableEvent::Resize { width: 50, height: 20 });
        assert!(d.events.is_empty());
        assert_eq!(t.row_cursor_index(), 1);
        assert_eq!(t.selected_rows().len(), 1);
        assert_eq!(t.target_width, 50);
    }
}
