use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use tracing::trace;

/// Single line text input used for the filter query.
#[derive(Debug, Clone, Default)]
pub struct Inputter {
    current_input: String,
    curser_pos: usize, // in chars
    focused: bool,
    prompt: String,
}

impl Inputter {
    pub fn new(prompt: impl Into<String>) -> Self {
        Inputter {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Applies a key press and returns `true` if the input text changed.
    pub fn read(&mut self, key: &KeyEvent) -> bool {
        let before = self.current_input.len();
        let changed = match (key.code, key.modifiers) {
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, KeyModifiers::NONE) => self.left(),
            (KeyCode::Right, KeyModifiers::NONE) => self.right(),
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.home(),
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => self.end(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.clear_to_start(),
            (kc, km) => self.key(kc, km),
        };
        trace!(
            "Input '{}' ({} -> {} bytes), cursor {}",
            self.current_input,
            before,
            self.current_input.len(),
            self.curser_pos
        );
        changed
    }

    pub fn value(&self) -> &str {
        &self.current_input
    }

    pub fn set(&mut self, s: &str) {
        self.current_input = s.to_string();
        self.curser_pos = self.current_input.chars().count();
    }

    pub fn reset(&mut self) {
        self.current_input.clear();
        self.curser_pos = 0;
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn cursor(&self) -> usize {
        self.curser_pos
    }

    /// Prompt and text, with the character under the cursor reversed while focused.
    pub fn view(&self, style: Style) -> Vec<Span<'static>> {
        let mut spans = vec![Span::styled(self.prompt.clone(), style)];
        if !self.focused {
            spans.push(Span::styled(self.current_input.clone(), style));
            return spans;
        }
        let split = self.getbytepos();
        let (head, tail) = self.current_input.split_at(split);
        let mut tail_chars = tail.chars();
        let under_cursor = tail_chars.next().map(String::from).unwrap_or_else(|| " ".into());
        spans.push(Span::styled(head.to_string(), style));
        spans.push(Span::styled(under_cursor, style.add_modifier(Modifier::REVERSED)));
        spans.push(Span::styled(tail_chars.as_str().to_string(), style));
        spans
    }

    fn backspace(&mut self) -> bool {
        if self.curser_pos == 0 {
            return false;
        }
        self.curser_pos -= 1;
        let pos = self.getbytepos();
        self.current_input.remove(pos);
        true
    }

    fn delete(&mut self) -> bool {
        if self.curser_pos >= self.current_input.chars().count() {
            return false;
        }
        let pos = self.getbytepos();
        self.current_input.remove(pos);
        true
    }

    fn left(&mut self) -> bool {
        self.curser_pos = self.curser_pos.saturating_sub(1);
        false
    }

    fn right(&mut self) -> bool {
        if self.curser_pos < self.current_input.chars().count() {
            self.curser_pos += 1;
        }
        false
    }

    fn home(&mut self) -> bool {
        self.curser_pos = 0;
        false
    }

    fn end(&mut self) -> bool {
        self.curser_pos = self.current_input.chars().count();
        false
    }

    fn clear_to_start(&mut self) -> bool {
        let pos = self.getbytepos();
        self.current_input.replace_range(..pos, "");
        self.curser_pos = 0;
        pos > 0
    }

    fn key(&mut self, code: KeyCode, modifier: KeyModifiers) -> bool {
        if modifier.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match code.as_char() {
            Some(chr) => {
                self.current_input.insert(self.getbytepos(), chr);
                self.curser_pos += 1;
                true
            }
            None => false,
        }
    }

    fn getbytepos(&self) -> usize {
        self.current_input
            .char_indices()
            .nth(self.curser_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}
