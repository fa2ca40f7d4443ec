use derive_setters::Setters;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Logical actions the table reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RowDown,
    RowUp,
    RowLeft,
    RowRight,
    RowStart,
    RowEnd,
    RowTop,
    RowBottom,
    RowSelectToggle,
    PageDown,
    PageUp,
    PageFirst,
    PageLast,
    Filter,
    FilterBlur,
    FilterClear,
    ScrollRight,
    ScrollLeft,
    Quit,
}

/// A set of key tokens that trigger one action, e.g. `["down", "j"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    keys: Vec<String>,
}

impl Binding {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Binding {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn disabled() -> Self {
        Binding::default()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn set_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
    }

    pub fn matches(&self, token: &str) -> bool {
        self.keys.iter().any(|k| k == token)
    }
}

/// Key bindings of a focused table.
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
#[setters(prefix = "with_")]
pub struct KeyMap {
    pub row_down: Binding,
    pub row_up: Binding,
    pub row_left: Binding,
    pub row_right: Binding,
    pub row_start: Binding,
    pub row_end: Binding,
    pub row_top: Binding,
    pub row_bottom: Binding,
    pub row_select_toggle: Binding,
    pub page_down: Binding,
    pub page_up: Binding,
    pub page_first: Binding,
    pub page_last: Binding,
    /// Starts typing into the filter.
    pub filter: Binding,
    /// Stops typing into the filter, the query stays applied.
    pub filter_blur: Binding,
    /// Clears the query while the filter is not focused.
    pub filter_clear: Binding,
    pub scroll_right: Binding,
    pub scroll_left: Binding,
    pub quit: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        KeyMap {
            row_down: Binding::new(["down", "j"]),
            row_up: Binding::new(["up", "k"]),
            row_left: Binding::new(["left", "h"]),
            row_right: Binding::new(["right", "l"]),
            row_start: Binding::new(["0"]),
            row_end: Binding::new(["$"]),
            row_top: Binding::new(["g"]),
            row_bottom: Binding::new(["G"]),
            row_select_toggle: Binding::new([" ", "enter"]),
            page_down: Binding::new(["pgdown", "ctrl+f"]),
            page_up: Binding::new(["pgup", "ctrl+b"]),
            page_first: Binding::new(["home", "g"]),
            page_last: Binding::new(["end"]),
            filter: Binding::new(["/"]),
            filter_blur: Binding::new(["enter", "esc"]),
            filter_clear: Binding::new(["esc"]),
            scroll_right: Binding::new(["shift+right"]),
            scroll_left: Binding::new(["shift+left"]),
            quit: Binding::new(["ctrl+c"]),
        }
    }
}

impl KeyMap {
    /// Every binding paired with its action, in dispatch order.
    pub fn bindings(&self) -> [(Action, &Binding); 19] {
        [
            (Action::RowDown, &self.row_down),
            (Action::RowUp, &self.row_up),
            (Action::RowLeft, &self.row_left),
            (Action::RowRight, &self.row_right),
            (Action::RowStart, &self.row_start),
            (Action::RowEnd, &self.row_end),
            (Action::RowTop, &self.row_top),
            (Action::RowBottom, &self.row_bottom),
            (Action::RowSelectToggle, &self.row_select_toggle),
            (Action::PageDown, &self.page_down),
            (Action::PageUp, &self.page_up),
            (Action::PageFirst, &self.page_first),
            (Action::PageLast, &self.page_last),
            (Action::Filter, &self.filter),
            (Action::FilterBlur, &self.filter_blur),
            (Action::FilterClear, &self.filter_clear),
            (Action::ScrollRight, &self.scroll_right),
            (Action::ScrollLeft, &self.scroll_left),
            (Action::Quit, &self.quit),
        ]
    }

    /// All actions bound to `token`. Overlapping bindings all fire.
    pub fn actions(&self, token: &str) -> Vec<Action> {
        self.bindings()
            .into_iter()
            .filter(|(_, binding)| binding.matches(token))
            .map(|(action, _)| action)
            .collect()
    }

    pub fn binding(&self, action: Action) -> &Binding {
        match action {
            Action::RowDown => &self.row_down,
            Action::RowUp => &self.row_up,
            Action::RowLeft => &self.row_left,
            Action::RowRight => &self.row_right,
            Action::RowStart => &self.row_start,
            Action::RowEnd => &self.row_end,
            Action::RowTop => &self.row_top,
            Action::RowBottom => &self.row_bottom,
            Action::RowSelectToggle => &self.row_select_toggle,
            Action::PageDown => &self.page_down,
            Action::PageUp => &self.page_up,
            Action::PageFirst => &self.page_first,
            Action::PageLast => &self.page_last,
            Action::Filter => &self.filter,
            Action::FilterBlur => &self.filter_blur,
            Action::FilterClear => &self.filter_clear,
            Action::ScrollRight => &self.scroll_right,
            Action::ScrollLeft => &self.scroll_left,
            Action::Quit => &self.quit,
        }
    }
}

/// Textual token of a key press as used in [`Binding`]s.
///
/// Characters map to themselves (`"G"`, `"$"`, `" "`), named keys to lower case
/// names (`"pgdown"`, `"esc"`), modifiers are prefixed (`"ctrl+f"`, `"shift+right"`).
/// Shift is implied by the character itself and not prefixed for character keys.
pub fn key_token(key: &KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "up".into(),
        KeyCode::Down => "down".into(),
        KeyCode::Left => "left".into(),
        KeyCode::Right => "right".into(),
        KeyCode::Enter => "enter".into(),
        KeyCode::Esc => "esc".into(),
        KeyCode::Backspace => "backspace".into(),
        KeyCode::Delete => "delete".into(),
        KeyCode::Tab => "tab".into(),
        KeyCode::BackTab => "shift+tab".into(),
        KeyCode::Home => "home".into(),
        KeyCode::End => "end".into(),
        KeyCode::PageUp => "pgup".into(),
        KeyCode::PageDown => "pgdown".into(),
        KeyCode::Insert => "insert".into(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };

    let mut token = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        token.push_str("ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        token.push_str("alt+");
    }
    let is_char = matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab);
    if key.modifiers.contains(KeyModifiers::SHIFT) && !is_char {
        token.push_str("shift+");
    }
    token.push_str(&name);
    Some(token)
}
