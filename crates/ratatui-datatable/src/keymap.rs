use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;
use crate::selection::SelectionBindings;

/// A set of keys plus the text shown for them in the help bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| key_event_matches(k, event))
    }
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    pattern.shift == event.shift && pattern.ctrl == event.ctrl && pattern.alt == event.alt
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::CTRL)
}

/// Key bindings of [`crate::view::DataTableView`] while the table body has focus.
#[derive(Clone, Debug)]
pub struct TableBindings {
    pub up: Binding,
    pub down: Binding,
    pub left: Binding,
    pub right: Binding,
    pub activate: Binding,
    pub action_menu: Binding,
    pub search: Binding,
    pub filter: Binding,
    pub sort_column: Binding,
    pub sort_direction: Binding,
    pub next_page: Binding,
    pub prev_page: Binding,
    pub first_page: Binding,
    pub last_page: Binding,
    pub bigger_pages: Binding,
    pub smaller_pages: Binding,
    pub selection: SelectionBindings,
}

impl Default for TableBindings {
    fn default() -> Self {
        Self {
            up: Binding::new("↑/k", "up", vec![key(KeyCode::Up), key_char('k')]),
            down: Binding::new("↓/j", "down", vec![key(KeyCode::Down), key_char('j')]),
            left: Binding::new("←/h", "left", vec![key(KeyCode::Left), key_char('h')]),
            right: Binding::new("→/l", "right", vec![key(KeyCode::Right), key_char('l')]),
            activate: Binding::new("enter", "open", vec![key(KeyCode::Enter)]),
            action_menu: Binding::new("m", "actions", vec![key_char('m')]),
            search: Binding::new("/", "search", vec![key_char('/')]),
            filter: Binding::new("f", "filter", vec![key_char('f')]),
            sort_column: Binding::new("s", "sort by", vec![key_char('s')]),
            sort_direction: Binding::new("o", "order", vec![key_char('o')]),
            next_page: Binding::new("]", "next page", vec![key_char(']'), key(KeyCode::PageDown)]),
            prev_page: Binding::new("[", "prev page", vec![key_char('['), key(KeyCode::PageUp)]),
            first_page: Binding::new("{", "first page", vec![key_char('{'), key(KeyCode::Home)]),
            last_page: Binding::new("}", "last page", vec![key_char('}'), key(KeyCode::End)]),
            bigger_pages: Binding::new("+", "rows/page", vec![key_char('+')]),
            smaller_pages: Binding::new("-", "rows/page", vec![key_char('-')]),
            selection: SelectionBindings::default(),
        }
    }
}

impl TableBindings {
    /// Bindings worth advertising in a help bar, in display order.
    pub fn help(&self) -> Vec<Binding> {
        vec![
            self.search.clone(),
            self.filter.clone(),
            self.sort_column.clone(),
            self.next_page.clone(),
            self.prev_page.clone(),
            Binding::new("space", "select", self.selection.toggle_row.clone()),
            self.action_menu.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_matches_exact_modifiers() {
        let b = Binding::new("q", "quit", vec![key_char('q')]);
        assert!(b.matches(&key_char('q')));
        assert!(!b.matches(&key_ctrl('q')));
    }

    #[test]
    fn default_table_bindings_do_not_overlap() {
        let t = TableBindings::default();
        let all = [
            &t.up,
            &t.down,
            &t.left,
            &t.right,
            &t.activate,
            &t.action_menu,
            &t.search,
            &t.filter,
            &t.sort_column,
            &t.sort_direction,
            &t.next_page,
            &t.prev_page,
            &t.first_page,
            &t.last_page,
            &t.bigger_pages,
            &t.smaller_pages,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                for k in &a.keys {
                    assert!(!b.matches(k), "{} collides with {}", a.help_desc, b.help_desc);
                }
            }
        }
    }
}
