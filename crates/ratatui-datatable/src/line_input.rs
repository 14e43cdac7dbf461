use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Debug, Default)]
pub struct LineInputOptions {
    pub style: Style,
    pub placeholder: Option<String>,
    pub placeholder_style: Style,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineInputAction {
    None,
    Changed,
    Submitted(String),
    Cancelled,
}

/// Single-line text field: search boxes and form inputs.
#[derive(Clone, Debug, Default)]
pub struct LineInput {
    text: String,
    cursor: usize, // char index
    scroll: usize, // display columns hidden on the left
    options: LineInputOptions,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LineInputOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.options.placeholder = placeholder;
    }

    /// Replaces the text and puts the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into().replace(['\r', '\n'], " ");
        self.cursor = self.text.chars().count();
        self.scroll = 0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn input(&mut self, event: InputEvent) -> LineInputAction {
        match event {
            InputEvent::Paste(s) => {
                let s = s.replace(['\r', '\n'], " ");
                if s.is_empty() {
                    return LineInputAction::None;
                }
                for ch in s.chars() {
                    self.insert_char(ch);
                }
                LineInputAction::Changed
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(_) => LineInputAction::None,
        }
    }

    /// Screen position of the cursor when rendered into `area`.
    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let x = self.cursor_display_x().saturating_sub(self.scroll_for(area.width));
        if x >= area.width as usize {
            return None;
        }
        Some((area.x + x as u16, area.y))
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let line = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(line, self.options.style);

        if self.text.is_empty() {
            if let Some(placeholder) = &self.options.placeholder {
                render::render_str_clipped(
                    area.x,
                    area.y,
                    area.width,
                    buf,
                    placeholder,
                    self.options.placeholder_style,
                );
            }
            return;
        }

        self.scroll = self.scroll_for(area.width);
        let visible: String = self.visible_from(self.scroll);
        render::render_str_clipped(
            area.x,
            area.y,
            area.width,
            buf,
            &visible,
            self.options.style,
        );
    }

    fn handle_key(&mut self, key: KeyEvent) -> LineInputAction {
        if key.modifiers.ctrl {
            return match key.code {
                KeyCode::Char('u') => {
                    if self.text.is_empty() {
                        return LineInputAction::None;
                    }
                    self.set_text("");
                    LineInputAction::Changed
                }
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    LineInputAction::None
                }
                KeyCode::Char('e') => {
                    self.cursor = self.char_len();
                    LineInputAction::None
                }
                _ => LineInputAction::None,
            };
        }
        match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.alt {
                    return LineInputAction::None;
                }
                self.insert_char(c);
                LineInputAction::Changed
            }
            KeyCode::Enter => LineInputAction::Submitted(self.text.clone()),
            KeyCode::Esc => LineInputAction::Cancelled,
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return LineInputAction::None;
                }
                self.cursor -= 1;
                self.remove_at_cursor();
                LineInputAction::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return LineInputAction::None;
                }
                self.remove_at_cursor();
                LineInputAction::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                LineInputAction::None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                LineInputAction::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                LineInputAction::None
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                LineInputAction::None
            }
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown => LineInputAction::None,
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn insert_char(&mut self, ch: char) {
        let at = byte_index_from_char_index(&self.text, self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    fn remove_at_cursor(&mut self) {
        let at = byte_index_from_char_index(&self.text, self.cursor);
        self.text.remove(at);
    }

    fn cursor_display_x(&self) -> usize {
        self.text
            .chars()
            .take(self.cursor)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }

    /// Horizontal scroll that keeps the cursor inside a field `width` columns wide.
    fn scroll_for(&self, width: u16) -> usize {
        let width = width as usize;
        let x = self.cursor_display_x();
        if x < self.scroll {
            x
        } else if x >= self.scroll + width {
            x + 1 - width
        } else {
            self.scroll
        }
    }

    fn visible_from(&self, skip_cols: usize) -> String {
        let mut cols = 0usize;
        self.text
            .chars()
            .skip_while(|ch| {
                let w = UnicodeWidthChar::width(*ch).unwrap_or(0);
                if cols + w <= skip_cols {
                    cols += w;
                    true
                } else {
                    false
                }
            })
            .collect()
    }
}

fn byte_index_from_char_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyModifiers;
    use crate::render::row_text;

    fn typed(s: &str) -> LineInput {
        let mut input = LineInput::new();
        for ch in s.chars() {
            input.input(KeyCode::Char(ch).into());
        }
        input
    }

    #[test]
    fn inserts_and_moves_cursor() {
        let mut input = typed("stu_11");
        input.input(KeyCode::Left.into());
        assert_eq!(input.input(KeyCode::Char('0').into()), LineInputAction::Changed);
        assert_eq!(input.text(), "stu_101");
        assert_eq!(input.cursor(), 6);
    }

    #[test]
    fn backspace_and_delete_at_edges() {
        let mut input = typed("ab");
        assert_eq!(input.input(KeyCode::Delete.into()), LineInputAction::None);
        input.input(KeyCode::Home.into());
        assert_eq!(input.input(KeyCode::Backspace.into()), LineInputAction::None);
        assert_eq!(input.input(KeyCode::Delete.into()), LineInputAction::Changed);
        assert_eq!(input.text(), "b");
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = typed("abc");
        let ctrl_u = KeyEvent::new(KeyCode::Char('u')).with_modifiers(KeyModifiers::CTRL);
        assert_eq!(input.input(ctrl_u.into()), LineInputAction::Changed);
        assert!(input.is_empty());
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut input = LineInput::new();
        input.input(InputEvent::Paste("a\nb".into()));
        assert_eq!(input.text(), "a b");
    }

    #[test]
    fn enter_submits_and_esc_cancels() {
        let mut input = typed("x");
        assert_eq!(
            input.input(KeyCode::Enter.into()),
            LineInputAction::Submitted("x".into())
        );
        assert_eq!(input.input(KeyCode::Esc.into()), LineInputAction::Cancelled);
    }

    #[test]
    fn renders_placeholder_then_scrolls_to_cursor() {
        let mut input = LineInput::with_options(LineInputOptions {
            placeholder: Some("Search".into()),
            ..Default::default()
        });
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        input.render_ref(area, &mut buf);
        assert_eq!(row_text(&buf, 0), "Sear");

        input.set_text("abcdef");
        let mut buf = Buffer::empty(area);
        input.render_ref(area, &mut buf);
        assert_eq!(row_text(&buf, 0), "def ");
        assert_eq!(input.cursor_pos(area), Some((3, 0)));
    }
}
