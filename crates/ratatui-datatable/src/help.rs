use crate::keymap::Binding;
use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

#[derive(Clone, Debug)]
pub struct HelpBarOptions {
    pub style: Style,
    pub key_style: Style,
    pub separator: String,
    /// Between a key and its description.
    pub space: String,
}

impl Default for HelpBarOptions {
    fn default() -> Self {
        Self {
            style: Style::default(),
            key_style: Style::default(),
            separator: " • ".to_string(),
            space: " ".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Hint {
    key: String,
    desc: String,
}

impl From<&Binding> for Hint {
    fn from(b: &Binding) -> Self {
        Self {
            key: b.help_key.clone(),
            desc: b.help_desc.clone(),
        }
    }
}

/// One-line key hint strip, e.g. `/ search • f filter • s sort by`.
///
/// Hints are drawn whole: the strip stops at the last hint that fits. Only the first hint may be
/// clipped, so a very narrow strip still shows something.
#[derive(Clone, Debug, Default)]
pub struct HelpBar {
    hints: Vec<Hint>,
    options: HelpBarOptions,
}

impl HelpBar {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self::with_options(bindings, HelpBarOptions::default())
    }

    pub fn with_options(bindings: Vec<Binding>, options: HelpBarOptions) -> Self {
        Self {
            hints: bindings.iter().map(Hint::from).collect(),
            options,
        }
    }

    pub fn push(&mut self, binding: Binding) {
        self.hints.push(Hint::from(&binding));
    }

    /// How many hints fit in `width` columns.
    pub fn fitting(&self, width: u16) -> usize {
        let width = width as usize;
        let sep = render::display_width(&self.options.separator);
        let mut used = 0usize;
        for (i, hint) in self.hints.iter().enumerate() {
            let w = self.hint_width(hint) + if i > 0 { sep } else { 0 };
            if used + w > width {
                return i.max(usize::from(width > 0 && i == 0));
            }
            used += w;
        }
        self.hints.len()
    }

    /// Draws the strip and returns the columns written.
    pub fn render_ref(&self, area: Rect, buf: &mut Buffer) -> u16 {
        if area.width == 0 || area.height == 0 {
            return 0;
        }
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), self.options.style);

        let count = self.fitting(area.width);
        let mut spans: Vec<Span<'static>> = Vec::with_capacity(count * 4);
        for (i, hint) in self.hints.iter().take(count).enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.options.separator.clone(), self.options.style));
            }
            spans.push(Span::styled(hint.key.clone(), self.options.key_style));
            spans.push(Span::styled(self.options.space.clone(), self.options.style));
            spans.push(Span::styled(hint.desc.clone(), self.options.style));
        }
        render::render_spans_clipped(area.x, area.y, area.width, buf, &spans, self.options.style)
    }

    fn hint_width(&self, hint: &Hint) -> usize {
        render::display_width(&hint.key)
            + render::display_width(&self.options.space)
            + render::display_width(&hint.desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap;
    use crate::render::row_text;

    fn quit() -> Binding {
        Binding::new("q", "quit", vec![keymap::key_char('q')])
    }

    #[test]
    fn first_hint_is_clipped_when_nothing_fits() {
        let hb = HelpBar::new(vec![quit(), quit()]);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        assert_eq!(hb.render_ref(Rect::new(0, 0, 3, 1), &mut buf), 3);
        assert_eq!(row_text(&buf, 0), "q q");
    }

    #[test]
    fn later_hints_are_dropped_whole() {
        let hb = HelpBar::new(keymap::TableBindings::default().help());
        let mut buf = Buffer::empty(Rect::new(0, 0, 24, 1));
        hb.render_ref(Rect::new(0, 0, 24, 1), &mut buf);
        assert_eq!(row_text(&buf, 0), "/ search • f filter     ");
        assert_eq!(hb.fitting(24), 2);
    }

    #[test]
    fn pushed_hints_render_after_existing_ones() {
        let mut hb = HelpBar::new(vec![quit()]);
        hb.push(Binding::new("c", "new", vec![keymap::key_char('c')]));
        assert_eq!(hb.fitting(40), 2);
        let mut buf = Buffer::empty(Rect::new(0, 0, 14, 1));
        hb.render_ref(Rect::new(0, 0, 14, 1), &mut buf);
        assert_eq!(row_text(&buf, 0), "q quit • c new");
    }
}
