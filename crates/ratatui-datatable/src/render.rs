use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

const TAB_WIDTH: usize = 4;
const ELLIPSIS: char = '…';

/// Writes characters left to right into one buffer row, stopping at `max_cols`.
struct ClippedWriter<'b> {
    buf: &'b mut Buffer,
    x: u16,
    y: u16,
    max_cols: usize,
    out_cols: usize,
}

impl<'b> ClippedWriter<'b> {
    fn new(buf: &'b mut Buffer, x: u16, y: u16, max_cols: u16) -> Self {
        Self {
            buf,
            x,
            y,
            max_cols: max_cols as usize,
            out_cols: 0,
        }
    }

    /// Returns `false` once the row is full.
    fn put(&mut self, ch: char, style: Style) -> bool {
        if ch == '\t' {
            for _ in 0..TAB_WIDTH {
                if !self.put(' ', style) {
                    return false;
                }
            }
            return true;
        }
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            return true;
        }
        if self.out_cols + w > self.max_cols {
            return false;
        }
        let mut tmp = [0u8; 4];
        let dx = self.out_cols as u16;
        if let Some(cell) = self.buf.cell_mut((self.x + dx, self.y)) {
            cell.set_style(style);
            cell.set_symbol(ch.encode_utf8(&mut tmp));
        }
        if w == 2 {
            if let Some(cell) = self.buf.cell_mut((self.x + dx + 1, self.y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        self.out_cols += w;
        true
    }
}

/// Draws `input` at `(x, y)`, clipped to `max_cols` display columns.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    if max_cols == 0 {
        return 0;
    }
    let mut w = ClippedWriter::new(buf, x, y, max_cols);
    for ch in input.chars() {
        if !w.put(ch, style) {
            break;
        }
    }
    w.out_cols as u16
}

/// Like [`render_str_clipped`], but each span keeps its own style. Spans with the default style
/// use `fallback_style`. Returns the number of columns written.
pub fn render_spans_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'static>],
    fallback_style: Style,
) -> u16 {
    if max_cols == 0 {
        return 0;
    }
    let mut w = ClippedWriter::new(buf, x, y, max_cols);
    for span in spans {
        let style = if span.style == Style::default() {
            fallback_style
        } else {
            fallback_style.patch(span.style)
        };
        for ch in span.content.chars() {
            if !w.put(ch, style) {
                return w.out_cols as u16;
            }
        }
    }
    w.out_cols as u16
}

pub fn display_width(input: &str) -> usize {
    if input.contains('\t') {
        input.replace('\t', "    ").width()
    } else {
        input.width()
    }
}

/// Cuts `input` to at most `max_cols` display columns, ending in `…` when anything was dropped.
pub fn truncate_with_ellipsis(input: &str, max_cols: usize) -> String {
    if display_width(input) <= max_cols {
        return input.to_string();
    }
    if max_cols == 0 {
        return String::new();
    }
    let mut out = slice_by_cols(input, max_cols - 1);
    out.push(ELLIPSIS);
    out
}

/// The leading `max_cols` display columns of `input`. A wide char that would straddle the edge is
/// dropped.
pub fn slice_by_cols(input: &str, max_cols: usize) -> String {
    let mut out = String::new();
    let mut cols = 0usize;
    for ch in input.chars() {
        let w = if ch == '\t' {
            TAB_WIDTH
        } else {
            UnicodeWidthChar::width(ch).unwrap_or(0)
        };
        if cols + w > max_cols {
            break;
        }
        if ch == '\t' {
            out.push_str("    ");
        } else {
            out.push(ch);
        }
        cols += w;
    }
    out
}

/// Fills `area` with `style` and blank symbols.
pub fn clear_area(area: Rect, buf: &mut Buffer, style: Style) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.reset();
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn row_text(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    (area.left()..area.right())
        .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
        .collect()
}
