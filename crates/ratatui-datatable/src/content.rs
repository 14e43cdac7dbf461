use ratatui::style::Style;
use ratatui::text::Span;

/// Cell content held by a [`crate::row::Row`].
///
/// The engine never interprets content beyond [`extract_text`]: search, filter values, sort keys
/// and content-derived row identities all compare the flattened text. Styling only matters when
/// the widget draws the cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    List(Vec<Content>),
    Node {
        tag: String,
        style: Style,
        children: Box<Content>,
    },
}

impl Content {
    pub fn text(s: impl Into<String>) -> Self {
        Content::Text(s.into())
    }

    /// A labelled composite, e.g. a status badge wrapping its caption.
    pub fn node(tag: impl Into<String>, style: Style, children: impl Into<Content>) -> Self {
        Content::Node {
            tag: tag.into(),
            style,
            children: Box::new(children.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        extract_text(self).is_empty()
    }

    /// Flattens the content into styled spans. Node styles patch the inherited style.
    pub fn spans(&self, base: Style) -> Vec<Span<'static>> {
        let mut out = Vec::new();
        push_spans(self, base, &mut out);
        out
    }
}

fn push_spans(content: &Content, style: Style, out: &mut Vec<Span<'static>>) {
    match content {
        Content::Empty => {}
        Content::Text(s) => out.push(Span::styled(s.clone(), style)),
        Content::Number(n) => out.push(Span::styled(format_number(*n), style)),
        Content::List(items) => {
            for item in items {
                push_spans(item, style, out);
            }
        }
        Content::Node {
            style: node_style,
            children,
            ..
        } => push_spans(children, style.patch(*node_style), out),
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<f64> for Content {
    fn from(n: f64) -> Self {
        Content::Number(n)
    }
}

impl From<i64> for Content {
    fn from(n: i64) -> Self {
        Content::Number(n as f64)
    }
}

impl From<Vec<Content>> for Content {
    fn from(items: Vec<Content>) -> Self {
        Content::List(items)
    }
}

/// Flattens `content` into a single whitespace-normalized line.
///
/// Primitives are stringified, lists are concatenated without a separator and nodes contribute
/// their children. Every run of whitespace collapses to one space and both ends are trimmed.
pub fn extract_text(content: &Content) -> String {
    let mut raw = String::new();
    push_raw(content, &mut raw);
    normalize_whitespace(&raw)
}

fn push_raw(content: &Content, out: &mut String) {
    match content {
        Content::Empty => {}
        Content::Text(s) => out.push_str(s),
        Content::Number(n) => out.push_str(&format_number(*n)),
        Content::List(items) => {
            for item in items {
                push_raw(item, out);
            }
        }
        Content::Node { children, .. } => push_raw(children, out),
    }
}

/// Prints a number the way a browser stringifies it: `120`, `80.5`, `-0.25`, `Infinity`.
///
/// Magnitudes outside `[1e-6, 1e21)` use exponent form: `1e+21`, `1.5e-7`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let exp = format!("{n:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    format!("{n}")
}

pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
