use crate::content::Content;
use crate::content::extract_text;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

/// One record of tabular data: column key -> content, plus an optional stable id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    id: Option<String>,
    cells: BTreeMap<String, Content>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn cell(mut self, key: impl Into<String>, value: impl Into<Content>) -> Self {
        self.cells.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Content>) {
        self.cells.insert(key.into(), value.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&Content> {
        self.cells.get(key)
    }

    /// Extracted text of `key`, or `""` if the row has no such cell.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(extract_text).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

/// Ordered column key -> display label map.
///
/// Keys define both the visible columns and the universe of filter/sort targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    columns: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Headers::append`].
    pub fn column(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.append(key, label);
        self
    }

    /// Adds a column at the end. An existing key keeps its position and label.
    pub fn append(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        if !self.contains(&key) {
            self.columns.push((key, label.into()));
        }
    }

    /// Adds a column at the front. An existing key keeps its position and label.
    pub fn prepend(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        if !self.contains(&key) {
            self.columns.insert(0, (key, label.into()));
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.columns.iter().any(|(k, _)| k == key)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, label)| label.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, L)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (k, l) in iter {
            headers.append(k, l);
        }
        headers
    }
}

/// Identity used to key row selection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    Explicit(String),
    Position(usize),
    Content(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Explicit(id) | RowId::Content(id) => f.write_str(id),
            RowId::Position(i) => write!(f, "{i}"),
        }
    }
}

/// How rows without an explicit id are identified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowIdentity {
    /// Position within the sorted row set. Identities shift when sorting or filtering reorders
    /// rows, so selection follows positions rather than records.
    #[default]
    Positional,
    /// Extracted text of every cell, disambiguated by an occurrence counter for duplicates.
    Content,
}

impl RowIdentity {
    /// Assigns identities to `rows`, in order. `rows` must already be in sorted order.
    pub fn assign<'a>(self, rows: impl IntoIterator<Item = &'a Row>) -> Vec<RowId> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        rows.into_iter()
            .enumerate()
            .map(|(position, row)| {
                if let Some(id) = row.id() {
                    return RowId::Explicit(id.to_string());
                }
                match self {
                    RowIdentity::Positional => RowId::Position(position),
                    RowIdentity::Content => {
                        let key = content_key(row);
                        let n = seen.entry(key.clone()).or_insert(0);
                        *n += 1;
                        RowId::Content(format!("{key}#{n}"))
                    }
                }
            })
            .collect()
    }
}

fn content_key(row: &Row) -> String {
    row.cells
        .iter()
        .map(|(k, v)| format!("{k}={}", extract_text(v)))
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_keep_first_position() {
        let mut h = Headers::new().column("a", "A").column("b", "B");
        h.prepend("b", "ignored");
        h.append("a", "ignored");
        assert_eq!(h.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(h.label("b"), Some("B"));
    }

    #[test]
    fn positional_identity_prefers_explicit_ids() {
        let rows = vec![
            Row::new().cell("x", "1"),
            Row::new().with_id("r2").cell("x", "2"),
            Row::new().with_id("").cell("x", "3"),
        ];
        assert_eq!(
            RowIdentity::Positional.assign(&rows),
            vec![
                RowId::Position(0),
                RowId::Explicit("r2".into()),
                RowId::Position(2)
            ]
        );
    }

    #[test]
    fn content_identity_disambiguates_duplicates() {
        let rows = vec![
            Row::new().cell("x", "same"),
            Row::new().cell("x", "same"),
            Row::new().cell("x", "other"),
        ];
        let ids = RowIdentity::Content.assign(&rows);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[2], RowId::Content("x=other#1".into()));
    }

    #[test]
    fn row_text_defaults_to_empty() {
        let row = Row::new().cell("name", "  Ada  ");
        assert_eq!(row.text("name"), "Ada");
        assert_eq!(row.text("missing"), "");
    }
}
