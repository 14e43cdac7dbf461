//! Synthetic `checkbox` / `actions` columns.
//!
//! Enhancement never touches the caller's rows or headers: it returns a new header set and a list
//! of [`EnhancedRow`]s borrowing the originals, so action activation can hand back the exact row
//! the caller supplied.

use crate::content::Content;
use crate::content::extract_text;
use crate::row::Headers;
use crate::row::Row;
use ratatui::style::Style;
use ratatui::style::Stylize;

pub const CHECKBOX_COLUMN: &str = "checkbox";
pub const ACTIONS_COLUMN: &str = "actions";

pub fn is_synthetic(key: &str) -> bool {
    key == CHECKBOX_COLUMN || key == ACTIONS_COLUMN
}

/// One entry of the per-row actions menu.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionItem {
    /// Reported back in [`crate::view::DataTableAction::ActionSelected`].
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub style: Option<Style>,
    /// Draw a separator line before this item.
    pub separator: bool,
}

impl ActionItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            style: None,
            separator: false,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn separated(mut self) -> Self {
        self.separator = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionMenu {
    pub trigger: Content,
    pub items: Vec<ActionItem>,
}

impl Default for ActionMenu {
    fn default() -> Self {
        Self {
            trigger: Content::from("..."),
            items: vec![
                ActionItem::new("delete", "Delete")
                    .style(Style::default().red())
                    .separated(),
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnhanceFlags {
    pub checkboxes: bool,
    pub actions: bool,
}

/// A raw row seen through the enhanced column set.
#[derive(Clone, Copy, Debug)]
pub struct EnhancedRow<'a> {
    pub source: &'a Row,
    /// Position of `source` in the raw row slice.
    pub index: usize,
    trigger: Option<&'a Content>,
}

impl<'a> EnhancedRow<'a> {
    pub fn cell(&self, key: &str) -> Option<&'a Content> {
        match key {
            ACTIONS_COLUMN if self.trigger.is_some() => self.trigger,
            CHECKBOX_COLUMN => None,
            _ => self.source.get(key),
        }
    }

    pub fn text(&self, key: &str) -> String {
        self.cell(key).map(extract_text).unwrap_or_default()
    }
}

pub struct Enhanced<'a> {
    pub headers: Headers,
    pub rows: Vec<EnhancedRow<'a>>,
}

pub fn enhance_headers(headers: &Headers, flags: EnhanceFlags) -> Headers {
    let mut out = headers.clone();
    if flags.actions {
        out.append(ACTIONS_COLUMN, "Actions");
    }
    if flags.checkboxes {
        out.prepend(CHECKBOX_COLUMN, "");
    }
    out
}

pub fn enhance<'a>(
    rows: &'a [Row],
    headers: &Headers,
    flags: EnhanceFlags,
    menu: Option<&'a ActionMenu>,
) -> Enhanced<'a> {
    let trigger = if flags.actions {
        menu.map(|m| &m.trigger)
    } else {
        None
    };
    Enhanced {
        headers: enhance_headers(headers, flags),
        rows: rows
            .iter()
            .enumerate()
            .map(|(index, source)| EnhancedRow {
                source,
                index,
                trigger,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Headers {
        Headers::new().column("id", "ID").column("name", "Name")
    }

    #[test]
    fn adds_synthetic_columns_in_place() {
        let flags = EnhanceFlags {
            checkboxes: true,
            actions: true,
        };
        let h = enhance_headers(&headers(), flags);
        assert_eq!(
            h.keys().collect::<Vec<_>>(),
            vec![CHECKBOX_COLUMN, "id", "name", ACTIONS_COLUMN]
        );
        assert_eq!(h.label(ACTIONS_COLUMN), Some("Actions"));
    }

    #[test]
    fn enhancement_is_idempotent() {
        let flags = EnhanceFlags {
            checkboxes: true,
            actions: true,
        };
        let once = enhance_headers(&headers(), flags);
        let twice = enhance_headers(&once, flags);
        assert_eq!(once, twice);
    }

    #[test]
    fn leaves_source_untouched() {
        let rows = vec![Row::new().cell("id", "1")];
        let original = rows.clone();
        let menu = ActionMenu::default();
        let enhanced = enhance(
            &rows,
            &headers(),
            EnhanceFlags {
                checkboxes: false,
                actions: true,
            },
            Some(&menu),
        );
        assert_eq!(enhanced.rows[0].text(ACTIONS_COLUMN), "...");
        assert_eq!(enhanced.rows[0].source, &original[0]);
        assert!(enhanced.rows[0].source.get(ACTIONS_COLUMN).is_none());
    }
}
