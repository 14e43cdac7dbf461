use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;
use crate::row::RowId;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// Checked rows, keyed by [`RowId`].
///
/// Unchecking keeps the entry with `false`, so `len()` of the map and the selected count can
/// differ; only `true` entries count as selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSelection {
    rows: BTreeMap<RowId, bool>,
    count: usize,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.rows.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: RowId, selected: bool) {
        self.rows.insert(id, selected);
        self.recount();
    }

    /// Flips one row and returns its new state.
    pub fn toggle(&mut self, id: RowId) -> bool {
        let selected = !self.is_selected(&id);
        self.set(id, selected);
        selected
    }

    /// Marks every id in `ids` as selected.
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a RowId>) {
        for id in ids {
            self.rows.insert(id.clone(), true);
        }
        self.recount();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.count = 0;
    }

    /// Header checkbox state: every one of `total` rows is selected, and there is at least one.
    pub fn is_all_selected(&self, total: usize) -> bool {
        self.count > 0 && self.count == total
    }

    /// Drops entries whose id is not in `ids`. Returns `true` if anything was pruned.
    pub fn reconcile(&mut self, ids: &[RowId]) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        let live: HashSet<&RowId> = ids.iter().collect();
        let before = self.rows.len();
        self.rows.retain(|id, _| live.contains(id));
        if self.rows.len() == before {
            return false;
        }
        self.recount();
        true
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &RowId> {
        self.rows
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id)
    }

    /// All tracked ids, selected or not.
    pub fn tracked_ids(&self) -> impl Iterator<Item = &RowId> {
        self.rows.keys()
    }

    fn recount(&mut self) {
        self.count = self.rows.values().filter(|s| **s).count();
    }
}

/// Key bindings for row selection.
///
/// Defaults:
/// - `Space` toggles the row under the cursor
/// - `a` toggles every row of the filtered set (not just the visible page)
/// - `D` hands the selected rows to the bulk-delete handler
/// - `Esc` clears the selection
#[derive(Clone, Debug)]
pub struct SelectionBindings {
    pub toggle_row: Vec<KeyEvent>,
    pub toggle_all: Vec<KeyEvent>,
    pub bulk_delete: Vec<KeyEvent>,
    pub clear: Vec<KeyEvent>,
}

impl Default for SelectionBindings {
    fn default() -> Self {
        Self {
            toggle_row: vec![keymap::key_char(' ')],
            toggle_all: vec![keymap::key_char('a')],
            bulk_delete: vec![keymap::key_char('D')],
            clear: vec![KeyEvent::new(KeyCode::Esc)],
        }
    }
}

impl SelectionBindings {
    pub fn is_toggle_row(&self, key: &KeyEvent) -> bool {
        self.toggle_row
            .iter()
            .any(|p| keymap::key_event_matches(p, key))
    }

    pub fn is_toggle_all(&self, key: &KeyEvent) -> bool {
        self.toggle_all
            .iter()
            .any(|p| keymap::key_event_matches(p, key))
    }

    pub fn is_bulk_delete(&self, key: &KeyEvent) -> bool {
        self.bulk_delete
            .iter()
            .any(|p| keymap::key_event_matches(p, key))
    }

    pub fn is_clear(&self, key: &KeyEvent) -> bool {
        self.clear.iter().any(|p| keymap::key_event_matches(p, key))
    }
}
