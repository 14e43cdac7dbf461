use crate::enhance::EnhancedRow;
use crate::row::Row;
use crate::sort::locale_compare;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;

/// Configuration of the free-text search box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub column: String,
    pub placeholder: Option<String>,
    /// Keep the search active but do not draw the input.
    pub hidden: bool,
}

impl SearchOptions {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            placeholder: None,
            hidden: false,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Selected values per filterable column.
///
/// A column with no selected values imposes no constraint and is not stored, so two states are
/// equal exactly when they filter the same way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    columns: BTreeMap<String, BTreeSet<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.set(column, values);
        self
    }

    pub fn set(
        &mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let column = column.into();
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.columns.remove(&column);
        } else {
            self.columns.insert(column, values);
        }
    }

    /// Adds `value` to the column's set, or removes it if present. Returns the new membership.
    pub fn toggle(&mut self, column: &str, value: &str) -> bool {
        let set = self.columns.entry(column.to_string()).or_default();
        let selected = if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        };
        if set.is_empty() {
            self.columns.remove(column);
        }
        selected
    }

    pub fn clear(&mut self, column: &str) {
        self.columns.remove(column);
    }

    pub fn values(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str, value: &str) -> bool {
        self.columns.get(column).is_some_and(|s| s.contains(value))
    }

    pub fn active_count(&self, column: &str) -> usize {
        self.columns.get(column).map_or(0, BTreeSet::len)
    }

    /// Total number of selected values across all columns.
    pub fn total_active(&self) -> usize {
        self.columns.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A distinct value offered by a column filter, with how many rows carry it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterChoice {
    pub value: String,
    pub count: usize,
}

/// Case-insensitive substring match of the trimmed `query` against the row's `column` text.
pub fn search_matches(row: &EnhancedRow<'_>, column: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    row.text(column)
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// AND over `filter_by`: each column with selected values must contain the row's text.
pub fn filter_matches(row: &EnhancedRow<'_>, filter_by: &[String], filters: &FilterState) -> bool {
    filter_by.iter().all(|column| match filters.values(column) {
        Some(values) if !values.is_empty() => values.contains(&row.text(column)),
        _ => true,
    })
}

/// Search first, then the column filters.
pub fn apply_filters<'a>(
    rows: &[EnhancedRow<'a>],
    search: Option<(&str, &str)>,
    filter_by: &[String],
    filters: &FilterState,
) -> Vec<EnhancedRow<'a>> {
    rows.iter()
        .filter(|row| search.is_none_or(|(column, query)| search_matches(row, column, query)))
        .filter(|row| filter_matches(row, filter_by, filters))
        .copied()
        .collect()
}

/// Distinct non-empty values of `column` across all `rows`, sorted, with occurrence counts.
pub fn filter_choices(rows: &[Row], column: &str) -> Vec<FilterChoice> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let value = row.text(column);
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    let mut choices: Vec<FilterChoice> = counts
        .into_iter()
        .map(|(value, count)| FilterChoice { value, count })
        .collect();
    choices.sort_by(|a, b| locale_compare(&a.value, &b.value));
    choices
}
