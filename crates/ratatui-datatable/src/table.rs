//! The table engine: owns the interactive state and derives what to show.
//!
//! Every mutator runs the whole pipeline again before returning, in a fixed order:
//!
//! 1. enhance (synthetic `checkbox` / `actions` columns)
//! 2. search, then per-column filters
//! 3. filter rollback (an edit that empties the table reverts to the initial filters)
//! 4. sort
//! 5. selection reconciliation against the sorted set
//! 6. page clamping
//!
//! So a [`TableView`] obtained after any call is never stale.

use crate::content::Content;
use crate::enhance::ACTIONS_COLUMN;
use crate::enhance::ActionMenu;
use crate::enhance::CHECKBOX_COLUMN;
use crate::enhance::EnhanceFlags;
use crate::enhance::enhance;
use crate::enhance::enhance_headers;
use crate::enhance::is_synthetic;
use crate::filter;
use crate::filter::FilterChoice;
use crate::filter::FilterState;
use crate::filter::SearchOptions;
use crate::pagination::Pagination;
use crate::pagination::PaginationOptions;
use crate::row::Headers;
use crate::row::Row;
use crate::row::RowId;
use crate::row::RowIdentity;
use crate::selection::RowSelection;
use crate::sort;
use crate::sort::SortDirection;
use crate::sort::SortSpec;

/// Sort-order UI configuration. Its absence hides the sort controls, but rows are still ordered
/// by the default column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortOptions {
    /// Initial sort column. `None` picks the first visible non-synthetic column.
    pub column: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckboxOptions {
    pub enabled: bool,
    /// Offer a bulk-delete command for the selected rows.
    pub bulk_delete: bool,
}

/// Configuration of a [`DataTable`].
#[derive(Clone, Debug)]
pub struct TableOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub search: Option<SearchOptions>,
    pub filter_by: Vec<String>,
    pub initial_filters: FilterState,
    pub sort: Option<SortOptions>,
    pub default_sort_direction: SortDirection,
    pub pagination: Option<PaginationOptions>,
    pub checkboxes: CheckboxOptions,
    /// `Some` enables the actions column.
    pub action_menu: Option<ActionMenu>,
    pub clickable_columns: Vec<String>,
    pub columns_to_hide: Vec<String>,
    pub skeleton_row_count: usize,
    pub empty_data_text: String,
    pub not_found_text: String,
    pub striped_rows: bool,
    pub row_height: u16,
    pub eliminate_outer_padding: bool,
    pub identity: RowIdentity,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            search: None,
            filter_by: Vec::new(),
            initial_filters: FilterState::default(),
            sort: None,
            default_sort_direction: SortDirection::Descending,
            pagination: None,
            checkboxes: CheckboxOptions::default(),
            action_menu: None,
            clickable_columns: Vec::new(),
            columns_to_hide: Vec::new(),
            skeleton_row_count: 5,
            empty_data_text: "No data available".to_string(),
            not_found_text: "No results found".to_string(),
            striped_rows: false,
            row_height: 1,
            eliminate_outer_padding: false,
            identity: RowIdentity::default(),
        }
    }
}

impl TableOptions {
    fn flags(&self) -> EnhanceFlags {
        EnhanceFlags {
            checkboxes: self.checkboxes.enabled,
            actions: self.action_menu.is_some(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SortedRow {
    id: RowId,
    index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyState<'a> {
    Loading { skeleton_rows: usize },
    NoData(&'a str),
    NotFound(&'a str),
    Rows,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewColumn<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub clickable: bool,
    /// Present for the active sort column when the sort UI is enabled.
    pub sort: Option<SortDirection>,
}

#[derive(Clone, Debug)]
pub struct ViewRow<'a> {
    pub id: RowId,
    pub row: &'a Row,
    /// Position within the current page.
    pub position: usize,
    pub selected: bool,
    /// `true` on odd positions when striping is enabled.
    pub striped: bool,
    actions_trigger: Option<&'a Content>,
}

impl<'a> ViewRow<'a> {
    pub fn cell(&self, key: &str) -> Option<&'a Content> {
        match key {
            ACTIONS_COLUMN if self.actions_trigger.is_some() => self.actions_trigger,
            CHECKBOX_COLUMN => None,
            _ => self.row.get(key),
        }
    }
}

/// Snapshot of everything the table shell draws.
#[derive(Clone, Debug)]
pub struct TableView<'a> {
    pub columns: Vec<ViewColumn<'a>>,
    pub body: BodyState<'a>,
    pub rows: Vec<ViewRow<'a>>,
    pub page: usize,
    pub total_pages: usize,
    pub rows_per_page: Option<usize>,
    pub total_rows: usize,
    pub selected_count: usize,
    pub all_selected: bool,
}

/// The data-table engine.
#[derive(Clone, Debug)]
pub struct DataTable {
    options: TableOptions,
    headers: Headers,
    enhanced_headers: Headers,
    rows: Vec<Row>,
    query: String,
    filters: FilterState,
    sort: Option<SortSpec>,
    pagination: Pagination,
    selection: RowSelection,
    loading: bool,
    sorted: Vec<SortedRow>,
    filtered_len: usize,
}

impl DataTable {
    pub fn new(headers: Headers, options: TableOptions) -> Self {
        let pagination = Pagination::new(
            options
                .pagination
                .as_ref()
                .map_or(usize::MAX, |p| p.rows_per_page),
        );
        let enhanced_headers = enhance_headers(&headers, options.flags());
        let mut table = Self {
            filters: options.initial_filters.clone(),
            headers,
            enhanced_headers,
            rows: Vec::new(),
            query: String::new(),
            sort: None,
            pagination,
            selection: RowSelection::new(),
            loading: false,
            sorted: Vec::new(),
            filtered_len: 0,
            options,
        };
        table.sort = table.initial_sort();
        table.recompute();
        table
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Replaces the row array. Counts as a new dataset: the page resets to 1.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.pagination.reset();
        self.recompute();
    }

    pub fn set_headers(&mut self, headers: Headers) {
        self.enhanced_headers = enhance_headers(&headers, self.options.flags());
        self.headers = headers;
        let stale = self
            .sort
            .as_ref()
            .is_some_and(|spec| !self.headers.contains(&spec.column));
        if stale {
            self.sort = self.initial_sort();
        }
        self.recompute();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replaces the caption under the title, e.g. to keep a row count current.
    pub fn set_description(&mut self, description: Option<String>) {
        self.options.description = description;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Updates the search text. The page resets to 1 when the text changes.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.pagination.reset();
        self.recompute();
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn initial_filters(&self) -> &FilterState {
        &self.options.initial_filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        if filters == self.filters {
            return;
        }
        self.filters = filters;
        self.pagination.reset();
        self.recompute();
    }

    pub fn set_filter(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let mut next = self.filters.clone();
        next.set(column, values);
        self.set_filters(next);
    }

    pub fn toggle_filter_value(&mut self, column: &str, value: &str) {
        let mut next = self.filters.clone();
        next.toggle(column, value);
        self.set_filters(next);
    }

    pub fn clear_filter(&mut self, column: &str) {
        let mut next = self.filters.clone();
        next.clear(column);
        self.set_filters(next);
    }

    pub fn clear_all_filters(&mut self) {
        self.set_filters(FilterState::new());
    }

    /// Values offered by `column`'s filter, computed over every raw row.
    pub fn filter_choices(&self, column: &str) -> Vec<FilterChoice> {
        filter::filter_choices(&self.rows, column)
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Columns offered by the sort-by menu.
    pub fn sortable_columns(&self) -> Vec<&str> {
        self.visible_keys()
            .into_iter()
            .filter(|k| !is_synthetic(k))
            .collect()
    }

    pub fn set_sort_column(&mut self, column: &str) {
        if !self.headers.contains(column) || is_synthetic(column) {
            return;
        }
        let direction = self
            .sort
            .as_ref()
            .map_or(self.options.default_sort_direction, |s| s.direction);
        let next = SortSpec::new(column, direction);
        if self.sort.as_ref() == Some(&next) {
            return;
        }
        self.sort = Some(next);
        self.recompute();
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        let Some(spec) = self.sort.as_mut() else {
            return;
        };
        if spec.direction == direction {
            return;
        }
        spec.direction = direction;
        self.recompute();
    }

    pub fn toggle_sort_direction(&mut self) {
        if let Some(dir) = self.sort.as_ref().map(|s| s.direction) {
            self.set_sort_direction(dir.toggled());
        }
    }

    /// Advances the sort column to the next sortable column, wrapping around.
    pub fn cycle_sort_column(&mut self) {
        let columns: Vec<String> = self
            .sortable_columns()
            .into_iter()
            .map(str::to_string)
            .collect();
        if columns.is_empty() {
            return;
        }
        let current = self
            .sort
            .as_ref()
            .and_then(|s| columns.iter().position(|c| *c == s.column));
        let next = current.map_or(0, |i| (i + 1) % columns.len());
        self.set_sort_column(&columns[next]);
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.options.pagination.as_ref().map(|_| &self.pagination)
    }

    pub fn total_pages(&self) -> usize {
        if self.options.pagination.is_none() {
            return 1;
        }
        self.pagination.total_pages(self.sorted.len())
    }

    pub fn next_page(&mut self) -> bool {
        self.options.pagination.is_some() && self.pagination.next(self.sorted.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.options.pagination.is_some() && self.pagination.prev()
    }

    pub fn first_page(&mut self) -> bool {
        self.options.pagination.is_some() && self.pagination.first()
    }

    pub fn last_page(&mut self) -> bool {
        self.options.pagination.is_some() && self.pagination.last(self.sorted.len())
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        if self.options.pagination.is_none() {
            return;
        }
        self.pagination.set_rows_per_page(rows_per_page);
    }

    pub fn cycle_page_size(&mut self, forward: bool) -> bool {
        let Some(options) = self.options.pagination.as_ref() else {
            return false;
        };
        self.pagination
            .cycle_page_size(&options.page_size_choices, forward)
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn selected_count(&self) -> usize {
        self.selection.count()
    }

    /// Header checkbox state.
    pub fn all_selected(&self) -> bool {
        self.selection.is_all_selected(self.sorted.len())
    }

    pub fn toggle_row(&mut self, id: &RowId) -> bool {
        if !self.options.checkboxes.enabled || !self.sorted.iter().any(|r| &r.id == id) {
            return false;
        }
        self.selection.toggle(id.clone())
    }

    /// Header checkbox: selects every row of the sorted set, or clears everything.
    pub fn toggle_all(&mut self) {
        if !self.options.checkboxes.enabled {
            return;
        }
        if self.all_selected() {
            self.selection.clear();
        } else {
            self.selection.select_all(self.sorted.iter().map(|r| &r.id));
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Rows currently selected, in sorted order.
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.sorted
            .iter()
            .filter(|r| self.selection.is_selected(&r.id))
            .map(|r| &self.rows[r.index])
            .collect()
    }

    /// Resolves the selection to full rows and clears it, whatever the caller does next.
    pub fn take_bulk_selection(&mut self) -> Vec<Row> {
        let rows = self.selected_rows().into_iter().cloned().collect();
        self.selection.clear();
        rows
    }

    /// The row handed to a row-click handler, if `column` is clickable.
    pub fn row_click<'a>(&self, row: &'a Row, column: &str) -> Option<&'a Row> {
        self.is_clickable(column).then_some(row)
    }

    pub fn is_clickable(&self, column: &str) -> bool {
        self.options.clickable_columns.iter().any(|c| c == column)
    }

    /// Identity of every row of the sorted set, in order.
    pub fn sorted_ids(&self) -> Vec<RowId> {
        self.sorted.iter().map(|r| r.id.clone()).collect()
    }

    pub fn sorted_rows(&self) -> Vec<&Row> {
        self.sorted.iter().map(|r| &self.rows[r.index]).collect()
    }

    /// Rows surviving search and filters, before paging.
    pub fn filtered_len(&self) -> usize {
        self.filtered_len
    }

    pub fn view(&self) -> TableView<'_> {
        let columns: Vec<ViewColumn<'_>> = self
            .visible_keys()
            .into_iter()
            .map(|key| ViewColumn {
                key,
                label: self.enhanced_headers.label(key).unwrap_or(""),
                clickable: self.is_clickable(key),
                sort: match (&self.options.sort, &self.sort) {
                    (Some(_), Some(spec)) if spec.column == key => Some(spec.direction),
                    _ => None,
                },
            })
            .collect();

        let body = if self.loading {
            BodyState::Loading {
                skeleton_rows: self.options.skeleton_row_count,
            }
        } else if self.rows.is_empty() {
            BodyState::NoData(&self.options.empty_data_text)
        } else if self.sorted.is_empty() {
            BodyState::NotFound(&self.options.not_found_text)
        } else {
            BodyState::Rows
        };

        let page_rows: &[SortedRow] = if self.options.pagination.is_some() {
            self.pagination.slice(&self.sorted)
        } else {
            &self.sorted
        };
        let trigger = self.options.action_menu.as_ref().map(|m| &m.trigger);
        let rows = match body {
            BodyState::Rows => page_rows
                .iter()
                .enumerate()
                .map(|(position, r)| ViewRow {
                    id: r.id.clone(),
                    row: &self.rows[r.index],
                    position,
                    selected: self.selection.is_selected(&r.id),
                    striped: self.options.striped_rows && position % 2 == 1,
                    actions_trigger: trigger,
                })
                .collect(),
            _ => Vec::new(),
        };

        TableView {
            columns,
            body,
            rows,
            page: self.pagination().map_or(1, Pagination::page),
            total_pages: self.total_pages(),
            rows_per_page: self.pagination().map(Pagination::rows_per_page),
            total_rows: self.sorted.len(),
            selected_count: self.selection.count(),
            all_selected: self.all_selected(),
        }
    }

    fn visible_keys(&self) -> Vec<&str> {
        self.enhanced_headers
            .keys()
            .filter(|k| {
                *k == CHECKBOX_COLUMN || !self.options.columns_to_hide.iter().any(|h| h == k)
            })
            .collect()
    }

    fn initial_sort(&self) -> Option<SortSpec> {
        let direction = self.options.default_sort_direction;
        if let Some(column) = self.options.sort.as_ref().and_then(|s| s.column.clone()) {
            if self.headers.contains(&column) {
                return Some(SortSpec::new(column, direction));
            }
        }
        self.visible_keys()
            .into_iter()
            .find(|k| !is_synthetic(k))
            .map(|k| SortSpec::new(k, direction))
    }

    fn recompute(&mut self) {
        let flags = self.options.flags();
        let enhanced = enhance(
            &self.rows,
            &self.headers,
            flags,
            self.options.action_menu.as_ref(),
        );
        let search = self
            .options
            .search
            .as_ref()
            .map(|s| (s.column.as_str(), self.query.as_str()));

        let mut filtered = filter::apply_filters(
            &enhanced.rows,
            search,
            &self.options.filter_by,
            &self.filters,
        );

        if filtered.is_empty()
            && !self.filters.is_empty()
            && self.filters != self.options.initial_filters
        {
            log::debug!(
                "filters {:?} emptied the table, restoring {:?}",
                self.filters,
                self.options.initial_filters
            );
            self.filters = self.options.initial_filters.clone();
            self.pagination.reset();
            filtered = filter::apply_filters(
                &enhanced.rows,
                search,
                &self.options.filter_by,
                &self.filters,
            );
        }
        self.filtered_len = filtered.len();

        if let Some(spec) = &self.sort {
            sort::sort_rows(&mut filtered, spec);
        }

        let ids = self
            .options
            .identity
            .assign(filtered.iter().map(|r| r.source));
        self.sorted = filtered
            .iter()
            .zip(ids)
            .map(|(r, id)| SortedRow { id, index: r.index })
            .collect();

        let ids: Vec<RowId> = self.sorted.iter().map(|r| r.id.clone()).collect();
        if self.selection.reconcile(&ids) {
            log::debug!("selection pruned to {} rows", self.selection.count());
        }

        self.pagination.clamp(self.sorted.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Headers {
        Headers::new()
            .column("charge_id", "Charge ID")
            .column("student_id", "Student ID")
            .column("status", "Status")
    }

    fn rows() -> Vec<Row> {
        [
            ("chg_001", "stu_101", "unpaid"),
            ("chg_002", "stu_102", "paid"),
            ("chg_003", "stu_101", "partial"),
            ("chg_004", "stu_103", "unpaid"),
            ("chg_005", "stu_104", "paid"),
        ]
        .into_iter()
        .map(|(c, s, st)| {
            Row::new()
                .cell("charge_id", c)
                .cell("student_id", s)
                .cell("status", st)
        })
        .collect()
    }

    fn ids(view: &TableView<'_>) -> Vec<String> {
        view.rows.iter().map(|r| r.row.text("charge_id")).collect()
    }

    #[test]
    fn default_sort_is_first_column_descending() {
        let mut t = DataTable::new(
            headers(),
            TableOptions {
                checkboxes: CheckboxOptions {
                    enabled: true,
                    bulk_delete: false,
                },
                ..Default::default()
            },
        );
        t.set_rows(rows());
        assert_eq!(
            t.sort_spec(),
            Some(&SortSpec::new("charge_id", SortDirection::Descending))
        );
        assert_eq!(
            ids(&t.view()),
            vec!["chg_005", "chg_004", "chg_003", "chg_002", "chg_001"]
        );
    }

    #[test]
    fn query_change_resets_page() {
        let mut t = DataTable::new(
            headers(),
            TableOptions {
                search: Some(SearchOptions::new("student_id")),
                pagination: Some(PaginationOptions::rows_per_page(2)),
                ..Default::default()
            },
        );
        t.set_rows(rows());
        assert!(t.next_page());
        assert_eq!(t.view().page, 2);
        t.set_query("stu");
        assert_eq!(t.view().page, 1);
    }

    #[test]
    fn sort_change_keeps_page() {
        let mut t = DataTable::new(
            headers(),
            TableOptions {
                sort: Some(SortOptions::default()),
                pagination: Some(PaginationOptions::rows_per_page(2)),
                ..Default::default()
            },
        );
        t.set_rows(rows());
        t.next_page();
        t.toggle_sort_direction();
        assert_eq!(t.view().page, 2);
        assert_eq!(ids(&t.view()), vec!["chg_003", "chg_004"]);
    }

    #[test]
    fn rollback_restores_initial_filters() {
        let mut t = DataTable::new(
            headers(),
            TableOptions {
                filter_by: vec!["status".into()],
                ..Default::default()
            },
        );
        t.set_rows(rows());
        t.set_filter("status", ["paid"]);
        assert_eq!(t.view().total_rows, 2);
        t.set_filter("status", ["archived"]);
        assert_eq!(t.filters(), &FilterState::new());
        assert_eq!(t.view().total_rows, 5);
    }

    #[test]
    fn rollback_does_not_fire_at_initial_state() {
        let initial = FilterState::new().with("status", ["archived"]);
        let mut t = DataTable::new(
            headers(),
            TableOptions {
                filter_by: vec!["status".into()],
                initial_filters: initial.clone(),
                ..Default::default()
            },
        );
        t.set_rows(rows());
        assert_eq!(t.filters(), &initial);
        assert!(matches!(t.view().body, BodyState::NotFound(_)));
    }

    #[test]
    fn hidden_columns_never_hide_checkbox() {
        let t = DataTable::new(
            headers(),
            TableOptions {
                checkboxes: CheckboxOptions {
                    enabled: true,
                    bulk_delete: false,
                },
                columns_to_hide: vec!["checkbox".into(), "status".into()],
                ..Default::default()
            },
        );
        let keys: Vec<&str> = t.view().columns.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["checkbox", "charge_id", "student_id"]);
    }

    #[test]
    fn body_states_in_priority_order() {
        let mut t = DataTable::new(
            headers(),
            TableOptions {
                search: Some(SearchOptions::new("student_id")),
                ..Default::default()
            },
        );
        assert_eq!(t.view().body, BodyState::NoData("No data available"));
        t.set_loading(true);
        assert_eq!(t.view().body, BodyState::Loading { skeleton_rows: 5 });
        t.set_loading(false);
        t.set_rows(rows());
        t.set_query("nobody");
        assert_eq!(t.view().body, BodyState::NotFound("No results found"));
        assert!(t.view().rows.is_empty());
    }

    #[test]
    fn bulk_selection_clears_and_keeps_sorted_order() {
        let mut t = DataTable::new(
            headers(),
            TableOptions {
                checkboxes: CheckboxOptions {
                    enabled: true,
                    bulk_delete: true,
                },
                ..Default::default()
            },
        );
        t.set_rows(rows());
        t.toggle_row(&RowId::Position(3));
        t.toggle_row(&RowId::Position(0));
        let taken = t.take_bulk_selection();
        let texts: Vec<String> = taken.iter().map(|r| r.text("charge_id")).collect();
        assert_eq!(texts, vec!["chg_005", "chg_002"]);
        assert_eq!(t.selected_count(), 0);
    }

    #[test]
    fn toggle_all_covers_every_page() {
        let mut t = DataTable::new(
            headers(),
            TableOptions {
                checkboxes: CheckboxOptions {
                    enabled: true,
                    bulk_delete: false,
                },
                pagination: Some(PaginationOptions::rows_per_page(2)),
                ..Default::default()
            },
        );
        t.set_rows(rows());
        t.toggle_all();
        assert_eq!(t.selected_count(), 5);
        assert!(t.view().all_selected);
        t.toggle_all();
        assert_eq!(t.selected_count(), 0);
    }

    #[test]
    fn only_clickable_columns_report_clicks() {
        let t = DataTable::new(
            headers(),
            TableOptions {
                clickable_columns: vec!["student_id".into()],
                ..Default::default()
            },
        );
        let row = Row::new().cell("student_id", "stu_101");
        assert_eq!(t.row_click(&row, "student_id"), Some(&row));
        assert_eq!(t.row_click(&row, "status"), None);
    }

    #[test]
    fn stripes_alternate_within_each_page() {
        let striped = |t: &DataTable| -> Vec<bool> { t.view().rows.iter().map(|r| r.striped).collect() };
        let options = |striped_rows| TableOptions {
            pagination: Some(PaginationOptions::rows_per_page(2)),
            striped_rows,
            ..Default::default()
        };

        let mut t = DataTable::new(headers(), options(true));
        t.set_rows(rows());
        assert_eq!(striped(&t), vec![false, true]);
        assert!(t.next_page());
        assert_eq!(striped(&t), vec![false, true]);

        let mut plain = DataTable::new(headers(), options(false));
        plain.set_rows(rows());
        assert_eq!(striped(&plain), vec![false, false]);
    }
}
