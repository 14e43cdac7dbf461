use ratatui_datatable::content::Content;
use ratatui_datatable::enhance::EnhanceFlags;
use ratatui_datatable::enhance::enhance;
use ratatui_datatable::enhance::enhance_headers;
use ratatui_datatable::filter::FilterState;
use ratatui_datatable::filter::SearchOptions;
use ratatui_datatable::filter::apply_filters;
use ratatui_datatable::pagination::PaginationOptions;
use ratatui_datatable::row::Headers;
use ratatui_datatable::row::Row;
use ratatui_datatable::row::RowId;
use ratatui_datatable::selection::RowSelection;
use ratatui_datatable::sort::SortDirection;
use ratatui_datatable::sort::SortSpec;
use ratatui_datatable::sort::sort_rows;
use ratatui_datatable::table::CheckboxOptions;
use ratatui_datatable::table::DataTable;
use ratatui_datatable::table::TableOptions;
use std::collections::BTreeSet;

fn headers() -> Headers {
    Headers::new()
        .column("charge_id", "Charge ID")
        .column("charge_amount", "Charge Amount (RM)")
        .column("student_id", "Student ID")
        .column("status", "Status")
}

fn seed() -> Vec<Row> {
    [
        ("chg_001", 120.0, "stu_101", "unpaid"),
        ("chg_002", 80.5, "stu_102", "paid"),
        ("chg_003", 150.0, "stu_101", "partial"),
        ("chg_004", 95.0, "stu_103", "unpaid"),
        ("chg_005", 200.0, "stu_104", "paid"),
    ]
    .into_iter()
    .map(|(id, amount, student, status)| {
        Row::new()
            .cell("charge_id", id)
            .cell("charge_amount", amount)
            .cell("student_id", student)
            .cell(
                "status",
                Content::node("badge", Default::default(), status.to_uppercase()),
            )
    })
    .collect()
}

fn charge_ids<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<String> {
    rows.into_iter().map(|r| r.text("charge_id")).collect()
}

#[test]
fn enhancing_twice_adds_no_duplicate_columns() {
    let flags = EnhanceFlags {
        checkboxes: true,
        actions: true,
    };
    let once = enhance_headers(&headers(), flags);
    let twice = enhance_headers(&once, flags);
    assert_eq!(once, twice);
    assert_eq!(once.len(), headers().len() + 2);
}

#[test]
fn stricter_filters_never_grow_the_result() {
    let rows = seed();
    let enhanced = enhance(&rows, &headers(), EnhanceFlags::default(), None);
    let filter_by = vec!["status".to_string(), "student_id".to_string()];

    let loose = FilterState::new().with("status", ["UNPAID", "PAID"]);
    let strict = loose.clone().with("student_id", ["stu_101"]);
    let narrow = FilterState::new().with("status", ["UNPAID"]);

    let run = |filters: &FilterState| -> Vec<String> {
        let rows = apply_filters(&enhanced.rows, None, &filter_by, filters);
        charge_ids(rows.iter().map(|r| r.source))
    };
    let loose_ids = run(&loose);
    let strict_ids = run(&strict);
    let narrow_ids = run(&narrow);

    let loose_set: BTreeSet<_> = loose_ids.iter().collect();
    assert!(strict_ids.iter().all(|id| loose_set.contains(id)));
    assert!(narrow_ids.iter().all(|id| loose_set.contains(id)));
    assert_eq!(strict_ids, vec!["chg_001"]);
    assert_eq!(narrow_ids, vec!["chg_001", "chg_004"]);
}

#[test]
fn sort_preserves_order_of_equal_keys_in_both_directions() {
    let rows = seed();
    let enhanced = enhance(&rows, &headers(), EnhanceFlags::default(), None);
    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let mut sorted = enhanced.rows.clone();
        sort_rows(&mut sorted, &SortSpec::new("student_id", direction));
        let stu_101: Vec<String> = sorted
            .iter()
            .filter(|r| r.text("student_id") == "stu_101")
            .map(|r| r.text("charge_id"))
            .collect();
        assert_eq!(stu_101, vec!["chg_001", "chg_003"]);
    }
}

#[test]
fn numeric_columns_sort_as_text() {
    let mut table = DataTable::new(headers(), TableOptions::default());
    table.set_rows(seed());
    table.set_sort_column("charge_amount");
    table.set_sort_direction(SortDirection::Ascending);
    let amounts: Vec<String> = table
        .sorted_rows()
        .iter()
        .map(|r| r.text("charge_amount"))
        .collect();
    assert_eq!(amounts, vec!["120", "150", "200", "80.5", "95"]);
}

#[test]
fn pages_concatenate_to_the_sorted_set() {
    for rows_per_page in [1, 2, 3, 5, 7] {
        let mut table = DataTable::new(
            headers(),
            TableOptions {
                pagination: Some(PaginationOptions::rows_per_page(rows_per_page)),
                ..Default::default()
            },
        );
        table.set_rows(seed());
        let expected = charge_ids(table.sorted_rows());
        let mut seen = Vec::new();
        loop {
            seen.extend(table.view().rows.iter().map(|r| r.row.text("charge_id")));
            if !table.next_page() {
                break;
            }
        }
        assert_eq!(seen, expected, "rows_per_page = {rows_per_page}");
        assert_eq!(table.total_pages(), 5usize.div_ceil(rows_per_page));
    }
}

#[test]
fn reconcile_keeps_only_surviving_identities() {
    fn ids(names: &[&str]) -> Vec<RowId> {
        names.iter().map(|n| RowId::Explicit(n.to_string())).collect()
    }

    let mut selection = RowSelection::new();
    selection.select_all(&ids(&["a", "b", "c"]));
    selection.reconcile(&ids(&["b", "c", "d"]));
    let kept: Vec<RowId> = selection.tracked_ids().cloned().collect();
    assert_eq!(kept, ids(&["b", "c"]));
    assert_eq!(selection.count(), 2);
}

#[test]
fn selection_follows_explicit_ids_through_search() {
    let rows: Vec<Row> = seed()
        .into_iter()
        .map(|r| {
            let id = r.text("charge_id");
            r.with_id(id)
        })
        .collect();
    let mut table = DataTable::new(
        headers(),
        TableOptions {
            search: Some(SearchOptions::new("student_id")),
            checkboxes: CheckboxOptions {
                enabled: true,
                bulk_delete: true,
            },
            ..Default::default()
        },
    );
    table.set_rows(rows);
    table.toggle_row(&RowId::Explicit("chg_001".into()));
    table.toggle_row(&RowId::Explicit("chg_005".into()));

    table.set_query("stu_101");
    assert_eq!(table.selected_count(), 1);
    table.set_query("");
    assert_eq!(table.selected_count(), 1);
    assert_eq!(charge_ids(table.selected_rows()), vec!["chg_001"]);
}

#[test]
fn emptying_filter_edit_rolls_back_to_mount_state() {
    let mut table = DataTable::new(
        Headers::new().column("status", "Status"),
        TableOptions {
            filter_by: vec!["status".into()],
            ..Default::default()
        },
    );
    table.set_rows(vec![
        Row::new().cell("status", "paid"),
        Row::new().cell("status", "unpaid"),
    ]);
    table.set_filter("status", ["paid"]);
    assert_eq!(table.filters(), &FilterState::new().with("status", ["paid"]));

    table.set_filter("status", ["archived"]);
    assert_eq!(table.filters(), &FilterState::new());
    assert_eq!(table.view().total_rows, 2);
}

#[test]
fn five_rows_two_per_page_descending() {
    let mut table = DataTable::new(
        headers(),
        TableOptions {
            pagination: Some(PaginationOptions::rows_per_page(2)),
            ..Default::default()
        },
    );
    table.set_rows(seed());
    assert_eq!(
        table.sort_spec(),
        Some(&SortSpec::new("charge_id", SortDirection::Descending))
    );

    let page = |t: &DataTable| -> Vec<String> {
        t.view().rows.iter().map(|r| r.row.text("charge_id")).collect()
    };
    assert_eq!(page(&table), vec!["chg_005", "chg_004"]);
    assert!(table.last_page());
    assert_eq!(page(&table), vec!["chg_001"]);
    assert_eq!(table.view().total_pages, 3);
    assert!(!table.next_page());
}

#[test]
fn search_keeps_original_relative_order() {
    let rows = seed();
    let enhanced = enhance(&rows, &headers(), EnhanceFlags::default(), None);
    let found = apply_filters(
        &enhanced.rows,
        Some(("student_id", "  STU_101 ")),
        &[],
        &FilterState::new(),
    );
    assert_eq!(
        charge_ids(found.iter().map(|r| r.source)),
        vec!["chg_001", "chg_003"]
    );
}
