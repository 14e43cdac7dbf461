//! `ratatui-datatable` is a data-table engine for terminal UIs.
//!
//! A [`table::DataTable`] owns the interactive state of one table (search text, column filters,
//! sort column, page and row selection) over caller-supplied rows, and recomputes what to show in
//! a fixed order after every change:
//!
//! ```text
//! rows -> enhance -> search -> filters -> rollback -> sort -> reconcile selection -> page
//! ```
//!
//! [`view::DataTableView`] is the terminal shell around it: title, search box, filter and sort
//! bars, header, body, pagination footer, filter popover and per-row action menu.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No callbacks: interactions come back as [`view::DataTableAction`] values (row clicks, chosen
//!   row actions, bulk deletes) and the caller decides what they mean.
//! - Cell values are [`content::Content`] trees; search, filters, sorting and content-derived
//!   row identity all work on their flattened text ([`content::extract_text`]).
//!
//! ## Getting started
//!
//! ```
//! use ratatui_datatable::pagination::PaginationOptions;
//! use ratatui_datatable::row::Headers;
//! use ratatui_datatable::row::Row;
//! use ratatui_datatable::table::DataTable;
//! use ratatui_datatable::table::TableOptions;
//!
//! let headers = Headers::new().column("id", "ID").column("name", "Name");
//! let mut table = DataTable::new(
//!     headers,
//!     TableOptions {
//!         pagination: Some(PaginationOptions::rows_per_page(2)),
//!         ..Default::default()
//!     },
//! );
//! table.set_rows(vec![
//!     Row::new().cell("id", "1").cell("name", "ada"),
//!     Row::new().cell("id", "2").cell("name", "grace"),
//!     Row::new().cell("id", "3").cell("name", "linus"),
//! ]);
//! let view = table.view();
//! assert_eq!(view.total_pages, 2);
//! assert_eq!(view.rows[0].row.text("name"), "linus");
//! ```
pub mod theme;

pub mod content;
pub mod enhance;
pub mod filter;
pub mod pagination;
pub mod row;
pub mod selection;
pub mod sort;
pub mod table;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod help;
pub mod input;
pub mod keymap;
pub mod line_input;
pub mod render;
pub mod view;
