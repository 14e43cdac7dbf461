//! Terminal console for managing student charges.
//!
//! [`store::ChargeStore`] holds the charge list and persists it as JSON after every change;
//! [`app::App`] shows it through a `ratatui_datatable` table with search on student id, a
//! student-id filter, paging, checkbox selection and per-row edit/delete actions.
pub mod app;
pub mod charge;
pub mod config;
pub mod form;
pub mod paths;
pub mod store;
