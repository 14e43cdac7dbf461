use crate::charge::ChargePatch;
use crate::charge::charge_headers;
use crate::charge::charge_rows;
use crate::config::ConsoleConfig;
use crate::form::ChargeForm;
use crate::form::Field;
use crate::form::FormAction;
use crate::form::FormMode;
use crate::form::ValidationError;
use crate::form::centered;
use crate::store::ChargeStore;
use crate::store::Storage;
use crate::store::StoreError;
use crate::store::SubscriptionId;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use ratatui_datatable::content::Content;
use ratatui_datatable::enhance::ActionItem;
use ratatui_datatable::enhance::ActionMenu;
use ratatui_datatable::filter::SearchOptions;
use ratatui_datatable::help::HelpBar;
use ratatui_datatable::input::InputEvent;
use ratatui_datatable::input::KeyCode;
use ratatui_datatable::keymap::Binding;
use ratatui_datatable::keymap::key;
use ratatui_datatable::keymap::key_char;
use ratatui_datatable::keymap::key_ctrl;
use ratatui_datatable::pagination::PaginationOptions;
use ratatui_datatable::render;
use ratatui_datatable::table::CheckboxOptions;
use ratatui_datatable::table::DataTable;
use ratatui_datatable::table::SortOptions;
use ratatui_datatable::table::TableOptions;
use ratatui_datatable::theme::Theme;
use ratatui_datatable::view::DataTableAction;
use ratatui_datatable::view::DataTableView;
use ratatui_datatable::view::Focus;
use std::cell::Cell;
use std::rc::Rc;

pub const EDIT_ACTION: &str = "edit";
pub const DELETE_ACTION: &str = "delete";

fn charge_count(n: usize) -> String {
    format!("{n} charges")
}

/// Table configuration of the charge list.
pub fn charge_table_options(config: &ConsoleConfig, count: usize) -> TableOptions {
    TableOptions {
        title: Some("Charge Manager".to_string()),
        description: Some(charge_count(count)),
        search: Some(SearchOptions::new("student_id").placeholder("Search for Student ID")),
        filter_by: vec!["student_id".to_string()],
        sort: config.sort_controls.then(SortOptions::default),
        pagination: Some(PaginationOptions {
            rows_per_page: config.rows_per_page,
            page_size_choices: config.page_sizes(),
        }),
        checkboxes: CheckboxOptions {
            enabled: true,
            bulk_delete: true,
        },
        action_menu: Some(ActionMenu {
            trigger: Content::from("..."),
            items: vec![
                ActionItem::new(EDIT_ACTION, "Edit").icon("✎"),
                ActionItem::new(DELETE_ACTION, "Delete")
                    .icon("✗")
                    .style(Style::default().red())
                    .separated(),
            ],
        }),
        clickable_columns: vec!["student_id".to_string()],
        not_found_text: "Charge not found...".to_string(),
        striped_rows: config.striped_rows,
        ..Default::default()
    }
}

/// App-level keys, active while the table body has focus.
#[derive(Clone, Debug)]
pub struct AppBindings {
    pub new_charge: Binding,
    pub edit: Binding,
    pub reset: Binding,
    pub quit: Binding,
}

impl Default for AppBindings {
    fn default() -> Self {
        Self {
            new_charge: Binding::new("c", "new", vec![key_char('c')]),
            edit: Binding::new("e", "edit", vec![key_char('e')]),
            reset: Binding::new("R", "reset", vec![key_char('R')]),
            quit: Binding::new("q", "quit", vec![key_char('q'), key_ctrl('c')]),
        }
    }
}

impl AppBindings {
    pub fn help(&self) -> Vec<Binding> {
        vec![
            self.new_charge.clone(),
            self.edit.clone(),
            self.reset.clone(),
            self.quit.clone(),
        ]
    }
}

/// A destructive operation waiting for a yes/no answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Confirm {
    Delete(String),
    BulkDelete(Vec<String>),
    Reset,
}

impl Confirm {
    pub fn prompt(&self) -> String {
        match self {
            Confirm::Delete(id) => format!("Delete charge {id}?"),
            Confirm::BulkDelete(ids) => format!("Delete {} selected charges?", ids.len()),
            Confirm::Reset => "Reset all charges to sample data?".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug)]
pub enum Screen {
    Table,
    Form(ChargeForm),
    Confirm(Confirm),
}

/// The charge console: table, form and confirmation prompt over one store.
pub struct App<S: Storage> {
    store: ChargeStore<S>,
    view: DataTableView,
    theme: Theme,
    bindings: AppBindings,
    screen: Screen,
    dirty: Rc<Cell<bool>>,
    subscription: SubscriptionId,
    status: Option<StatusMessage>,
    cursor: Option<(u16, u16)>,
    should_quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(mut store: ChargeStore<S>, config: &ConsoleConfig) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = store.subscribe(move |_| flag.set(true));

        let mut table = DataTable::new(
            charge_headers(),
            charge_table_options(config, store.list().len()),
        );
        table.set_rows(charge_rows(store.list()));
        Self {
            store,
            view: DataTableView::new(table),
            theme: Theme::default(),
            bindings: AppBindings::default(),
            screen: Screen::Table,
            dirty,
            subscription,
            status: None,
            cursor: None,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &ChargeStore<S> {
        &self.store
    }

    pub fn view(&self) -> &DataTableView {
        &self.view
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Terminal cursor position as of the last render.
    pub fn cursor_pos(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Returns `true` when the screen needs a redraw.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        let redraw = match &mut self.screen {
            Screen::Table => self.handle_table_event(event),
            Screen::Form(form) => {
                let action = form.handle_event(event);
                self.handle_form_action(action)
            }
            Screen::Confirm(confirm) => {
                let confirm = confirm.clone();
                self.handle_confirm_event(event, confirm)
            }
        };
        self.sync_rows();
        redraw
    }

    fn handle_table_event(&mut self, event: InputEvent) -> bool {
        if let InputEvent::Key(key) = &event {
            if *self.view.focus() == Focus::Table {
                if self.bindings.quit.matches(key) {
                    self.should_quit = true;
                    return true;
                }
                if self.bindings.new_charge.matches(key) {
                    let today = chrono::Local::now().date_naive();
                    self.screen = Screen::Form(ChargeForm::create(today));
                    return true;
                }
                if self.bindings.edit.matches(key) {
                    if let Some(id) = self.cursor_charge_id() {
                        self.open_edit(&id);
                    }
                    return true;
                }
                if self.bindings.reset.matches(key) {
                    self.screen = Screen::Confirm(Confirm::Reset);
                    return true;
                }
            }
        }

        match self.view.handle_event(event) {
            DataTableAction::None => false,
            DataTableAction::Redraw | DataTableAction::SearchChanged(_) => true,
            DataTableAction::RowClicked(row) => {
                if let Some(id) = row.id() {
                    self.open_edit(id);
                }
                true
            }
            DataTableAction::ActionSelected { action, row } => {
                let Some(id) = row.id() else {
                    return true;
                };
                match action.as_str() {
                    EDIT_ACTION => self.open_edit(id),
                    DELETE_ACTION => self.screen = Screen::Confirm(Confirm::Delete(id.to_string())),
                    other => log::warn!("unhandled row action {other}"),
                }
                true
            }
            DataTableAction::BulkDelete(rows) => {
                let ids: Vec<String> = rows
                    .iter()
                    .filter_map(|r| r.id().map(str::to_string))
                    .collect();
                if !ids.is_empty() {
                    self.screen = Screen::Confirm(Confirm::BulkDelete(ids));
                }
                true
            }
        }
    }

    fn handle_form_action(&mut self, action: FormAction) -> bool {
        match action {
            FormAction::None => false,
            FormAction::Redraw => true,
            FormAction::Cancel => {
                self.screen = Screen::Table;
                true
            }
            FormAction::Delete(id) => {
                self.screen = Screen::Confirm(Confirm::Delete(id));
                true
            }
            FormAction::Submit(charge) => {
                let mode = match &self.screen {
                    Screen::Form(form) => form.mode().clone(),
                    Screen::Table | Screen::Confirm(_) => return false,
                };
                match mode {
                    FormMode::Create => {
                        if self.store.contains(&charge.charge_id) {
                            if let Screen::Form(form) = &mut self.screen {
                                form.reject(
                                    Field::ChargeId,
                                    ValidationError::DuplicateId(charge.charge_id.clone()),
                                );
                            }
                            return true;
                        }
                        let result = self.store.add(charge);
                        self.finish(result, "Successfully created Charge".to_string());
                    }
                    FormMode::Edit { charge_id } => {
                        let result = self.store.update(&charge_id, &ChargePatch::from_charge(&charge));
                        self.finish(result, format!("Updated charge: {charge_id}"));
                    }
                }
                self.screen = Screen::Table;
                true
            }
        }
    }

    fn handle_confirm_event(&mut self, event: InputEvent, confirm: Confirm) -> bool {
        let InputEvent::Key(key) = event else {
            return false;
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.screen = Screen::Table;
                self.apply_confirmed(confirm);
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.screen = Screen::Table;
                true
            }
            _ => false,
        }
    }

    fn apply_confirmed(&mut self, confirm: Confirm) {
        match confirm {
            Confirm::Delete(id) => {
                let result = self.store.delete(&id);
                self.finish(result, format!("Charge {id} deleted successfully"));
            }
            Confirm::BulkDelete(ids) => {
                let mut deleted = 0usize;
                let mut failure = None;
                for id in &ids {
                    match self.store.delete(id) {
                        Ok(()) => deleted += 1,
                        Err(err) => failure = Some(err),
                    }
                }
                let result = failure.map_or(Ok(()), Err);
                self.finish(result, format!("Deleted {deleted} charges"));
            }
            Confirm::Reset => {
                let result = self.store.reset_to_seed_data();
                self.finish(result, "Reset to sample data".to_string());
            }
        }
    }

    fn finish(&mut self, result: Result<(), StoreError>, success: String) {
        self.status = Some(match result {
            Ok(()) => StatusMessage {
                kind: StatusKind::Success,
                text: success,
            },
            Err(err) => {
                log::error!("{err}");
                StatusMessage {
                    kind: StatusKind::Error,
                    text: err.to_string(),
                }
            }
        });
    }

    fn open_edit(&mut self, charge_id: &str) {
        match self.store.get(charge_id) {
            Some(charge) => self.screen = Screen::Form(ChargeForm::edit(charge)),
            None => log::warn!("no charge {charge_id} to edit"),
        }
    }

    fn cursor_charge_id(&self) -> Option<String> {
        let cursor = self.view.cursor();
        let table = self.view.table().view();
        table
            .rows
            .get(cursor.row)
            .and_then(|r| r.row.id())
            .map(str::to_string)
    }

    /// Pulls the store's list into the table after a mutation.
    fn sync_rows(&mut self) {
        if !self.dirty.replace(false) {
            return;
        }
        let count = self.store.list().len();
        self.view.set_rows(charge_rows(self.store.list()));
        self.view
            .table_mut()
            .set_description(Some(charge_count(count)));
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let body = Rect::new(area.x, area.y, area.width, area.height - 1);
        let status_line = Rect::new(area.x, area.y + body.height, area.width, 1);

        self.view.render(body, buf, &self.theme);
        self.cursor = self.view.cursor_pos();
        match &mut self.screen {
            Screen::Table => {}
            Screen::Form(form) => {
                form.render(body, buf, &self.theme);
                self.cursor = form.cursor_pos();
            }
            Screen::Confirm(confirm) => {
                self.cursor = None;
                render_confirm(body, buf, &self.theme, &confirm.prompt());
            }
        }
        self.render_status(status_line, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let (text, style) = match &self.status {
            Some(StatusMessage {
                kind: StatusKind::Success,
                text,
            }) => (text.as_str(), Style::default().green()),
            Some(StatusMessage {
                kind: StatusKind::Error,
                text,
            }) => (text.as_str(), self.theme.danger),
            None => ("", self.theme.text_muted),
        };
        let used = render::render_str_clipped(area.x, area.y, area.width, buf, text, style);
        if matches!(self.screen, Screen::Table) {
            let x = area.x + used + if used > 0 { 2 } else { 0 };
            if x < area.right() {
                HelpBar::new(self.bindings.help())
                    .render_ref(Rect::new(x, area.y, area.right() - x, 1), buf);
            }
        }
    }
}

impl<S: Storage> Drop for App<S> {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

fn render_confirm(area: Rect, buf: &mut Buffer, theme: &Theme, prompt: &str) {
    let width = render::display_width(prompt) as u16 + 4;
    let rect = centered(area, width.max(30), 4);
    Clear.render(rect, buf);
    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(theme.danger);
    let inner = block.inner(rect);
    block.render(rect, buf);
    if inner.height == 0 {
        return;
    }
    render::render_str_clipped(inner.x + 1, inner.y, inner.width.saturating_sub(1), buf, prompt, theme.text_primary);
    if inner.height > 1 {
        HelpBar::new(vec![
            Binding::new("y", "confirm", vec![key_char('y'), key(KeyCode::Enter)]),
            Binding::new("n", "cancel", vec![key_char('n'), key(KeyCode::Esc)]),
        ])
        .render_ref(
            Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(1), 1),
            buf,
        );
    }
}
