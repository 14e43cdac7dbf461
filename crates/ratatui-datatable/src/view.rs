use crate::content::Content;
use crate::content::extract_text;
use crate::enhance::ACTIONS_COLUMN;
use crate::enhance::ActionItem;
use crate::enhance::CHECKBOX_COLUMN;
use crate::help::HelpBar;
use crate::help::HelpBarOptions;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap::Binding;
use crate::keymap::TableBindings;
use crate::line_input::LineInput;
use crate::line_input::LineInputAction;
use crate::line_input::LineInputOptions;
use crate::render;
use crate::row::Row;
use crate::row::RowId;
use crate::table::BodyState;
use crate::table::DataTable;
use crate::table::TableView;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;

const MIN_COL_WIDTH: u16 = 3;
const CHECKBOX_WIDTH: u16 = 3;
const SKELETON: &str = "░";

/// What the host application should do after [`DataTableView::handle_event`].
#[derive(Clone, Debug, PartialEq)]
pub enum DataTableAction {
    None,
    Redraw,
    /// A clickable cell was activated. Carries the full source row.
    RowClicked(Row),
    /// An action menu item was chosen for `row`. Never accompanied by a `RowClicked`.
    ActionSelected { action: String, row: Row },
    /// The selected rows, resolved in sorted order. The selection is already cleared.
    BulkDelete(Vec<Row>),
    SearchChanged(String),
}

#[derive(Clone, Debug)]
pub struct DataTableViewOptions {
    pub bindings: TableBindings,
    pub show_help: bool,
    pub col_gap: u16,
    pub max_col_width: u16,
}

impl Default for DataTableViewOptions {
    fn default() -> Self {
        Self {
            bindings: TableBindings::default(),
            show_help: true,
            col_gap: 2,
            max_col_width: 40,
        }
    }
}

/// Cursor over the current page: `row` is the page position, `col` the visible column index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Table,
    Search,
    /// Filter popover open on `filter_by[column]`, highlighting `choice`.
    Filter { column: usize, choice: usize },
    /// Action menu open for `row`, highlighting `item`.
    ActionMenu { row: RowId, item: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Up,
    Down,
    Left,
    Right,
    Activate,
    ActionMenu,
    Search,
    Filter,
    SortColumn,
    SortDirection,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    BiggerPages,
    SmallerPages,
    ToggleRow,
    ToggleAll,
    BulkDelete,
    ClearSelection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ColumnHit {
    key: String,
    x: u16,
    width: u16,
}

/// Screen regions from the last render, used for mouse hit tests.
#[derive(Clone, Debug, Default)]
struct HitMap {
    search: Option<Rect>,
    header: Option<Rect>,
    body: Option<Rect>,
    columns: Vec<ColumnHit>,
    row_height: u16,
    popover: Option<Rect>,
}

impl HitMap {
    fn column_at(&self, x: u16) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| x >= c.x && x < c.x + c.width)
    }
}

/// Interactive terminal shell around a [`DataTable`].
///
/// Drive it from the app loop: feed events to [`DataTableView::handle_event`] and act on the
/// returned [`DataTableAction`], then call [`DataTableView::render`].
pub struct DataTableView {
    table: DataTable,
    options: DataTableViewOptions,
    search: LineInput,
    focus: Focus,
    cursor: Cursor,
    scroll: usize,
    hits: HitMap,
}

impl DataTableView {
    pub fn new(table: DataTable) -> Self {
        Self::with_options(table, DataTableViewOptions::default())
    }

    pub fn with_options(table: DataTable, options: DataTableViewOptions) -> Self {
        let placeholder = table
            .options()
            .search
            .as_ref()
            .and_then(|s| s.placeholder.clone());
        let mut search = LineInput::with_options(LineInputOptions {
            placeholder,
            ..Default::default()
        });
        search.set_text(table.query());
        Self {
            table,
            options,
            search,
            focus: Focus::Table,
            cursor: Cursor::default(),
            scroll: 0,
            hits: HitMap::default(),
        }
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// Direct access to the engine. The cursor is pulled back into range on the next event or
    /// render.
    pub fn table_mut(&mut self) -> &mut DataTable {
        &mut self.table
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.table.set_rows(rows);
        self.clamp_cursor();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.search.set_text(query.clone());
        self.table.set_query(query);
        self.clamp_cursor();
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    /// `true` while keystrokes go to the search box rather than to commands.
    pub fn is_editing(&self) -> bool {
        self.focus == Focus::Search
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Terminal cursor position while the search box has focus.
    pub fn cursor_pos(&self) -> Option<(u16, u16)> {
        if self.focus != Focus::Search {
            return None;
        }
        self.hits.search.and_then(|area| self.search.cursor_pos(area))
    }

    /// Bindings relevant to the current focus, for a help bar.
    pub fn help(&self) -> Vec<Binding> {
        let b = &self.options.bindings;
        match self.focus {
            Focus::Table => b.help(),
            Focus::Search => vec![
                Binding::new("enter", "done", vec![KeyEvent::new(KeyCode::Enter)]),
                Binding::new("ctrl+u", "clear", vec![crate::keymap::key_ctrl('u')]),
            ],
            Focus::Filter { .. } => vec![
                Binding::new("space", "toggle", b.selection.toggle_row.clone()),
                Binding::new("←/→", "column", [b.left.keys.clone(), b.right.keys.clone()].concat()),
                Binding::new("bksp", "clear", vec![KeyEvent::new(KeyCode::Backspace)]),
                Binding::new("esc", "close", vec![KeyEvent::new(KeyCode::Esc)]),
            ],
            Focus::ActionMenu { .. } => vec![
                b.activate.clone(),
                Binding::new("esc", "close", vec![KeyEvent::new(KeyCode::Esc)]),
            ],
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DataTableAction {
        self.clamp_cursor();
        match event {
            InputEvent::Key(key) => match self.focus.clone() {
                Focus::Table => match self.command_for(&key) {
                    Some(command) => self.run(command),
                    None => DataTableAction::None,
                },
                Focus::Search => self.handle_search_key(key),
                Focus::Filter { column, choice } => self.handle_filter_key(&key, column, choice),
                Focus::ActionMenu { row, item } => self.handle_menu_key(&key, row, item),
            },
            InputEvent::Paste(text) => {
                if self.focus == Focus::Search {
                    self.handle_search_input(InputEvent::Paste(text))
                } else {
                    DataTableAction::None
                }
            }
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
        }
    }

    fn command_for(&self, key: &KeyEvent) -> Option<Command> {
        let b = &self.options.bindings;
        let table = [
            (&b.up, Command::Up),
            (&b.down, Command::Down),
            (&b.left, Command::Left),
            (&b.right, Command::Right),
            (&b.activate, Command::Activate),
            (&b.action_menu, Command::ActionMenu),
            (&b.search, Command::Search),
            (&b.filter, Command::Filter),
            (&b.sort_column, Command::SortColumn),
            (&b.sort_direction, Command::SortDirection),
            (&b.next_page, Command::NextPage),
            (&b.prev_page, Command::PrevPage),
            (&b.first_page, Command::FirstPage),
            (&b.last_page, Command::LastPage),
            (&b.bigger_pages, Command::BiggerPages),
            (&b.smaller_pages, Command::SmallerPages),
        ];
        if let Some((_, command)) = table.iter().find(|(binding, _)| binding.matches(key)) {
            return Some(*command);
        }
        let s = &b.selection;
        if s.is_toggle_row(key) {
            Some(Command::ToggleRow)
        } else if s.is_toggle_all(key) {
            Some(Command::ToggleAll)
        } else if s.is_bulk_delete(key) {
            Some(Command::BulkDelete)
        } else if s.is_clear(key) {
            Some(Command::ClearSelection)
        } else {
            None
        }
    }

    fn run(&mut self, command: Command) -> DataTableAction {
        let options = self.table.options();
        match command {
            Command::Up => redraw_if(self.move_cursor(-1, 0)),
            Command::Down => redraw_if(self.move_cursor(1, 0)),
            Command::Left => redraw_if(self.move_cursor(0, -1)),
            Command::Right => redraw_if(self.move_cursor(0, 1)),
            Command::Activate => self.activate_cell(self.cursor.row, self.cursor.col),
            Command::ActionMenu => self.open_action_menu(self.cursor.row),
            Command::Search => {
                if !options.search.as_ref().is_some_and(|s| !s.hidden) {
                    return DataTableAction::None;
                }
                self.focus = Focus::Search;
                DataTableAction::Redraw
            }
            Command::Filter => {
                if options.filter_by.is_empty() {
                    return DataTableAction::None;
                }
                self.focus = Focus::Filter {
                    column: 0,
                    choice: 0,
                };
                DataTableAction::Redraw
            }
            Command::SortColumn => {
                if options.sort.is_none() {
                    return DataTableAction::None;
                }
                self.table.cycle_sort_column();
                DataTableAction::Redraw
            }
            Command::SortDirection => {
                if options.sort.is_none() {
                    return DataTableAction::None;
                }
                self.table.toggle_sort_direction();
                DataTableAction::Redraw
            }
            Command::NextPage => {
                let changed = self.table.next_page();
                self.page_changed(changed)
            }
            Command::PrevPage => {
                let changed = self.table.prev_page();
                self.page_changed(changed)
            }
            Command::FirstPage => {
                let changed = self.table.first_page();
                self.page_changed(changed)
            }
            Command::LastPage => {
                let changed = self.table.last_page();
                self.page_changed(changed)
            }
            Command::BiggerPages => {
                let changed = self.table.cycle_page_size(true);
                self.page_changed(changed)
            }
            Command::SmallerPages => {
                let changed = self.table.cycle_page_size(false);
                self.page_changed(changed)
            }
            Command::ToggleRow => match self.row_at(self.cursor.row) {
                Some((id, _)) => redraw_if(self.toggle_row(&id)),
                None => DataTableAction::None,
            },
            Command::ToggleAll => {
                if !options.checkboxes.enabled {
                    return DataTableAction::None;
                }
                self.table.toggle_all();
                DataTableAction::Redraw
            }
            Command::BulkDelete => {
                if !options.checkboxes.bulk_delete || self.table.selected_count() == 0 {
                    return DataTableAction::None;
                }
                DataTableAction::BulkDelete(self.table.take_bulk_selection())
            }
            Command::ClearSelection => {
                if self.table.selected_count() == 0 {
                    return DataTableAction::None;
                }
                self.table.clear_selection();
                DataTableAction::Redraw
            }
        }
    }

    fn toggle_row(&mut self, id: &RowId) -> bool {
        if !self.table.options().checkboxes.enabled {
            return false;
        }
        self.table.toggle_row(id)
    }

    fn page_changed(&mut self, changed: bool) -> DataTableAction {
        if changed {
            self.cursor.row = 0;
            self.scroll = 0;
        }
        redraw_if(changed)
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> DataTableAction {
        if matches!(key.code, KeyCode::Tab | KeyCode::Down) {
            self.focus = Focus::Table;
            return DataTableAction::Redraw;
        }
        self.handle_search_input(InputEvent::Key(key))
    }

    fn handle_search_input(&mut self, event: InputEvent) -> DataTableAction {
        match self.search.input(event) {
            LineInputAction::Changed => {
                let query = self.search.text().to_string();
                self.table.set_query(query.clone());
                self.cursor.row = 0;
                self.scroll = 0;
                DataTableAction::SearchChanged(query)
            }
            LineInputAction::Submitted(_) | LineInputAction::Cancelled => {
                self.focus = Focus::Table;
                DataTableAction::Redraw
            }
            LineInputAction::None => DataTableAction::None,
        }
    }

    fn handle_filter_key(&mut self, key: &KeyEvent, column: usize, choice: usize) -> DataTableAction {
        let b = &self.options.bindings;
        let columns = self.table.options().filter_by.len();
        let Some(column_key) = self.table.options().filter_by.get(column).cloned() else {
            self.focus = Focus::Table;
            return DataTableAction::Redraw;
        };
        let choices = self.table.filter_choices(&column_key);

        if key.code == KeyCode::Esc || b.filter.matches(key) {
            self.focus = Focus::Table;
        } else if b.up.matches(key) {
            self.focus = Focus::Filter {
                column,
                choice: choice.saturating_sub(1),
            };
        } else if b.down.matches(key) {
            self.focus = Focus::Filter {
                column,
                choice: (choice + 1).min(choices.len().saturating_sub(1)),
            };
        } else if b.right.matches(key) || key.code == KeyCode::Tab {
            self.focus = Focus::Filter {
                column: (column + 1) % columns,
                choice: 0,
            };
        } else if b.left.matches(key) || key.code == KeyCode::BackTab {
            self.focus = Focus::Filter {
                column: (column + columns - 1) % columns,
                choice: 0,
            };
        } else if b.selection.is_toggle_row(key) || b.activate.matches(key) {
            let Some(value) = choices.get(choice).map(|c| c.value.clone()) else {
                return DataTableAction::None;
            };
            self.table.toggle_filter_value(&column_key, &value);
            self.cursor.row = 0;
            self.scroll = 0;
        } else if key.code == KeyCode::Backspace {
            self.table.clear_filter(&column_key);
        } else {
            return DataTableAction::None;
        }
        DataTableAction::Redraw
    }

    fn handle_menu_key(&mut self, key: &KeyEvent, row: RowId, item: usize) -> DataTableAction {
        let b = &self.options.bindings;
        let items = self
            .table
            .options()
            .action_menu
            .as_ref()
            .map_or(0, |m| m.items.len());

        if key.code == KeyCode::Esc || b.action_menu.matches(key) {
            self.focus = Focus::Table;
            DataTableAction::Redraw
        } else if b.up.matches(key) {
            self.focus = Focus::ActionMenu {
                row,
                item: item.saturating_sub(1),
            };
            DataTableAction::Redraw
        } else if b.down.matches(key) {
            self.focus = Focus::ActionMenu {
                row,
                item: (item + 1).min(items.saturating_sub(1)),
            };
            DataTableAction::Redraw
        } else if b.activate.matches(key) {
            self.select_action(&row, item)
        } else {
            DataTableAction::None
        }
    }

    fn select_action(&mut self, row_id: &RowId, item: usize) -> DataTableAction {
        self.focus = Focus::Table;
        let action = self
            .table
            .options()
            .action_menu
            .as_ref()
            .and_then(|m| m.items.get(item))
            .map(|i| i.id.clone());
        let row = self
            .table
            .view()
            .rows
            .iter()
            .find(|r| &r.id == row_id)
            .map(|r| r.row.clone());
        match (action, row) {
            (Some(action), Some(row)) => DataTableAction::ActionSelected { action, row },
            _ => DataTableAction::Redraw,
        }
    }

    fn open_action_menu(&mut self, position: usize) -> DataTableAction {
        let has_items = self
            .table
            .options()
            .action_menu
            .as_ref()
            .is_some_and(|m| !m.items.is_empty());
        if !has_items {
            return DataTableAction::None;
        }
        let Some((row, _)) = self.row_at(position) else {
            return DataTableAction::None;
        };
        self.focus = Focus::ActionMenu { row, item: 0 };
        DataTableAction::Redraw
    }

    /// Enter or click on a body cell.
    fn activate_cell(&mut self, position: usize, col: usize) -> DataTableAction {
        let Some(key) = self.column_key(col) else {
            return DataTableAction::None;
        };
        let Some((id, row)) = self.row_at(position) else {
            return DataTableAction::None;
        };
        match key.as_str() {
            CHECKBOX_COLUMN => redraw_if(self.toggle_row(&id)),
            ACTIONS_COLUMN => self.open_action_menu(position),
            _ => match self.table.row_click(&row, &key) {
                Some(row) => DataTableAction::RowClicked(row.clone()),
                None => DataTableAction::None,
            },
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> DataTableAction {
        match mouse.kind {
            MouseEventKind::ScrollDown if self.focus == Focus::Table => {
                return self.run(Command::Down);
            }
            MouseEventKind::ScrollUp if self.focus == Focus::Table => {
                return self.run(Command::Up);
            }
            _ => {}
        }
        if !mouse.is_left_click() {
            return DataTableAction::None;
        }
        let pos = Position::new(mouse.x, mouse.y);

        if let Some(popover) = self.hits.popover {
            if !popover.contains(pos) {
                self.focus = Focus::Table;
                return DataTableAction::Redraw;
            }
            // top border
            if mouse.y <= popover.y {
                return DataTableAction::Redraw;
            }
            return self.click_popover_line((mouse.y - popover.y - 1) as usize);
        }

        if self.hits.search.is_some_and(|r| r.contains(pos)) {
            self.focus = Focus::Search;
            return DataTableAction::Redraw;
        }
        if self.focus == Focus::Search {
            self.focus = Focus::Table;
        }

        if self.hits.header.is_some_and(|r| r.contains(pos)) {
            let Some(col) = self.hits.column_at(mouse.x) else {
                return DataTableAction::None;
            };
            return self.click_header(col);
        }

        if let Some(body) = self.hits.body.filter(|r| r.contains(pos)) {
            let line = (mouse.y - body.y) / self.hits.row_height.max(1);
            let position = self.scroll + line as usize;
            let Some(col) = self.hits.column_at(mouse.x) else {
                return DataTableAction::None;
            };
            if self.row_at(position).is_none() {
                return DataTableAction::None;
            }
            self.cursor = Cursor { row: position, col };
            return match self.activate_cell(position, col) {
                DataTableAction::None => DataTableAction::Redraw,
                action => action,
            };
        }
        DataTableAction::None
    }

    fn click_header(&mut self, col: usize) -> DataTableAction {
        let Some(key) = self.column_key(col) else {
            return DataTableAction::None;
        };
        if key == CHECKBOX_COLUMN {
            return self.run(Command::ToggleAll);
        }
        if key == ACTIONS_COLUMN || self.table.options().sort.is_none() {
            return DataTableAction::None;
        }
        if self.table.sort_spec().is_some_and(|s| s.column == key) {
            self.table.toggle_sort_direction();
        } else {
            self.table.set_sort_column(&key);
        }
        DataTableAction::Redraw
    }

    fn click_popover_line(&mut self, line: usize) -> DataTableAction {
        match self.focus.clone() {
            Focus::Filter { column, .. } => {
                self.focus = Focus::Filter {
                    column,
                    choice: line,
                };
                let toggle = self.options.bindings.selection.toggle_row.first().cloned();
                match toggle {
                    Some(key) => self.handle_filter_key(&key, column, line),
                    None => DataTableAction::Redraw,
                }
            }
            Focus::ActionMenu { row, .. } => {
                let items = self
                    .table
                    .options()
                    .action_menu
                    .as_ref()
                    .map(|m| menu_lines(&m.items))
                    .unwrap_or_default();
                match items.get(line).copied().flatten() {
                    Some(item) => self.select_action(&row, item),
                    None => DataTableAction::None,
                }
            }
            Focus::Table | Focus::Search => DataTableAction::None,
        }
    }

    fn move_cursor(&mut self, drow: isize, dcol: isize) -> bool {
        let view = self.table.view();
        let rows = view.rows.len();
        let cols = view.columns.len();
        if rows == 0 || cols == 0 {
            return false;
        }
        let next = Cursor {
            row: self.cursor.row.saturating_add_signed(drow).min(rows - 1),
            col: self.cursor.col.saturating_add_signed(dcol).min(cols - 1),
        };
        if next == self.cursor {
            return false;
        }
        self.cursor = next;
        true
    }

    fn clamp_cursor(&mut self) {
        let view = self.table.view();
        let rows = view.rows.len();
        let cols = view.columns.len();
        self.cursor.row = self.cursor.row.min(rows.saturating_sub(1));
        self.cursor.col = self.cursor.col.min(cols.saturating_sub(1));
        let menu_row_gone = match &self.focus {
            Focus::ActionMenu { row, .. } => !view.rows.iter().any(|r| &r.id == row),
            _ => false,
        };
        if menu_row_gone {
            self.focus = Focus::Table;
        }
    }

    fn row_at(&self, position: usize) -> Option<(RowId, Row)> {
        self.table
            .view()
            .rows
            .get(position)
            .map(|r| (r.id.clone(), r.row.clone()))
    }

    fn column_key(&self, col: usize) -> Option<String> {
        self.table
            .view()
            .columns
            .get(col)
            .map(|c| c.key.to_string())
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.clamp_cursor();
        self.hits = HitMap::default();

        let area = if self.table.options().eliminate_outer_padding || area.width <= 2 {
            area
        } else {
            Rect::new(area.x + 1, area.y, area.width - 2, area.height)
        };
        buf.set_style(area, theme.text_primary);

        let mut y = area.y;
        let bottom = area.bottom();
        let line = |y: u16| Rect::new(area.x, y, area.width, 1);

        let options = self.table.options();
        if let Some(title) = &options.title {
            render::render_str_clipped(area.x, y, area.width, buf, title, theme.title);
            y += 1;
        }
        if let Some(description) = options.description.as_ref().filter(|_| y < bottom) {
            render::render_str_clipped(area.x, y, area.width, buf, description, theme.text_muted);
            y += 1;
        }

        let show_search = options.search.as_ref().is_some_and(|s| !s.hidden);
        if show_search && y < bottom {
            let label = "Search: ";
            let label_style = if self.focus == Focus::Search {
                theme.accent
            } else {
                theme.text_muted
            };
            let w = render::render_str_clipped(area.x, y, area.width, buf, label, label_style);
            let input_area = Rect::new(area.x + w, y, area.width - w, 1);
            self.search.render_ref(input_area, buf);
            self.hits.search = Some(input_area);
            y += 1;
        }

        let options = self.table.options();
        if !options.filter_by.is_empty() && y < bottom {
            let spans = self.filter_bar_spans(theme);
            render::render_spans_clipped(area.x, y, area.width, buf, &spans, theme.text_primary);
            y += 1;
        }

        if (options.sort.is_some() || options.checkboxes.enabled) && y < bottom {
            let spans = self.toolbar_spans(theme);
            render::render_spans_clipped(area.x, y, area.width, buf, &spans, theme.text_primary);
            y += 1;
        }

        let footer_h = u16::from(options.pagination.is_some());
        let help_h = u16::from(self.options.show_help);
        let reserved = footer_h + help_h;
        let table_h = bottom.saturating_sub(y).saturating_sub(reserved);
        if table_h == 0 {
            return;
        }

        let view = self.table.view();
        let widths = column_widths(&view, area.width, self.options.col_gap, self.options.max_col_width);
        let mut x = area.x;
        for (column, width) in view.columns.iter().zip(&widths) {
            self.hits.columns.push(ColumnHit {
                key: column.key.to_string(),
                x,
                width: *width,
            });
            x = x.saturating_add(*width + self.options.col_gap);
        }

        let header = line(y);
        render_header(&view, &self.hits.columns, header, buf, theme);
        self.hits.header = Some(header);

        let body = Rect::new(area.x, y + 1, area.width, table_h - 1);
        let row_height = options.row_height.max(1);
        self.hits.body = Some(body);
        self.hits.row_height = row_height;

        let capacity = (body.height / row_height).max(1) as usize;
        if self.cursor.row < self.scroll {
            self.scroll = self.cursor.row;
        } else if self.cursor.row >= self.scroll + capacity {
            self.scroll = self.cursor.row + 1 - capacity;
        }

        let cursor = (self.focus == Focus::Table).then_some(self.cursor);
        let body_ctx = BodyContext {
            view: &view,
            columns: &self.hits.columns,
            area: body,
            row_height,
            scroll: self.scroll,
            cursor,
            theme,
        };
        render_body(&body_ctx, buf);

        let mut footer_y = body.bottom();
        if let Some(rows_per_page) = view.rows_per_page.filter(|_| footer_h > 0) {
            let text = format!(
                "Rows per page: {rows_per_page}  Page {} of {}  ({} rows)",
                view.page, view.total_pages, view.total_rows
            );
            render::render_str_clipped(area.x, footer_y, area.width, buf, &text, theme.text_muted);
            footer_y += 1;
        }
        if help_h > 0 {
            let help = HelpBar::with_options(
                self.help(),
                HelpBarOptions {
                    style: theme.text_muted,
                    key_style: theme.accent,
                    ..Default::default()
                },
            );
            help.render_ref(line(footer_y), buf);
        }

        self.hits.popover = match &self.focus {
            Focus::Filter { column, choice } => {
                self.render_filter_popover(body, buf, theme, *column, *choice)
            }
            Focus::ActionMenu { row, item } => {
                let at = view.rows.iter().position(|r| &r.id == row).unwrap_or(0);
                let row_y = body.y + (at.saturating_sub(self.scroll) as u16) * row_height;
                self.render_action_menu(body, row_y, buf, theme, *item)
            }
            Focus::Table | Focus::Search => None,
        };
    }

    fn filter_bar_spans(&self, theme: &Theme) -> Vec<Span<'static>> {
        let options = self.table.options();
        let filters = self.table.filters();
        let mut spans = vec![Span::styled("Filters: ", theme.text_muted)];
        for (i, column) in options.filter_by.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" • ", theme.text_muted));
            }
            let label = self.table.headers().label(column).unwrap_or(column);
            let active = filters.active_count(column);
            let style = if active > 0 { theme.accent } else { theme.text_primary };
            spans.push(Span::styled(label.to_string(), style));
            if active > 0 {
                spans.push(Span::styled(format!(" ({active})"), theme.accent));
            }
        }
        spans
    }

    fn toolbar_spans(&self, theme: &Theme) -> Vec<Span<'static>> {
        let options = self.table.options();
        let mut spans = Vec::new();
        if let (Some(_), Some(spec)) = (&options.sort, self.table.sort_spec()) {
            let label = self.table.headers().label(&spec.column).unwrap_or(&spec.column);
            spans.push(Span::styled("Sort by: ", theme.text_muted));
            spans.push(Span::styled(
                format!("{label} {}", spec.direction.arrow()),
                theme.accent,
            ));
        }
        let selected = self.table.selected_count();
        if options.checkboxes.enabled && selected > 0 {
            if !spans.is_empty() {
                spans.push(Span::styled("  ", theme.text_muted));
            }
            spans.push(Span::styled(format!("{selected} selected"), theme.selected));
            if options.checkboxes.bulk_delete {
                let key = self
                    .options
                    .bindings
                    .selection
                    .bulk_delete
                    .first()
                    .and_then(KeyEvent::text_char)
                    .map_or_else(String::new, |c| format!(" ({c} to delete)"));
                spans.push(Span::styled(key, theme.danger));
            }
        }
        spans
    }

    fn render_filter_popover(
        &self,
        body: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        column: usize,
        choice: usize,
    ) -> Option<Rect> {
        let column_key = self.table.options().filter_by.get(column)?;
        let label = self.table.headers().label(column_key).unwrap_or(column_key);
        let choices = self.table.filter_choices(column_key);
        let lines: Vec<(String, bool)> = choices
            .iter()
            .map(|c| {
                let checked = self.table.filters().contains(column_key, &c.value);
                let mark = if checked { "[x]" } else { "[ ]" };
                (format!("{mark} {} ({})", c.value, c.count), checked)
            })
            .collect();
        let title = format!(" Filter: {label} ");
        let content_w = lines
            .iter()
            .map(|(l, _)| render::display_width(l))
            .chain([render::display_width(&title), 12])
            .max()
            .unwrap_or(12) as u16;
        let rect = popover_rect(body, body.x, body.y, content_w, lines.len().max(1) as u16)?;
        let inner = draw_popover(rect, buf, theme, &title);

        if lines.is_empty() {
            render::render_str_clipped(inner.x, inner.y, inner.width, buf, "(no values)", theme.text_muted);
        }
        for (i, (text, checked)) in lines.iter().enumerate().take(inner.height as usize) {
            let y = inner.y + i as u16;
            let mut style = if *checked { theme.accent } else { theme.popover };
            if i == choice {
                style = style.patch(theme.cursor);
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), style);
            }
            render::render_str_clipped(inner.x, y, inner.width, buf, text, style);
        }
        Some(rect)
    }

    fn render_action_menu(
        &self,
        body: Rect,
        row_y: u16,
        buf: &mut Buffer,
        theme: &Theme,
        item: usize,
    ) -> Option<Rect> {
        let menu = self.table.options().action_menu.as_ref()?;
        let lines = menu_lines(&menu.items);
        let labels: Vec<String> = menu.items.iter().map(item_label).collect();
        let content_w = labels
            .iter()
            .map(|l| render::display_width(l))
            .chain([8])
            .max()
            .unwrap_or(8) as u16;
        let x = body.right().saturating_sub(content_w + 2).max(body.x);
        let rect = popover_rect(body, x, row_y.saturating_add(1), content_w, lines.len() as u16)?;
        let inner = draw_popover(rect, buf, theme, " Actions ");

        for (i, entry) in lines.iter().enumerate().take(inner.height as usize) {
            let y = inner.y + i as u16;
            match entry {
                None => {
                    let rule = "─".repeat(inner.width as usize);
                    render::render_str_clipped(inner.x, y, inner.width, buf, &rule, theme.border);
                }
                Some(idx) => {
                    let action = &menu.items[*idx];
                    let mut style = theme.popover.patch(action.style.unwrap_or_default());
                    if *idx == item {
                        style = style.patch(theme.cursor);
                        buf.set_style(Rect::new(inner.x, y, inner.width, 1), style);
                    }
                    render::render_str_clipped(inner.x, y, inner.width, buf, &labels[*idx], style);
                }
            }
        }
        Some(rect)
    }
}

fn redraw_if(changed: bool) -> DataTableAction {
    if changed {
        DataTableAction::Redraw
    } else {
        DataTableAction::None
    }
}

fn item_label(item: &ActionItem) -> String {
    match &item.icon {
        Some(icon) => format!("{icon} {}", item.label),
        None => item.label.clone(),
    }
}

/// Menu rows in display order: `None` is a separator line, `Some(i)` is `items[i]`.
fn menu_lines(items: &[ActionItem]) -> Vec<Option<usize>> {
    let mut lines = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if item.separator && i > 0 {
            lines.push(None);
        }
        lines.push(Some(i));
    }
    lines
}

/// Bordered box of `content_w` x `content_h` inside `bounds`, anchored at `(x, y)` and shifted up
/// or left when it would overflow.
fn popover_rect(bounds: Rect, x: u16, y: u16, content_w: u16, content_h: u16) -> Option<Rect> {
    if bounds.width < 4 || bounds.height < 3 {
        return None;
    }
    let w = (content_w + 2).min(bounds.width);
    let h = (content_h + 2).min(bounds.height);
    let x = x.min(bounds.right() - w).max(bounds.x);
    let y = y.min(bounds.bottom() - h).max(bounds.y);
    Some(Rect::new(x, y, w, h))
}

fn draw_popover(rect: Rect, buf: &mut Buffer, theme: &Theme, title: &str) -> Rect {
    Clear.render(rect, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .style(theme.popover)
        .title(title.to_string());
    let inner = block.inner(rect);
    block.render(rect, buf);
    inner
}

fn column_widths(view: &TableView<'_>, available: u16, gap: u16, max: u16) -> Vec<u16> {
    let mut fixed = Vec::with_capacity(view.columns.len());
    let mut widths: Vec<u16> = view
        .columns
        .iter()
        .map(|column| {
            if column.key == CHECKBOX_COLUMN {
                fixed.push(true);
                return CHECKBOX_WIDTH;
            }
            fixed.push(false);
            let label = render::display_width(column.label) + 2;
            let cells = view
                .rows
                .iter()
                .filter_map(|r| r.cell(column.key))
                .map(|c| render::display_width(&extract_text(c)))
                .max()
                .unwrap_or(0);
            (label.max(cells) as u16).clamp(MIN_COL_WIDTH, max.max(MIN_COL_WIDTH))
        })
        .collect();

    let gaps = gap.saturating_mul(widths.len().saturating_sub(1) as u16);
    let budget = u32::from(available.saturating_sub(gaps));
    let mut total: u32 = widths.iter().map(|w| u32::from(*w)).sum();
    while total > budget {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(i, w)| !fixed[*i] && **w > MIN_COL_WIDTH)
            .max_by_key(|(_, w)| **w)
            .map(|(i, _)| i);
        let Some(i) = widest else {
            break;
        };
        widths[i] -= 1;
        total -= 1;
    }
    widths
}

fn checkbox_mark(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn render_header(
    view: &TableView<'_>,
    columns: &[ColumnHit],
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
) {
    buf.set_style(area, theme.header);
    for (column, hit) in view.columns.iter().zip(columns) {
        if hit.x >= area.right() {
            break;
        }
        let width = hit.width.min(area.right() - hit.x);
        if column.key == CHECKBOX_COLUMN {
            render::render_str_clipped(hit.x, area.y, width, buf, checkbox_mark(view.all_selected), theme.header);
            continue;
        }
        let (label, style) = match column.sort {
            Some(direction) => (
                format!("{} {}", column.label, direction.arrow()),
                theme.header.patch(theme.accent),
            ),
            None => (column.label.to_string(), theme.header),
        };
        let label = render::truncate_with_ellipsis(&label, width as usize);
        render::render_str_clipped(hit.x, area.y, width, buf, &label, style);
    }
}

struct BodyContext<'a> {
    view: &'a TableView<'a>,
    columns: &'a [ColumnHit],
    area: Rect,
    row_height: u16,
    scroll: usize,
    cursor: Option<Cursor>,
    theme: &'a Theme,
}

fn render_body(ctx: &BodyContext<'_>, buf: &mut Buffer) {
    let area = ctx.area;
    if area.height == 0 {
        return;
    }
    let theme = ctx.theme;
    match ctx.view.body {
        BodyState::Loading { skeleton_rows } => {
            let rows = skeleton_rows.min((area.height / ctx.row_height) as usize);
            for i in 0..rows {
                let y = area.y + i as u16 * ctx.row_height;
                for hit in ctx.columns.iter().filter(|h| h.x < area.right()) {
                    let width = hit.width.min(area.right() - hit.x);
                    let bar = SKELETON.repeat(width as usize);
                    render::render_str_clipped(hit.x, y, width, buf, &bar, theme.skeleton);
                }
            }
        }
        BodyState::NoData(message) | BodyState::NotFound(message) => {
            let w = render::display_width(message) as u16;
            let x = area.x + area.width.saturating_sub(w) / 2;
            render::render_str_clipped(x, area.y, area.width, buf, message, theme.text_muted);
        }
        BodyState::Rows => {
            let capacity = (area.height / ctx.row_height) as usize;
            for (line, row) in ctx
                .view
                .rows
                .iter()
                .skip(ctx.scroll)
                .take(capacity)
                .enumerate()
            {
                let y = area.y + line as u16 * ctx.row_height;
                let mut style = theme.text_primary;
                if row.striped {
                    style = style.patch(theme.stripe);
                }
                if row.selected {
                    style = style.patch(theme.selected);
                }
                buf.set_style(Rect::new(area.x, y, area.width, ctx.row_height), style);

                for (col, (column, hit)) in ctx.view.columns.iter().zip(ctx.columns).enumerate() {
                    if hit.x >= area.right() {
                        break;
                    }
                    let width = hit.width.min(area.right() - hit.x);
                    let mut cell_style = style;
                    if column.clickable {
                        cell_style = cell_style.patch(theme.clickable);
                    }
                    if ctx.cursor == Some(Cursor { row: row.position, col }) {
                        cell_style = cell_style.patch(theme.cursor);
                        buf.set_style(Rect::new(hit.x, y, width, 1), cell_style);
                    }
                    if column.key == CHECKBOX_COLUMN {
                        render::render_str_clipped(hit.x, y, width, buf, checkbox_mark(row.selected), cell_style);
                    } else if let Some(content) = row.cell(column.key) {
                        draw_content(hit.x, y, width, buf, content, cell_style);
                    }
                }
            }
        }
    }
}

fn draw_content(x: u16, y: u16, width: u16, buf: &mut Buffer, content: &Content, style: Style) {
    let spans = content.spans(style);
    let text = extract_text(content);
    if render::display_width(&text) <= width as usize {
        render::render_spans_clipped(x, y, width, buf, &spans, style);
    } else {
        let style = spans.first().map_or(style, |s| style.patch(s.style));
        let text = render::truncate_with_ellipsis(&text, width as usize);
        render::render_str_clipped(x, y, width, buf, &text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::ActionMenu;
    use crate::filter::SearchOptions;
    use crate::input::MouseEvent;
    use crate::keymap::key_char;
    use crate::pagination::PaginationOptions;
    use crate::render::row_text;
    use crate::row::Headers;
    use crate::table::CheckboxOptions;
    use crate::table::SortOptions;
    use crate::table::TableOptions;

    fn headers() -> Headers {
        Headers::new()
            .column("charge_id", "Charge ID")
            .column("student_id", "Student ID")
    }

    fn rows() -> Vec<Row> {
        [
            ("chg_001", "stu_101"),
            ("chg_002", "stu_102"),
            ("chg_003", "stu_101"),
            ("chg_004", "stu_103"),
            ("chg_005", "stu_104"),
        ]
        .into_iter()
        .map(|(c, s)| Row::new().with_id(c).cell("charge_id", c).cell("student_id", s))
        .collect()
    }

    fn view(options: TableOptions) -> DataTableView {
        let mut table = DataTable::new(headers(), options);
        table.set_rows(rows());
        DataTableView::new(table)
    }

    fn full_options() -> TableOptions {
        TableOptions {
            search: Some(SearchOptions::new("student_id")),
            filter_by: vec!["student_id".into()],
            sort: Some(SortOptions::default()),
            pagination: Some(PaginationOptions::rows_per_page(2)),
            checkboxes: CheckboxOptions {
                enabled: true,
                bulk_delete: true,
            },
            action_menu: Some(ActionMenu::default()),
            clickable_columns: vec!["student_id".into()],
            ..Default::default()
        }
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    fn ch(c: char) -> InputEvent {
        InputEvent::Key(key_char(c))
    }

    fn screen(v: &mut DataTableView, w: u16, h: u16) -> Vec<String> {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        v.render(area, &mut buf, &Theme::default());
        (0..h).map(|y| row_text(&buf, y)).collect()
    }

    #[test]
    fn renders_first_page_descending_with_footer() {
        let mut v = view(full_options());
        let lines = screen(&mut v, 60, 12);
        let text = lines.join("\n");
        assert!(text.contains("Charge ID ↓"));
        assert!(text.contains("Page 1 of 3"));
        let first = lines.iter().position(|l| l.contains("chg_005")).unwrap();
        let second = lines.iter().position(|l| l.contains("chg_004")).unwrap();
        assert!(first < second);
        assert!(!text.contains("chg_003"));
    }

    #[test]
    fn enter_on_clickable_column_emits_row_click() {
        let mut v = view(full_options());
        // columns: checkbox, charge_id, student_id, actions
        v.handle_event(key(KeyCode::Right));
        assert_eq!(v.handle_event(key(KeyCode::Enter)), DataTableAction::None);
        v.handle_event(key(KeyCode::Right));
        match v.handle_event(key(KeyCode::Enter)) {
            DataTableAction::RowClicked(row) => assert_eq!(row.text("charge_id"), "chg_005"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn action_menu_selects_without_row_click() {
        let mut v = view(full_options());
        v.handle_event(key(KeyCode::Down));
        assert_eq!(v.handle_event(ch('m')), DataTableAction::Redraw);
        assert!(matches!(v.focus(), Focus::ActionMenu { .. }));
        match v.handle_event(key(KeyCode::Enter)) {
            DataTableAction::ActionSelected { action, row } => {
                assert_eq!(action, "delete");
                assert_eq!(row.text("charge_id"), "chg_004");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(v.focus(), &Focus::Table);
    }

    #[test]
    fn search_typing_filters_and_resets_page() {
        let mut v = view(full_options());
        v.handle_event(ch(']'));
        assert_eq!(v.table().view().page, 2);
        v.handle_event(ch('/'));
        assert!(v.is_editing());
        let mut last = DataTableAction::None;
        for c in "stu_101".chars() {
            last = v.handle_event(ch(c));
        }
        assert_eq!(last, DataTableAction::SearchChanged("stu_101".into()));
        let view = v.table().view();
        assert_eq!(view.page, 1);
        let ids: Vec<String> = view.rows.iter().map(|r| r.row.text("charge_id")).collect();
        assert_eq!(ids, vec!["chg_003", "chg_001"]);
    }

    #[test]
    fn bulk_delete_hands_over_selection() {
        let mut v = view(full_options());
        assert_eq!(v.handle_event(ch('D')), DataTableAction::None);
        v.handle_event(ch(' '));
        v.handle_event(key(KeyCode::Down));
        v.handle_event(ch(' '));
        match v.handle_event(ch('D')) {
            DataTableAction::BulkDelete(rows) => {
                let ids: Vec<String> = rows.iter().map(|r| r.text("charge_id")).collect();
                assert_eq!(ids, vec!["chg_005", "chg_004"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(v.table().selected_count(), 0);
    }

    #[test]
    fn filter_popover_toggles_values() {
        let mut v = view(full_options());
        v.handle_event(ch('f'));
        assert_eq!(
            v.focus(),
            &Focus::Filter {
                column: 0,
                choice: 0
            }
        );
        v.handle_event(ch(' '));
        assert!(v.table().filters().contains("student_id", "stu_101"));
        assert_eq!(v.table().view().total_rows, 2);
        v.handle_event(key(KeyCode::Esc));
        assert_eq!(v.focus(), &Focus::Table);
    }

    #[test]
    fn clicking_checkbox_cell_toggles_row() {
        let mut v = view(full_options());
        let lines = screen(&mut v, 60, 12);
        let y = lines.iter().position(|l| l.contains("chg_005")).unwrap() as u16;
        let action = v.handle_event(InputEvent::Mouse(MouseEvent::left_click(1, y)));
        assert_eq!(action, DataTableAction::Redraw);
        assert!(v.table().selection().is_selected(&RowId::Explicit("chg_005".into())));
        let lines = screen(&mut v, 60, 12);
        assert!(lines[y as usize].contains("[x]"));
    }

    #[test]
    fn popover_border_click_selects_nothing() {
        let mut v = view(full_options());
        v.handle_event(ch('f'));
        screen(&mut v, 60, 12);
        let popover = v.hits.popover.unwrap();
        let border = InputEvent::Mouse(MouseEvent::left_click(popover.x + 2, popover.y));
        assert_eq!(v.handle_event(border), DataTableAction::Redraw);
        assert!(v.table().filters().is_empty());

        let first = InputEvent::Mouse(MouseEvent::left_click(popover.x + 2, popover.y + 1));
        v.handle_event(first);
        assert!(v.table().filters().contains("student_id", "stu_101"));
    }

    #[test]
    fn toggling_unknown_row_reports_no_change() {
        let mut v = view(full_options());
        assert!(!v.toggle_row(&RowId::Explicit("chg_999".into())));
        assert!(v.toggle_row(&RowId::Explicit("chg_001".into())));
        assert_eq!(v.table().selected_count(), 1);
    }

    #[test]
    fn empty_and_not_found_messages() {
        let mut table = DataTable::new(headers(), full_options());
        table.set_rows(Vec::new());
        let mut v = DataTableView::new(table);
        assert!(screen(&mut v, 60, 12).join("\n").contains("No data available"));

        v.set_rows(rows());
        v.set_query("nobody");
        assert!(screen(&mut v, 60, 12).join("\n").contains("No results found"));
    }

    #[test]
    fn loading_draws_skeleton_rows() {
        let mut v = view(TableOptions::default());
        v.table_mut().set_loading(true);
        let lines = screen(&mut v, 40, 10);
        let skeleton = lines.iter().filter(|l| l.contains(SKELETON)).count();
        assert_eq!(skeleton, 5);
    }

    #[test]
    fn column_widths_shrink_to_fit() {
        let table = {
            let mut t = DataTable::new(headers(), TableOptions::default());
            t.set_rows(rows());
            t
        };
        let view = table.view();
        let widths = column_widths(&view, 12, 2, 40);
        assert!(widths.iter().sum::<u16>() + 2 <= 12);
        assert!(widths.iter().all(|w| *w >= MIN_COL_WIDTH));
    }
}
