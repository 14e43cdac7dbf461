use crate::charge::Charge;
use crate::charge::ChargeStatus;
use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use ratatui_datatable::help::HelpBar;
use ratatui_datatable::input::InputEvent;
use ratatui_datatable::input::KeyCode;
use ratatui_datatable::keymap::Binding;
use ratatui_datatable::keymap::key;
use ratatui_datatable::keymap::key_ctrl;
use ratatui_datatable::line_input::LineInput;
use ratatui_datatable::line_input::LineInputAction;
use ratatui_datatable::line_input::LineInputOptions;
use ratatui_datatable::render;
use ratatui_datatable::theme::Theme;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

const LABEL_WIDTH: u16 = 20;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    ChargeId,
    ChargeAmount,
    PaidAmount,
    StudentId,
    DateCharged,
    Status,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::ChargeId,
        Field::ChargeAmount,
        Field::PaidAmount,
        Field::StudentId,
        Field::DateCharged,
        Field::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::ChargeId => "Charge ID",
            Field::ChargeAmount => "Charge Amount (RM)",
            Field::PaidAmount => "Paid Amount (RM)",
            Field::StudentId => "Student ID",
            Field::DateCharged => "Date Charged",
            Field::Status => "Status",
        }
    }

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{0} must be a number")]
    NotANumber(Field),
    #[error("Amount must be at least 1")]
    AmountTooSmall,
    #[error("Paid amount cannot be negative")]
    NegativePaid,
    #[error("Paid amount cannot exceed the charge amount")]
    Overpaid,
    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDate,
    #[error("Status must be paid, unpaid or partial")]
    InvalidStatus,
    #[error("Charge ID {0} already exists")]
    DuplicateId(String),
}

/// Per-field validation failures, at most one per field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("{} field(s) need attention", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<Field, ValidationError>,
}

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.errors.iter().map(|(f, e)| (*f, e))
    }

    fn insert(&mut self, field: Field, error: ValidationError) {
        self.errors.entry(field).or_insert(error);
    }
}

/// Raw text of the form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChargeDraft {
    pub charge_id: String,
    pub charge_amount: String,
    pub paid_amount: String,
    pub student_id: String,
    pub date_charged: String,
    pub status: String,
}

impl ChargeDraft {
    pub fn from_charge(charge: &Charge) -> Self {
        Self {
            charge_id: charge.charge_id.clone(),
            charge_amount: charge.charge_amount.to_string(),
            paid_amount: charge.paid_amount.to_string(),
            student_id: charge.student_id.clone(),
            date_charged: charge.date_charged.format(DATE_FORMAT).to_string(),
            status: charge.status.as_str().to_string(),
        }
    }

    /// Parses the draft into a charge, collecting every field error.
    pub fn validate(&self) -> Result<Charge, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let charge_id = required(&self.charge_id, Field::ChargeId, &mut errors);
        let student_id = required(&self.student_id, Field::StudentId, &mut errors);

        let charge_amount = number(&self.charge_amount, Field::ChargeAmount, &mut errors);
        if charge_amount.is_some_and(|v| v < 1.0) {
            errors.insert(Field::ChargeAmount, ValidationError::AmountTooSmall);
        }
        let paid_amount = number(&self.paid_amount, Field::PaidAmount, &mut errors);
        if paid_amount.is_some_and(|v| v < 0.0) {
            errors.insert(Field::PaidAmount, ValidationError::NegativePaid);
        }
        if let (Some(charged), Some(paid)) = (charge_amount, paid_amount) {
            if paid > charged {
                errors.insert(Field::PaidAmount, ValidationError::Overpaid);
            }
        }

        let date = self.date_charged.trim();
        let date_charged = if date.is_empty() {
            errors.insert(Field::DateCharged, ValidationError::Required(Field::DateCharged));
            None
        } else {
            NaiveDate::parse_from_str(date, DATE_FORMAT)
                .map_err(|_| errors.insert(Field::DateCharged, ValidationError::InvalidDate))
                .ok()
        };

        let status = ChargeStatus::parse(&self.status);
        if status.is_none() {
            errors.insert(Field::Status, ValidationError::InvalidStatus);
        }

        match (
            charge_id,
            charge_amount,
            paid_amount,
            student_id,
            date_charged,
            status,
        ) {
            (
                Some(charge_id),
                Some(charge_amount),
                Some(paid_amount),
                Some(student_id),
                Some(date_charged),
                Some(status),
            ) if errors.is_empty() => Ok(Charge {
                charge_id,
                charge_amount,
                paid_amount,
                student_id,
                date_charged,
                status,
            }),
            _ => Err(errors),
        }
    }
}

fn required(value: &str, field: Field, errors: &mut ValidationErrors) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, ValidationError::Required(field));
        return None;
    }
    Some(value.to_string())
}

fn number(value: &str, field: Field, errors: &mut ValidationErrors) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, ValidationError::Required(field));
        return None;
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            errors.insert(field, ValidationError::NotANumber(field));
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { charge_id: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormAction {
    None,
    Redraw,
    /// The draft validated. In edit mode `charge.charge_id` is the edited id.
    Submit(Charge),
    /// Delete was requested from the edit form.
    Delete(String),
    Cancel,
}

/// Create/edit form for one charge.
#[derive(Clone, Debug)]
pub struct ChargeForm {
    mode: FormMode,
    inputs: [LineInput; 5],
    status: ChargeStatus,
    focus: Field,
    errors: ValidationErrors,
    cursor: Option<(u16, u16)>,
}

impl ChargeForm {
    /// Blank form dated `today`, with status `unpaid`.
    pub fn create(today: NaiveDate) -> Self {
        let draft = ChargeDraft {
            paid_amount: "0".to_string(),
            date_charged: today.format(DATE_FORMAT).to_string(),
            status: ChargeStatus::Unpaid.as_str().to_string(),
            ..Default::default()
        };
        Self::from_draft(FormMode::Create, &draft, ChargeStatus::Unpaid)
    }

    pub fn edit(charge: &Charge) -> Self {
        let mut form = Self::from_draft(
            FormMode::Edit {
                charge_id: charge.charge_id.clone(),
            },
            &ChargeDraft::from_charge(charge),
            charge.status,
        );
        form.focus = Field::ChargeAmount;
        form
    }

    fn from_draft(mode: FormMode, draft: &ChargeDraft, status: ChargeStatus) -> Self {
        let input = |text: &str, placeholder: &str| {
            let mut input = LineInput::with_options(LineInputOptions {
                placeholder: Some(placeholder.to_string()),
                ..Default::default()
            });
            input.set_text(text);
            input
        };
        Self {
            mode,
            inputs: [
                input(&draft.charge_id, "chg_006"),
                input(&draft.charge_amount, "0.00"),
                input(&draft.paid_amount, "0.00"),
                input(&draft.student_id, "stu_101"),
                input(&draft.date_charged, "YYYY-MM-DD"),
            ],
            status,
            focus: Field::ChargeId,
            errors: ValidationErrors::default(),
            cursor: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn draft(&self) -> ChargeDraft {
        ChargeDraft {
            charge_id: self.inputs[0].text().to_string(),
            charge_amount: self.inputs[1].text().to_string(),
            paid_amount: self.inputs[2].text().to_string(),
            student_id: self.inputs[3].text().to_string(),
            date_charged: self.inputs[4].text().to_string(),
            status: self.status.as_str().to_string(),
        }
    }

    /// Attaches an error found outside the form, e.g. a duplicate id.
    pub fn reject(&mut self, field: Field, error: ValidationError) {
        self.errors.errors.insert(field, error);
        self.focus = field;
    }

    /// Terminal cursor for the focused text field, as of the last render.
    pub fn cursor_pos(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    pub fn help(&self) -> Vec<Binding> {
        let mut help = vec![
            Binding::new("tab", "next", vec![key(KeyCode::Tab), key(KeyCode::Down)]),
            Binding::new("enter", "save", vec![key(KeyCode::Enter)]),
        ];
        if self.focus == Field::Status {
            help.push(Binding::new(
                "←/→",
                "status",
                vec![key(KeyCode::Left), key(KeyCode::Right)],
            ));
        }
        if matches!(self.mode, FormMode::Edit { .. }) {
            help.push(Binding::new("ctrl+d", "delete", vec![key_ctrl('d')]));
        }
        help.push(Binding::new("esc", "cancel", vec![key(KeyCode::Esc)]));
        help
    }

    pub fn handle_event(&mut self, event: InputEvent) -> FormAction {
        let key = match event {
            InputEvent::Key(key) => key,
            InputEvent::Paste(_) => return self.edit_focused(event),
            InputEvent::Mouse(_) => return FormAction::None,
        };
        if key.modifiers.ctrl && key.code == KeyCode::Char('d') {
            return match &self.mode {
                FormMode::Edit { charge_id } => FormAction::Delete(charge_id.clone()),
                FormMode::Create => FormAction::None,
            };
        }
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Left | KeyCode::Right if self.focus == Field::Status => {
                self.status = self.status.cycle(key.code == KeyCode::Right);
                self.errors.errors.remove(&Field::Status);
                FormAction::Redraw
            }
            _ => self.edit_focused(InputEvent::Key(key)),
        }
    }

    fn submit(&mut self) -> FormAction {
        let mut draft = self.draft();
        if let FormMode::Edit { charge_id } = &self.mode {
            draft.charge_id = charge_id.clone();
        }
        match draft.validate() {
            Ok(charge) => {
                self.errors = ValidationErrors::default();
                FormAction::Submit(charge)
            }
            Err(errors) => {
                log::debug!("charge form rejected: {errors}");
                if let Some((field, _)) = errors.iter().next() {
                    self.focus = field;
                }
                self.errors = errors;
                FormAction::Redraw
            }
        }
    }

    fn editable(&self, field: Field) -> bool {
        !(field == Field::ChargeId && matches!(self.mode, FormMode::Edit { .. }))
    }

    fn move_focus(&mut self, forward: bool) -> FormAction {
        let len = Field::ALL.len();
        let mut i = self.focus.index();
        loop {
            i = if forward { (i + 1) % len } else { (i + len - 1) % len };
            if self.editable(Field::ALL[i]) {
                break;
            }
        }
        self.focus = Field::ALL[i];
        FormAction::Redraw
    }

    fn edit_focused(&mut self, event: InputEvent) -> FormAction {
        if self.focus == Field::Status || !self.editable(self.focus) {
            return FormAction::None;
        }
        let field = self.focus;
        match self.inputs[field.index()].input(event) {
            LineInputAction::Changed => {
                self.errors.errors.remove(&field);
                FormAction::Redraw
            }
            LineInputAction::None
            | LineInputAction::Submitted(_)
            | LineInputAction::Cancelled => FormAction::None,
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.cursor = None;
        let title = match &self.mode {
            FormMode::Create => " New Charge ".to_string(),
            FormMode::Edit { charge_id } => format!(" Edit Charge {charge_id} "),
        };
        let rect = centered(area, 64, Field::ALL.len() as u16 * 2 + 4);
        Clear.render(rect, buf);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(rect);
        block.render(rect, buf);
        if inner.width <= LABEL_WIDTH || inner.height == 0 {
            return;
        }

        let value_x = inner.x + LABEL_WIDTH;
        let value_w = inner.width - LABEL_WIDTH;
        let bottom = inner.y + inner.height;
        let mut y = inner.y;
        for field in Field::ALL {
            if y >= bottom {
                return;
            }
            let focused = field == self.focus;
            let label_style = if focused { theme.accent } else { theme.text_muted };
            render::render_str_clipped(inner.x, y, LABEL_WIDTH, buf, field.label(), label_style);

            if field == Field::Status {
                let style = if focused {
                    self.status.badge_style().patch(theme.cursor)
                } else {
                    self.status.badge_style()
                };
                let text = format!("< {} >", self.status.badge_label());
                render::render_str_clipped(value_x, y, value_w, buf, &text, style);
            } else {
                let value_area = Rect::new(value_x, y, value_w, 1);
                let input = &mut self.inputs[field.index()];
                input.render_ref(value_area, buf);
                if !self.editable(field) {
                    buf.set_style(value_area, theme.text_muted);
                } else if focused {
                    self.cursor = self.inputs[field.index()].cursor_pos(value_area);
                }
            }

            y += 1;
            if let Some(error) = self.errors.get(field) {
                if y < bottom {
                    render::render_str_clipped(
                        value_x,
                        y,
                        value_w,
                        buf,
                        &error.to_string(),
                        theme.danger,
                    );
                }
            }
            y += 1;
        }

        let help_y = bottom.saturating_sub(1);
        if help_y >= y {
            HelpBar::new(self.help()).render_ref(Rect::new(inner.x, help_y, inner.width, 1), buf);
        }
    }
}

/// `width` x `height` rectangle centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charge::seed_charges;
    use ratatui_datatable::input::KeyEvent;

    fn draft() -> ChargeDraft {
        ChargeDraft {
            charge_id: "chg_006".into(),
            charge_amount: "75".into(),
            paid_amount: "0".into(),
            student_id: "stu_105".into(),
            date_charged: "2025-02-01".into(),
            status: "unpaid".into(),
        }
    }

    fn type_text(form: &mut ChargeForm, text: &str) {
        for ch in text.chars() {
            form.handle_event(KeyEvent::new(KeyCode::Char(ch)).into());
        }
    }

    #[test]
    fn valid_draft_parses() {
        let charge = draft().validate().unwrap();
        assert_eq!(charge.charge_amount, 75.0);
        assert_eq!(charge.status, ChargeStatus::Unpaid);
    }

    #[test]
    fn amount_below_one_is_rejected() {
        let errors = ChargeDraft {
            charge_amount: "0.5".into(),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.get(Field::ChargeAmount).map(ToString::to_string),
            Some("Amount must be at least 1".to_string())
        );
    }

    #[test]
    fn every_bad_field_is_reported() {
        let errors = ChargeDraft {
            charge_id: " ".into(),
            charge_amount: "abc".into(),
            date_charged: "01/02/2025".into(),
            status: "refunded".into(),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(Field::ChargeId),
            Some(&ValidationError::Required(Field::ChargeId))
        );
        assert_eq!(
            errors.get(Field::ChargeAmount),
            Some(&ValidationError::NotANumber(Field::ChargeAmount))
        );
        assert_eq!(errors.get(Field::DateCharged), Some(&ValidationError::InvalidDate));
        assert_eq!(errors.get(Field::Status), Some(&ValidationError::InvalidStatus));
    }

    #[test]
    fn overpayment_is_rejected() {
        let errors = ChargeDraft {
            paid_amount: "80".into(),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get(Field::PaidAmount), Some(&ValidationError::Overpaid));
    }

    #[test]
    fn create_form_submits_typed_values() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let mut form = ChargeForm::create(today);
        type_text(&mut form, "chg_009");
        form.handle_event(KeyCode::Tab.into());
        type_text(&mut form, "42");
        form.handle_event(KeyCode::Tab.into());
        form.handle_event(KeyCode::Tab.into());
        type_text(&mut form, "stu_200");

        let FormAction::Submit(charge) = form.handle_event(KeyCode::Enter.into()) else {
            panic!("expected submit");
        };
        assert_eq!(charge.charge_id, "chg_009");
        assert_eq!(charge.charge_amount, 42.0);
        assert_eq!(charge.paid_amount, 0.0);
        assert_eq!(charge.date_charged, today);
    }

    #[test]
    fn edit_form_skips_id_and_cycles_status() {
        let mut form = ChargeForm::edit(&seed_charges()[0]);
        assert_eq!(form.focus(), Field::ChargeAmount);
        form.handle_event(KeyCode::BackTab.into());
        assert_eq!(form.focus(), Field::Status);
        form.handle_event(KeyCode::Right.into());
        let FormAction::Submit(charge) = form.handle_event(KeyCode::Enter.into()) else {
            panic!("expected submit");
        };
        assert_eq!(charge.charge_id, "chg_001");
        assert_eq!(charge.status, ChargeStatus::Partial);
    }

    #[test]
    fn invalid_submit_moves_focus_to_first_error() {
        let mut form = ChargeForm::create(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(form.handle_event(KeyCode::Enter.into()), FormAction::Redraw);
        assert_eq!(form.focus(), Field::ChargeId);
        assert!(form.errors().get(Field::ChargeAmount).is_some());
    }

    #[test]
    fn ctrl_d_deletes_only_in_edit_mode() {
        let ctrl_d = || InputEvent::Key(key_ctrl('d'));
        let mut form = ChargeForm::edit(&seed_charges()[1]);
        assert_eq!(form.handle_event(ctrl_d()), FormAction::Delete("chg_002".into()));
        let mut form = ChargeForm::create(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(form.handle_event(ctrl_d()), FormAction::None);
        assert_eq!(form.handle_event(KeyCode::Esc.into()), FormAction::Cancel);
    }

    #[test]
    fn renders_labels_and_errors() {
        let area = Rect::new(0, 0, 70, 20);
        let mut buf = Buffer::empty(area);
        let mut form = ChargeForm::create(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        form.handle_event(KeyCode::Enter.into());
        form.render(area, &mut buf, &Theme::default());
        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("New Charge"));
        assert!(text.contains("Charge ID is required"));
        assert!(text.contains("Charge Amount (RM) is required"));
        assert!(form.cursor_pos().is_some());
    }
}
