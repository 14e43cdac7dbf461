use chrono::NaiveDate;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui_datatable::content::Content;
use ratatui_datatable::row::Headers;
use ratatui_datatable::row::Row;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

pub const CURRENCY: &str = "MYR";

const AMBER: Color = Color::Rgb(245, 158, 11);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    Paid,
    #[default]
    Unpaid,
    Partial,
    /// Anything a stored record carries that is not one of the known states.
    #[serde(other)]
    Unknown,
}

impl ChargeStatus {
    /// The states a user can pick in the form.
    pub const CHOICES: [ChargeStatus; 3] = [
        ChargeStatus::Unpaid,
        ChargeStatus::Partial,
        ChargeStatus::Paid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChargeStatus::Paid => "paid",
            ChargeStatus::Unpaid => "unpaid",
            ChargeStatus::Partial => "partial",
            ChargeStatus::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Some(ChargeStatus::Paid),
            "unpaid" => Some(ChargeStatus::Unpaid),
            "partial" => Some(ChargeStatus::Partial),
            _ => None,
        }
    }

    /// Caption shown in the status column.
    pub fn badge_label(self) -> String {
        match self {
            ChargeStatus::Unknown => "unknown".to_string(),
            known => known.as_str().to_ascii_uppercase(),
        }
    }

    pub fn badge_style(self) -> Style {
        match self {
            ChargeStatus::Paid => Style::default().fg(Color::Green).bold(),
            ChargeStatus::Unpaid => Style::default().fg(Color::Red).bold(),
            ChargeStatus::Partial => Style::default().fg(AMBER).bold(),
            ChargeStatus::Unknown => Style::default().dark_gray(),
        }
    }

    /// Next pickable state, wrapping. `Unknown` moves to the first choice.
    pub fn cycle(self, forward: bool) -> Self {
        let len = Self::CHOICES.len();
        match Self::CHOICES.iter().position(|s| *s == self) {
            Some(i) if forward => Self::CHOICES[(i + 1) % len],
            Some(i) => Self::CHOICES[(i + len - 1) % len],
            None => Self::CHOICES[0],
        }
    }
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One charge billed to a student.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub charge_id: String,
    pub charge_amount: f64,
    pub paid_amount: f64,
    pub student_id: String,
    pub date_charged: NaiveDate,
    pub status: ChargeStatus,
}

/// Partial update: every `Some` field overwrites the stored one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChargePatch {
    pub charge_amount: Option<f64>,
    pub paid_amount: Option<f64>,
    pub student_id: Option<String>,
    pub date_charged: Option<NaiveDate>,
    pub status: Option<ChargeStatus>,
}

impl ChargePatch {
    /// A patch that rewrites every editable field of `charge`.
    pub fn from_charge(charge: &Charge) -> Self {
        Self {
            charge_amount: Some(charge.charge_amount),
            paid_amount: Some(charge.paid_amount),
            student_id: Some(charge.student_id.clone()),
            date_charged: Some(charge.date_charged),
            status: Some(charge.status),
        }
    }

    pub fn apply(&self, charge: &mut Charge) {
        if let Some(v) = self.charge_amount {
            charge.charge_amount = v;
        }
        if let Some(v) = self.paid_amount {
            charge.paid_amount = v;
        }
        if let Some(v) = &self.student_id {
            charge.student_id = v.clone();
        }
        if let Some(v) = self.date_charged {
            charge.date_charged = v;
        }
        if let Some(v) = self.status {
            charge.status = v;
        }
    }
}

fn seed(
    charge_id: &str,
    charge_amount: f64,
    paid_amount: f64,
    student_id: &str,
    (y, m, d): (i32, u32, u32),
    status: ChargeStatus,
) -> Charge {
    Charge {
        charge_id: charge_id.to_string(),
        charge_amount,
        paid_amount,
        student_id: student_id.to_string(),
        date_charged: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        status,
    }
}

/// The sample records the store falls back to and resets to.
pub fn seed_charges() -> Vec<Charge> {
    vec![
        seed("chg_001", 120.0, 0.0, "stu_101", (2025, 1, 5), ChargeStatus::Unpaid),
        seed("chg_002", 80.5, 80.5, "stu_102", (2025, 1, 7), ChargeStatus::Paid),
        seed("chg_003", 150.0, 50.0, "stu_101", (2025, 1, 12), ChargeStatus::Partial),
        seed("chg_004", 95.0, 0.0, "stu_103", (2025, 1, 15), ChargeStatus::Unpaid),
        seed("chg_005", 200.0, 200.0, "stu_104", (2025, 1, 20), ChargeStatus::Paid),
    ]
}

/// `1234.5` -> `"MYR 1,234.50"`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{CURRENCY} {grouped}.{:02}", cents % 100)
}

pub fn charge_headers() -> Headers {
    Headers::new()
        .column("charge_id", "Charge ID")
        .column("charge_amount", "Charge Amount (RM)")
        .column("paid_amount", "Paid Amount (RM)")
        .column("student_id", "Student ID")
        .column("date_charged", "Date Charged")
        .column("status", "Status")
}

/// Table row for one charge, keyed by its charge id.
pub fn charge_row(charge: &Charge) -> Row {
    Row::new()
        .with_id(charge.charge_id.clone())
        .cell(
            "charge_id",
            Content::node("span", Style::default().bold(), charge.charge_id.clone()),
        )
        .cell(
            "charge_amount",
            Content::node(
                "span",
                Style::default(),
                format_currency(charge.charge_amount),
            ),
        )
        .cell(
            "paid_amount",
            Content::node("span", Style::default(), format_currency(charge.paid_amount)),
        )
        .cell(
            "student_id",
            Content::node("span", Style::default(), charge.student_id.clone()),
        )
        .cell(
            "date_charged",
            Content::node(
                "span",
                Style::default(),
                charge.date_charged.format("%Y-%m-%d").to_string(),
            ),
        )
        .cell(
            "status",
            Content::node(
                "badge",
                charge.status.badge_style(),
                charge.status.badge_label(),
            ),
        )
}

pub fn charge_rows(charges: &[Charge]) -> Vec<Row> {
    charges.iter().map(charge_row).collect()
}
