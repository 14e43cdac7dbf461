use ratatui::style::Style;

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub title: Style,
    pub header: Style,
    /// Background of odd rows when striping is on.
    pub stripe: Style,
    pub cursor: Style,
    pub selected: Style,
    pub clickable: Style,
    pub skeleton: Style,
    pub border: Style,
    pub popover: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            danger: Style::default().red(),
            title: Style::default().bold(),
            header: Style::default().bold().underlined(),
            stripe: Style::default().on_black(),
            cursor: Style::default().reversed(),
            selected: Style::default().yellow(),
            clickable: Style::default().blue().underlined(),
            skeleton: Style::default().dark_gray(),
            border: Style::default().dark_gray(),
            popover: Style::default().on_dark_gray(),
        }
    }
}
