use charge_console::app::App;
use charge_console::config::ConsoleConfig;
use charge_console::paths;
use charge_console::store::ChargeStore;
use charge_console::store::FileStorage;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use log::LevelFilter;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui_datatable::crossterm_input::input_event_from_crossterm;
use simplelog::Config;
use simplelog::WriteLogger;
use std::fs;
use std::fs::File;
use std::io;
use std::time::Duration;

fn main() -> io::Result<()> {
    let (config, config_error) = match ConsoleConfig::load_default() {
        Ok(config) => (config, None),
        Err(err) => (ConsoleConfig::default(), Some(err)),
    };
    init_logging(config.log_level().unwrap_or(LevelFilter::Info));
    if let Some(err) = config_error {
        log::warn!("using default config: {err}");
    }

    let data_dir = config.data_dir();
    log::info!("charge data in {}", data_dir.display());
    let store = ChargeStore::open(FileStorage::new(data_dir));
    let mut app = App::new(store, &config);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if config.mouse {
        crossterm::execute!(stdout, EnableMouseCapture)?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    if config.mouse {
        crossterm::execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    crossterm::execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    if let Err(err) = &res {
        log::error!("terminal error: {err}");
    }
    res
}

fn init_logging(level: LevelFilter) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    if let Ok(file) = File::create(&path) {
        let _ = WriteLogger::init(level, Config::default(), file);
    }
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App<FileStorage>) -> io::Result<()> {
    let mut redraw = true;
    loop {
        if redraw {
            terminal.draw(|f| {
                let area = f.area();
                app.render(area, f.buffer_mut());
                if let Some((x, y)) = app.cursor_pos() {
                    f.set_cursor_position((x, y));
                }
            })?;
            redraw = false;
        }
        if app.should_quit() {
            return Ok(());
        }

        if !crossterm::event::poll(Duration::from_millis(100))? {
            continue;
        }
        match crossterm::event::read()? {
            crossterm::event::Event::Resize(_, _) => redraw = true,
            ev => {
                if let Some(ev) = input_event_from_crossterm(ev) {
                    redraw |= app.handle_event(ev);
                }
            }
        }
    }
}
