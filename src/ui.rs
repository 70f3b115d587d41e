// src/ui.rs

pub mod chat;
pub mod footer;
pub mod sidebar;

use crate::app::{App, AppEvent};
use crate::config::Config;
use crate::constants::SIDEBAR_WIDTH;
use crate::errors::{ReviewBotError, ReviewBotResult};
use crate::key_handlers::handle_event;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Runs the terminal UI until the user quits.
pub async fn run_ui(config: Config) -> ReviewBotResult<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>(100);
    let mut app = App::new(&config, tx.clone())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    spawn_input_reader(tx);
    let res = run_app(&mut terminal, &mut app, rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    app.shutdown();
    res
}

/// Forwards terminal input and ticks to the UI loop until it goes away.
fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    tokio::task::spawn_blocking(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
            match event::poll(timeout) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(AppEvent::Input(ev)).is_err() {
                            return;
                        }
                    }
                    Err(e) => log::warn!("Failed to read terminal event: {}", e),
                },
                Ok(false) => {}
                Err(e) => {
                    log::error!("Terminal polling failed: {}", e);
                    return;
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                if tx.blocking_send(AppEvent::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });
}

/// Main loop of the application.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut rx: mpsc::Receiver<AppEvent>,
) -> ReviewBotResult<()> {
    loop {
        terminal
            .draw(|f| draw(f, app))
            .map_err(|e| ReviewBotError::terminal_error(format!("Failed to draw: {}", e)))?;

        let Some(event) = rx.recv().await else {
            break;
        };

        match event {
            AppEvent::Input(ev) => handle_event(ev, app),
            AppEvent::Tick => app.tick(),
            AppEvent::Reply(request, result) => {
                let outcome = app.settle(request, result);
                log::debug!("Request {} settled: {:?}", request.get(), outcome);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Renders the whole screen: sidebar, chat, footer.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)].as_ref())
        .split(f.area());

    let main = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(columns[1]);

    sidebar::draw_sidebar(f, columns[0], app);
    chat::draw_chat(f, main[0], app);
    footer::draw_footer(f, main[1], app);
}
