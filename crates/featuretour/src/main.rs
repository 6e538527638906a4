//! featuretour - a terminal tour of optimistic updates, tabbed demo viewers
//! and error boundaries.

mod cli;
mod logging;

use clap::Parser;
use cli::Cli;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use featuretour_core::{AppCoordinator, Config, CoreError, Message, MessageBus, Theme};
use featuretour_ui::App;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

static TUI_ACTIVE: AtomicBool = AtomicBool::new(false);

// Restores the terminal even if the loop returns early or unwinds
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        TUI_ACTIVE.store(true, Ordering::SeqCst);
        execute!(stdout(), EnterAlternateScreen)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        TUI_ACTIVE.store(false, Ordering::SeqCst);
    }
}

fn install_panic_hook() {
    let report = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(%info, "panic");
        // Render panics are caught by the page boundary; keep them off the screen
        if !TUI_ACTIVE.load(Ordering::SeqCst) {
            report(info);
        }
    }));
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => match Config::load() {
            Ok(config) => config,
            Err(CoreError::NoConfigDir) => Config::default(),
            Err(err) => return Err(err).wrap_err("failed to load config"),
        },
    };

    if let Some(theme) = &cli.theme {
        config.ui.theme = theme.clone();
    }
    if let Some(rate) = cli.failure_rate {
        config.override_failure_rate(rate);
    }
    if let Some(latency_ms) = cli.latency_ms {
        config.override_latency(latency_ms);
    }
    config.validate().wrap_err("invalid settings")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path, cli.verbose)?;
    install_panic_hook();

    let config = load_config(&cli)?;
    let theme = Theme::by_name(&config.ui.theme)?;
    tracing::info!(theme = %theme.name, seed = ?cli.seed, "starting featuretour");

    let bus = MessageBus::default();
    let mut updates = bus.subscribe();
    let mut app = App::new(bus.clone(), theme);
    for page in featuretour_demos::build_pages(&config, cli.seed, &bus)? {
        app.add_page(page);
    }

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);

    let result = run_app(&mut terminal, &mut app, &mut updates, tick_rate);
    terminal.show_cursor()?;
    tracing::info!("featuretour exited");
    result
}

fn run_app<B>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    updates: &mut Receiver<Message>,
    tick_rate: Duration,
) -> Result<()>
where
    B: Backend,
    <B as Backend>::Error: std::error::Error + Send + Sync + 'static,
{
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| app.render(frame))?;
            dirty = false;
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.dispatch(Message::from_key(key));
                    dirty = true;
                }
                Event::Resize(w, h) => {
                    app.dispatch(Message::Resize(w, h));
                    dirty = true;
                }
                _ => {}
            }
        } else {
            app.tick();
            dirty = true;
        }

        if app.should_quit() {
            return Ok(());
        }

        dirty |= drain_updates(updates);
    }
}

// Everything on the bus is either an echo of a dispatched message or a
// redraw request from a background task; only the latter needs handling.
fn drain_updates(updates: &mut Receiver<Message>) -> bool {
    let mut redraw = false;
    loop {
        match updates.try_recv() {
            Ok(Message::Redraw) => redraw = true,
            Ok(_) => {}
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "update receiver lagged");
                redraw = true;
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return redraw,
        }
    }
}
