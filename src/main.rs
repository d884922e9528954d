//! clinic-feed — a terminal client for a clinic's article and service feeds.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  PageMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio)  │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲                       │ ▲
//!      └── PageRequest ─ loader.rs │ handle_key_event()
//!                              ┌──────────┐
//!                              │ input.rs │
//!                              └──────────┘
//! ```
//!
//! * **`source/`** — the `ItemSource` trait, `FeedItem`, and the HTTP source.
//! * **`loader`** — per-feed pagination state machine.
//! * **`debounce`** — collapses bursts of end-of-list signals.
//! * **`fetch`** — runs page requests on a tokio runtime.
//! * **`app`** — tabs, selection, detail view, message routing.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`config`** / **`logging`** — TOML settings and tracing setup.
//! * **`main`** — wires everything together: parse args, set up the terminal,
//!   and run the event loop.

mod app;
mod config;
mod debounce;
mod fetch;
mod input;
mod loader;
mod logging;
mod source;
mod ui;

use std::io;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use app::{App, Tab};
use config::Config;
use fetch::Dispatcher;
use source::{HttpSource, ItemSource};

/// Browse a clinic's news articles and services from the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (defaults to ./clinic-feed.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API root, e.g. http://localhost:3000/api/v1.
    #[arg(long)]
    base_url: Option<String>,

    /// Records requested per page.
    #[arg(long)]
    page_size: Option<NonZeroU32>,

    /// Where to write logs.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(url) = self.base_url {
            config.api.base_url = url;
        }
        if let Some(n) = self.page_size {
            config.feed.page_size = n;
        }
        if let Some(path) = self.log_file {
            config.logging.file = path;
        }
    }
}

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

fn http_source(config: &Config, resource: &str, label: &str) -> Result<Arc<dyn ItemSource>> {
    let source = HttpSource::new(&config.api.base_url, resource, label, config.api.timeout())
        .with_context(|| format!("failed to build HTTP client for {label}"))?;
    Ok(Arc::new(source))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    let config_source = match &cli.config {
        Some(path) => path.display().to_string(),
        None if Path::new(config::DEFAULT_CONFIG_FILE).exists() => {
            config::DEFAULT_CONFIG_FILE.to_string()
        }
        None => "built-in defaults".to_string(),
    };
    cli.apply(&mut config);

    logging::init(&config.logging.level, &config.logging.file)?;
    info!(
        config = %config_source,
        base_url = %config.api.base_url,
        page_size = config.feed.page_size.get(),
        "starting"
    );

    install_panic_hook();

    // -- fetch runtime and sources -------------------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("fetch")
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    let (tx, rx) = mpsc::channel();
    let articles = Dispatcher::new(
        Tab::Home,
        runtime.handle().clone(),
        http_source(&config, &config.api.articles_resource, "Articles")?,
        tx.clone(),
    );
    let services = Dispatcher::new(
        Tab::Services,
        runtime.handle().clone(),
        http_source(&config, &config.api.services_resource, "Services")?,
        tx,
    );

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.feed.clone(), config.clinic.clone(), articles, services);

    // -- main event loop -----------------------------------------------------
    // Each iteration:
    //   1. Drain fetch outcomes.
    //   2. Fire any debounced page requests that are due.
    //   3. Render.
    //   4. Poll for input, waking early if a debounce is about to fire.
    let tick_rate = Duration::from_millis(100);

    let result: Result<()> = loop {
        while let Ok(msg) = rx.try_recv() {
            app.handle_page(msg);
        }

        app.tick(Instant::now());

        if let Err(e) = guard.terminal.draw(|f| ui::draw(&mut app, f)) {
            break Err(e.into());
        }

        let timeout = app.poll_timeout(Instant::now(), tick_rate);
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => input::handle_key_event(&mut app, key, Instant::now()),
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }

        if app.quit {
            break Ok(());
        }
    };

    drop(guard);
    if let Err(e) = &result {
        error!(error = %e, "event loop failed");
    }
    // Outstanding fetches cannot be cancelled; don't wait for them.
    runtime.shutdown_background();
    info!("exiting");
    result
}
