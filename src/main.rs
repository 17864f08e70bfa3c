use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::Arc,
};
use tracing::warn;

use typedash::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{Event, EventSource, TerminalEvents},
    source::{FixedParagraphSource, HttpParagraphSource, ParagraphSource},
    store::{ScoreDb, ScoreStore},
};

/// terminal typing speed test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing speed test: a short countdown, a timed run against a fetched paragraph, live per-character feedback, and a persistent high score."
)]
pub struct Cli {
    /// number of seconds to type for
    #[clap(short = 's', long)]
    secs: Option<u64>,

    /// countdown seconds before typing starts
    #[clap(short = 'c', long)]
    countdown: Option<u64>,

    /// paragraph endpoint to fetch reference text from
    #[clap(long)]
    url: Option<String>,

    /// fixed paragraph to type instead of fetching one
    #[clap(short = 'p', long)]
    paragraph: Option<String>,
}

impl Cli {
    /// Layer CLI flags over the persisted configuration
    fn to_config(&self, mut base: Config) -> Config {
        if let Some(secs) = self.secs {
            base.duration_secs = secs;
        }
        if let Some(countdown) = self.countdown {
            base.countdown_secs = countdown;
        }
        if let Some(url) = &self.url {
            base.source_url = url.clone();
        }
        base
    }
}

/// Log to a file in the state directory; stdout belongs to the TUI.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = AppDirs::log_dir()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(log_dir, "typedash.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = init_tracing();

    let config = cli.to_config(FileConfigStore::new().load());

    let source: Arc<dyn ParagraphSource> = match &cli.paragraph {
        Some(text) => Arc::new(FixedParagraphSource::new(text.clone())),
        None => Arc::new(HttpParagraphSource::new(config.source_url.clone())),
    };

    let score_store: Option<Box<dyn ScoreStore>> = match ScoreDb::new() {
        Ok(db) => Some(Box::new(db)),
        Err(error) => {
            warn!(%error, "high score store unavailable, scores will not persist");
            None
        }
    };

    let mut app = App::new(&config, source, score_store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = TerminalEvents::new();
    let res = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &TerminalEvents,
) -> Result<(), Box<dyn Error>> {
    let tx = events.sender();

    // a paragraph for the idle screen, like the session fetches later on
    app.prefetch_reference(&tx);

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let Some(event) = events.recv() else {
            break;
        };

        match event {
            Event::Tick { session } => app.on_tick(session),
            Event::Resize => {}
            Event::Paragraph { session, result } => app.on_paragraph(session, result),
            Event::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Enter => app.toggle_session(&tx),
                KeyCode::Backspace => app.on_backspace(),
                KeyCode::Char(c) => {
                    // ctrl+c to quit
                    if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                        break;
                    }
                    app.on_char(c);
                }
                _ => {}
            },
        }
    }

    Ok(())
}
