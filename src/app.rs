use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::runtime::{spawn_session_ticker, Event, TickerHandle};
use crate::session::{Phase, Session};
use crate::source::{self, ParagraphSource};
use crate::store::ScoreStore;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Application state: the active session plus its collaborators.
pub struct App {
    pub session: Session,
    pub high_score: u64,
    score_store: Option<Box<dyn ScoreStore>>,
    source: Arc<dyn ParagraphSource>,
    ticker: Option<TickerHandle>,
}

impl App {
    pub fn new(
        config: &Config,
        source: Arc<dyn ParagraphSource>,
        score_store: Option<Box<dyn ScoreStore>>,
    ) -> Self {
        let high_score = score_store
            .as_ref()
            .map_or(0, |store| store.load_high_score());

        Self {
            session: Session::new(config.duration_secs, config.countdown_secs),
            high_score,
            score_store,
            source,
            ticker: None,
        }
    }

    /// Fetch a paragraph for the idle screen without starting a session.
    pub fn prefetch_reference(&self, tx: &Sender<Event>) {
        source::spawn_fetch(Arc::clone(&self.source), self.session.id, tx.clone());
    }

    /// Begin a new session: countdown, fresh ticker, paragraph fetch.
    /// A previous session's ticker is cancelled by the handle swap.
    pub fn start_session(&mut self, tx: &Sender<Event>) {
        let id = self.session.start();
        info!(session = id, phase = %self.session.phase, "session started");
        self.ticker = Some(spawn_session_ticker(tx.clone(), id, TICK_INTERVAL));
        source::spawn_fetch(Arc::clone(&self.source), id, tx.clone());
    }

    /// User-initiated stop; ends the session through the same path as
    /// automatic expiry.
    pub fn stop_session(&mut self) {
        if self.session.stop() {
            self.ticker = None;
            self.finish_session();
        }
    }

    /// The start/stop control: its meaning toggles with the phase.
    pub fn toggle_session(&mut self, tx: &Sender<Event>) {
        match self.session.phase {
            Phase::Running => self.stop_session(),
            Phase::Idle | Phase::Ended => self.start_session(tx),
            Phase::Countdown => {}
        }
    }

    pub fn on_tick(&mut self, session: u64) {
        if session != self.session.id {
            return; // tick from a superseded session's ticker
        }
        if self.session.tick() {
            self.ticker = None;
            self.finish_session();
        }
    }

    pub fn on_char(&mut self, c: char) {
        if self.session.phase == Phase::Running {
            let mut text = self.session.typed_text.clone();
            text.push(c);
            self.session.submit_input(text);
        }
    }

    pub fn on_backspace(&mut self) {
        if self.session.phase == Phase::Running {
            let mut text = self.session.typed_text.clone();
            text.pop();
            self.session.submit_input(text);
        }
    }

    /// Apply a fetch completion. Failures keep the previous reference text
    /// and are only logged; the session timers are unaffected.
    pub fn on_paragraph(&mut self, session: u64, result: Result<String, String>) {
        match result {
            Ok(text) => {
                if !self.session.apply_reference_text(session, text) {
                    info!(session, "discarded paragraph for superseded session");
                }
            }
            Err(error) => {
                warn!(session, %error, "paragraph fetch failed");
            }
        }
    }

    fn finish_session(&mut self) {
        let Some(summary) = self.session.summary.clone() else {
            return;
        };

        info!(
            session = self.session.id,
            wpm = summary.words_per_minute,
            accuracy = summary.accuracy_percent,
            words = summary.words_typed,
            "session ended"
        );

        let words = summary.words_typed as u64;
        if words > self.high_score {
            self.high_score = words;
            if let Some(store) = &self.score_store {
                if let Err(error) = store.save_high_score(words) {
                    warn!(%error, "failed to persist high score");
                }
            }
        }
    }
}
