use crate::scoring::{self, ScoreSummary};
use strum_macros::Display;

pub const DEFAULT_DURATION_SECS: u64 = 60;
pub const DEFAULT_COUNTDOWN_SECS: u64 = 3;

/// One discrete state of the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Phase {
    Idle,
    Countdown,
    Running,
    Ended,
}

/// The single active exercise instance.
///
/// `id` is a generation counter bumped on every `start()`; asynchronous
/// completions (ticks, paragraph fetches) carry the id they were spawned
/// under and are discarded when it no longer matches.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: u64,
    pub phase: Phase,
    pub reference_text: String,
    pub typed_text: String,
    pub countdown_remaining: u64,
    pub time_remaining: u64,
    pub duration_secs: u64,
    pub countdown_secs: u64,
    pub summary: Option<ScoreSummary>,
}

impl Session {
    pub fn new(duration_secs: u64, countdown_secs: u64) -> Self {
        Self {
            id: 0,
            phase: Phase::Idle,
            reference_text: String::new(),
            typed_text: String::new(),
            countdown_remaining: countdown_secs,
            time_remaining: duration_secs,
            duration_secs,
            countdown_secs,
            summary: None,
        }
    }

    /// Begin a new session: reset per-session state and enter Countdown.
    ///
    /// The reference text is NOT cleared; the previous paragraph stays on
    /// screen until the new fetch resolves. Returns the new session id for
    /// the caller to tag its ticker and fetch with.
    pub fn start(&mut self) -> u64 {
        self.id += 1;
        self.phase = Phase::Countdown;
        self.countdown_remaining = self.countdown_secs;
        self.time_remaining = self.duration_secs;
        self.typed_text.clear();
        self.summary = None;
        self.id
    }

    /// Advance the session by one second. Returns true when this tick ended
    /// the session.
    pub fn tick(&mut self) -> bool {
        match self.phase {
            Phase::Countdown => {
                self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
                if self.countdown_remaining == 0 {
                    // time_remaining is untouched on the transition tick
                    self.phase = Phase::Running;
                }
                false
            }
            Phase::Running => {
                self.time_remaining = self.time_remaining.saturating_sub(1);
                if self.time_remaining == 0 {
                    self.finish();
                    true
                } else {
                    false
                }
            }
            Phase::Idle | Phase::Ended => false,
        }
    }

    /// Replace the typed text verbatim. Ignored outside Running.
    pub fn submit_input(&mut self, text: String) {
        if self.phase == Phase::Running {
            self.typed_text = text;
        }
    }

    /// User-initiated stop. Valid only while Running; runs the same
    /// end-of-session computation as automatic expiry. Returns true when the
    /// session ended.
    pub fn stop(&mut self) -> bool {
        if self.phase == Phase::Running {
            self.finish();
            true
        } else {
            false
        }
    }

    /// Apply a resolved paragraph fetch. Results from a superseded session
    /// are discarded. Returns true when the text was applied.
    pub fn apply_reference_text(&mut self, id: u64, text: String) -> bool {
        if id == self.id {
            self.reference_text = text;
            true
        } else {
            false
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.duration_secs - self.time_remaining
    }

    pub fn is_time_driven(&self) -> bool {
        matches!(self.phase, Phase::Countdown | Phase::Running)
    }

    fn finish(&mut self) {
        self.phase = Phase::Ended;
        self.summary = Some(scoring::summarize(
            &self.reference_text,
            &self.typed_text,
            self.elapsed_secs(),
        ));
    }
}
