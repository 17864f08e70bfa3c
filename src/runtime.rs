use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    /// One-second session timer. Carries the id of the session it was
    /// started for so ticks from a superseded session are discarded.
    Tick { session: u64 },
    /// Completed paragraph fetch. The error is stringified so the event
    /// stays cheaply cloneable.
    Paragraph {
        session: u64,
        result: Result<String, String>,
    },
}

/// Source of events for the main loop.
pub trait EventSource: Send + 'static {
    /// Block for the next event; None once every producer is gone.
    fn recv(&self) -> Option<Event>;
}

/// Production event source: a crossterm reader thread plus a sender handle
/// for the ticker and fetch workers to feed the same channel.
pub struct TerminalEvents {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl TerminalEvents {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        let input_tx = tx.clone();
        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if input_tx.send(Event::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if input_tx.send(Event::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { tx, rx }
    }

    /// Sender handle for asynchronous producers.
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }
}

impl Default for TerminalEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for TerminalEvents {
    fn recv(&self) -> Option<Event> {
        self.rx.recv().ok()
    }
}

/// Test event source fed by a plain channel
pub struct TestEvents {
    rx: Receiver<Event>,
}

impl TestEvents {
    pub fn new(rx: Receiver<Event>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEvents {
    fn recv(&self) -> Option<Event> {
        self.rx.recv().ok()
    }
}

/// Owner of a session's periodic timer. Dropping the handle cancels the
/// timer, so cancellation happens on every exit path, teardown included.
#[derive(Debug)]
pub struct TickerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickerHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawn the one-second session timer. Ticks are strictly sequential (one
/// send per sleep, never re-entrant); the thread exits when the handle is
/// dropped or the channel closes.
pub fn spawn_session_ticker(tx: Sender<Event>, session: u64, interval: Duration) -> TickerHandle {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    thread::spawn(move || loop {
        thread::sleep(interval);
        if flag.load(Ordering::Relaxed) {
            break;
        }
        if tx.send(Event::Tick { session }).is_err() {
            break;
        }
    });

    TickerHandle { cancelled }
}
