use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::runtime::Event;

pub const DEFAULT_SOURCE_URL: &str =
    "https://baconipsum.com/api/?type=meat-and-filler&paras=1&format=text";

pub type SourceResult = Result<String, Box<dyn Error + Send + Sync>>;

/// External provider of reference paragraphs.
pub trait ParagraphSource: Send + Sync {
    /// Produce one paragraph of plain-text prose.
    fn fetch_paragraph(&self) -> SourceResult;
}

/// Plain-text paragraph fetched over HTTP GET. No timeout beyond the
/// transport default, no retry.
#[derive(Debug, Clone)]
pub struct HttpParagraphSource {
    url: String,
}

impl HttpParagraphSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ParagraphSource for HttpParagraphSource {
    fn fetch_paragraph(&self) -> SourceResult {
        let body = reqwest::blocking::get(&self.url)?
            .error_for_status()?
            .text()?;
        Ok(body.trim_end().to_string())
    }
}

/// Fixed paragraph served through the same asynchronous path. Backs the
/// `--paragraph` flag and the headless tests.
#[derive(Debug, Clone)]
pub struct FixedParagraphSource {
    text: String,
}

impl FixedParagraphSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl ParagraphSource for FixedParagraphSource {
    fn fetch_paragraph(&self) -> SourceResult {
        Ok(self.text.clone())
    }
}

/// Fire-and-forget fetch. The result lands on the event channel tagged with
/// the session id it was requested for; the session timers never wait on it.
/// A send after teardown fails silently.
pub fn spawn_fetch(source: Arc<dyn ParagraphSource>, session: u64, tx: Sender<Event>) {
    thread::spawn(move || {
        let result = source.fetch_paragraph().map_err(|e| e.to_string());
        let _ = tx.send(Event::Paragraph { session, result });
    });
}
