//! The swipe session: one deck, one card gesture and the reload bookkeeping.
//!
//! Reloads are split in two so the session never awaits anything itself:
//! [`SwipeSession::request_reload`] hands out a [`ReloadTicket`], the caller
//! runs it (usually on a spawned task) and feeds the [`ReloadResult`] back
//! through [`SwipeSession::apply_reload`].

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::deck::{Advance, Deck};
use super::gesture::{CardGesture, Phase, Settled};
use super::visual::{Offset, SwipeDirection, SwipeGeometry, VisualState};
use crate::news::{FetchError, NewsItem, NewsSource};

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("Could not load news: {0}")]
    Fetch(#[from] FetchError),

    #[error("No news available")]
    Empty,

    #[error("Reload task failed: {0}")]
    Aborted(String),
}

/// Permission to run one feed reload for one generation of the session.
#[derive(Clone)]
pub struct ReloadTicket {
    generation: u64,
    language: String,
    source: Arc<dyn NewsSource>,
}

impl ReloadTicket {
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Fetch the feed. Never panics; failures travel inside the result.
    pub async fn run(self) -> ReloadResult {
        tracing::debug!(language = %self.language, generation = self.generation, "Reloading deck");
        let result = self.source.fetch(&self.language).await.map_err(ReloadError::from);
        ReloadResult {
            generation: self.generation,
            language: self.language,
            result,
        }
    }

    /// Result to apply when the task running this ticket died, so the
    /// session does not wait on it forever.
    pub fn abort(self, reason: impl Into<String>) -> ReloadResult {
        ReloadResult {
            generation: self.generation,
            language: self.language,
            result: Err(ReloadError::Aborted(reason.into())),
        }
    }
}

/// Outcome of a [`ReloadTicket`], to be applied back to the session.
#[derive(Debug)]
pub struct ReloadResult {
    generation: u64,
    language: String,
    result: Result<Vec<NewsItem>, ReloadError>,
}

pub struct SwipeSession {
    source: Arc<dyn NewsSource>,
    language: String,
    deck: Deck,
    gesture: CardGesture,
    /// Bumped on language change; results from older generations are dropped
    generation: u64,
    reload_pending: bool,
    last_error: Option<ReloadError>,
}

impl SwipeSession {
    /// Empty session for `language`. Call [`request_reload`](Self::request_reload)
    /// to load the first deck.
    pub fn new(source: Arc<dyn NewsSource>, language: impl Into<String>, geometry: SwipeGeometry) -> Self {
        Self {
            source,
            language: language.into(),
            deck: Deck::default(),
            gesture: CardGesture::new(geometry),
            generation: 0,
            reload_pending: false,
            last_error: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current_index(&self) -> usize {
        self.deck.current_index()
    }

    pub fn current(&self) -> Option<&NewsItem> {
        self.deck.current()
    }

    pub fn peek_next(&self) -> Option<&NewsItem> {
        self.deck.peek_next()
    }

    pub fn phase(&self) -> Phase {
        self.gesture.phase()
    }

    pub fn visual(&self) -> VisualState {
        self.gesture.visual()
    }

    pub fn geometry(&self) -> SwipeGeometry {
        self.gesture.geometry()
    }

    pub fn set_geometry(&mut self, geometry: SwipeGeometry) {
        self.gesture.set_geometry(geometry);
    }

    pub fn is_loading(&self) -> bool {
        self.reload_pending
    }

    /// Error from the most recent reload, cleared by the next success.
    pub fn last_error(&self) -> Option<&ReloadError> {
        self.last_error.as_ref()
    }

    /// Whether something is animating and needs ticks.
    pub fn is_animating(&self) -> bool {
        matches!(self.gesture.phase(), Phase::Committing(_) | Phase::Cancelling)
    }

    // ========================================================================
    // Gesture Input
    // ========================================================================

    /// Start dragging the top card. Ignored when there is no card or one is
    /// already leaving.
    pub fn begin_drag(&mut self) -> bool {
        if self.deck.current().is_none() {
            return false;
        }
        self.gesture.begin_drag()
    }

    pub fn update_drag(&mut self, translation: Offset) {
        self.gesture.update_drag(translation);
    }

    pub fn end_drag(&mut self) -> Phase {
        self.gesture.end_drag()
    }

    /// Keyboard swipe: the top card flies off as if dragged past the threshold.
    pub fn swipe(&mut self, direction: SwipeDirection) -> bool {
        if self.deck.current().is_none() {
            return false;
        }
        self.gesture.fling(direction)
    }

    // ========================================================================
    // Animation & Advance
    // ========================================================================

    /// Advance animations. Returns a ticket when the fly-off finished on the
    /// last card and a reload must be run.
    pub fn tick(&mut self, dt: Duration) -> Option<ReloadTicket> {
        match self.gesture.tick(dt)? {
            Settled::Committed(direction) => {
                tracing::debug!(?direction, index = self.deck.current_index(), "Card dismissed");
                self.advance()
            }
            Settled::Returned => None,
        }
    }

    /// Runs once per committed card, after the fly-off settled.
    fn advance(&mut self) -> Option<ReloadTicket> {
        match self.deck.advance() {
            Advance::Moved => {
                self.gesture.finish_advance();
                None
            }
            // The gesture stays in Advancing until the reload lands
            Advance::Exhausted => self.request_reload(),
        }
    }

    // ========================================================================
    // Reloads
    // ========================================================================

    /// Ticket for a reload of the current language, or `None` if one is
    /// already in flight.
    pub fn request_reload(&mut self) -> Option<ReloadTicket> {
        if self.reload_pending {
            tracing::debug!(language = %self.language, "Reload already in flight, ignoring");
            return None;
        }
        self.reload_pending = true;
        Some(self.ticket())
    }

    /// Switch language. Any in-flight reload becomes stale and a new one is
    /// always issued.
    pub fn set_language(&mut self, language: impl Into<String>) -> ReloadTicket {
        self.language = language.into();
        self.generation += 1;
        self.reload_pending = true;
        self.gesture.reset();
        self.ticket()
    }

    fn ticket(&self) -> ReloadTicket {
        ReloadTicket {
            generation: self.generation,
            language: self.language.clone(),
            source: Arc::clone(&self.source),
        }
    }

    /// Apply a finished reload. Returns `false` when the result was stale
    /// and dropped.
    ///
    /// A failed or empty reload keeps the current deck and records the error.
    pub fn apply_reload(&mut self, reload: ReloadResult) -> bool {
        if reload.generation != self.generation {
            tracing::debug!(
                language = %reload.language,
                generation = reload.generation,
                current = self.generation,
                "Dropping stale reload"
            );
            return false;
        }
        self.reload_pending = false;

        match reload.result {
            Ok(items) if !items.is_empty() => {
                tracing::info!(language = %reload.language, count = items.len(), "Deck loaded");
                self.deck.replace(items);
                self.last_error = None;
            }
            Ok(_) => {
                tracing::warn!(language = %reload.language, "Reload returned no news");
                self.last_error = Some(ReloadError::Empty);
            }
            Err(e) => {
                tracing::warn!(language = %reload.language, error = %e, "Reload failed");
                self.last_error = Some(e);
            }
        }

        // A card waiting on the reload comes back into play either way
        self.gesture.finish_advance();
        true
    }

    /// Request and apply a reload inline. Convenience for callers that do not
    /// need to keep the UI responsive while fetching.
    pub async fn reload_now(&mut self) -> bool {
        match self.request_reload() {
            Some(ticket) => {
                let result = ticket.run().await;
                self.apply_reload(result)
            }
            None => false,
        }
    }
}
