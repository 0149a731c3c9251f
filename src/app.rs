use crate::news::{default_languages, Language, NewsClient, NewsItem};
use crate::storage::{PreferenceStore, SavedStore};
use crate::swipe::{ReloadResult, ReloadTicket, SwipeSession};
use crate::theme::{ColorPalette, ThemeVariant};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use tokio::time::Instant;

/// Preference key for the light/dark palette.
pub const PREF_DARK_MODE: &str = "dark_mode";

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// View and Event Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Deck,
    Saved,
}

/// Messages from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A deck reload finished (possibly stale; the session decides).
    DeckLoaded(ReloadResult),
    /// Language list fetched from the API (or the built-in fallback).
    LanguagesLoaded(Vec<Language>),
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

/// Pending confirmation for destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearSaved,
}

/// Language picker overlay state.
#[derive(Debug, Clone)]
pub struct LanguagePicker {
    pub selected: usize,
}

/// Mouse position where the current drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragAnchor {
    pub column: u16,
    pub row: u16,
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub saved: SavedStore,
    pub prefs: PreferenceStore,
    pub news: NewsClient,
    pub session: SwipeSession,

    pub view: View,
    pub theme_variant: ThemeVariant,
    pub theme: ColorPalette,

    /// Saved list as last read from the store, newest first
    pub saved_items: Vec<NewsItem>,
    pub saved_selected: usize,
    saved_ids: HashSet<String>,

    pub languages: Vec<Language>,
    pub language_picker: Option<LanguagePicker>,
    pub pending_confirm: Option<ConfirmAction>,

    pub drag_anchor: Option<DragAnchor>,
    /// Where the top card was last drawn (for mouse hit-testing)
    pub card_area: Option<ratatui::layout::Rect>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        saved: SavedStore,
        prefs: PreferenceStore,
        news: NewsClient,
        session: SwipeSession,
        dark_mode: bool,
    ) -> Self {
        let theme_variant = ThemeVariant::from_dark_mode(dark_mode);
        Self {
            saved,
            prefs,
            news,
            session,
            view: View::Deck,
            theme_variant,
            theme: theme_variant.palette(),
            saved_items: Vec::new(),
            saved_selected: 0,
            saved_ids: HashSet::new(),
            languages: default_languages(),
            language_picker: None,
            pending_confirm: None,
            drag_anchor: None,
            card_area: None,
            status_message: None,
            needs_redraw: true,
        }
    }

    // ========================================================================
    // Status Bar
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ========================================================================
    // Deck
    // ========================================================================

    /// Apply a finished reload and surface failures in the status bar.
    pub fn on_deck_loaded(&mut self, result: ReloadResult) {
        if !self.session.apply_reload(result) {
            return;
        }
        if let Some(err) = self.session.last_error() {
            let msg = if self.session.current().is_none() {
                format!("{} (press r to retry)", err)
            } else {
                err.to_string()
            };
            self.set_status(msg);
        }
    }

    /// Request a manual reload, or `None` if one is already running.
    pub fn reload(&mut self) -> Option<ReloadTicket> {
        let ticket = self.session.request_reload();
        if ticket.is_some() {
            self.set_status("Loading news...");
        }
        ticket
    }

    // ========================================================================
    // Saved Items
    // ========================================================================

    /// Re-read the saved list from the store.
    pub async fn load_saved(&mut self) {
        let outcome = self.saved.list().await;
        if outcome.is_recovered() {
            self.set_status("Could not read saved articles");
        }
        self.saved_items = outcome.into_value();
        self.saved_ids = self.saved_items.iter().map(|i| i.id.clone()).collect();
        self.clamp_saved_selection();
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved_ids.contains(id)
    }

    /// Save or unsave the card on top of the deck.
    pub async fn toggle_save_current(&mut self) {
        let Some(item) = self.session.current().cloned() else {
            return;
        };

        let outcome = self.saved.toggle(&item).await;
        if outcome.is_recovered() {
            self.set_status("Could not update saved articles");
            return;
        }

        if outcome.into_value() {
            self.set_status("Saved");
        } else {
            self.set_status("Removed from saved");
        }
        self.load_saved().await;
    }

    pub fn selected_saved(&self) -> Option<&NewsItem> {
        self.saved_items.get(self.saved_selected)
    }

    pub async fn remove_selected_saved(&mut self) {
        let Some(id) = self.selected_saved().map(|i| i.id.clone()) else {
            return;
        };

        let outcome = self.saved.remove(&id).await;
        if outcome.is_recovered() {
            self.set_status("Failed to remove item");
            return;
        }
        self.set_status("Removed from saved");
        self.load_saved().await;
    }

    pub async fn clear_saved(&mut self) {
        let outcome = self.saved.clear().await;
        if outcome.is_recovered() {
            self.set_status("Failed to clear saved articles");
        } else {
            self.set_status("All saved articles cleared");
        }
        self.load_saved().await;
    }

    fn clamp_saved_selection(&mut self) {
        self.saved_selected = self
            .saved_selected
            .min(self.saved_items.len().saturating_sub(1));
    }

    pub fn select_next_saved(&mut self) {
        if self.saved_selected + 1 < self.saved_items.len() {
            self.saved_selected += 1;
        }
    }

    pub fn select_prev_saved(&mut self) {
        self.saved_selected = self.saved_selected.saturating_sub(1);
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    /// Persist and apply a new language, returning the reload to run.
    pub async fn change_language(&mut self, code: &str) -> ReloadTicket {
        if self.prefs.set_language(code).await.is_recovered() {
            self.set_status("Language will not be remembered (storage error)");
        } else {
            let name = self
                .languages
                .iter()
                .find(|l| l.code == code)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| code.to_string());
            self.set_status(format!("Language: {}", name));
        }
        self.session.set_language(code)
    }

    pub async fn toggle_dark_mode(&mut self) {
        let dark_mode = self.theme_variant != ThemeVariant::Dark;
        self.theme_variant = ThemeVariant::from_dark_mode(dark_mode);
        self.theme = self.theme_variant.palette();

        if self
            .prefs
            .set(PREF_DARK_MODE, Value::Bool(dark_mode))
            .await
            .is_recovered()
        {
            self.set_status("Theme will not be remembered (storage error)");
        } else {
            self.set_status(format!("{} theme", self.theme_variant.name()));
        }
    }

    // ========================================================================
    // Language Picker
    // ========================================================================

    /// Let go of a mouse drag whose button-up will never reach the deck.
    pub fn release_drag(&mut self) {
        if self.drag_anchor.take().is_some() {
            let phase = self.session.end_drag();
            tracing::debug!(?phase, "Drag released without button-up");
        }
    }

    pub fn open_language_picker(&mut self) {
        self.release_drag();
        let selected = self
            .languages
            .iter()
            .position(|l| l.code == self.session.language())
            .unwrap_or(0);
        self.language_picker = Some(LanguagePicker { selected });
    }

    pub fn move_language_selection(&mut self, delta: isize) {
        let len = self.languages.len();
        if let Some(picker) = self.language_picker.as_mut() {
            if len == 0 {
                return;
            }
            picker.selected = (picker.selected as isize + delta).clamp(0, len as isize - 1) as usize;
        }
    }

    /// Close the picker, returning the chosen code if it differs from the active one.
    pub fn confirm_language_picker(&mut self) -> Option<String> {
        let picker = self.language_picker.take()?;
        let code = self.languages.get(picker.selected)?.code.clone();
        (code != self.session.language()).then_some(code)
    }

    pub fn set_languages(&mut self, languages: Vec<Language>) {
        if languages.is_empty() {
            return;
        }
        self.languages = languages;
        if let Some(picker) = self.language_picker.as_mut() {
            picker.selected = picker.selected.min(self.languages.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::{sample_news, FetchError, NewsSource};
    use crate::storage::Database;
    use crate::swipe::SwipeGeometry;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct Samples;

    #[async_trait]
    impl NewsSource for Samples {
        async fn fetch(&self, language: &str) -> Result<Vec<NewsItem>, FetchError> {
            Ok(sample_news(language))
        }
    }

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let news = NewsClient::new("http://127.0.0.1:9/api", Duration::from_millis(100)).unwrap();
        let session = SwipeSession::new(Arc::new(Samples), "en", SwipeGeometry::new(80.0, 20.0));
        let mut app = App::new(
            SavedStore::new(db.clone()),
            PreferenceStore::new(db),
            news,
            session,
            true,
        );
        assert!(app.session.reload_now().await);
        app
    }

    #[tokio::test]
    async fn test_toggle_save_current() {
        let mut app = test_app().await;
        app.toggle_save_current().await;
        assert!(app.is_saved("1"));
        assert_eq!(app.saved_items.len(), 1);

        app.toggle_save_current().await;
        assert!(!app.is_saved("1"));
        assert!(app.saved_items.is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_clear_saved() {
        let mut app = test_app().await;
        for item in sample_news("en") {
            app.saved.save(&item).await.into_value();
        }
        app.load_saved().await;
        assert_eq!(app.saved_items.len(), 2);

        app.saved_selected = 1;
        app.remove_selected_saved().await;
        assert_eq!(app.saved_items.len(), 1);
        assert_eq!(app.saved_selected, 0);

        app.clear_saved().await;
        assert!(app.saved_items.is_empty());
    }

    #[tokio::test]
    async fn test_change_language_persists_and_reloads() {
        let mut app = test_app().await;
        let ticket = app.change_language("hi").await;
        let result = ticket.run().await;
        app.on_deck_loaded(result);

        assert_eq!(app.prefs.language().await, "hi");
        assert_eq!(app.session.language(), "hi");
        assert_eq!(app.session.deck().len(), 1);
    }

    #[tokio::test]
    async fn test_language_picker_selection() {
        let mut app = test_app().await;
        app.open_language_picker();
        assert_eq!(app.language_picker.as_ref().map(|p| p.selected), Some(0));

        app.move_language_selection(5);
        assert_eq!(app.language_picker.as_ref().map(|p| p.selected), Some(2));
        assert_eq!(app.confirm_language_picker().as_deref(), Some("hi"));
        assert!(app.language_picker.is_none());

        app.open_language_picker();
        assert_eq!(app.confirm_language_picker(), None);
    }

    #[tokio::test]
    async fn test_toggle_dark_mode_persists() {
        let mut app = test_app().await;
        assert_eq!(app.theme_variant, ThemeVariant::Dark);

        app.toggle_dark_mode().await;
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert!(!app.prefs.get_bool(PREF_DARK_MODE, true).await.into_value());
    }

    #[tokio::test]
    async fn test_status_expiry() {
        let mut app = test_app().await;
        app.set_status("hello");
        assert!(!app.clear_expired_status());
        app.status_message = Some(("old".into(), Instant::now() - Duration::from_secs(5)));
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
