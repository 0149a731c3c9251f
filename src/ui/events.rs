//! Background task event processing.

use crate::app::{App, AppEvent};

/// Apply an event sent by a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::DeckLoaded(result) => app.on_deck_loaded(result),
        AppEvent::LanguagesLoaded(languages) => {
            tracing::debug!(count = languages.len(), "Language list loaded");
            app.set_languages(languages);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
