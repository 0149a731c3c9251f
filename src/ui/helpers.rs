//! Background task spawning and other helpers shared by input and the loop.

use crate::app::{App, AppEvent};
use crate::news::NewsClient;
use crate::swipe::ReloadTicket;
use crate::util::validate_link;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// A panicking background task would otherwise vanish silently; this turns
/// the panic payload into `Err(String)` so the UI can report it.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Run a deck reload on a background task and deliver the result as
/// `AppEvent::DeckLoaded`.
///
/// A panicking source still produces a result (an aborted one) so the
/// session stops waiting for it.
pub(super) fn spawn_reload(ticket: ReloadTicket, event_tx: &mpsc::Sender<AppEvent>) {
    let tx = event_tx.clone();
    tracing::debug!(language = %ticket.language(), "Spawning deck reload");

    tokio::spawn(async move {
        let fallback = ticket.clone();
        let result = match catch_task_panic(ticket.run()).await {
            Ok(result) => result,
            Err(panic_msg) => {
                tracing::error!(error = %panic_msg, "Deck reload panicked");
                if let Err(e) = tx
                    .send(AppEvent::TaskPanicked {
                        task: "reload",
                        error: panic_msg.clone(),
                    })
                    .await
                {
                    tracing::warn!(error = %e, event = "TaskPanicked", "Channel send failed (receiver dropped)");
                }
                fallback.abort(panic_msg)
            }
        };

        if let Err(e) = tx.send(AppEvent::DeckLoaded(result)).await {
            tracing::warn!(error = %e, event = "DeckLoaded", "Channel send failed (receiver dropped)");
        }
    });
}

/// Fetch the language list on a background task.
pub(super) fn spawn_languages_load(news: NewsClient, event_tx: &mpsc::Sender<AppEvent>) {
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let event = match catch_task_panic(news.languages()).await {
            Ok(languages) => AppEvent::LanguagesLoaded(languages),
            Err(panic_msg) => {
                tracing::error!(error = %panic_msg, "Language load panicked");
                AppEvent::TaskPanicked {
                    task: "languages",
                    error: panic_msg,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send language list (receiver dropped)");
        }
    });
}

/// Kick off the first deck load and the language list fetch.
pub(super) fn start_background_loads(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.session.current().is_none() {
        if let Some(ticket) = app.session.request_reload() {
            spawn_reload(ticket, event_tx);
        }
    }
    spawn_languages_load(app.news.clone(), event_tx);
}

/// Open an article's action link in the system browser.
pub(super) fn open_link(app: &mut App, action_url: Option<String>) {
    let Some(raw) = action_url else {
        app.set_status("This article has no link");
        return;
    };

    // Never hand unchecked remote input to the system opener
    match validate_link(&raw) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status("Opening link...");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_messages() {
        let err = catch_task_panic(async { panic!("static message") }).await;
        assert_eq!(err, Err::<(), _>("static message".to_string()));

        let code = 42;
        let err = catch_task_panic(async move { panic!("formatted {}", code) }).await;
        assert_eq!(err, Err::<(), _>("formatted 42".to_string()));
    }
}
