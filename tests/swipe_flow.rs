//! Integration tests for the reading flow: swipe through a deck, save and
//! unsave articles, reload at the end of the deck.
//!
//! Each test uses its own in-memory SQLite database and an in-memory news
//! source, so nothing touches the network.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use newsdeck::news::{FetchError, NewsItem, NewsSource};
use newsdeck::storage::{Database, SavedStore};
use newsdeck::swipe::{Offset, Phase, SwipeDirection, SwipeGeometry, SwipeSession};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const GEOMETRY: SwipeGeometry = SwipeGeometry {
    width: 60.0,
    height: 20.0,
};
const FRAME: Duration = Duration::from_millis(16);

fn item(id: &str, title: &str) -> NewsItem {
    NewsItem {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("{} content", title),
        why: "why".to_string(),
        how: "how".to_string(),
        category: "AI".to_string(),
        image_url: None,
        action_url: Some(format!("https://example.com/{}", id)),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
    }
}

/// Always serves the same two cards and counts fetches.
struct TwoCards {
    calls: AtomicUsize,
}

#[async_trait]
impl NewsSource for TwoCards {
    async fn fetch(&self, _language: &str) -> Result<Vec<NewsItem>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![item("a", "Card A"), item("b", "Card B")])
    }
}

async fn loaded_session() -> (SwipeSession, Arc<TwoCards>) {
    let source = Arc::new(TwoCards {
        calls: AtomicUsize::new(0),
    });
    let mut session = SwipeSession::new(source.clone(), "en", GEOMETRY);
    assert!(session.reload_now().await);
    (session, source)
}

/// Tick until the gesture is idle, running any reload the session asks for.
async fn settle(session: &mut SwipeSession) {
    for _ in 0..2_000 {
        if let Some(ticket) = session.tick(FRAME) {
            let result = ticket.run().await;
            session.apply_reload(result);
        }
        if session.phase() == Phase::Idle {
            return;
        }
    }
    panic!("gesture never settled: {:?}", session.phase());
}

#[tokio::test]
async fn test_swipe_does_not_save_and_save_remove_round_trips() {
    let db = Database::open(":memory:").await.unwrap();
    let saved = SavedStore::new(db);
    let (mut session, _) = loaded_session().await;

    // Swipe A away to the right
    assert!(session.begin_drag());
    session.update_drag(Offset::new(GEOMETRY.width * 0.5, 0.0));
    assert_eq!(session.end_drag(), Phase::Committing(SwipeDirection::Right));
    settle(&mut session).await;

    assert_eq!(session.current_index(), 1);
    assert_eq!(session.current().map(|i| i.id.as_str()), Some("b"));
    assert!(!saved.is_saved("a").await.into_value());

    // Save and then remove B
    let b = session.current().cloned().unwrap();
    assert!(saved.save(&b).await.into_value());
    assert_eq!(saved.list().await.into_value(), vec![b.clone()]);
    assert!(saved.remove(&b.id).await.into_value());
    assert!(saved.list().await.into_value().is_empty());
}

#[tokio::test]
async fn test_short_drag_keeps_card() {
    let (mut session, _) = loaded_session().await;

    session.begin_drag();
    session.update_drag(Offset::new(GEOMETRY.width * 0.3, 0.0));
    // Exactly at the threshold does not commit
    assert_eq!(session.end_drag(), Phase::Cancelling);
    settle(&mut session).await;

    assert_eq!(session.current_index(), 0);
    assert_eq!(session.visual().offset, Offset::ZERO);
}

#[tokio::test]
async fn test_left_and_right_both_advance() {
    let (mut session, source) = loaded_session().await;

    assert!(session.swipe(SwipeDirection::Left));
    settle(&mut session).await;
    assert_eq!(session.current_index(), 1);

    // Last card: dismissing it reloads and starts over at the top
    assert!(session.swipe(SwipeDirection::Right));
    settle(&mut session).await;
    assert_eq!(session.current_index(), 0);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_input_ignored_while_card_leaves() {
    let (mut session, _) = loaded_session().await;

    assert!(session.swipe(SwipeDirection::Right));
    assert!(!session.swipe(SwipeDirection::Right));
    assert!(!session.begin_drag());
    settle(&mut session).await;

    // Exactly one advance for one commit
    assert_eq!(session.current_index(), 1);
}

#[tokio::test]
async fn test_saved_order_is_newest_saved_first() {
    let db = Database::open(":memory:").await.unwrap();
    let saved = SavedStore::new(db);

    for id in ["a", "b", "c"] {
        saved.save(&item(id, id)).await.into_value();
    }
    // Saving again is a no-op and keeps position
    assert!(!saved.save(&item("a", "a")).await.into_value());

    let ids: Vec<_> = saved
        .list()
        .await
        .into_value()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
}
