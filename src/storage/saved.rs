//! Saved articles, persisted as one JSON array under the `saved_news` key.
//!
//! The list is ordered most-recently-saved first and never holds two items
//! with the same `id`.

use crate::news::NewsItem;

use super::schema::Database;
use super::types::{Outcome, StorageError};
use super::KEY_SAVED_NEWS;

/// Fail-soft store for the user's saved articles.
#[derive(Clone)]
pub struct SavedStore {
    db: Database,
}

impl SavedStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All saved items, newest save first. Empty when nothing is stored or
    /// the stored value cannot be read.
    pub async fn list(&self) -> Outcome<Vec<NewsItem>> {
        Outcome::settle("saved.list", self.try_list().await, Vec::new)
    }

    /// Save `item` at the front of the list. Returns `false` (and writes
    /// nothing) if an item with the same id is already saved.
    pub async fn save(&self, item: &NewsItem) -> Outcome<bool> {
        let result = self
            .db
            .update_value(KEY_SAVED_NEWS, |raw| {
                let mut items = decode_for_write(raw);
                if items.iter().any(|saved| saved.id == item.id) {
                    return Ok(None);
                }
                items.insert(0, item.clone());
                encode(&items).map(Some)
            })
            .await;

        if let Ok(true) = result {
            tracing::debug!(id = %item.id, "Saved article");
        }
        Outcome::settle("saved.save", result, || false)
    }

    /// Remove the item with `id`. Returns `false` when it was not saved.
    pub async fn remove(&self, id: &str) -> Outcome<bool> {
        let result = self
            .db
            .update_value(KEY_SAVED_NEWS, |raw| {
                let mut items = decode_for_write(raw);
                let before = items.len();
                items.retain(|saved| saved.id != id);
                if items.len() == before {
                    return Ok(None);
                }
                encode(&items).map(Some)
            })
            .await;

        if let Ok(true) = result {
            tracing::debug!(id, "Removed saved article");
        }
        Outcome::settle("saved.remove", result, || false)
    }

    /// Forget every saved item.
    pub async fn clear(&self) -> Outcome<()> {
        let result = self.db.delete_values(&[KEY_SAVED_NEWS]).await;
        Outcome::settle("saved.clear", result, || ())
    }

    pub async fn is_saved(&self, id: &str) -> Outcome<bool> {
        let result = self
            .try_list()
            .await
            .map(|items| items.iter().any(|saved| saved.id == id));
        Outcome::settle("saved.is_saved", result, || false)
    }

    /// Save `item` if absent, otherwise remove it. Returns the new saved state.
    ///
    /// On a fault the value is the state before the toggle.
    pub async fn toggle(&self, item: &NewsItem) -> Outcome<bool> {
        let mut now_saved = false;
        let result = self
            .db
            .update_value(KEY_SAVED_NEWS, |raw| {
                let mut items = decode_for_write(raw);
                let before = items.len();
                items.retain(|saved| saved.id != item.id);
                if items.len() == before {
                    items.insert(0, item.clone());
                    now_saved = true;
                }
                encode(&items).map(Some)
            })
            .await;

        match result {
            Ok(_) => Outcome::clean(now_saved),
            Err(e) => {
                tracing::warn!(op = "saved.toggle", id = %item.id, error = %e, "Storage operation failed, using default");
                let was_saved = self.is_saved(&item.id).await.into_value();
                Outcome::recovered(was_saved, e)
            }
        }
    }

    async fn try_list(&self) -> Result<Vec<NewsItem>, StorageError> {
        match self.db.get_value(KEY_SAVED_NEWS).await? {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }
}

fn decode(raw: &str) -> Result<Vec<NewsItem>, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Corrupt {
        key: KEY_SAVED_NEWS,
        source,
    })
}

/// Unreadable stored lists are treated as empty on write, so the next
/// successful write replaces them.
fn decode_for_write(raw: Option<String>) -> Vec<NewsItem> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    decode(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Discarding unreadable saved list");
        Vec::new()
    })
}

fn encode(items: &[NewsItem]) -> Result<String, StorageError> {
    serde_json::to_string(items).map_err(|source| StorageError::Encode {
        key: KEY_SAVED_NEWS,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    async fn test_store() -> SavedStore {
        SavedStore::new(Database::open(":memory:").await.unwrap())
    }

    fn item(id: &str) -> NewsItem {
        NewsItem {
            id: id.to_string(),
            title: format!("Article {id}"),
            content: "content".to_string(),
            why: "why".to_string(),
            how: "how".to_string(),
            category: "AI".to_string(),
            image_url: Some(format!("https://img.example.com/{id}.jpg")),
            action_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn ids(items: &[NewsItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_empty_when_nothing_saved() {
        let store = test_store().await;
        let outcome = store.list().await;
        assert!(!outcome.is_recovered());
        assert!(outcome.value().is_empty());
    }

    #[tokio::test]
    async fn test_save_prepends_newest_first() {
        let store = test_store().await;
        assert!(store.save(&item("a")).await.into_value());
        assert!(store.save(&item("b")).await.into_value());

        let items = store.list().await.into_value();
        assert_eq!(ids(&items), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_save_twice_keeps_one_entry() {
        let store = test_store().await;
        assert!(store.save(&item("a")).await.into_value());
        assert!(!store.save(&item("a")).await.into_value());

        assert_eq!(store.list().await.into_value().len(), 1);
    }

    #[tokio::test]
    async fn test_save_dedupes_by_id_not_content() {
        let store = test_store().await;
        store.save(&item("a")).await.into_value();

        let mut translated = item("a");
        translated.title = "अनुवादित".to_string();
        assert!(!store.save(&translated).await.into_value());

        let items = store.list().await.into_value();
        assert_eq!(items[0].title, "Article a");
    }

    #[tokio::test]
    async fn test_remove_absent_id_is_noop() {
        let store = test_store().await;
        store.save(&item("a")).await.into_value();

        let outcome = store.remove("zzz").await;
        assert!(!outcome.is_recovered());
        assert!(!outcome.into_value());
        assert_eq!(ids(&store.list().await.into_value()), vec!["a"]);
    }

    #[tokio::test]
    async fn test_remove_keeps_order_of_rest() {
        let store = test_store().await;
        for id in ["a", "b", "c"] {
            store.save(&item(id)).await.into_value();
        }

        assert!(store.remove("b").await.into_value());
        assert_eq!(ids(&store.list().await.into_value()), vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_clear_and_is_saved() {
        let store = test_store().await;
        store.save(&item("a")).await.into_value();
        assert!(store.is_saved("a").await.into_value());
        assert!(!store.is_saved("b").await.into_value());

        store.clear().await.into_value();
        assert!(store.list().await.value().is_empty());
        assert!(!store.is_saved("a").await.into_value());
    }

    #[tokio::test]
    async fn test_toggle_saves_then_removes() {
        let store = test_store().await;
        assert!(store.toggle(&item("a")).await.into_value());
        assert!(store.is_saved("a").await.into_value());
        assert!(!store.toggle(&item("a")).await.into_value());
        assert!(!store.is_saved("a").await.into_value());
    }

    #[tokio::test]
    async fn test_round_trip_is_lossless() {
        let store = test_store().await;
        let original = item("a");
        store.save(&original).await.into_value();

        let items = store.list().await.into_value();
        assert_eq!(items, vec![original]);
    }

    #[tokio::test]
    async fn test_corrupt_value_lists_empty_with_fault() {
        let db = Database::open(":memory:").await.unwrap();
        db.set_value(KEY_SAVED_NEWS, "{not json").await.unwrap();
        let store = SavedStore::new(db);

        let outcome = store.list().await;
        assert!(outcome.value().is_empty());
        assert!(matches!(outcome.fault(), Some(StorageError::Corrupt { .. })));

        // The next save replaces the unreadable value
        assert!(store.save(&item("a")).await.into_value());
        let outcome = store.list().await;
        assert!(!outcome.is_recovered());
        assert_eq!(ids(outcome.value()), vec!["a"]);
    }

    #[tokio::test]
    async fn test_faults_degrade_to_defaults() {
        let db = Database::open(":memory:").await.unwrap();
        let store = SavedStore::new(db.clone());
        db.close().await;

        let listed = store.list().await;
        assert!(listed.is_recovered());
        assert!(listed.value().is_empty());

        let saved = store.save(&item("a")).await;
        assert!(saved.is_recovered());
        assert!(!saved.into_value());

        assert!(store.remove("a").await.is_recovered());
        assert!(store.clear().await.is_recovered());

        let toggled = store.toggle(&item("a")).await;
        assert!(toggled.is_recovered());
        assert!(!toggled.into_value());
    }
}
