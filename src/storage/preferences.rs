use serde_json::{Map, Value};

use crate::news::DEFAULT_LANGUAGE;

use super::schema::Database;
use super::types::{Outcome, StorageError};
use super::{KEY_LANGUAGE, KEY_PREFERENCES, KEY_SAVED_NEWS};

/// Fail-soft store for the selected language and the flat preference map.
#[derive(Clone)]
pub struct PreferenceStore {
    db: Database,
}

impl PreferenceStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ========================================================================
    // Language
    // ========================================================================

    /// The stored language code, or `"en"` when unset or unreadable.
    pub async fn language(&self) -> String {
        self.stored_language()
            .await
            .into_value()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// The raw stored language code, `None` if never set.
    pub async fn stored_language(&self) -> Outcome<Option<String>> {
        let result = self.db.get_value(KEY_LANGUAGE).await;
        Outcome::settle("preferences.stored_language", result, || None)
    }

    pub async fn set_language(&self, code: &str) -> Outcome<()> {
        let result = self.db.set_value(KEY_LANGUAGE, code).await;
        if result.is_ok() {
            tracing::info!(language = code, "Language changed");
        }
        Outcome::settle("preferences.set_language", result, || ())
    }

    // ========================================================================
    // Preference Map
    // ========================================================================

    /// Look up one preference from the stored map.
    pub async fn get(&self, key: &str) -> Outcome<Option<Value>> {
        let result = self
            .db
            .get_value(KEY_PREFERENCES)
            .await
            .and_then(|raw| match raw {
                Some(raw) => decode(&raw).map(|mut map| map.remove(key)),
                None => Ok(None),
            });
        Outcome::settle("preferences.get", result, || None)
    }

    /// Set one preference, replacing the whole stored map.
    pub async fn set(&self, key: &str, value: Value) -> Outcome<()> {
        let result = self
            .db
            .update_value(KEY_PREFERENCES, |raw| {
                let mut map = match raw.as_deref().map(decode) {
                    Some(Ok(map)) => map,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Discarding unreadable preferences");
                        Map::new()
                    }
                    None => Map::new(),
                };
                map.insert(key.to_string(), value);
                serde_json::to_string(&map)
                    .map(Some)
                    .map_err(|source| StorageError::Encode {
                        key: KEY_PREFERENCES,
                        source,
                    })
            })
            .await
            .map(|_| ());
        Outcome::settle("preferences.set", result, || ())
    }

    /// Convenience for boolean toggles such as `dark_mode`. Missing or
    /// non-boolean values read as `default`.
    pub async fn get_bool(&self, key: &str, default: bool) -> Outcome<bool> {
        self.get(key)
            .await
            .map(|value| value.as_ref().and_then(Value::as_bool).unwrap_or(default))
    }

    /// Forget language, preferences and saved items in one transaction.
    pub async fn clear_all(&self) -> Outcome<()> {
        let result = self
            .db
            .delete_values(&[KEY_LANGUAGE, KEY_SAVED_NEWS, KEY_PREFERENCES])
            .await;
        if result.is_ok() {
            tracing::info!("Cleared all local data");
        }
        Outcome::settle("preferences.clear_all", result, || ())
    }
}

fn decode(raw: &str) -> Result<Map<String, Value>, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Corrupt {
        key: KEY_PREFERENCES,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SavedStore;
    use serde_json::json;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_language_defaults_to_english() {
        let prefs = PreferenceStore::new(test_db().await);
        assert_eq!(prefs.language().await, "en");
        assert_eq!(prefs.stored_language().await.into_value(), None);
    }

    #[tokio::test]
    async fn test_set_language() {
        let prefs = PreferenceStore::new(test_db().await);
        prefs.set_language("te").await.into_value();
        assert_eq!(prefs.language().await, "te");
        assert_eq!(prefs.stored_language().await.into_value().as_deref(), Some("te"));
    }

    #[tokio::test]
    async fn test_get_set_preferences() {
        let prefs = PreferenceStore::new(test_db().await);
        assert_eq!(prefs.get("dark_mode").await.into_value(), None);

        prefs.set("dark_mode", json!(true)).await.into_value();
        prefs.set("notifications", json!(false)).await.into_value();
        prefs.set("dark_mode", json!(false)).await.into_value();

        assert_eq!(prefs.get("dark_mode").await.into_value(), Some(json!(false)));
        assert_eq!(prefs.get("notifications").await.into_value(), Some(json!(false)));
    }

    #[tokio::test]
    async fn test_get_bool_default() {
        let prefs = PreferenceStore::new(test_db().await);
        assert!(prefs.get_bool("notifications", true).await.into_value());

        prefs.set("notifications", json!("yes")).await.into_value();
        assert!(!prefs.get_bool("notifications", false).await.into_value());

        prefs.set("notifications", json!(false)).await.into_value();
        assert!(!prefs.get_bool("notifications", true).await.into_value());
    }

    #[tokio::test]
    async fn test_corrupt_preferences_read_as_none() {
        let db = test_db().await;
        db.set_value(KEY_PREFERENCES, "[1,2").await.unwrap();
        let prefs = PreferenceStore::new(db);

        let outcome = prefs.get("dark_mode").await;
        assert!(outcome.is_recovered());
        assert_eq!(outcome.into_value(), None);

        prefs.set("dark_mode", json!(true)).await.into_value();
        assert_eq!(prefs.get("dark_mode").await.into_value(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_clear_all_removes_everything() {
        let db = test_db().await;
        let prefs = PreferenceStore::new(db.clone());
        let saved = SavedStore::new(db);

        prefs.set_language("hi").await.into_value();
        prefs.set("dark_mode", json!(true)).await.into_value();
        saved
            .save(&crate::news::sample_news("en")[0])
            .await
            .into_value();

        let outcome = prefs.clear_all().await;
        assert!(!outcome.is_recovered());

        assert_eq!(prefs.language().await, "en");
        assert_eq!(prefs.get("dark_mode").await.into_value(), None);
        assert!(saved.list().await.value().is_empty());
    }

    #[tokio::test]
    async fn test_language_survives_failures_as_default() {
        let db = test_db().await;
        let prefs = PreferenceStore::new(db.clone());
        prefs.set_language("te").await.into_value();
        db.close().await;

        assert_eq!(prefs.language().await, "en");
        assert!(prefs.set_language("hi").await.is_recovered());
    }

    #[tokio::test]
    async fn test_language_persists_across_reopen() {
        let dir = std::env::temp_dir().join(format!("newsdeck_prefs_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("newsdeck.db");
        let _ = std::fs::remove_file(&path);
        let path_str = path.to_str().unwrap();

        {
            let db = Database::open(path_str).await.unwrap();
            PreferenceStore::new(db.clone())
                .set_language("te")
                .await
                .into_value();
            db.close().await;
        }

        let db = Database::open(path_str).await.unwrap();
        assert_eq!(PreferenceStore::new(db.clone()).language().await, "te");
        db.close().await;

        let _ = std::fs::remove_dir_all(&dir);
    }
}
