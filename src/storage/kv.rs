use super::schema::Database;
use super::types::StorageError;

impl Database {
    // ========================================================================
    // Key-Value Operations
    // ========================================================================

    /// Get the raw stored value for `key`, or `None` if never written.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Replace the stored value for `key` (UPSERT).
    pub async fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Read-modify-write `key` inside a single transaction.
    ///
    /// `update` receives the current value and returns the replacement, or
    /// `None` to leave the row untouched. Returns whether a write happened.
    pub(crate) async fn update_value<F>(&self, key: &str, update: F) -> Result<bool, StorageError>
    where
        F: FnOnce(Option<String>) -> Result<Option<String>, StorageError>,
    {
        let mut tx = self.pool.begin().await?;

        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(next) = update(row.map(|(value,)| value))? else {
            // Dropping the transaction rolls it back
            return Ok(false);
        };

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(&next)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete every listed key in one transaction. Missing keys are ignored.
    pub async fn delete_values(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        for key in keys {
            sqlx::query("DELETE FROM kv_store WHERE key = ?")
                .bind(key)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
