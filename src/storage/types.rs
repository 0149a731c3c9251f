use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while opening the database, with user-friendly messages.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of newsdeck appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5), SQLITE_LOCKED (6), SQLITE_CANTOPEN (14)
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
            || error_string.contains("unable to open database file")
        {
            return DatabaseError::InstanceLocked;
        }

        DatabaseError::Other(err)
    }
}

/// Faults inside the key-value layer. Stores collapse these into [`Outcome`]s.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite operation failed (closed pool, I/O, lock timeout)
    #[error("Storage unavailable: {0}")]
    Database(#[from] sqlx::Error),

    /// The stored blob could not be decoded into the expected shape
    #[error("Stored value for '{key}' is unreadable: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized for storage
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Fail-soft Results
// ============================================================================

/// Result of a fail-soft store operation.
///
/// Always carries a usable value. When the persistence layer faulted, the
/// value is the operation's safe default (empty list, `None`, `false`) and
/// the fault is kept for reporting.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    value: T,
    fault: Option<StorageError>,
}

impl<T> Outcome<T> {
    pub(crate) fn clean(value: T) -> Self {
        Self { value, fault: None }
    }

    pub(crate) fn recovered(value: T, fault: StorageError) -> Self {
        Self {
            value,
            fault: Some(fault),
        }
    }

    /// Collapse a fallible store result, logging and substituting `default` on error.
    pub(crate) fn settle(
        op: &'static str,
        result: Result<T, StorageError>,
        default: impl FnOnce() -> T,
    ) -> Self {
        match result {
            Ok(value) => Self::clean(value),
            Err(e) => {
                tracing::warn!(op, error = %e, "Storage operation failed, using default");
                Self::recovered(default(), e)
            }
        }
    }

    /// Transform the value, keeping any recovered fault.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            fault: self.fault,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// The recovered fault, if the operation fell back to its default.
    pub fn fault(&self) -> Option<&StorageError> {
        self.fault.as_ref()
    }

    pub fn is_recovered(&self) -> bool {
        self.fault.is_some()
    }
}
