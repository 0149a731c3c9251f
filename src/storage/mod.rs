mod kv;
mod preferences;
mod saved;
mod schema;
mod types;

pub use preferences::PreferenceStore;
pub use saved::SavedStore;
pub use schema::Database;
pub use types::{DatabaseError, Outcome, StorageError};

// Blob keys in `kv_store`
pub(crate) const KEY_LANGUAGE: &str = "language";
pub(crate) const KEY_SAVED_NEWS: &str = "saved_news";
pub(crate) const KEY_PREFERENCES: &str = "preferences";
