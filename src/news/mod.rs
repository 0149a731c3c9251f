//! News data model and the client that fetches localized feeds.
//!
//! - [`client`] - HTTP client for the news API with sample-data fallback
//! - [`samples`] - Built-in sample articles and the default language list
//!
//! The swipe session depends only on the [`NewsSource`] trait, so tests can
//! swap the HTTP client for an in-memory double.

mod client;
mod samples;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::{FetchError, NewsClient};
pub use samples::{default_languages, sample_news};

/// Language used whenever none is stored or a localization is missing.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A single news article, already resolved to one language.
///
/// `id` is stable across languages: the same article fetched in two
/// languages carries the same `id`, which is what save/unsave dedupes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub why: String,
    pub how: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A selectable interface language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
    pub flag: String,
}

/// Anything that can produce a deck of articles for a language.
///
/// [`NewsClient`] never returns `Err` here (it falls back to sample data);
/// the `Result` exists so the session can absorb failures from other sources.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self, language: &str) -> Result<Vec<NewsItem>, FetchError>;
}

/// Sort articles newest first.
pub(crate) fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
