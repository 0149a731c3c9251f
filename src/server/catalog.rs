//! Records served by the news API, each carrying every localization.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::news::{default_languages, Language, NewsItem, DEFAULT_LANGUAGE};

/// Built-in catalog used when no `catalog_path` is configured.
const SEED: &str = include_str!("../../assets/seed_catalog.json");

/// Maximum catalog file size (4 MB)
const MAX_CATALOG_SIZE: u64 = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog file too large ({size} bytes, max {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Duplicate news id '{0}' in catalog")]
    DuplicateId(String),
}

/// Language code → text.
pub type LocalizedText = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRecord {
    pub id: String,
    pub title: LocalizedText,
    pub content: LocalizedText,
    pub why: LocalizedText,
    pub how: LocalizedText,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewsRecord {
    /// Resolve every text field to `language`, falling back to English per field.
    pub fn localize(&self, language: &str) -> NewsItem {
        NewsItem {
            id: self.id.clone(),
            title: pick(&self.title, language),
            content: pick(&self.content, language),
            why: pick(&self.why, language),
            how: pick(&self.how, language),
            category: self.category.clone(),
            image_url: self.image_url.clone(),
            action_url: self.action_url.clone(),
            created_at: self.created_at,
        }
    }
}

fn pick(text: &LocalizedText, language: &str) -> String {
    text.get(language)
        .or_else(|| text.get(DEFAULT_LANGUAGE))
        .cloned()
        .unwrap_or_default()
}

/// Read-only set of records, kept newest first.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<NewsRecord>,
    languages: Vec<Language>,
}

impl Catalog {
    pub fn from_records(mut records: Vec<NewsRecord>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Self {
            records,
            languages: default_languages(),
        })
    }

    /// The built-in three-article catalog.
    pub fn seed() -> Result<Self, CatalogError> {
        Self::from_records(serde_json::from_str(SEED)?)
    }

    /// Load a JSON array of records from `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_CATALOG_SIZE {
            return Err(CatalogError::TooLarge {
                size,
                max: MAX_CATALOG_SIZE,
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_records(serde_json::from_str(&contents)?)?;
        tracing::info!(path = %path.display(), records = catalog.len(), "Loaded news catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record resolved to `language`, newest first.
    pub fn localized(&self, language: &str) -> Vec<NewsItem> {
        self.records.iter().map(|r| r.localize(language)).collect()
    }

    pub fn find(&self, id: &str, language: &str) -> Option<NewsItem> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.localize(language))
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }
}
