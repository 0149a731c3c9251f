use std::sync::Arc;

use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::response::status::NotFound;
use rocket::serde::json::Json;
use rocket::{catch, get, Request, State};
use serde::Serialize;

use super::catalog::Catalog;
use crate::news::{Language, NewsItem, DEFAULT_LANGUAGE};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

fn language_or_default(language: Option<&str>) -> &str {
    match language {
        Some(code) if !code.is_empty() => code,
        _ => DEFAULT_LANGUAGE,
    }
}

/// All articles for `language`, newest first.
#[get("/news?<language>")]
pub async fn list_news(catalog: &State<Arc<Catalog>>, language: Option<&str>) -> Json<Vec<NewsItem>> {
    Json(catalog.localized(language_or_default(language)))
}

#[get("/news/<id>?<language>")]
pub async fn get_news(
    catalog: &State<Arc<Catalog>>,
    id: &str,
    language: Option<&str>,
) -> Result<Json<NewsItem>, NotFound<Json<ErrorBody>>> {
    catalog
        .find(id, language_or_default(language))
        .map(Json)
        .ok_or_else(|| {
            tracing::debug!(id, "News not found");
            NotFound(Json(ErrorBody {
                error: "News not found".to_string(),
            }))
        })
}

#[get("/languages")]
pub async fn languages(catalog: &State<Arc<Catalog>>) -> Json<Vec<Language>> {
    Json(catalog.languages().to_vec())
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
    })
}

#[catch(default)]
pub fn default_catcher(status: Status, request: &Request<'_>) -> Json<ErrorBody> {
    tracing::debug!(uri = %request.uri(), status = status.code, "Request failed");
    Json(ErrorBody {
        error: status.reason_lossy().to_string(),
    })
}
