use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::samples::{default_languages, sample_news};
use super::{sort_newest_first, Language, NewsItem, NewsSource};

const MAX_RETRIES: u32 = 2;
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Errors that can occur while talking to the news API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with a non-2xx status other than 404
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The requested article does not exist
    #[error("News not found")]
    NotFound,
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Body was not the expected JSON shape
    #[error("Invalid response body: {0}")]
    Decode(String),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Base URL could not be used to build API endpoints
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// HTTP client for the news API.
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl NewsClient {
    /// Create a client for the API rooted at `base_url` (e.g. `http://localhost:3000/api`).
    ///
    /// `timeout` bounds each request; a request that exceeds it is treated as a
    /// transport failure.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;
        Self::with_http_client(http, base_url, timeout)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "{} is not an http(s) base URL",
                base_url
            )));
        }
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the localized feed, newest first.
    ///
    /// Never fails: on any transport problem the built-in sample deck for
    /// `language` is returned (or the default-language deck if there is none).
    pub async fn fetch_news(&self, language: &str) -> Vec<NewsItem> {
        match self.try_fetch_news(language).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    language,
                    error = %e,
                    "News fetch failed, falling back to sample data"
                );
                sample_news(language)
            }
        }
    }

    /// Fetch the localized feed without falling back to sample data.
    pub async fn try_fetch_news(&self, language: &str) -> Result<Vec<NewsItem>, FetchError> {
        let url = self.endpoint(&["news"], Some(language));
        let bytes = self.get_bytes(&url).await?;
        let mut items: Vec<NewsItem> =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        sort_newest_first(&mut items);
        tracing::debug!(language, count = items.len(), "Fetched news");
        Ok(items)
    }

    /// Fetch a single article. Returns [`FetchError::NotFound`] for unknown ids.
    pub async fn fetch_news_item(&self, id: &str, language: &str) -> Result<NewsItem, FetchError> {
        let url = self.endpoint(&["news", id], Some(language));
        let bytes = self.get_bytes(&url).await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Fetch the supported languages, falling back to the built-in list.
    pub async fn languages(&self) -> Vec<Language> {
        let url = self.endpoint(&["languages"], None);
        let result = match self.get_bytes(&url).await {
            Ok(bytes) => serde_json::from_slice::<Vec<Language>>(&bytes)
                .map_err(|e| FetchError::Decode(e.to_string())),
            Err(e) => Err(e),
        };
        match result {
            Ok(languages) if !languages.is_empty() => languages,
            Ok(_) => default_languages(),
            Err(e) => {
                tracing::warn!(error = %e, "Language list fetch failed, using defaults");
                default_languages()
            }
        }
    }

    fn endpoint(&self, segments: &[&str], language: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor: base URLs are never cannot-be-a-base.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if let Some(language) = language {
            url.query_pairs_mut().append_pair("language", language);
        }
        url
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let mut retry_count = 0;

        loop {
            let response = tokio::time::timeout(self.timeout, self.http.get(url.clone()).send())
                .await
                .map_err(|_| FetchError::Timeout)?
                .map_err(FetchError::Network)?;

            let status = response.status();

            // Server errors are retried with exponential backoff
            if status.is_server_error() {
                if retry_count >= MAX_RETRIES {
                    return Err(FetchError::HttpStatus(status.as_u16()));
                }
                let delay = RETRY_BASE_DELAY * 2u32.pow(retry_count);
                tracing::warn!(
                    url = %url,
                    status = %status,
                    retry = retry_count,
                    delay_ms = delay.as_millis() as u64,
                    "Server error, retrying after delay"
                );
                tokio::time::sleep(delay).await;
                retry_count += 1;
                continue;
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound);
            }

            if !status.is_success() {
                return Err(FetchError::HttpStatus(status.as_u16()));
            }

            return tokio::time::timeout(self.timeout, read_limited_bytes(response, MAX_BODY_SIZE))
                .await
                .map_err(|_| FetchError::Timeout)?;
        }
    }
}

#[async_trait]
impl NewsSource for NewsClient {
    async fn fetch(&self, language: &str) -> Result<Vec<NewsItem>, FetchError> {
        Ok(self.fetch_news(language).await)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NEWS_JSON: &str = r#"[
        {"id":"a","title":"Older","content":"c","why":"w","how":"h","category":"AI",
         "createdAt":"2024-01-01T00:00:00.000Z"},
        {"id":"b","title":"Newer","content":"c","why":"w","how":"h","category":"Mobile",
         "imageUrl":"https://example.com/b.jpg","createdAt":"2024-02-01T00:00:00.000Z"}
    ]"#;

    fn client_for(server: &MockServer) -> NewsClient {
        NewsClient::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let result = NewsClient::new("mailto:someone@example.com", Duration::from_secs(1));
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_building() {
        let client =
            NewsClient::new("http://localhost:3000/api/", Duration::from_secs(1)).unwrap();
        let url = client.endpoint(&["news", "42"], Some("te"));
        assert_eq!(url.as_str(), "http://localhost:3000/api/news/42?language=te");
    }

    #[tokio::test]
    async fn test_fetch_news_sorted_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_JSON))
            .mount(&server)
            .await;

        let items = client_for(&server).try_fetch_news("en").await.unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(items[0].image_url.as_deref(), Some("https://example.com/b.jpg"));
    }

    #[tokio::test]
    async fn test_server_error_retries_then_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3) // Initial request + 2 retries
            .mount(&server)
            .await;

        let items = client_for(&server).fetch_news("te").await;
        let titles: Vec<_> = items.iter().map(|i| i.title.clone()).collect();
        let expected: Vec<_> = sample_news("te").into_iter().map(|i| i.title).collect();
        assert_eq!(titles, expected);
    }

    #[tokio::test]
    async fn test_unknown_language_failure_uses_default_samples() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let items = client_for(&server).fetch_news("fr").await;
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["ChatGPT Vision Update", "GitHub Copilot Workspace"]);
    }

    #[tokio::test]
    async fn test_timeout_treated_as_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(NEWS_JSON)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client =
            NewsClient::new(&format!("{}/api", server.uri()), Duration::from_millis(100)).unwrap();

        let err = client.try_fetch_news("en").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout), "got {:?}", err);

        let items = client.fetch_news("en").await;
        assert_eq!(items[0].title, "ChatGPT Vision Update");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).try_fetch_news("en").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_news_item_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/news/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"error":"News not found"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_news_item("missing", "en")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound));
    }

    #[tokio::test]
    async fn test_fetch_news_item_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/news/a"))
            .and(query_param("language", "hi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id":"a","title":"T","content":"c","why":"w","how":"h","category":"AI",
                    "createdAt":"2024-01-01T00:00:00Z"}"#,
            ))
            .mount(&server)
            .await;

        let item = client_for(&server).fetch_news_item("a", "hi").await.unwrap();
        assert_eq!(item.id, "a");
    }

    #[tokio::test]
    async fn test_languages_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let languages = client_for(&server).languages().await;
        assert_eq!(languages, default_languages());
    }

    #[tokio::test]
    async fn test_news_source_never_fails_for_client() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let source: &dyn NewsSource = &client_for(&server);
        let items = source.fetch("hi").await.unwrap();
        assert_eq!(items.len(), 1);
    }
}
