use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Invalid link: {0}")]
    Invalid(#[from] url::ParseError),

    #[error("Refusing to open {0} link (only http/https)")]
    UnsupportedScheme(String),

    #[error("Refusing to open link with embedded credentials")]
    Credentials,
}

/// Check an article's `action_url` before handing it to the system opener.
///
/// Only `http` and `https` links without userinfo are accepted; anything
/// else (`file:`, `javascript:`, custom handlers) could run local programs.
pub fn validate_link(raw: &str) -> Result<Url, LinkError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(LinkError::UnsupportedScheme(other.to_string())),
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(LinkError::Credentials);
    }
    Ok(url)
}
