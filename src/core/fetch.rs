use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::FetchError;

const USER_AGENT: &str = concat!("cv-tailor/", env!("CARGO_PKG_VERSION"));

/// Download a page and return its body as text
///
/// Any non-success status is an error; there are no retries.
pub async fn fetch_text(url: &str, timeout_seconds: u64) -> Result<String, FetchError> {
    let parsed = parse_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    debug!("Fetching {} (timeout {}s)", parsed, timeout_seconds);

    let response = client.get(parsed).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                seconds: timeout_seconds,
            }
        } else {
            FetchError::RequestFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| FetchError::RequestFailed {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    info!("Fetched {} characters from {}", body.len(), url);
    Ok(body)
}

/// Parse and check a URL before any network I/O
pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}
