//! HTTP clients for the blog API and the assistant services

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

pub mod assistant;
pub mod blog;
pub mod error;

pub use assistant::AssistantClient;
pub use blog::BlogClient;
pub use error::{ApiError, Result};

/// Shared plumbing of the API clients: a configured `reqwest` client and a base URL
#[derive(Debug, Clone)]
struct HttpApi {
    http: Client,
    base_url: Url,
}

impl HttpApi {
    fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}: unsupported scheme {}",
                base_url.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

/// Turn a non-success response into an [`ApiError`]
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    log::debug!("{url} failed with {status}: {body}");
    Err(ApiError::from_response(status, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = ensure_success(response).await?.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}
