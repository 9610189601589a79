//! Bearer-authenticated JSON transport shared by the REST clients.

use crate::error::{AssistantError, AssistantResult};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("assistant-mcp/", env!("CARGO_PKG_VERSION"));

/// HTTP transport bound to one API base URL and one access token.
#[derive(Debug, Clone)]
pub struct ApiTransport {
    client: Client,
    base_url: Url,
}

impl ApiTransport {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> AssistantResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AssistantError::Config(format!(
                "API URL cannot be used as a base: {}",
                base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AssistantError::Config("Invalid access token format".to_string()))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a `/` inside a segment
    /// becomes `%2F` instead of introducing a new path level.
    pub fn endpoint(&self, segments: &[&str]) -> AssistantResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AssistantError::Config(format!("API URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a GET request with query parameters and decode the JSON body.
    pub async fn get_json<T, Q>(&self, url: Url, query: &Q) -> AssistantResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!(url = %url, "GET request");

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::from_response(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
