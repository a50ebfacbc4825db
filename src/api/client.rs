//! HTTP wrapper around the lead management API

use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::CredentialStore;

use super::RequestDescriptor;

/// Thin client over `reqwest`.
///
/// Reads the bearer token from the credential store on every call, so a
/// login or logout is visible to the next request without rebuilding the
/// client. Each call is a single attempt: no retries, no caching.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Create a client for `base_url`, e.g. `http://127.0.0.1:5000`
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let parsed =
            Url::parse(base_url).map_err(|_| Error::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::new(&config.api.base_url, credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request and return the raw body of a 2xx response.
    ///
    /// `fallback` names the operation; it becomes the error message when the
    /// server gives no usable one.
    pub async fn execute(&self, request: RequestDescriptor, fallback: &str) -> Result<Vec<u8>> {
        let url = self.url(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if request.requires_auth {
            let token = self
                .credentials
                .access_token()?
                .ok_or(Error::NotAuthenticated)?;
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|source| {
            tracing::warn!(method = %request.method, path = %request.path, error = %source, "request failed");
            Error::Transport {
                context: fallback.to_string(),
                source,
            }
        })?;

        let status = response.status();
        tracing::debug!(method = %request.method, path = %request.path, status = status.as_u16(), "api response");

        let body = response.bytes().await.map_err(|source| Error::Transport {
            context: fallback.to_string(),
            source,
        })?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let message = error_message(&body, fallback);
        tracing::warn!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            message = %message,
            "api error"
        );
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Issue a request and decode the JSON body
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
        fallback: &str,
    ) -> Result<T> {
        let body = self.execute(request, fallback).await?;
        decode(&body, fallback)
    }

    /// Issue a request whose body is of no interest
    pub async fn send(&self, request: RequestDescriptor, fallback: &str) -> Result<()> {
        self.execute(request, fallback).await.map(|_| ())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8], context: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| Error::Decode {
        context: context.to_string(),
        source,
    })
}

/// Pick the server's message out of an error body.
///
/// Looks at `error`, then `message`, then `msg` (what the JWT layer uses).
/// Anything else, including an empty or non-JSON body, yields `fallback`.
pub(crate) fn error_message(body: &[u8], fallback: &str) -> String {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return fallback.to_string();
    };

    ["error", "message", "msg"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
