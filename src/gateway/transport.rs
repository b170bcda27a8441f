// src/gateway/transport.rs
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One JSON request/response exchange with the backend.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value>;
}

/// `reqwest` transport: base URL prefix plus the session's bearer token.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        let url = self.url(path);
        tracing::debug!("{} {}", method.as_str(), url);

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let payload = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                // Proxies and crashed backends answer with HTML or plain text.
                Err(_) if !status.is_success() => Value::Null,
                Err(e) => return Err(e.into()),
            }
        };

        if status.is_success() {
            return Ok(payload);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("{} {} rejected: session missing or expired", method.as_str(), url);
        } else {
            tracing::warn!("{} {} failed with {}", method.as_str(), url, status);
        }
        Err(ClientError::from_response(status.as_u16(), &payload))
    }
}
