//! Shared blocking JSON transport for the inference endpoints.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use lexrag_core::{Error, Result, Service};

/// One endpoint, one client. Non-success statuses and transport failures
/// become `Error::Upstream`; nothing here retries.
#[derive(Clone)]
pub(crate) struct JsonEndpoint {
    client: Client,
    url: String,
    service: Service,
}

impl JsonEndpoint {
    pub(crate) fn new(service: Service, url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !api_key.trim().is_empty() {
            let auth = format!("Bearer {}", api_key.trim());
            let value = HeaderValue::from_str(&auth)
                .map_err(|_| Error::InvalidConfig("inference.api_key contains invalid header characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build {service} HTTP client: {e}")))?;
        Ok(Self { client, url: url.to_string(), service })
    }

    pub(crate) fn service(&self) -> Service {
        self.service
    }

    pub(crate) fn post<B, R>(&self, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let resp = self.client.post(&self.url).json(body).send().map_err(|e| Error::Upstream {
            service: self.service,
            status: e.status().map(|s| s.as_u16()),
            body: e.to_string(),
        })?;
        let status = resp.status();
        let text = resp
            .text()
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        debug!(service = %self.service, status = status.as_u16(), bytes = text.len(), "inference response");
        if !status.is_success() {
            return Err(Error::Upstream { service: self.service, status: Some(status.as_u16()), body: text });
        }
        serde_json::from_str(&text).map_err(|e| self.malformed(e.to_string()))
    }

    pub(crate) fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::MalformedResponse { service: self.service, reason: reason.into() }
    }
}
