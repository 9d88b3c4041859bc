use crate::{
    Error, Result,
    config::RuntimeConfig,
    error::EndpointError,
    inference::WirePayload,
};
use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use std::time::Duration;
use tracing::debug;

const BODY_PREVIEW_LIMIT: usize = 1024;

#[async_trait]
pub trait EndpointInvoker: Send + Sync {
    /// Sends one payload to a named endpoint and returns the raw response body.
    async fn invoke(
        &self,
        endpoint_name: &str,
        payload: &WirePayload,
        timeout: Duration,
    ) -> std::result::Result<Vec<u8>, EndpointError>;
}

/// Invokes endpoints on a model-serving runtime over HTTP.
///
/// One instance is built at startup and shared across requests so the
/// underlying connection pool is reused.
pub struct HttpEndpointInvoker {
    client: Client,
    base_url: Url,
}

impl HttpEndpointInvoker {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::config(format!("Invalid runtime base_url '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Runtime base_url cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::config(format!("Invalid runtime header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                Error::config(format!("Invalid value for runtime header '{}': {}", name, e))
            })?;
            headers.insert(name, value);
        }

        // The call deadline is set per request in invoke()
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, base_url })
    }

    fn invocation_url(&self, endpoint_name: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was ruled out in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["endpoints", endpoint_name, "invocations"]);
        }
        url
    }
}

#[async_trait]
impl EndpointInvoker for HttpEndpointInvoker {
    async fn invoke(
        &self,
        endpoint_name: &str,
        payload: &WirePayload,
        timeout: Duration,
    ) -> std::result::Result<Vec<u8>, EndpointError> {
        let url = self.invocation_url(endpoint_name);
        debug!(
            "Invoking endpoint {} ({} bytes, {})",
            endpoint_name,
            payload.body.len(),
            payload.content_type
        );

        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .header(CONTENT_TYPE, payload.content_type)
            .header(ACCEPT, "application/json")
            .body(payload.body.clone())
            .send()
            .await
            .map_err(|e| classify(endpoint_name, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify(endpoint_name, e))?;

        debug!(
            "Endpoint {} responded with {} ({} bytes)",
            endpoint_name,
            status,
            body.len()
        );

        if !status.is_success() {
            return Err(EndpointError::Status {
                endpoint: endpoint_name.to_string(),
                status: status.as_u16(),
                body: preview(&body, BODY_PREVIEW_LIMIT),
            });
        }

        Ok(body.to_vec())
    }
}

fn classify(endpoint_name: &str, err: reqwest::Error) -> EndpointError {
    let endpoint = endpoint_name.to_string();
    if err.is_timeout() {
        EndpointError::Timeout { endpoint }
    } else if err.is_connect() {
        EndpointError::Connection {
            endpoint,
            message: err.to_string(),
        }
    } else {
        EndpointError::Transport {
            endpoint,
            message: err.to_string(),
        }
    }
}

/// Lossy UTF-8 rendering of at most `limit` bytes, for logs and error text.
pub fn preview(body: &[u8], limit: usize) -> String {
    let end = body.len().min(limit);
    let mut text = String::from_utf8_lossy(&body[..end]).into_owned();
    if body.len() > limit {
        text.push_str("...");
    }
    text
}
