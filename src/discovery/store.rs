use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Read-only access to the key-value store the infrastructure publishes
/// endpoint names and URLs into.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetParameterResponse {
    parameter: Parameter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Parameter {
    value: Option<String>,
}

pub struct HttpParameterStore {
    client: Client,
    base_url: Url,
}

impl HttpParameterStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            Error::config(format!("Invalid parameter store url '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Parameter store url cannot carry a path: {}",
                base_url
            )));
        }
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, base_url })
    }

    fn parameter_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["parameters", name]);
        }
        url
    }
}

#[async_trait]
impl ParameterStore for HttpParameterStore {
    async fn get(&self, name: &str) -> Result<String> {
        let url = self.parameter_url(name);
        debug!("Fetching parameter {} from {}", name, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::parameter_store(format!(
                "lookup of '{}' returned HTTP {}",
                name, status
            )));
        }

        let document: GetParameterResponse = response.json().await?;
        document
            .parameter
            .value
            .ok_or_else(|| Error::parameter_store(format!("parameter '{}' has no value", name)))
    }
}

/// Fixed set of parameters held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticParameterStore {
    values: HashMap<String, String>,
}

impl StaticParameterStore {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

#[async_trait]
impl ParameterStore for StaticParameterStore {
    async fn get(&self, name: &str) -> Result<String> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| Error::parameter_store(format!("parameter '{}' not found", name)))
    }
}
