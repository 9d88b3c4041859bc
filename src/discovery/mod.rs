//! Discovery of deploy-time wiring (gateway URLs, endpoint names) from a
//! parameter store that may not be populated yet when a client starts.

mod store;

pub use store::{HttpParameterStore, ParameterStore, StaticParameterStore};

use crate::{Error, Result, config::ParameterStoreConfig};
use std::{collections::HashMap, time::Duration};
use tracing::{debug, info, warn};

/// The demo workloads and the parameter names their wiring is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    Image,
    Text,
}

impl Workload {
    /// Parameter holding the gateway URL for this workload.
    pub fn api_key(self) -> &'static str {
        match self {
            Self::Image => "txt2img_api_endpoint",
            Self::Text => "txt2nlu_api_endpoint",
        }
    }

    /// Parameter holding the model endpoint name for this workload.
    pub fn endpoint_key(self) -> &'static str {
        match self {
            Self::Image => "txt2img_sm_endpoint",
            Self::Text => "txt2nlu_sm_endpoint",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 12,
        }
    }
}

impl From<&ParameterStoreConfig> for PollPolicy {
    fn from(config: &ParameterStoreConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_attempts: config.max_attempts.max(1),
        }
    }
}

/// Builds the store described by the config: HTTP when a base URL is set,
/// otherwise the static values.
pub fn store_from_config(config: &ParameterStoreConfig) -> Result<Box<dyn ParameterStore>> {
    match &config.base_url {
        Some(base_url) => Ok(Box::new(HttpParameterStore::new(base_url)?)),
        None => Ok(Box::new(StaticParameterStore::new(config.values.clone()))),
    }
}

/// Fetches every name in `names`, retrying the whole set at a fixed interval
/// until all resolve or `policy.max_attempts` is used up.
pub async fn discover(
    store: &dyn ParameterStore,
    names: &[&str],
    policy: PollPolicy,
) -> Result<HashMap<String, String>> {
    let mut last_error = String::new();

    for attempt in 1..=policy.max_attempts {
        match fetch_all(store, names).await {
            Ok(values) => {
                info!("Resolved {} parameters on attempt {}", values.len(), attempt);
                return Ok(values);
            }
            Err(e) => {
                warn!(
                    "Parameter lookup attempt {}/{} failed: {}",
                    attempt, policy.max_attempts, e
                );
                last_error = e.to_string();
            }
        }

        if attempt < policy.max_attempts {
            debug!("Retrying parameter lookup in {:?}", policy.interval);
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(Error::ConfigurationUnavailable {
        attempts: policy.max_attempts,
        last_error,
    })
}

async fn fetch_all(store: &dyn ParameterStore, names: &[&str]) -> Result<HashMap<String, String>> {
    let mut values = HashMap::with_capacity(names.len());
    for name in names {
        let value = store.get(name).await?;
        values.insert((*name).to_string(), value);
    }
    Ok(values)
}
