mod types;

pub use types::*;

use crate::Result;
use serde::Deserialize;
use std::{env, path::Path};
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = load_from(&config_path).await?;

    if let Ok(base_url) = env::var("RUNTIME_BASE_URL") {
        debug!("Overriding runtime base_url from environment");
        config.runtime.base_url = base_url;
    }

    Ok(config)
}

pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Reads only the `parameter_store` section, for clients that never serve.
pub async fn load_parameter_store(path: impl AsRef<Path>) -> Result<ParameterStoreConfig> {
    #[derive(Deserialize)]
    struct Partial {
        #[serde(default)]
        parameter_store: ParameterStoreConfig,
    }

    let config_str = tokio::fs::read_to_string(path.as_ref()).await?;
    let partial: Partial = serde_yaml::from_str(&config_str)?;
    Ok(partial.parameter_store)
}
