use super::mocks::MockEndpointInvoker;
use genai_gateway::{
    config::{
        Config, HandlerConfig, LogsConfig, ParameterStoreConfig, RuntimeConfig, ServerConfig,
    },
    inference::{GenerationProfile, InferenceHandler, ModelFamily},
    server,
};
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Create a test configuration with one image and one text handler
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        runtime: RuntimeConfig {
            base_url: "http://localhost:9000".to_string(),
            timeout_secs: 180,
            headers: HashMap::new(),
        },
        handlers: vec![
            HandlerConfig {
                name: "txt2img".to_string(),
                path: "/txt2img".to_string(),
                family: ModelFamily::RawText,
                max_characters: None,
                profile: GenerationProfile::default(),
            },
            HandlerConfig {
                name: "txt2nlu".to_string(),
                path: "/txt2nlu".to_string(),
                family: ModelFamily::NestedParams,
                max_characters: Some(1700),
                profile: GenerationProfile::default(),
            },
        ],
        parameter_store: ParameterStoreConfig::default(),
    }
}

pub fn text_handler(invoker: &MockEndpointInvoker, family: ModelFamily) -> InferenceHandler {
    InferenceHandler::from_config(
        &HandlerConfig {
            name: "text".to_string(),
            path: "/text".to_string(),
            family,
            max_characters: Some(1700),
            profile: GenerationProfile::default(),
        },
        Arc::new(invoker.clone()),
        TEST_TIMEOUT,
    )
    .unwrap()
}

pub fn image_handler(invoker: &MockEndpointInvoker) -> InferenceHandler {
    InferenceHandler::new(
        "image",
        ModelFamily::RawText,
        GenerationProfile::default(),
        None,
        Arc::new(invoker.clone()),
        TEST_TIMEOUT,
    )
}

/// Router for the test config with every handler backed by `invoker`
pub fn create_test_app(invoker: &MockEndpointInvoker) -> Router {
    let routes = server::build_routes(&create_test_config(), Arc::new(invoker.clone())).unwrap();
    server::router(routes)
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  logs:
    level: "debug"

runtime:
  base_url: "http://localhost:9000"
  timeout_secs: 60
  headers:
    x-api-key: "local-dev"

handlers:
  - name: txt2img
    path: /txt2img
    family: raw_text
  - name: txt2nlu
    path: /txt2nlu
    family: flat_params
    max_characters: 1700
    profile:
      max_length: 256
      num_return_sequences: 2
      top_k: 50
      top_p: 0.95
      do_sample: false

parameter_store:
  base_url: "http://localhost:9100"
  poll_interval_secs: 1
  max_attempts: 3
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
runtime:
  base_url: "http://localhost:9000"
handlers:
  - name: txt2nlu
    path: /txt2nlu
    family: "unknown-family"
"#;
