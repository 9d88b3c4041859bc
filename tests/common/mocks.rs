use async_trait::async_trait;
use genai_gateway::{
    Error, Result, discovery::ParameterStore, endpoint::EndpointInvoker, error::EndpointError,
    inference::WirePayload,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call recorded by [`MockEndpointInvoker`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint_name: String,
    pub payload: WirePayload,
    pub timeout: Duration,
}

/// Mock endpoint invoker for testing
#[derive(Debug, Clone)]
pub struct MockEndpointInvoker {
    pub responses: Arc<Mutex<Vec<Vec<u8>>>>,
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    pub error: Option<EndpointError>,
}

impl MockEndpointInvoker {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_response(self, body: impl Into<Vec<u8>>) -> Self {
        self.responses.lock().unwrap().push(body.into());
        self
    }

    pub fn with_json(self, body: serde_json::Value) -> Self {
        self.with_response(body.to_string())
    }

    pub fn with_error(mut self, error: EndpointError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EndpointInvoker for MockEndpointInvoker {
    async fn invoke(
        &self,
        endpoint_name: &str,
        payload: &WirePayload,
        timeout: Duration,
    ) -> std::result::Result<Vec<u8>, EndpointError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint_name: endpoint_name.to_string(),
            payload: payload.clone(),
            timeout,
        });

        if let Some(ref error) = self.error {
            return Err(error.clone());
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(EndpointError::Transport {
                endpoint: endpoint_name.to_string(),
                message: "No more mock responses available".to_string(),
            });
        }

        // The last response is reused so concurrent tests need only one
        if responses.len() == 1 {
            Ok(responses[0].clone())
        } else {
            Ok(responses.remove(0))
        }
    }
}

impl Default for MockEndpointInvoker {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameter store that fails a fixed number of lookups before answering.
#[derive(Debug, Clone)]
pub struct FlakyParameterStore {
    pub values: HashMap<String, String>,
    pub failures_left: Arc<Mutex<u32>>,
    pub lookups: Arc<Mutex<u32>>,
}

impl FlakyParameterStore {
    pub fn new(values: &[(&str, &str)], failures: u32) -> Self {
        Self {
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            failures_left: Arc::new(Mutex::new(failures)),
            lookups: Arc::new(Mutex::new(0)),
        }
    }

    pub fn lookups(&self) -> u32 {
        *self.lookups.lock().unwrap()
    }
}

#[async_trait]
impl ParameterStore for FlakyParameterStore {
    async fn get(&self, name: &str) -> Result<String> {
        *self.lookups.lock().unwrap() += 1;

        let mut failures_left = self.failures_left.lock().unwrap();
        if *failures_left > 0 {
            *failures_left -= 1;
            return Err(Error::parameter_store("store not ready"));
        }

        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| Error::parameter_store(format!("parameter '{}' not found", name)))
    }
}
