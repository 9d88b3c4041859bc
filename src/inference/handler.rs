use super::{
    ClientResponse, GenerationProfile, InferenceRequest, ModelFamily, TruncationBound, normalize,
};
use crate::{
    Error, Result,
    config::HandlerConfig,
    endpoint::{EndpointInvoker, client::preview},
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

const RAW_LOG_LIMIT: usize = 4096;

/// Turns a prompt into a model call and the model's answer into a
/// [`ClientResponse`], for one model family.
pub struct InferenceHandler {
    name: String,
    family: ModelFamily,
    profile: GenerationProfile,
    truncation: Option<TruncationBound>,
    invoker: Arc<dyn EndpointInvoker>,
    timeout: Duration,
}

impl InferenceHandler {
    pub fn new(
        name: impl Into<String>,
        family: ModelFamily,
        profile: GenerationProfile,
        truncation: Option<TruncationBound>,
        invoker: Arc<dyn EndpointInvoker>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            profile,
            truncation,
            invoker,
            timeout,
        }
    }

    pub fn from_config(
        config: &HandlerConfig,
        invoker: Arc<dyn EndpointInvoker>,
        timeout: Duration,
    ) -> Result<Self> {
        config.profile.validate()?;
        let truncation = config
            .max_characters
            .map(TruncationBound::new)
            .transpose()?;

        Ok(Self::new(
            config.name.clone(),
            config.family,
            config.profile.clone(),
            truncation,
            invoker,
            timeout,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub async fn handle(&self, request: InferenceRequest) -> Result<ClientResponse> {
        let (prompt, endpoint_name) = validate(&request)?;

        let (sent, was_truncated) = match self.truncation {
            Some(bound) => normalize(prompt, bound),
            None => (prompt, false),
        };
        if was_truncated {
            info!(
                "[{}] Prompt truncated from {} to {} characters",
                self.name,
                prompt.chars().count(),
                sent.chars().count()
            );
        }

        let payload = self.family.encode(sent, &self.profile)?;
        debug!(
            "[{}] Encoded {:?} payload for endpoint {}",
            self.name, self.family, endpoint_name
        );

        let raw = self
            .invoker
            .invoke(endpoint_name, &payload, self.timeout)
            .await
            .inspect_err(|e| warn!("[{}] Endpoint call failed: {}", self.name, e))?;

        let generation = self.family.decode(&raw).inspect_err(|e| {
            error!(
                "[{}] {} from endpoint {}; raw response: {}",
                self.name,
                e,
                endpoint_name,
                preview(&raw, RAW_LOG_LIMIT)
            )
        })?;

        Ok(ClientResponse::new(sent, prompt, was_truncated, generation))
    }
}

fn validate(request: &InferenceRequest) -> Result<(&str, &str)> {
    let prompt = required(&request.prompt, "prompt")?;
    let endpoint_name = required(&request.endpoint_name, "endpoint_name")?;
    Ok((prompt, endpoint_name))
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(Error::validation(format!("Field '{}' must not be empty", name))),
        None => Err(Error::validation(format!("Missing required field: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_accepts_complete_request() {
        let request = InferenceRequest::new("Hello", "ep-1");
        assert_eq!(validate(&request).unwrap(), ("Hello", "ep-1"));
    }

    #[test]
    fn test_validate_reports_missing_endpoint() {
        let request = InferenceRequest {
            prompt: Some("x".to_string()),
            endpoint_name: None,
        };
        let err = validate(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required field: endpoint_name"
        );
    }

    #[test]
    fn test_validate_rejects_empty_endpoint() {
        let request = InferenceRequest::new("Hello", "");
        assert!(matches!(validate(&request), Err(Error::Validation(_))));
    }

    #[test]
    fn test_validate_forwards_whitespace_prompt() {
        let request = InferenceRequest::new(" ", "ep-1");
        assert_eq!(validate(&request).unwrap(), (" ", "ep-1"));
    }
}
