use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Decoding parameters applied to every request of one handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
    pub max_length: u32,
    pub num_return_sequences: u32,
    pub top_k: u32,
    pub top_p: f64,
    pub do_sample: bool,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            max_length: 512,
            num_return_sequences: 1,
            top_k: 40,
            top_p: 0.8,
            do_sample: true,
        }
    }
}

impl GenerationProfile {
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(Error::config("profile.max_length must be greater than 0"));
        }
        if self.num_return_sequences == 0 {
            return Err(Error::config(
                "profile.num_return_sequences must be greater than 0",
            ));
        }
        if self.top_k == 0 {
            return Err(Error::config("profile.top_k must be greater than 0"));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(Error::config(format!(
                "profile.top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        Ok(())
    }
}

/// Incoming request body. Fields are optional here so that absence is
/// reported as a validation failure rather than a deserialization one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub endpoint_name: Option<String>,
}

impl InferenceRequest {
    pub fn new(prompt: impl Into<String>, endpoint_name: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            endpoint_name: Some(endpoint_name.into()),
        }
    }
}

/// Serialized request body for one endpoint call.
#[derive(Debug, Clone, PartialEq)]
pub struct WirePayload {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// The artifact extracted from a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    Text(String),
    Image(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResponse {
    pub prompt: String,
    pub original_prompt: String,
    pub was_truncated: bool,
    pub generated_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub prompt: String,
    /// Present only when the prompt was cut before sending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub was_truncated: bool,
    pub image: serde_json::Value,
}

/// Body returned to the caller on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClientResponse {
    Text(TextResponse),
    Image(ImageResponse),
}

impl ClientResponse {
    pub fn new(sent: &str, original: &str, was_truncated: bool, generation: Generation) -> Self {
        match generation {
            Generation::Text(generated_text) => Self::Text(TextResponse {
                prompt: sent.to_string(),
                original_prompt: original.to_string(),
                was_truncated,
                generated_text,
            }),
            Generation::Image(image) => Self::Image(ImageResponse {
                prompt: sent.to_string(),
                original_prompt: was_truncated.then(|| original.to_string()),
                was_truncated,
                image,
            }),
        }
    }
}
