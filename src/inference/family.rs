use super::types::{Generation, GenerationProfile, WirePayload};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const JSON: &str = "application/json";
const TEXT: &str = "application/x-text";

/// Wire shape shared by a class of model endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// Prompt and sampling parameters side by side at the top level.
    FlatParams,
    /// Prompt under `inputs`, sampling parameters under `parameters`.
    NestedParams,
    /// Raw prompt text; the endpoint owns its sampling configuration.
    RawText,
}

#[derive(Serialize)]
struct FlatBody<'a> {
    text_inputs: &'a str,
    #[serde(flatten)]
    parameters: &'a GenerationProfile,
}

#[derive(Serialize)]
struct NestedBody<'a> {
    inputs: &'a str,
    parameters: &'a GenerationProfile,
}

impl ModelFamily {
    pub fn encode(&self, prompt: &str, profile: &GenerationProfile) -> Result<WirePayload> {
        let payload = match self {
            Self::FlatParams => WirePayload {
                content_type: JSON,
                body: serde_json::to_vec(&FlatBody {
                    text_inputs: prompt,
                    parameters: profile,
                })?,
            },
            Self::NestedParams => WirePayload {
                content_type: JSON,
                body: serde_json::to_vec(&NestedBody {
                    inputs: prompt,
                    parameters: profile,
                })?,
            },
            Self::RawText => WirePayload {
                content_type: TEXT,
                body: prompt.as_bytes().to_vec(),
            },
        };
        Ok(payload)
    }

    pub fn decode(&self, raw: &[u8]) -> Result<Generation> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| Error::malformed(format!("response is not valid JSON: {}", e)))?;

        match self {
            Self::FlatParams => value
                .get("generated_texts")
                .and_then(|texts| texts.get(0))
                .and_then(Value::as_str)
                .map(|text| Generation::Text(text.to_string()))
                .ok_or_else(|| Error::malformed("expected string at generated_texts[0]")),
            Self::NestedParams => value
                .get(0)
                .and_then(|record| record.get("generated_text"))
                .and_then(Value::as_str)
                .map(|text| Generation::Text(text.to_string()))
                .ok_or_else(|| Error::malformed("expected string at [0].generated_text")),
            Self::RawText => match value {
                Value::Object(mut map) => map
                    .remove("generated_image")
                    .map(Generation::Image)
                    .ok_or_else(|| Error::malformed("missing generated_image")),
                _ => Err(Error::malformed("expected a JSON object with generated_image")),
            },
        }
    }
}
