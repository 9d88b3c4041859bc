//! Client side of the demo: sends prompts to the gateway the way the web
//! pages did and decodes the gateway's answers.

use crate::{
    Error, Result,
    error::ErrorResponse,
    inference::{ImageResponse, InferenceRequest, TextResponse},
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

pub struct DemoClient {
    client: Client,
}

impl DemoClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("genai-demo/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub async fn generate_text(
        &self,
        url: &str,
        endpoint_name: &str,
        prompt: &str,
    ) -> Result<TextResponse> {
        self.post(url, endpoint_name, prompt).await
    }

    pub async fn generate_image(
        &self,
        url: &str,
        endpoint_name: &str,
        prompt: &str,
    ) -> Result<ImageResponse> {
        self.post(url, endpoint_name, prompt).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        endpoint_name: &str,
        prompt: &str,
    ) -> Result<T> {
        if url.trim().is_empty() || endpoint_name.trim().is_empty() || prompt.trim().is_empty() {
            return Err(Error::validation(
                "Please enter a valid endpoint name, gateway url and prompt",
            ));
        }

        debug!("Posting {} characters to {}", prompt.chars().count(), url);
        let response = self
            .client
            .post(url)
            .json(&InferenceRequest::new(prompt, endpoint_name))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => serde_json::from_str::<ErrorResponse>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body),
                Err(e) => format!("failed to read error body: {}", e),
            };
            return Err(Error::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Joins the conversation context and the question the way the text page did.
pub fn compose_text_prompt(context: &str, query: &str) -> String {
    format!("{}\n{}", context, query)
}

/// Height, width and channel count of an image given as nested pixel rows.
pub fn image_dimensions(image: &Value) -> Option<(usize, usize, usize)> {
    let rows = image.as_array()?;
    let first_row = rows.first()?.as_array()?;
    let channels = match first_row.first()? {
        Value::Array(pixel) => pixel.len(),
        _ => 1,
    };
    Some((rows.len(), first_row.len(), channels))
}
