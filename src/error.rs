use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration unavailable after {attempts} attempts: {last_error}")]
    ConfigurationUnavailable { attempts: u32, last_error: String },

    #[error("Gateway returned HTTP {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Parameter store error: {0}")]
    ParameterStore(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

/// Failure of a single call to a remote inference endpoint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EndpointError {
    #[error("request to endpoint '{endpoint}' timed out")]
    Timeout { endpoint: String },

    #[error("could not connect to endpoint '{endpoint}': {message}")]
    Connection { endpoint: String, message: String },

    #[error("endpoint '{endpoint}' returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("transport failure calling endpoint '{endpoint}': {message}")]
    Transport { endpoint: String, message: String },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn parameter_store(msg: impl Into<String>) -> Self {
        Self::ParameterStore(msg.into())
    }

    /// HTTP status reported to the caller when this error ends a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Endpoint(EndpointError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Endpoint(_) | Self::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = Error::validation("Missing required field: prompt");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required field: prompt"
        );
    }

    #[test]
    fn test_endpoint_timeout_maps_to_gateway_timeout() {
        let err: Error = EndpointError::Timeout {
            endpoint: "ep-1".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_upstream_failures_map_to_bad_gateway() {
        let status: Error = EndpointError::Status {
            endpoint: "ep-1".to_string(),
            status: 424,
            body: "model error".to_string(),
        }
        .into();
        assert_eq!(status.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            Error::malformed("missing generated_text").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_config_error_is_internal() {
        assert_eq!(
            Error::config("bad").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
