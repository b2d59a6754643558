//! Error types for the common library.
//!
//! This module provides the closed error taxonomy shared by every stage of the
//! generate → download → upload pipeline, using `thiserror`.
//!
//! # Error Categories
//!
//! - `Error::Config`: a credential or setting is missing or malformed
//! - `Error::ExternalService`: fal.ai, the image host, or ImageKit answered
//!   with a non-success status (or did not answer at all)
//! - `Error::InvalidResponse`: a success status with an unusable body
//! - `Error::InvalidParams`: tool arguments failed validation
//! - `Error::MethodNotFound`: a tool name that is not registered
//! - `Error::Internal`: anything not classified above
//!
//! Conversion into [`rmcp::ErrorData`] happens in exactly one place, the
//! `From<Error>` impl at the bottom of this module.

use rmcp::ErrorData as McpError;
use rmcp::model::ErrorCode;
use serde_json::json;
use thiserror::Error;

/// The external systems a pipeline call can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// fal.ai image generation API
    Fal,
    /// Download of the generated image bytes
    Download,
    /// ImageKit upload API
    ImageKit,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Fal => write!(f, "fal.ai"),
            Service::Download => write!(f, "image download"),
            Service::ImageKit => write!(f, "ImageKit"),
        }
    }
}

/// Error kind names reported to MCP callers in `error.data.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigurationError,
    ExternalServiceError,
    InvalidResponseError,
    InvalidParams,
    MethodNotFound,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigurationError => "ConfigurationError",
            ErrorKind::ExternalServiceError => "ExternalServiceError",
            ErrorKind::InvalidResponseError => "InvalidResponseError",
            ErrorKind::InvalidParams => "InvalidParams",
            ErrorKind::MethodNotFound => "MethodNotFound",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the image generation server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing credentials, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream answered with a non-success status.
    ///
    /// `status_code` is 0 when no HTTP response was received at all
    /// (connection refused, timeout, truncated body).
    #[error("{service} request failed (HTTP {status_code} {status_text}): {message}")]
    ExternalService {
        /// Which upstream failed
        service: Service,
        /// HTTP status code returned by the upstream
        status_code: u16,
        /// Canonical reason phrase for the status
        status_text: String,
        /// Response body or extracted upstream message
        message: String,
    },

    /// Upstream answered with success but the body was unusable
    #[error("Invalid response from {service}: {message}")]
    InvalidResponse {
        /// Which upstream produced the body
        service: Service,
        /// What was wrong with it
        message: String,
    },

    /// Tool arguments failed validation
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Requested tool is not registered
    #[error("Unknown tool: {0}")]
    MethodNotFound(String),

    /// Anything that does not fit one of the kinds above
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an external service error from an HTTP status.
    ///
    /// # Example
    ///
    /// ```
    /// use imagegen_mcp_common::error::{Error, Service};
    ///
    /// let err = Error::external(Service::ImageKit, 500, "Internal Server Error", "quota exceeded");
    /// assert!(err.to_string().contains("quota exceeded"));
    /// assert!(err.to_string().contains("500"));
    /// ```
    pub fn external(
        service: Service,
        status_code: u16,
        status_text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::ExternalService {
            service,
            status_code,
            status_text: status_text.into(),
            message: message.into(),
        }
    }

    /// Classify a `reqwest` failure that happened before a status was available.
    pub fn transport(service: Service, err: &reqwest::Error) -> Self {
        let status_text = if err.is_timeout() {
            "request timed out"
        } else {
            "no response"
        };
        Error::external(service, 0, status_text, err.to_string())
    }

    /// Create an invalid response error.
    pub fn invalid_response(service: Service, message: impl Into<String>) -> Self {
        Error::InvalidResponse {
            service,
            message: message.into(),
        }
    }

    /// Create an invalid parameters error.
    ///
    /// # Example
    ///
    /// ```
    /// use imagegen_mcp_common::error::Error;
    ///
    /// let err = Error::invalid_params("prompt cannot be empty");
    /// assert!(err.to_string().contains("prompt cannot be empty"));
    /// ```
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Error::InvalidParams(message.into())
    }

    /// Create an unknown tool error.
    pub fn method_not_found(name: impl Into<String>) -> Self {
        Error::MethodNotFound(name.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::ConfigurationError,
            Error::ExternalService { .. } => ErrorKind::ExternalServiceError,
            Error::InvalidResponse { .. } => ErrorKind::InvalidResponseError,
            Error::InvalidParams(_) => ErrorKind::InvalidParams,
            Error::MethodNotFound(_) => ErrorKind::MethodNotFound,
            Error::Internal(_) => ErrorKind::InternalError,
        }
    }
}

/// Configuration errors.
///
/// Missing credentials are not raised at startup; they surface the first
/// time a client needs the value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let (code, data) = match &err {
            Error::Config(_) => (ErrorCode::INVALID_REQUEST, json!({ "kind": kind.as_str() })),
            Error::ExternalService {
                service,
                status_code,
                status_text,
                ..
            } => (
                ErrorCode::INTERNAL_ERROR,
                json!({
                    "kind": kind.as_str(),
                    "service": service.to_string(),
                    "status": status_code,
                    "statusText": status_text,
                }),
            ),
            Error::InvalidResponse { service, .. } => (
                ErrorCode::INTERNAL_ERROR,
                json!({ "kind": kind.as_str(), "service": service.to_string() }),
            ),
            Error::InvalidParams(_) => (ErrorCode::INVALID_PARAMS, json!({ "kind": kind.as_str() })),
            Error::MethodNotFound(_) => {
                (ErrorCode::METHOD_NOT_FOUND, json!({ "kind": kind.as_str() }))
            }
            Error::Internal(_) => (ErrorCode::INTERNAL_ERROR, json!({ "kind": kind.as_str() })),
        };
        McpError::new(code, message, Some(data))
    }
}
