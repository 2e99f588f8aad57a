use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Request error: {service}: {message}")]
    RequestError {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned non-success status {status}: {body}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("No data in the response from {0}")]
    EmptyResponse(&'static str),

    #[error("AWS error: {service}: {message}")]
    AwsError {
        service: &'static str,
        message: String,
    },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        PipelineError::ConfigError(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        PipelineError::InvalidInput(msg.into())
    }

    pub fn aws(service: &'static str, err: impl std::fmt::Display) -> Self {
        PipelineError::AwsError {
            service,
            message: err.to_string(),
        }
    }

    /// True for failures caused by the caller's input rather than by an upstream
    /// service or by deployment configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::InvalidInput(_))
    }

    /// Upstream HTTP status, when the failure came with one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            PipelineError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
