// Standard library
use std::fmt;

// 3rd party crates
use thiserror::Error;

use reqwest::StatusCode;

// Current module imports
use super::types::RawResponse;

/// Category of a failed storage request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server answered with a status other than 200
    HttpError,
    /// The server answered 200 but the body is not JSON
    ParseError,
    /// No response was obtained
    TransportError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::HttpError => "HttpError",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::TransportError => "TransportError",
        };
        f.write_str(name)
    }
}

/// Failure delivered in place of a storage response.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        response: RawResponse,
        #[source]
        source: HttpStatus,
    },

    #[error("Error parsing data: {message}")]
    Parse {
        message: String,
        response: RawResponse,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error sending data: {message}")]
    Transport {
        message: String,
        #[source]
        source: TransportError,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Http { .. } => ErrorKind::HttpError,
            StoreError::Parse { .. } => ErrorKind::ParseError,
            StoreError::Transport { .. } => ErrorKind::TransportError,
        }
    }

    /// Human-readable diagnostic: reason phrase, parser message or fault text.
    pub fn message(&self) -> &str {
        match self {
            StoreError::Http { message, .. }
            | StoreError::Parse { message, .. }
            | StoreError::Transport { message, .. } => message,
        }
    }

    /// The raw response, when the server answered at all.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            StoreError::Http { response, .. } | StoreError::Parse { response, .. } => {
                Some(response)
            }
            StoreError::Transport { .. } => None,
        }
    }
}

impl From<TransportError> for StoreError {
    fn from(source: TransportError) -> Self {
        StoreError::Transport {
            message: source.to_string(),
            source,
        }
    }
}

/// Status of a response that was not `200 OK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("HTTP status {0}")]
pub struct HttpStatus(pub StatusCode);

/// Faults raised before a response was obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid upload MIME type {mime_type:?}: {source}")]
    InvalidMimeType {
        mime_type: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("Request task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum StoreValidationError {
    #[error("API key is not set")]
    MissingApiKey,

    #[error("Invalid server URL '{0}'")]
    InvalidServer(String),

    #[error("Timeout must be greater than 0")]
    InvalidTimeout,
}

/// Errors raised while constructing a client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid store configuration: {0}")]
    Validation(#[from] StoreValidationError),

    #[error("HTTP client error: {0}")]
    HttpClientBuild(#[from] reqwest::Error),
}
