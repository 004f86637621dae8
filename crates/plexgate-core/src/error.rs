//! Shared error type across plexgate crates.
//!
//! Bridge failures never become HTTP errors. Their `Display` text is what the
//! caller finds inside the error envelope, so the message prefixes below are
//! part of the external contract.

use thiserror::Error;

/// Stable failure codes (logs and metric labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Request body could not be read.
    ReadFailed,
    /// Outer hex transport encoding is malformed.
    DecodeFailed,
    /// Inner binary envelope does not match the schema.
    ParseFailed,
    /// Destination scheme is not dispatchable.
    UnsupportedScheme,
    /// No terminal reply within the budget.
    Timeout,
    /// Invalid input (configuration).
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::ReadFailed => "READ_FAILED",
            ClientCode::DecodeFailed => "DECODE_FAILED",
            ClientCode::ParseFailed => "PARSE_FAILED",
            ClientCode::UnsupportedScheme => "UNSUPPORTED_SCHEME",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PlexError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum PlexError {
    #[error("Failed to read body: {0}")]
    Read(String),
    #[error("Failed to decode body: {0}")]
    Decode(#[from] hex::FromHexError),
    #[error("Failed to unmarshal platform request: {0}")]
    Parse(#[from] prost::DecodeError),
    #[error("Unsupported scheme provided: {offending_uri}")]
    SchemeMismatch { offending_uri: String },
    #[error("Got a timeout for request: {id}")]
    Timeout { id: String },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl PlexError {
    /// Map internal error to a stable code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PlexError::Read(_) => ClientCode::ReadFailed,
            PlexError::Decode(_) => ClientCode::DecodeFailed,
            PlexError::Parse(_) => ClientCode::ParseFailed,
            PlexError::SchemeMismatch { .. } => ClientCode::UnsupportedScheme,
            PlexError::Timeout { .. } => ClientCode::Timeout,
            PlexError::BadRequest(_) => ClientCode::BadRequest,
            PlexError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            PlexError::Internal(_) => ClientCode::Internal,
        }
    }
}
