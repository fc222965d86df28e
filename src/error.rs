//! Error types for the transfer tool

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the transfer tool
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Startup check failed for {component}: {reason}")]
    Startup { component: String, reason: String },

    // Input errors
    #[error("Private key is required")]
    MissingPrivateKey,

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Recipient address is required")]
    MissingRecipient,

    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("Only {supported} tokens are supported, got {token}")]
    UnsupportedToken { token: String, supported: String },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    // Signing errors
    #[error("Signing failed: {0}")]
    Signing(String),

    // HTTP errors
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP request timed out: {0}")]
    HttpTimeout(String),

    #[error("HTTP connection failed: {0}")]
    HttpConnect(String),

    #[error("Client error: status {status}: {message}")]
    ClientRequest { status: u16, message: String },

    #[error("Server error: status {status}: {message}")]
    ServerRequest { status: u16, message: String },

    // Exchange errors
    #[error("Exchange rejected request: {0}")]
    ExchangeRejected(String),

    #[error("{method}() got an unexpected keyword argument '{name}'")]
    UnexpectedArgument { method: String, name: String },

    #[error("{method}() missing required argument '{name}'")]
    MissingArgument { method: String, name: String },

    #[error("{method}() takes {expected} positional arguments but {given} were given")]
    ArgumentCount {
        method: String,
        expected: usize,
        given: usize,
    },

    #[error("{method}() argument '{name}' must be {expected}")]
    ArgumentType {
        method: String,
        name: String,
        expected: &'static str,
    },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Cancelled by user")]
    Cancelled,
}

impl Error {
    /// Check if this error is retryable (transient)
    ///
    /// Only failures where the request cannot have been processed count:
    /// a connect error, or a 502/503/504 from the gateway. Timeouts are
    /// ambiguous and left to the caller's retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::HttpConnect(_) => true,
            Error::ServerRequest { status, .. } => {
                crate::hyperliquid::req::RETRYABLE_STATUS_CODES.contains(status)
            }
            _ => false,
        }
    }

    /// Check if this error came from bad user input (fatal, exit 1)
    pub fn is_fatal_input(&self) -> bool {
        matches!(
            self,
            Error::MissingPrivateKey
                | Error::InvalidPrivateKey(_)
                | Error::MissingRecipient
                | Error::InvalidAmount(_)
                | Error::NonPositiveAmount(_)
                | Error::UnsupportedToken { .. }
        )
    }
}

// Conversion from reqwest errors
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::HttpTimeout(e.to_string())
        } else if e.is_connect() {
            Error::HttpConnect(e.to_string())
        } else {
            Error::Http(e.to_string())
        }
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

// Conversion from prompt errors
impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        match e {
            dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                Error::Cancelled
            }
            dialoguer::Error::IO(io) => Error::Prompt(io.to_string()),
        }
    }
}
