use std::fmt;
use thiserror::Error;

/// The error type for paysign operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (invalid fields or values)
    ConfigInvalid,

    /// No merchant secret is configured, nothing can be signed or verified
    MissingMerchantSecret,

    /// The signature algorithm tag is not supported
    UnsupportedSignType,

    /// The provider reported a communication failure (`return_code` is not `SUCCESS`)
    Communication,

    /// The provider rejected the trade (`result_code` is not `SUCCESS`)
    TradeFailed,

    /// The signature is missing or doesn't match the payload
    SignVerifyFailed,

    /// The wire payload can't be decoded into a flat parameter set
    PayloadInvalid,

    /// Unexpected errors (I/O, encoding, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the error code reported by the provider
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error code reported by the provider, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Check if this is a configuration error.
    ///
    /// Configuration errors are fatal: the caller must abort before talking
    /// to the provider and must never retry.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ConfigInvalid
                | ErrorKind::MissingMerchantSecret
                | ErrorKind::UnsupportedSignType
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a missing merchant secret error
    pub fn missing_merchant_secret() -> Self {
        Self::new(
            ErrorKind::MissingMerchantSecret,
            "merchant secret is not configured",
        )
    }

    /// Create an unsupported sign type error
    pub fn unsupported_sign_type(tag: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedSignType,
            format!("unsupported sign type: {tag}"),
        )
    }

    /// Create a communication error
    pub fn communication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Communication, message)
    }

    /// Create a trade failed error carrying the provider's error code
    pub fn trade_failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TradeFailed, message).with_code(code)
    }

    /// Create a sign verify failed error
    pub fn sign_verify_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignVerifyFailed, message)
    }

    /// Create a payload invalid error
    pub fn payload_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::MissingMerchantSecret => write!(f, "missing merchant secret"),
            ErrorKind::UnsupportedSignType => write!(f, "unsupported sign type"),
            ErrorKind::Communication => write!(f, "communication failed"),
            ErrorKind::TradeFailed => write!(f, "trade failed"),
            ErrorKind::SignVerifyFailed => write!(f, "sign verify failed"),
            ErrorKind::PayloadInvalid => write!(f, "invalid payload"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::payload_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::payload_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::payload_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::payload_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
