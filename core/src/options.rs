use std::fmt::{Debug, Formatter};

use crate::sign_type::SignType;
use crate::utils::Redact;
use crate::{Error, Result};

/// SigningOptions carries everything needed to sign and verify payloads.
///
/// Build it once at startup and share it behind an `Arc`; it's never mutated
/// afterwards.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SigningOptions {
    secret: Option<String>,
    sign_type: SignType,
    ssl_cert_path: Option<String>,
    ssl_key_path: Option<String>,
}

impl SigningOptions {
    /// Create a new SigningOptions without a secret.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the merchant secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set the signature algorithm.
    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = sign_type;
        self
    }

    /// Set the client certificate path used for mutual TLS.
    pub fn with_ssl_cert_path(mut self, path: impl Into<String>) -> Self {
        self.ssl_cert_path = Some(path.into());
        self
    }

    /// Set the client key path used for mutual TLS.
    pub fn with_ssl_key_path(mut self, path: impl Into<String>) -> Self {
        self.ssl_key_path = Some(path.into());
        self
    }

    /// The merchant secret, failing if it's absent or empty.
    pub fn secret(&self) -> Result<&str> {
        match self.secret.as_deref() {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(Error::missing_merchant_secret()),
        }
    }

    /// The configured signature algorithm.
    pub fn sign_type(&self) -> SignType {
        self.sign_type
    }

    /// Whether responses arrive over an already authenticated mutual TLS channel.
    ///
    /// Only then may a response without a `sign` field be accepted.
    pub fn trusts_mutual_tls(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|v| !v.is_empty());
        present(&self.ssl_cert_path) && present(&self.ssl_key_path)
    }
}

impl Debug for SigningOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningOptions")
            .field("secret", &Redact::from(&self.secret))
            .field("sign_type", &self.sign_type)
            .field("ssl_cert_path", &self.ssl_cert_path)
            .field("ssl_key_path", &self.ssl_key_path)
            .finish()
    }
}
