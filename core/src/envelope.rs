use std::sync::Arc;

use log::{debug, warn};
use rand::Rng;

use crate::canonical::SIGN_FIELD;
use crate::nonce::{ensure_nonce, NONCE_FIELD, NONCE_LENGTH};
use crate::options::SigningOptions;
use crate::params::{ParameterSet, Value};
use crate::wire::WireFormat;
use crate::{Error, Result};

/// Field carrying the transport level status.
pub const RETURN_CODE: &str = "return_code";
/// Field carrying the transport level message.
pub const RETURN_MSG: &str = "return_msg";
/// Field carrying the business level status.
pub const RESULT_CODE: &str = "result_code";
/// Field carrying the business level error code.
pub const ERR_CODE: &str = "err_code";
/// Field carrying the business level error description.
pub const ERR_CODE_DES: &str = "err_code_des";
/// Status value reported on success.
pub const SUCCESS: &str = "SUCCESS";

/// Lifecycle of a [`SignedEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Fields may change, no digest is stored or the stored one is stale.
    Building,
    /// The digest of the current fields is stored under `sign`.
    Signed,
    /// The envelope has been rendered for the wire.
    Serialized,
    /// The received digest matched.
    Verified,
    /// The received digest was missing or didn't match.
    VerificationFailed,
}

/// SignedEnvelope owns the fields of one payment message plus its signing state.
///
/// Envelopes are single use: build one, sign and serialize it, or decode one
/// and verify it, then drop it.
#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    fields: ParameterSet,
    options: Arc<SigningOptions>,
    state: EnvelopeState,
    inbound: bool,
}

impl SignedEnvelope {
    /// Create an empty envelope.
    pub fn new(options: Arc<SigningOptions>) -> Self {
        Self::from_fields(ParameterSet::new(), options)
    }

    /// Create an envelope from existing fields.
    pub fn from_fields(fields: ParameterSet, options: Arc<SigningOptions>) -> Self {
        Self {
            fields,
            options,
            state: EnvelopeState::Building,
            inbound: false,
        }
    }

    /// Create an envelope from fields received from the provider, for
    /// callers that decoded the payload themselves.
    pub fn received(fields: ParameterSet, options: Arc<SigningOptions>) -> Self {
        Self {
            inbound: true,
            ..Self::from_fields(fields, options)
        }
    }

    /// Decode an envelope received from the provider.
    ///
    /// The envelope is not verified yet, call [`SignedEnvelope::verify`] or
    /// [`SignedEnvelope::check_result`] before trusting it.
    pub fn decode(payload: &str, format: WireFormat, options: Arc<SigningOptions>) -> Result<Self> {
        Ok(Self::received(format.decode(payload)?, options))
    }

    /// Get the value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get the textual value of a field.
    pub fn get_str(&self, name: &str) -> Option<String> {
        self.fields.get_str(name)
    }

    /// Set a field.
    ///
    /// Fields are expected to be set while building. Setting one on a signed
    /// envelope makes the stored digest stale and moves it back to
    /// [`EnvelopeState::Building`].
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.set(name, value);
        self.state = EnvelopeState::Building;
    }

    /// Remove a field, see [`SignedEnvelope::set`] for the state change.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.state = EnvelopeState::Building;
        self.fields.remove(name)
    }

    /// All fields of this envelope.
    pub fn fields(&self) -> &ParameterSet {
        &self.fields
    }

    /// Consume the envelope into its fields.
    pub fn into_fields(self) -> ParameterSet {
        self.fields
    }

    /// The options this envelope signs and verifies with.
    pub fn options(&self) -> &Arc<SigningOptions> {
        &self.options
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Whether a field equals `SUCCESS`.
    pub fn is_success(&self, name: &str) -> bool {
        self.fields.get(name).and_then(Value::as_str) == Some(SUCCESS)
    }

    /// Make sure `nonce_str` is set, returning its value.
    ///
    /// An existing nonce is never replaced.
    pub fn ensure_nonce(&mut self) -> String {
        self.ensure_nonce_with(&mut rand::thread_rng())
    }

    /// Same as [`SignedEnvelope::ensure_nonce`] with an explicit random source.
    pub fn ensure_nonce_with<R: Rng>(&mut self, rng: &mut R) -> String {
        let current = self.fields.get_str(NONCE_FIELD);
        let nonce = ensure_nonce(current.as_deref(), NONCE_LENGTH, rng);
        if current.as_deref() != Some(nonce.as_str()) {
            self.fields.set(NONCE_FIELD, nonce.as_str());
        }
        nonce
    }

    /// Compute the digest of the current fields without storing it.
    pub fn compute_sign(&self) -> Result<String> {
        let secret = self.options.secret()?;
        self.options.sign_type().sign(&self.fields, secret)
    }

    /// Fill the nonce, then compute and store the digest under `sign`.
    ///
    /// The digest is always recomputed, so calling this again after changing
    /// fields is fine.
    pub fn sign(&mut self) -> Result<()> {
        self.sign_with(&mut rand::thread_rng())
    }

    /// Same as [`SignedEnvelope::sign`] with an explicit random source.
    pub fn sign_with<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        // Fail on configuration before mutating anything.
        self.options.secret()?;

        self.ensure_nonce_with(rng);
        let sign = self.compute_sign()?;
        self.fields.set(SIGN_FIELD, sign);
        self.state = EnvelopeState::Signed;
        debug!("envelope signed with {}", self.options.sign_type());
        Ok(())
    }

    /// Render the envelope for the wire.
    ///
    /// Signs first unless the envelope is already signed, so the rendered
    /// payload always carries a digest of its current fields.
    pub fn serialize(&mut self, format: WireFormat) -> Result<String> {
        if !matches!(
            self.state,
            EnvelopeState::Signed | EnvelopeState::Serialized
        ) {
            self.sign()?;
        }

        let payload = format.encode(&self.fields)?;
        self.state = EnvelopeState::Serialized;
        Ok(payload)
    }

    /// Verify the received `sign` against the current fields.
    ///
    /// - No configured secret fails with `MissingMerchantSecret`, which is a
    ///   configuration error rather than a verification failure.
    /// - A missing `sign` is accepted only when the options trust the mutual
    ///   TLS channel.
    /// - Digests are compared byte for byte.
    ///
    /// Only received envelopes move to [`EnvelopeState::Verified`] or
    /// [`EnvelopeState::VerificationFailed`]. Checking an envelope built
    /// locally returns the verdict and keeps its state.
    pub fn verify(&mut self) -> Result<()> {
        self.options.secret()?;

        let result = match self.fields.get_str(SIGN_FIELD) {
            None if self.options.trusts_mutual_tls() => {
                debug!("sign is absent, trusting the mutual tls channel");
                Ok(())
            }
            None => Err(Error::sign_verify_failed("sign is missing")),
            Some(received) => {
                let expected = self.compute_sign()?;
                if received == expected {
                    Ok(())
                } else {
                    Err(Error::sign_verify_failed("sign doesn't match the payload"))
                }
            }
        };

        match &result {
            Ok(()) if self.inbound => self.state = EnvelopeState::Verified,
            Ok(()) => {}
            Err(err) => {
                warn!("envelope verification failed: {err}");
                if self.inbound {
                    self.state = EnvelopeState::VerificationFailed;
                }
            }
        }
        result
    }

    /// Check a provider response layer by layer.
    ///
    /// 1. `return_code` must be `SUCCESS`, else `Communication` with `return_msg`.
    /// 2. `result_code` must be `SUCCESS`, else `TradeFailed` with `err_code`
    ///    and `err_code_des`.
    /// 3. the signature must verify.
    ///
    /// The first failing layer wins: a communication failure is never
    /// reported as a signature failure.
    pub fn check_result(&mut self) -> Result<()> {
        if !self.is_success(RETURN_CODE) {
            return Err(Error::communication(
                self.get_str(RETURN_MSG)
                    .unwrap_or_else(|| "communication failed".to_string()),
            ));
        }

        if !self.is_success(RESULT_CODE) {
            return Err(Error::trade_failed(
                self.get_str(ERR_CODE).unwrap_or_default(),
                self.get_str(ERR_CODE_DES)
                    .unwrap_or_else(|| "trade failed".to_string()),
            ));
        }

        self.verify()
    }
}
