//! Core components for signing payment gateway payloads.
//!
//! This crate provides the foundational types for the paysign ecosystem: it
//! turns a bag of payment fields plus a merchant secret into a signed wire
//! payload, and checks signed payloads coming back from the provider.
//!
//! ## Overview
//!
//! - **Canonicalizer**: [`canonicalize`] turns fields into a deterministic
//!   `k1=v1&k2=v2&key=secret` string
//! - **Signer**: [`SignType`] computes the uppercase digest of that string
//! - **Nonce**: [`ensure_nonce`] fills `nonce_str` at most once
//! - **Envelope**: [`SignedEnvelope`] ties the above to a set of fields and
//!   their [`SigningOptions`], and renders them through [`WireFormat`]
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use paysign_core::{SignedEnvelope, SigningOptions, WireFormat};
//!
//! # fn main() -> paysign_core::Result<()> {
//! let options = Arc::new(SigningOptions::new().with_secret("192006250b4c09247ec02edce69f6a2d"));
//!
//! let mut req = SignedEnvelope::new(options.clone());
//! req.set("appid", "wxd930ea5d5a258f4f");
//! req.set("mch_id", "10000100");
//! req.set("total_fee", 100);
//! let payload = req.serialize(WireFormat::Xml)?;
//!
//! let mut resp = SignedEnvelope::decode(&payload, WireFormat::Xml, options)?;
//! resp.verify()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`utils`]: General utilities including data redaction
//! - [`wire`]: Flat XML and JSON codecs

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod utils;
pub mod wire;
pub use wire::WireFormat;

mod error;
pub use error::{Error, ErrorKind, Result};
mod env;
pub use env::{Env, OsEnv, StaticEnv};

mod params;
pub use params::{ParameterSet, Value};
mod canonical;
pub use canonical::{canonicalize, KEY_FIELD, RESERVED_KEYS, SIGN_FIELD};
mod sign_type;
pub use sign_type::SignType;
mod nonce;
pub use nonce::{ensure_nonce, NONCE_FIELD, NONCE_LENGTH};
mod options;
pub use options::SigningOptions;
mod envelope;
pub use envelope::{
    EnvelopeState, SignedEnvelope, ERR_CODE, ERR_CODE_DES, RESULT_CODE, RETURN_CODE, RETURN_MSG,
    SUCCESS,
};
