//! WeChat Pay service signer
//!
//! Only the v2 API with `MD5` and `HMAC-SHA256` digests has been supported.
//!
//! ```no_run
//! use std::sync::Arc;
//! use paysign_core::{OsEnv, ParameterSet};
//! use paysign_wechat::{decode_response, encode_request, Config, JsapiParams};
//!
//! # fn send(_: String) -> String { unimplemented!() }
//! # fn main() -> paysign_core::Result<()> {
//! let config = Config::new().from_env(&OsEnv);
//! let options = Arc::new(config.signing_options()?);
//!
//! let mut fields = ParameterSet::from([
//!     ("body", "JSAPI test"),
//!     ("out_trade_no", "20150806125346"),
//!     ("total_fee", "1"),
//!     ("trade_type", "JSAPI"),
//! ]);
//! config.fill_defaults(&mut fields);
//!
//! let body = encode_request(fields, options.clone())?;
//! let prepay = decode_response(&send(body), options)?;
//! let params = JsapiParams::new().build(&prepay)?;
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod request;
pub use request::{decode_response, encode_request};

mod notify;
pub use notify::{NotifyHandler, NotifyReply};

mod jsapi;
pub use jsapi::JsapiParams;

mod constants;
