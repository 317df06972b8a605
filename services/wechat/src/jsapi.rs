use chrono::{DateTime, Utc};
use log::debug;
use paysign_core::{
    ensure_nonce, wire, EnvelopeState, Error, ParameterSet, Result, SignedEnvelope, NONCE_LENGTH,
};
use rand::Rng;

use crate::constants::*;

/// Builder for the parameters a browser passes to the JS bridge to start a
/// payment.
///
/// ```text
/// {"appId":"...","nonceStr":"...","package":"prepay_id=...","paySign":"...","signType":"MD5","timeStamp":"..."}
/// ```
///
/// - [JSAPI payment](https://pay.weixin.qq.com/wiki/doc/api/jsapi.php?chapter=7_7)
#[derive(Debug, Default)]
pub struct JsapiParams {
    time: Option<DateTime<Utc>>,
}

impl JsapiParams {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Build the JSON parameters from a verified unified order response.
    pub fn build(&self, prepay: &SignedEnvelope) -> Result<String> {
        self.build_with(prepay, &mut rand::thread_rng())
    }

    /// Same as [`JsapiParams::build`] with an explicit random source.
    pub fn build_with<R: Rng>(&self, prepay: &SignedEnvelope, rng: &mut R) -> Result<String> {
        let fields = self.build_fields(prepay, rng)?;
        wire::to_json(&fields)
    }

    /// Build the parameters as fields, `paySign` included.
    pub fn build_fields<R: Rng>(
        &self,
        prepay: &SignedEnvelope,
        rng: &mut R,
    ) -> Result<ParameterSet> {
        if prepay.state() != EnvelopeState::Verified {
            return Err(Error::sign_verify_failed(
                "unified order response must be verified before use",
            ));
        }

        let appid = prepay
            .get_str(APPID)
            .ok_or_else(|| Error::payload_invalid("response is missing appid"))?;
        let prepay_id = prepay
            .get_str(PREPAY_ID)
            .ok_or_else(|| Error::payload_invalid("response is missing prepay_id"))?;

        let now = self.time.unwrap_or_else(Utc::now);
        let options = prepay.options();

        let fields = ParameterSet::new()
            .with(JS_APP_ID, appid)
            .with(JS_TIME_STAMP, now.timestamp().to_string())
            .with(JS_NONCE_STR, ensure_nonce(None, NONCE_LENGTH, rng))
            .with(JS_PACKAGE, format!("prepay_id={prepay_id}"))
            .with(JS_SIGN_TYPE, options.sign_type().as_str());

        let pay_sign = options.sign_type().sign(&fields, options.secret()?)?;
        debug!("jsapi params signed with {}", options.sign_type());

        Ok(fields.with(JS_PAY_SIGN, pay_sign))
    }
}
