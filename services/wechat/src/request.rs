use std::sync::Arc;

use log::debug;
use paysign_core::{ParameterSet, Result, SignedEnvelope, SigningOptions, WireFormat};

/// Sign `fields` and render them as the XML body of a request.
///
/// `nonce_str` is generated when absent. A missing merchant secret fails
/// here, before anything could be sent.
pub fn encode_request(fields: ParameterSet, options: Arc<SigningOptions>) -> Result<String> {
    let mut req = SignedEnvelope::from_fields(fields, options);
    req.sign()?;
    req.serialize(WireFormat::Xml)
}

/// Decode an XML response body and check it layer by layer.
///
/// The returned envelope is [`paysign_core::EnvelopeState::Verified`].
pub fn decode_response(body: &str, options: Arc<SigningOptions>) -> Result<SignedEnvelope> {
    let mut resp = SignedEnvelope::decode(body, WireFormat::Xml, options)?;
    resp.check_result()?;
    debug!("response verified with {} fields", resp.fields().len());
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysign_core::{ErrorKind, SIGN_FIELD};

    fn options() -> Arc<SigningOptions> {
        Arc::new(SigningOptions::new().with_secret("abc"))
    }

    #[test]
    fn test_encode_request() -> Result<()> {
        let fields = ParameterSet::from([
            ("appid", "wx01"),
            ("mch_id", "1900000109"),
            ("out_trade_no", "1001"),
        ]);
        let body = encode_request(fields, options())?;
        assert!(body.starts_with("<xml><appid><![CDATA[wx01]]></appid>"));
        assert!(body.contains("<nonce_str><![CDATA["));
        assert!(body.contains("<sign><![CDATA["));
        Ok(())
    }

    #[test]
    fn test_encode_request_without_secret() {
        let err = encode_request(
            ParameterSet::from([("appid", "wx01")]),
            Arc::new(SigningOptions::new()),
        )
        .expect_err("secret is missing");
        assert_eq!(err.kind(), ErrorKind::MissingMerchantSecret);
    }

    #[test]
    fn test_decode_response() -> Result<()> {
        let fields = ParameterSet::from([
            ("return_code", "SUCCESS"),
            ("result_code", "SUCCESS"),
            ("prepay_id", "wx201410272009395522657a690389285100"),
        ]);
        let body = encode_request(fields, options())?;

        let resp = decode_response(&body, options())?;
        assert_eq!(
            resp.get_str("prepay_id").as_deref(),
            Some("wx201410272009395522657a690389285100")
        );
        assert!(resp.get(SIGN_FIELD).is_some());
        Ok(())
    }

    #[test]
    fn test_decode_response_rejects_garbage() {
        let err = decode_response("<html>502 Bad Gateway", options()).expect_err("garbage");
        assert_eq!(err.kind(), ErrorKind::PayloadInvalid);
    }
}
