use std::cell::Cell;
use std::sync::Arc;

use anyhow::anyhow;
use log::debug;
use paysign_core::{
    ErrorKind, ParameterSet, Result, SigningOptions, StaticEnv, WireFormat, SIGN_FIELD,
};
use paysign_wechat::{decode_response, encode_request, Config, JsapiParams, NotifyHandler};
use pretty_assertions::assert_eq;
use test_case::test_case;

const PAID_NOTIFY: &str = "<xml>\
    <appid><![CDATA[wx01]]></appid>\
    <mch_id><![CDATA[1900000109]]></mch_id>\
    <nonce_str><![CDATA[5k8264iltkch16cq2502si8znmtm67vs]]></nonce_str>\
    <out_trade_no><![CDATA[1001]]></out_trade_no>\
    <result_code><![CDATA[SUCCESS]]></result_code>\
    <return_code><![CDATA[SUCCESS]]></return_code>\
    <sign><![CDATA[AC320B9ED01ADABCD5C3B11272C3988D]]></sign>\
    <total_fee>100</total_fee>\
    <transaction_id><![CDATA[4200000001]]></transaction_id>\
    </xml>";

const ORDER_PAID_RESPONSE: &str = "<xml>\
    <appid><![CDATA[wx01]]></appid>\
    <err_code><![CDATA[ORDERPAID]]></err_code>\
    <err_code_des><![CDATA[order paid]]></err_code_des>\
    <mch_id><![CDATA[1900000109]]></mch_id>\
    <nonce_str><![CDATA[5k8264iltkch16cq2502si8znmtm67vs]]></nonce_str>\
    <result_code><![CDATA[FAIL]]></result_code>\
    <return_code><![CDATA[SUCCESS]]></return_code>\
    <sign><![CDATA[438F82B27C4D10627DF4FB28349BADA3]]></sign>\
    </xml>";

fn init() -> NotifyHandler {
    let _ = env_logger::builder().is_test(true).try_init();
    NotifyHandler::new(Arc::new(SigningOptions::new().with_secret("abc")))
}

#[test]
fn test_notify_success() -> Result<()> {
    let handler = init();

    let reply = handler.handle(PAID_NOTIFY, |notify| {
        assert_eq!(notify.get_str("transaction_id").as_deref(), Some("4200000001"));
        assert_eq!(notify.get_str("total_fee").as_deref(), Some("100"));
        Ok(None)
    });
    debug!("reply: {reply:?}");

    assert!(reply.is_success());
    assert_eq!(
        reply.to_xml()?,
        "<xml><return_code><![CDATA[SUCCESS]]></return_code>\
         <return_msg><![CDATA[OK]]></return_msg></xml>"
    );
    Ok(())
}

#[test]
fn test_notify_callback_message() {
    let handler = init();
    let reply = handler.handle(PAID_NOTIFY, |_| Ok(Some("received".to_string())));
    assert!(reply.is_success());
    assert_eq!(reply.message(), "received");
}

#[test]
fn test_notify_callback_error() {
    let handler = init();
    let reply = handler.handle(PAID_NOTIFY, |_| Err(anyhow!("order 1001 not found")));
    assert!(!reply.is_success());
    assert_eq!(reply.message(), "order 1001 not found");
}

#[test_case(
    "<xml><return_code><![CDATA[FAIL]]></return_code><return_msg><![CDATA[invalid mch_id]]></return_msg></xml>",
    "invalid mch_id"
    ; "communication failure"
)]
#[test_case(ORDER_PAID_RESPONSE, "order paid" ; "trade failure")]
#[test_case(
    &PAID_NOTIFY.replace("<total_fee>100</total_fee>", "<total_fee>1</total_fee>"),
    "sign doesn't match the payload"
    ; "tampered amount"
)]
#[test_case(
    &PAID_NOTIFY.replace("<sign><![CDATA[AC320B9ED01ADABCD5C3B11272C3988D]]></sign>", ""),
    "sign is missing"
    ; "missing sign"
)]
fn test_notify_rejected(body: &str, message: &str) {
    let handler = init();
    let called = Cell::new(false);

    let reply = handler.handle(body, |_| {
        called.set(true);
        Ok(None)
    });

    assert!(!called.get(), "callback must not run for a rejected notification");
    assert!(!reply.is_success());
    assert_eq!(reply.message(), message);
}

#[test]
fn test_notify_verify_kinds() {
    let handler = init();

    let err = handler
        .verify(ORDER_PAID_RESPONSE)
        .expect_err("trade failed");
    assert_eq!(err.kind(), ErrorKind::TradeFailed);
    assert_eq!(err.code(), Some("ORDERPAID"));

    let err = NotifyHandler::new(Arc::new(SigningOptions::new()))
        .verify(PAID_NOTIFY)
        .expect_err("secret is missing");
    assert_eq!(err.kind(), ErrorKind::MissingMerchantSecret);
    assert!(err.is_config_error());
}

#[test]
fn test_config_round_trip() -> Result<()> {
    let _ = init();
    let env = StaticEnv::from_pairs([
        ("WECHAT_PAY_APPID", "wx01"),
        ("WECHAT_PAY_MCH_ID", "1900000109"),
        ("WECHAT_PAY_KEY", "abc"),
        ("WECHAT_PAY_SIGN_TYPE", "HMAC-SHA256"),
    ]);
    let config = Config::new().from_env(&env);
    let options = Arc::new(config.signing_options()?);

    let mut fields = ParameterSet::from([
        ("return_code", "SUCCESS"),
        ("result_code", "SUCCESS"),
        ("prepay_id", "wx201410272009395522657a690389285100"),
    ]);
    config.fill_defaults(&mut fields);

    let body = encode_request(fields, options.clone())?;
    let prepay = decode_response(&body, options.clone())?;
    assert_eq!(prepay.get_str("mch_id").as_deref(), Some("1900000109"));

    let json = JsapiParams::new().build(&prepay)?;
    let mut params = paysign_core::SignedEnvelope::decode(&json, WireFormat::Json, options)?;
    let pay_sign = params.remove("paySign").expect("paySign must be set");
    params.set(SIGN_FIELD, pay_sign);
    params.verify()?;
    assert_eq!(params.get_str("signType").as_deref(), Some("HMAC-SHA256"));
    Ok(())
}

#[test]
fn test_config_deserialize() -> Result<()> {
    let config: Config = serde_json::from_str(
        r#"{"appid": "wx01", "mch_id": "1900000109", "key": "abc", "sign_type": "MD5"}"#,
    )?;
    assert_eq!(config.appid.as_deref(), Some("wx01"));
    assert_eq!(config.notify_url, None);

    let options = config.signing_options()?;
    assert_eq!(options.secret()?, "abc");
    Ok(())
}
