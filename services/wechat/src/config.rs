use std::fmt::{Debug, Formatter};

use paysign_core::utils::Redact;
use paysign_core::{Env, ParameterSet, Result, SignType, SigningOptions};
use serde::Deserialize;

use crate::constants::*;

/// Config carries all the configuration for WeChat Pay merchants.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `appid` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHAT_PAY_APPID`]
    pub appid: Option<String>,
    /// `mch_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHAT_PAY_MCH_ID`]
    pub mch_id: Option<String>,
    /// Merchant secret, `key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHAT_PAY_KEY`]
    pub key: Option<String>,
    /// `sign_type` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHAT_PAY_SIGN_TYPE`]
    ///
    /// Defaults to `MD5`.
    pub sign_type: Option<String>,
    /// `notify_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHAT_PAY_NOTIFY_URL`]
    pub notify_url: Option<String>,
    /// `ssl_cert_path` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHAT_PAY_SSL_CERT_PATH`]
    pub ssl_cert_path: Option<String>,
    /// `ssl_key_path` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`WECHAT_PAY_SSL_KEY_PATH`]
    pub ssl_key_path: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set appid
    pub fn with_appid(mut self, appid: impl Into<String>) -> Self {
        self.appid = Some(appid.into());
        self
    }

    /// Set mch_id
    pub fn with_mch_id(mut self, mch_id: impl Into<String>) -> Self {
        self.mch_id = Some(mch_id.into());
        self
    }

    /// Set the merchant secret
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set sign_type
    pub fn with_sign_type(mut self, sign_type: impl Into<String>) -> Self {
        self.sign_type = Some(sign_type.into());
        self
    }

    /// Set notify_url
    pub fn with_notify_url(mut self, notify_url: impl Into<String>) -> Self {
        self.notify_url = Some(notify_url.into());
        self
    }

    /// Set ssl_cert_path
    pub fn with_ssl_cert_path(mut self, path: impl Into<String>) -> Self {
        self.ssl_cert_path = Some(path.into());
        self
    }

    /// Set ssl_key_path
    pub fn with_ssl_key_path(mut self, path: impl Into<String>) -> Self {
        self.ssl_key_path = Some(path.into());
        self
    }

    /// Load config from env, fields already set are kept.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        let pairs = [
            (&mut self.appid, WECHAT_PAY_APPID),
            (&mut self.mch_id, WECHAT_PAY_MCH_ID),
            (&mut self.key, WECHAT_PAY_KEY),
            (&mut self.sign_type, WECHAT_PAY_SIGN_TYPE),
            (&mut self.notify_url, WECHAT_PAY_NOTIFY_URL),
            (&mut self.ssl_cert_path, WECHAT_PAY_SSL_CERT_PATH),
            (&mut self.ssl_key_path, WECHAT_PAY_SSL_KEY_PATH),
        ];
        for (field, name) in pairs {
            if let Some(v) = env.var(name) {
                field.get_or_insert(v);
            }
        }

        self
    }

    /// Build the signing options for this merchant.
    ///
    /// An unknown `sign_type` fails here with `UnsupportedSignType`. A
    /// missing key is only reported once something is signed or verified.
    pub fn signing_options(&self) -> Result<SigningOptions> {
        let sign_type = match self.sign_type.as_deref() {
            None | Some("") => SignType::default(),
            Some(v) => v.parse()?,
        };

        let mut opts = SigningOptions::new().with_sign_type(sign_type);
        if let Some(key) = &self.key {
            opts = opts.with_secret(key);
        }
        if let Some(path) = &self.ssl_cert_path {
            opts = opts.with_ssl_cert_path(path);
        }
        if let Some(path) = &self.ssl_key_path {
            opts = opts.with_ssl_key_path(path);
        }
        Ok(opts)
    }

    /// Fill `appid`, `mch_id` and `notify_url` when the caller left them unset.
    pub fn fill_defaults(&self, fields: &mut ParameterSet) {
        for (name, value) in [
            (APPID, &self.appid),
            (MCH_ID, &self.mch_id),
            (NOTIFY_URL, &self.notify_url),
        ] {
            if let Some(v) = value {
                if fields.get(name).map_or(true, |v| v.is_empty()) {
                    fields.set(name, v);
                }
            }
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("appid", &self.appid)
            .field("mch_id", &self.mch_id)
            .field("key", &Redact::from(&self.key))
            .field("sign_type", &self.sign_type)
            .field("notify_url", &self.notify_url)
            .field("ssl_cert_path", &self.ssl_cert_path)
            .field("ssl_key_path", &self.ssl_key_path)
            .finish()
    }
}
