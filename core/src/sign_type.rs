use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::canonical::{canonicalize, RESERVED_KEYS};
use crate::hash::{hex_hmac_sha256, hex_md5};
use crate::params::ParameterSet;
use crate::{Error, Result};

/// Signature algorithm used to compute the `sign` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignType {
    /// `uppercase(hex(md5(canonical + "&key=" + secret)))`
    #[default]
    Md5,
    /// `uppercase(hex(hmac_sha256(secret, canonical)))`
    ///
    /// # Note
    ///
    /// Providers' responses signed with this scheme have not been verified
    /// against their documentation. Prefer [`SignType::Md5`].
    HmacSha256,
}

impl SignType {
    /// The tag used on the wire and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Md5 => "MD5",
            SignType::HmacSha256 => "HMAC-SHA256",
        }
    }

    /// Build the canonical string for this algorithm.
    ///
    /// MD5 embeds the secret as a `key=` suffix, HMAC-SHA256 uses it as the
    /// MAC key only.
    pub fn string_to_sign(&self, fields: &ParameterSet, secret: &str) -> String {
        match self {
            SignType::Md5 => canonicalize(fields, &RESERVED_KEYS, Some(secret)),
            SignType::HmacSha256 => canonicalize(fields, &RESERVED_KEYS, None),
        }
    }

    /// Compute the digest of an already canonicalized string.
    ///
    /// For [`SignType::Md5`] the secret must already be part of
    /// `string_to_sign`; it's not embedded again.
    pub fn digest(&self, string_to_sign: &str, secret: &str) -> String {
        let hex = match self {
            SignType::Md5 => hex_md5(string_to_sign.as_bytes()),
            SignType::HmacSha256 => hex_hmac_sha256(secret.as_bytes(), string_to_sign.as_bytes()),
        };
        hex.to_ascii_uppercase()
    }

    /// Canonicalize `fields` and sign them with `secret`.
    pub fn sign(&self, fields: &ParameterSet, secret: &str) -> Result<String> {
        if secret.is_empty() {
            return Err(Error::missing_merchant_secret());
        }

        Ok(self.digest(&self.string_to_sign(fields, secret), secret))
    }
}

impl FromStr for SignType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MD5" => Ok(SignType::Md5),
            "HMAC-SHA256" => Ok(SignType::HmacSha256),
            v => Err(Error::unsupported_sign_type(v)),
        }
    }
}

impl Display for SignType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn order_fields(sign_type: &str) -> ParameterSet {
        ParameterSet::from([
            ("out_trade_no", "1001"),
            ("total_fee", "100"),
            ("appid", "wx01"),
            ("sign_type", sign_type),
        ])
    }

    #[test]
    fn test_md5_sign() -> Result<()> {
        let fields = order_fields("MD5");
        assert_eq!(
            SignType::Md5.string_to_sign(&fields, "abc"),
            "appid=wx01&out_trade_no=1001&sign_type=MD5&total_fee=100&key=abc"
        );
        assert_eq!(
            SignType::Md5.sign(&fields, "abc")?,
            "5ABBA5BD3734D9577980F13C788BBC8B"
        );
        Ok(())
    }

    #[test]
    fn test_hmac_sha256_sign() -> Result<()> {
        let fields = order_fields("HMAC-SHA256");
        assert_eq!(
            SignType::HmacSha256.string_to_sign(&fields, "abc"),
            "appid=wx01&out_trade_no=1001&sign_type=HMAC-SHA256&total_fee=100"
        );
        assert_eq!(
            SignType::HmacSha256.sign(&fields, "abc")?,
            "53037623418E270B5736877CC5B5F4992C05E54FB8E4B77C104F9B1D4D3811FF"
        );
        Ok(())
    }

    #[test]
    fn test_md5_digest_shape() -> Result<()> {
        for secret in ["abc", "192006250b4c09247ec02edce69f6a2d", "密钥"] {
            let digest = SignType::Md5.sign(&order_fields("MD5"), secret)?;
            assert_eq!(digest.len(), 32);
            assert!(digest
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
        Ok(())
    }

    #[test]
    fn test_empty_secret() {
        let err = SignType::Md5
            .sign(&order_fields("MD5"), "")
            .expect_err("empty secret must fail");
        assert_eq!(err.kind(), ErrorKind::MissingMerchantSecret);
    }

    #[test_case("MD5", SignType::Md5; "md5")]
    #[test_case("HMAC-SHA256", SignType::HmacSha256; "hmac sha256")]
    fn test_parse(tag: &str, expected: SignType) {
        assert_eq!(tag.parse::<SignType>().expect("must be supported"), expected);
        assert_eq!(expected.to_string(), tag);
    }

    #[test_case("md5"; "lowercase")]
    #[test_case("RSA"; "rsa")]
    #[test_case(""; "empty")]
    fn test_parse_unsupported(tag: &str) {
        let err = tag.parse::<SignType>().expect_err("must be unsupported");
        assert_eq!(err.kind(), ErrorKind::UnsupportedSignType);
        assert!(err.is_config_error());
    }
}
