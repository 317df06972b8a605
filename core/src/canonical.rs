//! Canonical string construction.

use log::debug;

use crate::params::ParameterSet;

/// Field carrying the digest, never part of its own input.
pub const SIGN_FIELD: &str = "sign";
/// Field name reserved for the merchant secret suffix.
pub const KEY_FIELD: &str = "key";

/// Keys that are always stripped before signing.
pub const RESERVED_KEYS: [&str; 2] = [SIGN_FIELD, KEY_FIELD];

/// Build the canonical string to sign.
///
/// ## Format
///
/// ```text
/// k1=v1&k2=v2&...&kn=vn[&key=secret]
/// ```
///
/// - empty values (`Null` and `""`) are dropped
/// - `exclude` keys are dropped
/// - remaining keys are sorted ascending by byte value
/// - values are used raw: providers url-encode then url-decode them before
///   signing, which is the identity
/// - `secret_suffix`, if given, is appended as `key={secret}`
pub fn canonicalize(
    fields: &ParameterSet,
    exclude: &[&str],
    secret_suffix: Option<&str>,
) -> String {
    let mut params = fields
        .iter()
        .filter(|(k, v)| !v.is_empty() && !exclude.contains(k))
        .map(|(k, v)| (k, v.to_string()))
        .collect::<Vec<_>>();
    // Keys are unique, so sorting the pairs sorts by key only.
    params.sort();

    let mut s = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    debug!("canonical string: {s}");

    if let Some(secret) = secret_suffix {
        if !s.is_empty() {
            s.push('&');
        }
        s.push_str(KEY_FIELD);
        s.push('=');
        s.push_str(secret);
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Value;
    use pretty_assertions::assert_eq;

    fn order_fields() -> ParameterSet {
        ParameterSet::from([
            ("out_trade_no", "1001"),
            ("total_fee", "100"),
            ("appid", "wx01"),
            ("sign_type", "MD5"),
        ])
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(
            canonicalize(&order_fields(), &RESERVED_KEYS, Some("abc")),
            "appid=wx01&out_trade_no=1001&sign_type=MD5&total_fee=100&key=abc"
        );
        assert_eq!(
            canonicalize(&order_fields(), &RESERVED_KEYS, None),
            "appid=wx01&out_trade_no=1001&sign_type=MD5&total_fee=100"
        );
    }

    #[test]
    fn test_canonicalize_is_order_independent() {
        let shuffled = ParameterSet::from([
            ("sign_type", "MD5"),
            ("appid", "wx01"),
            ("total_fee", "100"),
            ("out_trade_no", "1001"),
        ]);
        assert_eq!(
            canonicalize(&order_fields(), &RESERVED_KEYS, Some("abc")),
            canonicalize(&shuffled, &RESERVED_KEYS, Some("abc"))
        );
    }

    #[test]
    fn test_canonicalize_skips_empty_and_reserved() {
        let fields = order_fields()
            .with("attach", "")
            .with("detail", Value::Null)
            .with("sign", "X")
            .with("key", "leaked");
        assert_eq!(
            canonicalize(&fields, &RESERVED_KEYS, Some("abc")),
            canonicalize(&order_fields(), &RESERVED_KEYS, Some("abc"))
        );
    }

    #[test]
    fn test_canonicalize_sorts_by_byte_value() {
        let fields = ParameterSet::from([("nonceStr", "n"), ("appId", "a"), ("Zeta", "z")]);
        assert_eq!(
            canonicalize(&fields, &RESERVED_KEYS, None),
            "Zeta=z&appId=a&nonceStr=n"
        );
    }

    #[test]
    fn test_canonicalize_keeps_raw_values() {
        let fields = ParameterSet::from([("body", "a b&c=d+e"), ("detail", "中文")]);
        assert_eq!(
            canonicalize(&fields, &RESERVED_KEYS, None),
            "body=a b&c=d+e&detail=中文"
        );
    }

    #[test]
    fn test_canonicalize_empty_set() {
        let fields = ParameterSet::from([("sign", "X"), ("attach", "")]);
        assert_eq!(canonicalize(&fields, &RESERVED_KEYS, None), "");
        assert_eq!(canonicalize(&fields, &RESERVED_KEYS, Some("abc")), "key=abc");
    }
}
