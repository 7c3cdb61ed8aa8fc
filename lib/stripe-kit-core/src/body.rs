//! Form encoding of parameters and JSON decoding of answers.

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{Result, ToParameterValue, flatten_params};

/// Bytes left as-is by the form encoder: RFC 3986 unreserved characters.
///
/// Everything else is percent-encoded, so a space becomes `%20` and brackets
/// in keys become `%5B` / `%5D`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Media types the client sends. Responses are always JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContentType {
    /// Body of every `POST` but file uploads.
    #[display("application/x-www-form-urlencoded")]
    FormUrlEncoded,
    /// File part of an upload.
    #[display("application/octet-stream")]
    OctetStream,
}

impl ContentType {
    /// MIME type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

/// Join flattened pairs into `key1=value1&key2=value2`.
///
/// Keys and values are both percent-encoded. Order is kept as given and an
/// empty input gives an empty string.
///
/// # Example
///
/// ```
/// use stripe_kit_core::encode_pairs;
///
/// let pairs = vec![
///     ("description".to_string(), "a test".to_string()),
///     ("metadata[a]".to_string(), "b".to_string()),
/// ];
/// assert_eq!(encode_pairs(&pairs), "description=a%20test&metadata%5Ba%5D=b");
/// ```
#[must_use]
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    let mut encoded = String::new();
    for (index, (key, value)) in pairs.iter().enumerate() {
        if index > 0 {
            encoded.push('&');
        }
        encoded.extend(utf8_percent_encode(key, FORM_ENCODE_SET));
        encoded.push('=');
        encoded.extend(utf8_percent_encode(value, FORM_ENCODE_SET));
    }
    encoded
}

/// Serialize parameters to form URL-encoded bytes.
///
/// # Errors
///
/// Returns an error if the parameters cannot be flattened (binary data, bad root).
///
/// # Example
///
/// ```
/// use stripe_kit_core::{ParameterValue, to_form};
///
/// let params = ParameterValue::map().with("description", "test").with("amount", 2000_i64);
/// let bytes = to_form(&params).expect("serialize");
/// assert_eq!(bytes.as_ref(), b"description=test&amount=2000");
/// ```
pub fn to_form<P: ToParameterValue + ?Sized>(params: &P) -> Result<Bytes> {
    to_query_string(params).map(|s| Bytes::from(s.into_bytes()))
}

/// Serialize parameters to a query string (without the leading `?`).
///
/// # Errors
///
/// Returns an error if the parameters cannot be flattened.
///
/// # Example
///
/// ```
/// use stripe_kit_core::{ParameterValue, to_query_string};
///
/// let filter = ParameterValue::map().with("limit", 3_i64).with("starting_after", None::<String>);
/// assert_eq!(to_query_string(&filter).expect("serialize"), "limit=3");
/// ```
pub fn to_query_string<P: ToParameterValue + ?Sized>(params: &P) -> Result<String> {
    flatten_params(params).map(|pairs| encode_pairs(&pairs))
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "charges.data[0].amount").
///
/// # Example
///
/// ```
/// use stripe_kit_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Customer { id: String }
///
/// let bytes = br#"{"id":"cus_123"}"#;
/// let customer: Customer = from_json(bytes).expect("deserialize");
/// assert_eq!(customer, Customer { id: "cus_123".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;
    use crate::ParameterValue;

    #[test]
    fn content_types_display_their_mime_type() {
        for content_type in [ContentType::FormUrlEncoded, ContentType::OctetStream] {
            check!(content_type.to_string() == content_type.as_str());
        }
    }

    #[test]
    fn encode_pairs_empty() {
        assert_eq!(encode_pairs(&[]), "");
    }

    #[test]
    fn encode_pairs_escapes_reserved_characters() {
        let pairs = vec![
            ("q".to_string(), "a+b c&d=e".to_string()),
            ("name".to_string(), "Zoë".to_string()),
            ("safe".to_string(), "A-z_0.9~".to_string()),
        ];

        insta::assert_snapshot!(
            encode_pairs(&pairs),
            @"q=a%2Bb%20c%26d%3De&name=Zo%C3%AB&safe=A-z_0.9~"
        );
    }

    #[test]
    fn encode_pairs_keeps_order_and_repeated_keys() {
        let pairs = vec![
            ("expand[]".to_string(), "customer".to_string()),
            ("expand[]".to_string(), "invoice".to_string()),
            ("amount".to_string(), "100".to_string()),
        ];

        assert_eq!(
            encode_pairs(&pairs),
            "expand%5B%5D=customer&expand%5B%5D=invoice&amount=100"
        );
    }

    #[test]
    fn form_round_trips_through_a_standard_decoder() {
        let params = ParameterValue::map()
            .with("description", "Jane's coffee & tea")
            .with("email", "jane+test@example.com")
            .with("balance", -150_i64)
            .with("tax_exempt", "none")
            .with("livemode", false);

        let body = to_form(&params).expect("serialize");
        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(&body)
            .into_owned()
            .collect();

        check!(decoded == flatten_params(&params).expect("flatten"));
    }

    #[test]
    fn encoding_is_idempotent() {
        let params = ParameterValue::map()
            .with("metadata", ParameterValue::map().with("order", "42"))
            .with("amount", 500_i64);

        check!(to_form(&params).expect("first") == to_form(&params).expect("second"));
    }

    #[test]
    fn to_query_string_skips_absent() {
        let filter = ParameterValue::map()
            .with("limit", 3_i64)
            .with("customer", None::<String>);

        assert_eq!(to_query_string(&filter).expect("serialize"), "limit=3");
    }

    #[test]
    fn from_json_deserialize() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Customer {
            id: String,
            balance: i64,
        }

        let bytes = br#"{"id":"cus_1","balance":30}"#;
        let customer: Customer = from_json(bytes).expect("deserialize");

        assert_eq!(
            customer,
            Customer {
                id: "cus_1".to_string(),
                balance: 30,
            }
        );
    }

    #[test]
    fn from_json_syntax_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Customer {
            #[allow(dead_code)]
            id: String,
        }

        let result: Result<Customer> = from_json(b"not json");

        let err = result.expect_err("should fail");
        assert!(err.to_string().contains("JSON deserialization error"));
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Shipping {
            #[allow(dead_code)]
            address: Address,
        }

        let result: Result<Shipping> = from_json(br#"{"address":{}}"#);

        let msg = result.expect_err("should fail").to_string();
        assert!(
            msg.contains("address"),
            "Expected path 'address' in error: {msg}"
        );
        assert!(
            msg.contains("city"),
            "Expected field 'city' mentioned in error: {msg}"
        );
    }
}
