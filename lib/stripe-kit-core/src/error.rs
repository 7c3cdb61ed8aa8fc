//! Everything an API call can fail with.
//!
//! Nothing is retried or swallowed: transport failures, error envelopes and
//! undecodable bodies all reach the caller as one [`Error`].

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::{ApiError, ApiErrorKind};

/// Failure of an API call.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The call could not be encoded: binary data in a form, a path
    /// placeholder left unfilled, a nested value in a comma-separated list.
    /// Nothing was sent.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// The connection failed or dropped.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// The TLS handshake failed.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// No response arrived in time.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The API rejected the call with an error envelope.
    #[display("API error {status}: {error}")]
    #[from(skip)]
    Api {
        /// HTTP status.
        status: u16,
        /// The decoded `error` object.
        #[error(not(source))]
        error: ApiError,
    },

    /// Non-2xx answer without an error envelope, typically from a proxy.
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status.
        status: u16,
        /// Reason phrase of the status.
        message: String,
        /// Body as received, when not empty.
        #[error(not(source))]
        body: Option<Bytes>,
    },

    /// A 2xx body did not have the expected shape.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// Path of the offending field, such as `data[0].amount`.
        path: String,
        /// What serde complained about.
        message: String,
    },

    /// A base URL did not parse.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result of an API call.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Non-2xx answer without an error envelope. An empty body is dropped.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>, body: Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: (!body.is_empty()).then_some(body),
        }
    }

    /// Error envelope answered with `status`.
    #[must_use]
    pub const fn api(status: u16, error: ApiError) -> Self {
        Self::Api { status, error }
    }

    /// Connection failure.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// TLS failure.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Call that cannot be encoded.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Body that does not decode, with the path of the offending field.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// No response in time.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Connection failure.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Rejected before anything was sent.
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// HTTP status, when the API or a proxy answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 4xx answer.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }

    /// 5xx answer.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|status| (500..600).contains(&status))
    }

    /// 404 answer, such as a `resource_missing` envelope.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The decoded error envelope.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Kind of the error envelope.
    #[must_use]
    pub fn api_error_kind(&self) -> Option<ApiErrorKind> {
        self.api_error().map(|error| error.kind)
    }

    /// The card was declined or failed a check.
    #[must_use]
    pub fn is_card_error(&self) -> bool {
        self.api_error_kind() == Some(ApiErrorKind::CardError)
    }

    /// Too many calls: a `rate_limit_error` envelope or a bare 429.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.api_error_kind() == Some(ApiErrorKind::RateLimitError) || self.status() == Some(429)
    }

    /// Body of an answer without an error envelope.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Decodes the body of an answer without an error envelope, for
    /// gateways that answer with their own JSON.
    ///
    /// `None` when there is no such body.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    fn declined() -> Error {
        Error::api(
            402,
            ApiError {
                kind: ApiErrorKind::CardError,
                code: Some("card_declined".to_string()),
                decline_code: Some("insufficient_funds".to_string()),
                message: Some("Your card has insufficient funds.".to_string()),
                param: None,
                doc_url: None,
                charge: Some("ch_123".to_string()),
            },
        )
    }

    #[test]
    fn messages_name_the_failure() {
        check!(
            declined().to_string()
                == "API error 402: card_error (card_declined): Your card has insufficient funds."
        );
        check!(Error::http(502, "Bad Gateway", Bytes::new()).to_string() == "HTTP error 502: Bad Gateway");
        check!(
            Error::json_deserialization("data[0].amount", "invalid type: string").to_string()
                == "JSON deserialization error at 'data[0].amount': invalid type: string"
        );
        check!(Error::Timeout.to_string() == "request timeout");
    }

    #[test]
    fn card_errors_are_client_errors() {
        let err = declined();

        check!(err.status() == Some(402));
        check!(err.is_card_error());
        check!(err.is_client_error());
        check!(!err.is_server_error());
        check!(!err.is_rate_limited());
        let_assert!(Some(api_error) = err.api_error());
        check!(api_error.charge.as_deref() == Some("ch_123"));
    }

    #[test]
    fn rate_limits_are_recognised_with_or_without_envelope() {
        let envelope = Error::api(
            429,
            ApiError {
                kind: ApiErrorKind::RateLimitError,
                code: None,
                decline_code: None,
                message: None,
                param: None,
                doc_url: None,
                charge: None,
            },
        );
        check!(envelope.is_rate_limited());
        check!(Error::http(429, "Too Many Requests", Bytes::new()).is_rate_limited());
        check!(!Error::Timeout.is_rate_limited());
    }

    #[test]
    fn transport_failures_have_no_status() {
        for err in [Error::Timeout, Error::connection("refused"), Error::tls("bad certificate")] {
            check!(err.status().is_none());
            check!(err.api_error().is_none());
            check!(err.body().is_none());
        }
        check!(Error::Timeout.is_timeout());
        check!(Error::connection("refused").is_connection());
        check!(Error::invalid_request("binary in form").is_invalid_request());
    }

    #[test]
    fn gateway_bodies_can_be_decoded() {
        #[derive(Debug, serde::Deserialize)]
        struct GatewayError {
            message: String,
        }

        let err = Error::http(503, "Service Unavailable", Bytes::from(r#"{"message": "upstream down"}"#));
        check!(err.is_server_error());
        let_assert!(Some(Ok(GatewayError { message })) = err.decode_body::<GatewayError>());
        check!(message == "upstream down");

        let empty = Error::http(404, "Not Found", Bytes::new());
        check!(empty.is_not_found());
        check!(empty.body().is_none());
        check!(empty.decode_body::<GatewayError>().is_none());
    }
}
