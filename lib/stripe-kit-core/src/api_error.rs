//! Error object returned by the API in non-2xx responses.
//!
//! The body looks like:
//!
//! ```json
//! {"error": {"type": "card_error", "code": "card_declined", "message": "..."}}
//! ```

use serde::{Deserialize, Serialize};

/// Category of an API error (the `type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Problem on the API side.
    ApiError,
    /// The card could not be charged.
    CardError,
    /// An idempotency key was reused with different parameters.
    IdempotencyError,
    /// Invalid parameters.
    InvalidRequestError,
    /// Missing or invalid API key.
    AuthenticationError,
    /// Too many requests.
    RateLimitError,
    /// The API could not reach a downstream network.
    ApiConnectionError,
    /// A type this version of the crate does not know about.
    #[serde(other)]
    Unknown,
}

impl ApiErrorKind {
    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApiError => "api_error",
            Self::CardError => "card_error",
            Self::IdempotencyError => "idempotency_error",
            Self::InvalidRequestError => "invalid_request_error",
            Self::AuthenticationError => "authentication_error",
            Self::RateLimitError => "rate_limit_error",
            Self::ApiConnectionError => "api_connection_error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error decoded from an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category.
    #[serde(rename = "type")]
    pub kind: ApiErrorKind,
    /// Short machine-readable code (e.g. `resource_missing`).
    #[serde(default)]
    pub code: Option<String>,
    /// Issuer reason for card declines.
    #[serde(default)]
    pub decline_code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Parameter the error relates to.
    #[serde(default)]
    pub param: Option<String>,
    /// Link to the documentation of the error code.
    #[serde(default)]
    pub doc_url: Option<String>,
    /// Failed charge, for card errors.
    #[serde(default)]
    pub charge: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// `{"error": {...}}` wrapper.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

impl ApiError {
    /// Decodes an error response body, `None` when it is not an error envelope.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ApiErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_invalid_request_error() {
        let body = br#"{
            "error": {
                "type": "invalid_request_error",
                "code": "resource_missing",
                "message": "No such customer: 'cus_missing'",
                "param": "id",
                "doc_url": "https://stripe.com/docs/error-codes/resource-missing"
            }
        }"#;

        let error = ApiError::from_body(body).expect("envelope");

        assert_eq!(error.kind, ApiErrorKind::InvalidRequestError);
        assert_eq!(error.code.as_deref(), Some("resource_missing"));
        assert_eq!(error.param.as_deref(), Some("id"));
        assert!(error.decline_code.is_none());
        assert_eq!(
            error.to_string(),
            "invalid_request_error (resource_missing): No such customer: 'cus_missing'"
        );
    }

    #[test]
    fn unknown_kind_is_tolerated() {
        let body = br#"{"error": {"type": "brand_new_error"}}"#;

        let error = ApiError::from_body(body).expect("envelope");

        assert_eq!(error.kind, ApiErrorKind::Unknown);
        assert_eq!(error.to_string(), "unknown");
    }

    #[test]
    fn non_envelope_bodies_are_rejected() {
        assert!(ApiError::from_body(b"<html>502</html>").is_none());
        assert!(ApiError::from_body(br#"{"message": "nope"}"#).is_none());
        assert!(ApiError::from_body(b"").is_none());
    }
}
