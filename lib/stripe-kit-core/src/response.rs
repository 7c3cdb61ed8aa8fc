//! Raw answers from the API, before decoding.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::request::find_header;

/// Response header identifying the call, to quote when contacting support.
pub const REQUEST_ID_HEADER: &str = "request-id";

/// Status, headers, and body of an API call.
///
/// [`decode_response`](crate::decode_response) turns it into the resource
/// or an [`Error`](crate::Error).
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Assembles a response, as received by a transport.
    #[must_use]
    pub const fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// All headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header value, whatever the case of `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The `Request-Id` of the call.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header(REQUEST_ID_HEADER)
    }

    /// Raw body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

impl Response<Bytes> {
    /// Decodes the body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonDeserialization`](crate::Error::JsonDeserialization)
    /// with the path of the offending field.
    pub fn json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::Error;

    #[test]
    fn request_id_is_found_whatever_the_case() {
        let headers = HashMap::from([("Request-Id".to_string(), "req_abc".to_string())]);
        let response = Response::new(200, headers, Bytes::new());

        check!(response.request_id() == Some("req_abc"));
        check!(response.header("REQUEST-ID") == Some("req_abc"));
        check!(Response::new(200, HashMap::new(), Bytes::new()).request_id().is_none());
    }

    #[test]
    fn only_2xx_is_success() {
        let statuses: Vec<_> = [200, 204, 299, 300, 402, 500]
            .into_iter()
            .filter(|&status| Response::new(status, HashMap::new(), ()).is_success())
            .collect();

        check!(statuses == [200, 204, 299]);
    }

    #[test]
    fn json_reports_the_failing_field() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Balance {
            livemode: bool,
        }

        let ok = Response::new(200, HashMap::new(), Bytes::from(r#"{"livemode":false}"#));
        let_assert!(Ok(Balance { livemode: false }) = ok.json::<Balance>());

        let bad = Response::new(200, HashMap::new(), Bytes::from(r#"{"livemode":"no"}"#));
        let_assert!(Err(Error::JsonDeserialization { path, .. }) = bad.json::<Balance>());
        check!(path == "livemode");
    }
}
