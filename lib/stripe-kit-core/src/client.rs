//! HTTP client traits.
//!
//! - [`HttpClient`] - Low-level HTTP execution
//! - [`Transport`] - HTTP execution plus base URLs, used by every route group
//!
//! Implement [`Transport`] directly to record requests in tests or to route
//! calls through a proxy.

use std::collections::HashMap;
use std::future::Future;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, ApiHost, Endpoint, Error, Request, Response, Result};

/// Sends a resolved request and hands back whatever answer arrives.
///
/// Wrap one in `stripe_kit::ApiClient` to get a [`Transport`].
pub trait HttpClient: Send + Sync {
    /// Performs one exchange.
    ///
    /// # Errors
    ///
    /// Transport failures only: connection, TLS, timeout. A non-2xx answer
    /// is still an `Ok` response.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// Executes API calls on behalf of route groups.
///
/// Implementors provide raw execution and the base URL of each host;
/// [`Transport::send`] does the rest (URL assembly, status handling, JSON decoding).
///
/// # Example
///
/// ```ignore
/// use stripe_kit::{ApiHost, Request, Response, Result, Transport};
///
/// #[derive(Clone)]
/// struct Recorder {
///     base: Url,
///     seen: Arc<Mutex<Vec<Request>>>,
/// }
///
/// impl Transport for Recorder {
///     async fn execute(&self, request: Request) -> Result<Response> {
///         self.seen.lock().unwrap().push(request);
///         Ok(Response::new(200, HashMap::new(), Bytes::from_static(b"{}")))
///     }
///
///     fn base_url(&self, _host: ApiHost) -> &Url {
///         &self.base
///     }
/// }
/// ```
pub trait Transport: Clone + Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails. Non-2xx responses are not errors here.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;

    /// Base URL for `host`, including the version prefix (`https://api.stripe.com/v1`).
    fn base_url(&self, host: ApiHost) -> &Url;

    /// Builds, executes and decodes one endpoint call.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] when the endpoint cannot be turned into a request,
    /// - transport errors as returned by [`Transport::execute`],
    /// - [`Error::Api`] / [`Error::Http`] for non-2xx responses,
    /// - [`Error::JsonDeserialization`] when a 2xx body does not match `T`.
    fn send<T>(
        &self,
        endpoint: Endpoint,
        headers: &HashMap<String, String>,
    ) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send,
    {
        let host = endpoint.host();
        let request = endpoint.into_request(self.base_url(host), headers);
        async move {
            let response = self.execute(request?).await?;
            decode_response(&response)
        }
    }
}

/// Decodes a response: JSON for 2xx, [`Error::Api`] when the body is an error
/// envelope, [`Error::Http`] otherwise.
///
/// # Errors
///
/// See above.
pub fn decode_response<T: DeserializeOwned>(response: &Response<Bytes>) -> Result<T> {
    if response.is_success() {
        return response.json();
    }

    let status = response.status();
    let body = response.body();
    if let Some(error) = ApiError::from_body(body) {
        return Err(Error::api(status, error));
    }

    let message = http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("unexpected status");
    Err(Error::http(status, message, body.clone()))
}
