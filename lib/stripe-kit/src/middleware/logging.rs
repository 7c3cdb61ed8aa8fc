//! `tracing` instrumentation of API calls.
//!
//! Each call runs in a `stripe_request` span named after the route's path
//! template (`/customers/{customer}`), so object ids stay out of span fields.
//! Failed calls are logged with the decoded error envelope when there is one.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::routes::{IDEMPOTENCY_KEY_HEADER, STRIPE_ACCOUNT_HEADER};
use crate::{ApiError, Error, Request, Response, Result};

const REDACTED: &str = "[redacted]";

/// Layer logging every API call.
///
/// The default layer logs one line per call at `INFO` (`WARN` on failure).
/// [`LoggingLayer::verbose`] also logs the outgoing headers at `DEBUG`, with
/// the API key masked.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    verbose: bool,
}

impl LoggingLayer {
    /// Summary logging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary logging plus request headers at `DEBUG`.
    #[must_use]
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            verbose: self.verbose,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    verbose: bool,
}

fn masked(headers: &HashMap<String, String>) -> Vec<(&str, &str)> {
    let mut headers: Vec<_> = headers
        .iter()
        .map(|(name, value)| {
            let value = if name.eq_ignore_ascii_case("authorization") {
                REDACTED
            } else {
                value.as_str()
            };
            (name.as_str(), value)
        })
        .collect();
    headers.sort_unstable();
    headers
}

fn log_outcome(result: &Result<Response<Bytes>>, elapsed_ms: u64) {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, connection = err.is_connection(), elapsed_ms, "call failed");
            return;
        }
    };

    let status = response.status();
    let request_id = response.request_id().unwrap_or("-");
    if response.is_success() {
        info!(status, request_id, elapsed_ms, "call succeeded");
        return;
    }

    match ApiError::from_body(response.body()) {
        Some(api_error) => warn!(
            status,
            request_id,
            elapsed_ms,
            error_type = %api_error.kind,
            code = api_error.code.as_deref().unwrap_or("-"),
            param = api_error.param.as_deref().unwrap_or("-"),
            "call rejected"
        ),
        None => warn!(status, request_id, elapsed_ms, "call rejected"),
    }
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let path = request
            .path_template()
            .map_or_else(|| request.url().path().to_string(), |template| template.to_string());
        let span = info_span!(
            "stripe_request",
            method = %request.method(),
            %path,
            account = request.header(STRIPE_ACCOUNT_HEADER).unwrap_or("-"),
            idempotent = request.header(IDEMPOTENCY_KEY_HEADER).is_some(),
        );
        if self.verbose {
            span.in_scope(|| {
                debug!(
                    headers = ?masked(request.headers()),
                    body_len = request.body().map_or(0, Bytes::len),
                    "sending"
                );
            });
        }

        // Call the instance `poll_ready` was driven on; the clone stays behind.
        let fresh = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, fresh);
        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                log_outcome(&result, elapsed_ms);
                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_api_key_is_masked() {
        let headers = HashMap::from([
            ("Authorization".to_string(), "Bearer sk_test_123".to_string()),
            ("Idempotency-Key".to_string(), "order-1".to_string()),
        ]);

        assert_eq!(
            masked(&headers),
            [("Authorization", REDACTED), ("Idempotency-Key", "order-1")]
        );
    }

    #[test]
    fn verbose_is_opt_in() {
        assert!(!LoggingLayer::new().verbose);
        assert!(LoggingLayer::verbose().verbose);
    }
}
