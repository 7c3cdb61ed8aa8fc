//! API key authentication middleware.
//!
//! Adds `Authorization: Bearer <api key>` to every outgoing request, and
//! `Stripe-Version` when an API version is pinned.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::{Error, Request, Response, Result};

/// Header carrying the pinned API version.
pub const STRIPE_VERSION_HEADER: &str = "Stripe-Version";

/// Layer that authenticates requests with a secret API key.
///
/// # Example
///
/// ```ignore
/// use stripe_kit::middleware::AuthLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(AuthLayer::new("sk_test_123").with_api_version("2024-06-20"))
///     .service(client);
/// ```
#[derive(Clone)]
pub struct AuthLayer {
    api_key: Arc<str>,
    api_version: Option<Arc<str>>,
}

impl std::fmt::Debug for AuthLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthLayer")
            .field("api_key", &"[redacted]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl AuthLayer {
    /// Create a new auth layer with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Arc::from(api_key.into()),
            api_version: None,
        }
    }

    /// Pin the API version sent with every request.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(Arc::from(version.into()));
        self
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = Auth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Auth {
            inner,
            api_key: Arc::clone(&self.api_key),
            api_version: self.api_version.clone(),
        }
    }
}

/// Service that authenticates requests with a secret API key.
#[derive(Clone)]
pub struct Auth<S> {
    inner: S,
    api_key: Arc<str>,
    api_version: Option<Arc<str>>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Auth<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("inner", &self.inner)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl<S> Service<Request<Bytes>> for Auth<S>
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

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        request.set_header("Authorization", format!("Bearer {}", self.api_key));
        if let Some(version) = &self.api_version {
            request.set_header(STRIPE_VERSION_HEADER, version.as_ref());
        }

        // Call the instance `poll_ready` was driven on; the clone stays behind.
        let fresh = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, fresh);
        Box::pin(async move { inner.call(request).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let layer = AuthLayer::new("sk_test_secret").with_api_version("2024-06-20");
        let debug = format!("{layer:?}");

        assert!(!debug.contains("sk_test_secret"));
        assert!(debug.contains("2024-06-20"));
    }
}
