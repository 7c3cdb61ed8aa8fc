//! Generic API client wrapper.
//!
//! This module provides [`ApiClient`], a wrapper that combines any [`HttpClient`]
//! with the base URLs of the API and file hosts to create a [`Transport`].

use std::future::Future;
use std::sync::LazyLock;

use bytes::Bytes;
use url::Url;

use crate::{ApiHost, Error, HttpClient, Request, Response, Result, Transport};

/// Default base URL of the REST API.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

/// Default base URL of the file upload host.
pub const DEFAULT_FILES_BASE: &str = "https://files.stripe.com/v1";

/// Generic API client wrapper.
///
/// Wraps any [`HttpClient`] with the base URL of each host. Sharing one
/// `HttpClient` (with its connection pool and middleware) across several
/// wrappers is cheap: the client is cloned, not rebuilt.
///
/// # Example
///
/// ```ignore
/// use stripe_kit::{ApiClient, HyperClient};
///
/// let http = HyperClient::builder().with_logging().build();
/// let live = ApiClient::new(http.clone());
/// let mock = ApiClient::new(http).with_base_url("http://localhost:12111/v1")?;
/// ```
#[derive(Debug)]
pub struct ApiClient<C> {
    client: C,
    api_base: Url,
    files_base: Url,
}

impl<C: Clone> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_base: self.api_base.clone(),
            files_base: self.files_base.clone(),
        }
    }
}

#[allow(clippy::expect_used)]
static API_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"));

#[allow(clippy::expect_used)]
static FILES_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_FILES_BASE).expect("default files base is a valid URL"));

fn parse_base(url: &str) -> Result<Url> {
    Url::parse(url).map_err(Error::InvalidUrl)
}

impl<C> ApiClient<C> {
    /// Create a new API client pointing at the production hosts.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            api_base: API_BASE.clone(),
            files_base: FILES_BASE.clone(),
        }
    }

    /// Replace the API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        self.api_base = parse_base(base_url.as_ref())?;
        Ok(self)
    }

    /// Replace the file upload base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn with_files_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        self.files_base = parse_base(base_url.as_ref())?;
        Ok(self)
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C> Transport for ApiClient<C>
where
    C: HttpClient + Clone,
{
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        self.client.execute(request)
    }

    fn base_url(&self, host: ApiHost) -> &Url {
        match host {
            ApiHost::Api => &self.api_base,
            ApiHost::Files => &self.files_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Noop;

    #[test]
    fn defaults_point_at_production() {
        let client = ApiClient::new(Noop);

        assert_eq!(client.api_base.as_str(), "https://api.stripe.com/v1");
        assert_eq!(client.files_base.as_str(), "https://files.stripe.com/v1");
    }

    #[test]
    fn base_urls_can_be_replaced() {
        let client = ApiClient::new(Noop)
            .with_base_url("http://localhost:12111/v1")
            .expect("valid url")
            .with_files_base_url("http://localhost:12112/v1")
            .expect("valid url");

        assert_eq!(client.api_base.path(), "/v1");
        assert_eq!(client.files_base.port(), Some(12112));
    }

    #[test]
    fn invalid_base_url() {
        let result = ApiClient::new(Noop).with_base_url("not a url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
