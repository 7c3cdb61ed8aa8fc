//! hyper-based [`HttpClient`](stripe_kit_core::HttpClient) with a tower
//! middleware stack.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tower::{Layer, ServiceExt};
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::config::{AppInfo, ClientConfig, ClientConfigBuilder};
use crate::middleware::{AuthLayer, LoggingLayer};
use crate::{Error, Request, Response, Result};

/// Header describing the bindings as JSON.
pub const CLIENT_USER_AGENT_HEADER: &str = "X-Stripe-Client-User-Agent";

/// Middleware stack with its type erased.
pub type BoxedService = BoxCloneService<Request<Bytes>, Response<Bytes>, Error>;

/// Future returned by [`HyperClient`] as a tower service.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

type Wrap = Box<dyn FnOnce(BoxedService) -> BoxedService + Send>;

/// TLS through rustls with the webpki roots. Plain `http://` stays allowed
/// for local mock servers.
fn connector(config: &ClientConfig) -> HttpsConnector<HttpConnector> {
    let roots: rustls::RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
    let tls = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut tcp = HttpConnector::new();
    tcp.enforce_http(false);
    tcp.set_connect_timeout(Some(config.connect_timeout));

    HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(tcp)
}

/// Whether a rustls error sits anywhere in the cause chain.
fn is_tls_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut cause = Some(err);
    while let Some(current) = cause {
        if current.is::<rustls::Error>() {
            return true;
        }
        if let Some(io) = current.downcast_ref::<std::io::Error>()
            && io.get_ref().is_some_and(|inner| inner.is::<rustls::Error>())
        {
            return true;
        }
        cause = current.source();
    }
    false
}

/// Bottom of the stack: one hyper exchange per request.
#[derive(Clone)]
struct Wire {
    hyper: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
    user_agent: Arc<str>,
    client_user_agent: Arc<str>,
}

impl Wire {
    fn new(config: &ClientConfig) -> Self {
        let hyper = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector(config));
        Self {
            hyper,
            timeout: config.timeout,
            user_agent: config.user_agent().into(),
            client_user_agent: config.client_user_agent().into(),
        }
    }

    fn to_hyper(&self, mut request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        for (name, value) in [
            ("User-Agent", &self.user_agent),
            (CLIENT_USER_AGENT_HEADER, &self.client_user_agent),
        ] {
            if request.header(name).is_none() {
                request.set_header(name, value.to_string());
            }
        }
        let (method, url, headers, body) = request.into_parts();

        let builder = headers.iter().fold(
            http::Request::builder()
                .method(http::Method::from(method))
                .uri(url.as_str()),
            |builder, (name, value)| builder.header(name.as_str(), value.as_str()),
        );
        builder
            .body(body.map_or_else(Full::default, Full::new))
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn exchange(self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let request = self.to_hyper(request)?;
        let response = tokio::time::timeout(self.timeout, self.hyper.request(request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(|err| {
                if is_tls_failure(&err) {
                    Error::tls(format!("{err:?}"))
                } else {
                    Error::connection(format!("{err:?}"))
                }
            })?;

        let status = response.status().as_u16();
        let headers: HashMap<_, _> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|err| Error::connection(err.to_string()))?
            .to_bytes();

        Ok(Response::new(status, headers, body))
    }
}

impl Service<Request<Bytes>> for Wire {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        Box::pin(self.clone().exchange(request))
    }
}

/// HTTP client for the API: pooled connections, rustls, and any number of
/// tower layers.
///
/// Clones share the connection pool.
///
/// ```ignore
/// use std::time::Duration;
/// use stripe_kit::HyperClient;
///
/// let http = HyperClient::builder()
///     .timeout(Duration::from_secs(20))
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    // `BoxCloneService` is `Send` but not `Sync`; each call clones it out.
    stack: Arc<Mutex<BoxedService>>,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Client with the default settings and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// Transport settings.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn stack(&self) -> BoxedService {
        self.stack
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Client sharing this one's pool, with `layer` added as the outermost
    /// middleware.
    #[must_use]
    pub fn layer<L>(&self, layer: L) -> Self
    where
        L: Layer<BoxedService>,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send,
    {
        Self {
            stack: Arc::new(Mutex::new(BoxCloneService::new(layer.layer(self.stack())))),
            config: Arc::clone(&self.config),
        }
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl stripe_kit_core::HttpClient for HyperClient {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.stack().oneshot(request).await
    }
}

impl Service<Request<Bytes>> for HyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        Box::pin(self.stack().oneshot(request))
    }
}

/// Builder for [`HyperClient`].
///
/// Layers wrap each other in the order they are added: the last one sees
/// the request first.
#[derive(Default)]
pub struct HyperClientBuilder {
    config: ClientConfigBuilder,
    layers: Vec<Wrap>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Time allowed until the response headers arrive. Defaults to 80 seconds.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Time allowed to connect. Defaults to 30 seconds.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Idle connections kept per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Delay before idle connections are closed.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Application reported in the user agent headers.
    #[must_use]
    pub fn app_info(mut self, app: AppInfo) -> Self {
        self.config = self.config.app_info(app);
        self
    }

    /// Adds a tower layer.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send,
    {
        self.layers
            .push(Box::new(move |inner| BoxCloneService::new(layer.layer(inner))));
        self
    }

    /// Logs one line per call.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Logs one line per call plus the request headers, API key masked.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::verbose())
    }

    /// Authenticates every call with `api_key`.
    ///
    /// [`StripeClient`](crate::StripeClient) adds this itself; it is only
    /// needed when the client is driven directly.
    #[must_use]
    pub fn with_auth(self, api_key: impl Into<String>) -> Self {
        self.layer(AuthLayer::new(api_key))
    }

    /// Builds the client.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let config = self.config.build();
        let bottom: BoxedService = BoxCloneService::new(Wire::new(&config));
        let stack = self.layers.into_iter().fold(bottom, |inner, wrap| wrap(inner));

        HyperClient {
            stack: Arc::new(Mutex::new(stack)),
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use url::Url;

    use super::*;
    use crate::Method;

    #[test]
    fn builder_settings_reach_the_config() {
        let client = HyperClient::builder()
            .timeout(Duration::from_secs(20))
            .pool_idle_per_host(4)
            .app_info(AppInfo::new("my-shop"))
            .with_logging()
            .build();

        check!(client.config().timeout == Duration::from_secs(20));
        check!(client.config().pool_idle_per_host == 4);
        check!(client.config().user_agent().ends_with(" my-shop"));
    }

    #[test]
    fn builder_debug_counts_layers_without_the_key() {
        let builder = HyperClient::builder()
            .with_logging()
            .with_auth("sk_test_123");

        let debug = format!("{builder:?}");
        check!(debug.contains("layers: 2"));
        check!(!debug.contains("sk_test_123"));
    }

    #[test]
    fn user_agent_headers_are_added_unless_present() {
        let wire = Wire::new(&ClientConfig::default());
        let url = Url::parse("https://api.stripe.com/v1/balance").expect("url");

        let request = wire
            .to_hyper(Request::builder(Method::Get, url.clone()).build())
            .expect("request");
        let_assert!(Some(agent) = request.headers().get("user-agent"));
        check!(agent == crate::config::BINDINGS_USER_AGENT);
        check!(request.headers().contains_key("x-stripe-client-user-agent"));

        let request = wire
            .to_hyper(
                Request::builder(Method::Get, url)
                    .header("user-agent", "custom/1.0")
                    .header("x-stripe-client-user-agent", "{}")
                    .build(),
            )
            .expect("request");
        let agents: Vec<_> = request.headers().get_all("user-agent").iter().collect();
        check!(agents == ["custom/1.0"]);
        check!(request.headers().get_all(CLIENT_USER_AGENT_HEADER).iter().count() == 1);
    }

    #[test]
    fn plain_io_errors_are_not_tls() {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        check!(!is_tls_failure(&err));

        let err = std::io::Error::other(rustls::Error::General("bad certificate".into()));
        check!(is_tls_failure(&err));
    }
}
