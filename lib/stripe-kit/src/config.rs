//! Transport settings.

use std::time::Duration;

use serde::Serialize;

/// Name and version reported to the API.
pub const BINDINGS_USER_AGENT: &str = concat!("stripe-kit/", env!("CARGO_PKG_VERSION"));

/// Plugin or application built on top of the client, reported in the
/// `User-Agent` so API logs can tell integrations apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    /// Application name.
    pub name: String,
    /// Application version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Application home page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AppInfo {
    /// Application called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            url: None,
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the home page.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    // `name/version (url)`
    fn user_agent_suffix(&self) -> String {
        let mut suffix = self.name.clone();
        if let Some(version) = &self.version {
            suffix.push('/');
            suffix.push_str(version);
        }
        if let Some(url) = &self.url {
            suffix.push_str(&format!(" ({url})"));
        }
        suffix
    }
}

/// Settings of [`HyperClient`](crate::HyperClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Time allowed from sending a request to receiving the response headers.
    pub timeout: Duration,
    /// Time allowed to open a connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_idle_per_host: usize,
    /// Delay before an idle connection is closed.
    pub pool_idle_timeout: Duration,
    /// Application reported alongside the bindings.
    pub app_info: Option<AppInfo>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(80),
            connect_timeout: Duration::from_secs(30),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            app_info: None,
        }
    }
}

impl ClientConfig {
    /// Starts from the defaults.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `User-Agent` header value: the bindings, then the application if any.
    #[must_use]
    pub fn user_agent(&self) -> String {
        match &self.app_info {
            Some(app) => format!("{BINDINGS_USER_AGENT} {}", app.user_agent_suffix()),
            None => BINDINGS_USER_AGENT.to_string(),
        }
    }

    /// `X-Stripe-Client-User-Agent` header value, a JSON description of the
    /// bindings.
    #[must_use]
    pub fn client_user_agent(&self) -> String {
        #[derive(Serialize)]
        struct ClientUserAgent<'a> {
            bindings_version: &'static str,
            lang: &'static str,
            publisher: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            application: Option<&'a AppInfo>,
        }

        let agent = ClientUserAgent {
            bindings_version: env!("CARGO_PKG_VERSION"),
            lang: "rust",
            publisher: "stripe-kit",
            application: self.app_info.as_ref(),
        };
        serde_json::to_string(&agent).unwrap_or_default()
    }
}

/// Builder for [`ClientConfig`]. Unset values keep their default.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder(ClientConfig);

impl ClientConfigBuilder {
    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.0.timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.0.connect_timeout = timeout;
        self
    }

    /// Sets how many idle connections are kept per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.0.pool_idle_per_host = count;
        self
    }

    /// Sets how long idle connections are kept.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.0.pool_idle_timeout = timeout;
        self
    }

    /// Reports `app` in the user agent headers.
    #[must_use]
    pub fn app_info(mut self, app: AppInfo) -> Self {
        self.0.app_info = Some(app);
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.0
    }
}
