//! Entry point: a configured client exposing every route group.

use crate::api_client::ApiClient;
use crate::client::{HyperClient, HyperClientBuilder};
use crate::middleware::AuthLayer;
use crate::resources::{
    balance::Balances, balance_transactions::BalanceTransactions, bank_accounts::BankAccounts,
    cards::Cards, charges::Charges, customers::Customers, disputes::Disputes, events::Events,
    file_links::FileLinks, files::Files, invoices::Invoices, payment_intents::PaymentIntents,
    payment_methods::PaymentMethods, prices::Prices, products::Products, refunds::Refunds,
    setup_intents::SetupIntents, sources::Sources, tokens::Tokens,
};
use crate::{Result, Routes, Transport};

/// Client of the REST API.
///
/// Cloning is cheap: clones share the connection pool.
///
/// # Example
///
/// ```ignore
/// use stripe_kit::StripeClient;
/// use stripe_kit::resources::customers::ListCustomers;
///
/// let stripe = StripeClient::builder("sk_test_...")
///     .api_version("2024-06-20")
///     .configure_client(|b| b.with_logging())
///     .build()?;
///
/// let customers = stripe.customers().list_all(&ListCustomers::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StripeClient<T = ApiClient<HyperClient>> {
    transport: T,
}

impl StripeClient {
    /// Starts building a client authenticated with `api_key`.
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> StripeClientBuilder {
        StripeClientBuilder::new(api_key)
    }
}

impl<T: Transport> StripeClient<T> {
    /// Client sending every request through `transport`.
    ///
    /// The transport is responsible for authentication.
    #[must_use]
    pub const fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    fn routes<R>(&self) -> Routes<T, R> {
        Routes::new(self.transport.clone())
    }

    /// Account balance.
    #[must_use]
    pub fn balance(&self) -> Routes<T, Balances> {
        self.routes()
    }

    /// Balance transactions.
    #[must_use]
    pub fn balance_transactions(&self) -> Routes<T, BalanceTransactions> {
        self.routes()
    }

    /// Bank accounts attached to customers.
    #[must_use]
    pub fn bank_accounts(&self) -> Routes<T, BankAccounts> {
        self.routes()
    }

    /// Cards attached to customers.
    #[must_use]
    pub fn cards(&self) -> Routes<T, Cards> {
        self.routes()
    }

    /// Charges.
    #[must_use]
    pub fn charges(&self) -> Routes<T, Charges> {
        self.routes()
    }

    /// Customers.
    #[must_use]
    pub fn customers(&self) -> Routes<T, Customers> {
        self.routes()
    }

    /// Disputes.
    #[must_use]
    pub fn disputes(&self) -> Routes<T, Disputes> {
        self.routes()
    }

    /// Events.
    #[must_use]
    pub fn events(&self) -> Routes<T, Events> {
        self.routes()
    }

    /// File links.
    #[must_use]
    pub fn file_links(&self) -> Routes<T, FileLinks> {
        self.routes()
    }

    /// Files.
    #[must_use]
    pub fn files(&self) -> Routes<T, Files> {
        self.routes()
    }

    /// Invoices.
    #[must_use]
    pub fn invoices(&self) -> Routes<T, Invoices> {
        self.routes()
    }

    /// Payment intents.
    #[must_use]
    pub fn payment_intents(&self) -> Routes<T, PaymentIntents> {
        self.routes()
    }

    /// Payment methods.
    #[must_use]
    pub fn payment_methods(&self) -> Routes<T, PaymentMethods> {
        self.routes()
    }

    /// Prices.
    #[must_use]
    pub fn prices(&self) -> Routes<T, Prices> {
        self.routes()
    }

    /// Products.
    #[must_use]
    pub fn products(&self) -> Routes<T, Products> {
        self.routes()
    }

    /// Refunds.
    #[must_use]
    pub fn refunds(&self) -> Routes<T, Refunds> {
        self.routes()
    }

    /// Setup intents.
    #[must_use]
    pub fn setup_intents(&self) -> Routes<T, SetupIntents> {
        self.routes()
    }

    /// Sources.
    #[must_use]
    pub fn sources(&self) -> Routes<T, Sources> {
        self.routes()
    }

    /// Tokens.
    #[must_use]
    pub fn tokens(&self) -> Routes<T, Tokens> {
        self.routes()
    }
}

/// Builder for [`StripeClient`].
pub struct StripeClientBuilder {
    api_key: String,
    api_version: Option<String>,
    base_url: Option<String>,
    files_base_url: Option<String>,
    client: Option<HyperClient>,
    configure: Option<Box<dyn FnOnce(HyperClientBuilder) -> HyperClientBuilder + Send>>,
}

impl std::fmt::Debug for StripeClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClientBuilder")
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("files_base_url", &self.files_base_url)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl StripeClientBuilder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_version: None,
            base_url: None,
            files_base_url: None,
            client: None,
            configure: None,
        }
    }

    /// Pins the API version (`Stripe-Version` header).
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Overrides the API base URL, e.g. to target a mock server.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the file upload base URL.
    #[must_use]
    pub fn files_base_url(mut self, url: impl Into<String>) -> Self {
        self.files_base_url = Some(url.into());
        self
    }

    /// Uses an existing HTTP client. Authentication is added on top of it.
    ///
    /// Takes precedence over [`configure_client`](Self::configure_client).
    #[must_use]
    pub fn client(mut self, client: HyperClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Customizes the HTTP client built for this API client.
    #[must_use]
    pub fn configure_client(
        mut self,
        configure: impl FnOnce(HyperClientBuilder) -> HyperClientBuilder + Send + 'static,
    ) -> Self {
        self.configure = Some(Box::new(configure));
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) when a base
    /// URL override does not parse.
    pub fn build(self) -> Result<StripeClient> {
        let client = match (self.client, self.configure) {
            (Some(client), _) => client,
            (None, Some(configure)) => configure(HyperClient::builder()).build(),
            (None, None) => HyperClient::new(),
        };

        let mut auth = AuthLayer::new(self.api_key);
        if let Some(version) = self.api_version {
            auth = auth.with_api_version(version);
        }

        let mut transport = ApiClient::new(client.layer(auth));
        if let Some(url) = self.base_url {
            transport = transport.with_base_url(url)?;
        }
        if let Some(url) = self.files_base_url {
            transport = transport.with_files_base_url(url)?;
        }

        Ok(StripeClient { transport })
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::{ApiHost, Error};

    #[test]
    fn builder_debug_hides_the_key() {
        let builder = StripeClient::builder("sk_test_secret").api_version("2024-06-20");

        let debug = format!("{builder:?}");
        check!(!debug.contains("sk_test_secret"));
        check!(debug.contains("2024-06-20"));
    }

    #[tokio::test]
    async fn base_urls_are_overridable() {
        let stripe = StripeClient::builder("sk_test_1")
            .base_url("http://localhost:12111/v1")
            .files_base_url("http://localhost:12112/v1")
            .build()
            .expect("client");

        check!(stripe.transport().base_url(ApiHost::Api).as_str() == "http://localhost:12111/v1");
        check!(stripe.transport().base_url(ApiHost::Files).as_str() == "http://localhost:12112/v1");
    }

    #[tokio::test]
    async fn bad_base_url_is_rejected() {
        let result = StripeClient::builder("sk_test_1").base_url("not a url").build();

        let_assert!(Err(Error::InvalidUrl(_)) = result);
    }
}
