//! Route groups.
//!
//! A [`Routes`] value binds one resource's operations to a [`Transport`] and
//! a set of default headers. Each resource module adds its operations with an
//! `impl<T: Transport> Routes<T, Marker>` block.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{Endpoint, ListStyle, ParameterValue, Result, ToParameterValue, Transport};

/// Header carrying the idempotency key of a write.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Header selecting a connected account.
pub const STRIPE_ACCOUNT_HEADER: &str = "Stripe-Account";

/// The operations of one resource.
///
/// `R` is an uninhabited marker type naming the resource (for example
/// [`Customers`](crate::resources::customers::Customers)).
///
/// Header setters return a new route group: the original keeps its headers,
/// including for calls already in flight.
///
/// ```ignore
/// let customers = client.customers();
/// let once = customers.with_idempotency_key("order-1234");
///
/// once.create(&CreateCustomer::new()).await?;   // sends Idempotency-Key
/// customers.list_all(&ListCustomers::default()).await?; // does not
/// ```
pub struct Routes<T, R> {
    transport: T,
    headers: HashMap<String, String>,
    resource: PhantomData<fn() -> R>,
}

impl<T: Clone, R> Clone for Routes<T, R> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            headers: self.headers.clone(),
            resource: PhantomData,
        }
    }
}

impl<T: fmt::Debug, R> fmt::Debug for Routes<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routes")
            .field("resource", &std::any::type_name::<R>())
            .field("transport", &self.transport)
            .field("headers", &self.headers)
            .finish()
    }
}

impl<T: Transport, R> Routes<T, R> {
    /// Creates a route group without default headers.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            headers: HashMap::new(),
            resource: PhantomData,
        }
    }

    /// Returns a copy of this route group that sends `name: value` with every call.
    ///
    /// A header already set under a name that differs only in case is replaced.
    #[must_use]
    pub fn with_header(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let mut routes = self.clone();
        routes.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        routes.headers.insert(name, value.into());
        routes
    }

    /// Returns a copy of this route group that sends `Idempotency-Key: key`.
    #[must_use]
    pub fn with_idempotency_key(&self, key: impl Into<String>) -> Self {
        self.with_header(IDEMPOTENCY_KEY_HEADER, key)
    }

    /// Returns a copy of this route group acting on behalf of a connected account.
    #[must_use]
    pub fn with_stripe_account(&self, account: impl Into<String>) -> Self {
        self.with_header(STRIPE_ACCOUNT_HEADER, account)
    }

    /// Default headers of this route group.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) async fn send<M>(&self, endpoint: Endpoint) -> Result<M>
    where
        M: DeserializeOwned + Send,
    {
        debug!(
            method = %endpoint.method(),
            path = %endpoint.template(),
            has_body = endpoint.body().is_some(),
            "calling api"
        );
        self.transport.send(endpoint, &self.headers).await
    }
}

/// `expand[]` query of a retrieve call.
pub(crate) fn expand_query(expand: &[&str]) -> ParameterValue {
    ParameterValue::map().with(
        "expand",
        expand
            .to_parameter_value()
            .with_list_style(ListStyle::Brackets),
    )
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use url::Url;

    use super::*;
    use crate::{ApiHost, Request, Response, to_query_string};

    enum Widgets {}

    #[derive(Debug, Clone)]
    struct Offline(Url);

    impl Transport for Offline {
        async fn execute(&self, _request: Request<Bytes>) -> Result<Response<Bytes>> {
            Err(crate::Error::connection("offline"))
        }

        fn base_url(&self, _host: ApiHost) -> &Url {
            &self.0
        }
    }

    fn routes() -> Routes<Offline, Widgets> {
        Routes::new(Offline(
            Url::parse("https://api.example.com/v1").expect("valid url"),
        ))
    }

    #[test]
    fn header_setters_do_not_touch_the_original() {
        let base = routes();
        let keyed = base.with_idempotency_key("k1");
        let other = keyed.with_stripe_account("acct_1");

        assert!(base.headers().is_empty());
        assert_eq!(keyed.headers().len(), 1);
        assert_eq!(keyed.headers()[IDEMPOTENCY_KEY_HEADER], "k1");
        assert_eq!(other.headers()[STRIPE_ACCOUNT_HEADER], "acct_1");
        assert_eq!(other.headers()[IDEMPOTENCY_KEY_HEADER], "k1");
    }

    #[test]
    fn header_names_are_replaced_whatever_the_case() {
        let routes = routes()
            .with_idempotency_key("old")
            .with_header("idempotency-key", "new");

        assert_eq!(routes.headers().len(), 1);
        assert_eq!(routes.headers()["idempotency-key"], "new");

        let request = Endpoint::post("/widgets")
            .into_request(
                routes.transport().base_url(ApiHost::Api),
                routes.headers(),
            )
            .expect("request");
        assert_eq!(request.header(IDEMPOTENCY_KEY_HEADER), Some("new"));
    }

    #[test]
    fn expand_uses_brackets() {
        let query = to_query_string(&expand_query(&["customer", "invoice.subscription"]))
            .expect("query");

        assert_eq!(
            query,
            "expand%5B%5D=customer&expand%5B%5D=invoice.subscription"
        );
        assert_eq!(to_query_string(&expand_query(&[])).expect("query"), "");
    }

    #[tokio::test]
    async fn send_surfaces_transport_errors() {
        let result: Result<serde_json::Value> = routes().send(Endpoint::get("/widgets")).await;

        assert!(result.expect_err("offline").is_connection());
    }
}
