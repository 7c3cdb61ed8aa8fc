//! Customers.
//!
//! ```ignore
//! use stripe_kit::resources::customers::CreateCustomer;
//!
//! let customer = client
//!     .customers()
//!     .create(&CreateCustomer {
//!         email: Some("jenny@example.com".into()),
//!         ..CreateCustomer::new()
//!     })
//!     .await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use crate::routes::expand_query;
use crate::shared::{
    Address, AddressParams, Deleted, Identifiable, List, Metadata, Pagination, RangeQuery,
    Shipping, ShippingParams,
};
use crate::{Clearable, Endpoint, Result, Routes, Transport};

/// Marker of the customer routes.
pub enum Customers {}

/// Customer operations.
pub type CustomerRoutes<T> = Routes<T, Customers>;

/// A customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (`cus_...`).
    pub id: String,
    /// Always `customer`.
    pub object: String,
    /// Customer address.
    pub address: Option<Address>,
    /// Credit balance applied to the next invoices, in the smallest currency unit.
    #[serde(default)]
    pub balance: i64,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Currency the customer can be charged in for recurring billing.
    pub currency: Option<String>,
    /// Id of the default payment source.
    pub default_source: Option<String>,
    /// Whether the latest invoice is past due.
    pub delinquent: Option<bool>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Prefix of the customer's invoice numbers.
    pub invoice_prefix: Option<String>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Full name or business name.
    pub name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Shipping information.
    pub shipping: Option<Shipping>,
}

impl Identifiable for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Parameters of `create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CreateCustomer {
    /// Customer address.
    pub address: Option<AddressParams>,
    /// Starting credit balance.
    pub balance: Option<i64>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Full name or business name.
    pub name: Option<String>,
    /// Id of a payment method to attach.
    pub payment_method: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Shipping information.
    pub shipping: Option<ShippingParams>,
    /// Token or source id to attach as default source.
    pub source: Option<String>,
}

impl CreateCustomer {
    /// No parameters: every field is optional.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateCustomer {
    /// Customer address.
    pub address: Option<Clearable<AddressParams>>,
    /// Credit balance.
    pub balance: Option<i64>,
    /// Id of the default payment source.
    pub default_source: Option<String>,
    /// Arbitrary description.
    pub description: Option<Clearable<String>>,
    /// Email address.
    pub email: Option<Clearable<String>>,
    /// Attached key/value pairs. An empty value unsets a key.
    pub metadata: Option<Metadata>,
    /// Full name or business name.
    pub name: Option<Clearable<String>>,
    /// Phone number.
    pub phone: Option<Clearable<String>>,
    /// Shipping information.
    pub shipping: Option<Clearable<ShippingParams>>,
    /// Token or source id to attach as default source.
    pub source: Option<String>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListCustomers {
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Case-sensitive email filter.
    pub email: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Customers> {
    /// Creates a customer.
    pub async fn create(&self, params: &CreateCustomer) -> Result<Customer> {
        self.send(Endpoint::post("/customers").form(params)?).await
    }

    /// Retrieves a customer.
    pub async fn retrieve(&self, customer: &str, expand: &[&str]) -> Result<Customer> {
        self.send(
            Endpoint::get("/customers/{customer}")
                .path_param("customer", customer)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a customer.
    pub async fn update(&self, customer: &str, params: &UpdateCustomer) -> Result<Customer> {
        self.send(
            Endpoint::post("/customers/{customer}")
                .path_param("customer", customer)
                .form(params)?,
        )
        .await
    }

    /// Deletes a customer and cancels its subscriptions.
    pub async fn delete(&self, customer: &str) -> Result<Deleted> {
        self.send(Endpoint::delete("/customers/{customer}").path_param("customer", customer))
            .await
    }

    /// Lists customers, most recent first.
    pub async fn list_all(&self, filter: &ListCustomers) -> Result<List<Customer>> {
        self.send(Endpoint::get("/customers").query(filter)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_form, to_query_string};

    #[test]
    fn update_clears_fields_with_empty_strings() {
        let params = UpdateCustomer {
            description: Some(Clearable::Clear),
            email: Some("new@example.com".to_string().into()),
            ..UpdateCustomer::default()
        };

        let body = to_form(&params).expect("form");

        assert_eq!(body, "description=&email=new%40example.com");
    }

    #[test]
    fn nested_shipping_address() {
        let params = CreateCustomer {
            shipping: Some(ShippingParams::new(
                "Jenny Rosen",
                AddressParams {
                    city: Some("Paris".into()),
                    ..AddressParams::default()
                },
            )),
            ..CreateCustomer::new()
        };

        let body = to_form(&params).expect("form");

        assert_eq!(
            body,
            "shipping%5Baddress%5D%5Bcity%5D=Paris&shipping%5Bname%5D=Jenny%20Rosen"
        );
    }

    #[test]
    fn list_filter_flattens_pagination() {
        let filter = ListCustomers {
            email: Some("a@b.c".into()),
            page: Pagination::after("cus_9"),
            ..ListCustomers::default()
        };

        let query = to_query_string(&filter).expect("query");

        assert_eq!(query, "email=a%40b.c&starting_after=cus_9");
    }
}
