//! Products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::prices::{Price, RecurringParams};
use crate::routes::expand_query;
use crate::shared::{Deleted, Expandable, Identifiable, List, Metadata, Pagination, RangeQuery};
use crate::{Clearable, Endpoint, Result, Routes, Transport};

/// Marker of the product routes.
pub enum Products {}

/// Product operations.
pub type ProductRoutes<T> = Routes<T, Products>;

/// A product or service offered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (`prod_...`, or chosen at creation).
    pub id: String,
    /// Always `product`.
    pub object: String,
    /// Whether the product can be bought.
    pub active: bool,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Default price.
    pub default_price: Option<Expandable<Price>>,
    /// Description shown to customers.
    pub description: Option<String>,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Name shown to customers.
    pub name: String,
    /// Whether the product is shipped.
    pub shippable: Option<bool>,
    /// Statement descriptor.
    pub statement_descriptor: Option<String>,
    /// Unit label shown on receipts and invoices.
    pub unit_label: Option<String>,
    /// Last update time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated: DateTime<Utc>,
    /// Public URL of the product.
    pub url: Option<String>,
}

impl Identifiable for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Default price created along with the product.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct DefaultPriceData {
    /// Three-letter ISO currency code.
    pub currency: String,
    /// Recurring component, for subscriptions.
    pub recurring: Option<RecurringParams>,
    /// Unit amount in the smallest currency unit.
    pub unit_amount: Option<i64>,
}

impl DefaultPriceData {
    /// One-time price of `unit_amount` in `currency`.
    #[must_use]
    pub fn new(currency: impl Into<String>, unit_amount: i64) -> Self {
        Self {
            currency: currency.into(),
            recurring: None,
            unit_amount: Some(unit_amount),
        }
    }
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreateProduct {
    /// Name shown to customers.
    pub name: String,
    /// Whether the product can be bought.
    pub active: Option<bool>,
    /// Default price to create.
    pub default_price_data: Option<DefaultPriceData>,
    /// Description shown to customers.
    pub description: Option<String>,
    /// Identifier to use instead of a generated one.
    pub id: Option<String>,
    /// Image URLs (up to 8).
    pub images: Option<Vec<String>>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Whether the product is shipped.
    pub shippable: Option<bool>,
    /// Statement descriptor.
    pub statement_descriptor: Option<String>,
    /// Unit label shown on receipts and invoices.
    pub unit_label: Option<String>,
    /// Public URL of the product.
    pub url: Option<String>,
}

impl CreateProduct {
    /// Product named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: None,
            default_price_data: None,
            description: None,
            id: None,
            images: None,
            metadata: None,
            shippable: None,
            statement_descriptor: None,
            unit_label: None,
            url: None,
        }
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateProduct {
    /// Whether the product can be bought.
    pub active: Option<bool>,
    /// Default price id.
    pub default_price: Option<String>,
    /// Description shown to customers.
    pub description: Option<Clearable<String>>,
    /// Image URLs. An empty list is not a way to clear them: use [`Clearable::Clear`].
    pub images: Option<Clearable<Vec<String>>>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Name shown to customers.
    pub name: Option<String>,
    /// Whether the product is shipped.
    pub shippable: Option<bool>,
    /// Statement descriptor.
    pub statement_descriptor: Option<String>,
    /// Unit label shown on receipts and invoices.
    pub unit_label: Option<Clearable<String>>,
    /// Public URL of the product.
    pub url: Option<Clearable<String>>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListProducts {
    /// Only active (or only archived) products.
    pub active: Option<bool>,
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only these products.
    #[param(list = "brackets")]
    pub ids: Option<Vec<String>>,
    /// Only shippable (or only non-shippable) products.
    pub shippable: Option<bool>,
    /// Only the product with this URL.
    pub url: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Products> {
    /// Creates a product.
    pub async fn create(&self, params: &CreateProduct) -> Result<Product> {
        self.send(Endpoint::post("/products").form(params)?).await
    }

    /// Retrieves a product.
    pub async fn retrieve(&self, product: &str, expand: &[&str]) -> Result<Product> {
        self.send(
            Endpoint::get("/products/{product}")
                .path_param("product", product)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a product.
    pub async fn update(&self, product: &str, params: &UpdateProduct) -> Result<Product> {
        self.send(
            Endpoint::post("/products/{product}")
                .path_param("product", product)
                .form(params)?,
        )
        .await
    }

    /// Deletes a product without prices.
    pub async fn delete(&self, product: &str) -> Result<Deleted> {
        self.send(Endpoint::delete("/products/{product}").path_param("product", product))
            .await
    }

    /// Lists products, most recent first.
    pub async fn list_all(&self, filter: &ListProducts) -> Result<List<Product>> {
        self.send(Endpoint::get("/products").query(filter)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_form, to_query_string};

    #[test]
    fn images_are_indexed() {
        let params = CreateProduct {
            images: Some(vec!["https://a.example/1.png".into(), "https://a.example/2.png".into()]),
            ..CreateProduct::new("T-shirt")
        };

        assert_eq!(
            to_form(&params).expect("form"),
            "name=T-shirt&images%5B0%5D=https%3A%2F%2Fa.example%2F1.png\
             &images%5B1%5D=https%3A%2F%2Fa.example%2F2.png"
        );
    }

    #[test]
    fn clearing_images_sends_an_empty_string() {
        let params = UpdateProduct {
            images: Some(Clearable::Clear),
            ..UpdateProduct::default()
        };

        assert_eq!(to_form(&params).expect("form"), "images=");
    }

    #[test]
    fn ids_filter_uses_brackets() {
        let filter = ListProducts {
            ids: Some(vec!["prod_1".into(), "prod_2".into()]),
            ..ListProducts::default()
        };

        assert_eq!(
            to_query_string(&filter).expect("query"),
            "ids%5B%5D=prod_1&ids%5B%5D=prod_2"
        );
    }
}
