//! Prices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::products::Product;
use crate::routes::expand_query;
use crate::shared::{Expandable, Identifiable, List, Metadata, Pagination, RangeQuery};
use crate::{Clearable, Endpoint, Result, Routes, Transport};

/// Marker of the price routes.
pub enum Prices {}

/// Price operations.
pub type PriceRoutes<T> = Routes<T, Prices>;

/// The unit cost of a product, and its billing cycle for recurring purchases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Unique identifier (`price_...`).
    pub id: String,
    /// Always `price`.
    pub object: String,
    /// Whether the price can be used for new purchases.
    pub active: bool,
    /// `per_unit` or `tiered`.
    pub billing_scheme: Option<String>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Lookup key, to fetch prices dynamically.
    pub lookup_key: Option<String>,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Brief description, hidden from customers.
    pub nickname: Option<String>,
    /// Product the price belongs to.
    pub product: Expandable<Product>,
    /// Billing cycle, for recurring prices.
    pub recurring: Option<Recurring>,
    /// Whether the price includes taxes.
    pub tax_behavior: Option<TaxBehavior>,
    /// One-time or recurring.
    #[serde(rename = "type")]
    pub type_: PriceType,
    /// Unit amount in the smallest currency unit.
    pub unit_amount: Option<i64>,
    /// Unit amount with up to 12 decimal places.
    pub unit_amount_decimal: Option<String>,
}

impl Identifiable for Price {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Billing cycle of a recurring price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurring {
    /// Billing frequency.
    pub interval: RecurringInterval,
    /// Number of intervals between billings.
    pub interval_count: u32,
    /// `licensed` or `metered`.
    pub usage_type: UsageType,
}

/// Billing frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum RecurringInterval {
    /// Daily.
    Day,
    /// Weekly.
    Week,
    /// Monthly.
    Month,
    /// Yearly.
    Year,
}

/// How the quantity of a recurring price is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum UsageType {
    /// Quantity set on the subscription.
    Licensed,
    /// Quantity reported as usage.
    Metered,
}

/// Whether a price includes taxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum TaxBehavior {
    /// Taxes are added on top.
    Exclusive,
    /// Taxes are included.
    Inclusive,
    /// Not decided yet.
    Unspecified,
}

/// One-time or recurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum PriceType {
    /// Single purchase.
    OneTime,
    /// Subscription.
    Recurring,
}

/// Billing cycle of a new recurring price.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct RecurringParams {
    /// Billing frequency.
    pub interval: RecurringInterval,
    /// Number of intervals between billings.
    pub interval_count: Option<u32>,
    /// `licensed` (default) or `metered`.
    pub usage_type: Option<UsageType>,
}

impl RecurringParams {
    /// Billing every `interval`.
    #[must_use]
    pub const fn new(interval: RecurringInterval) -> Self {
        Self {
            interval,
            interval_count: None,
            usage_type: None,
        }
    }
}

/// Product created along with the price.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct ProductData {
    /// Name shown to customers.
    pub name: String,
    /// Whether the product can be bought.
    pub active: Option<bool>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Statement descriptor.
    pub statement_descriptor: Option<String>,
    /// Unit label shown on receipts and invoices.
    pub unit_label: Option<String>,
}

impl ProductData {
    /// Product named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: None,
            metadata: None,
            statement_descriptor: None,
            unit_label: None,
        }
    }
}

/// Parameters of `create`. One of `product` or `product_data` is required.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreatePrice {
    /// Three-letter ISO currency code.
    pub currency: String,
    /// Whether the price can be used for new purchases.
    pub active: Option<bool>,
    /// Lookup key.
    pub lookup_key: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Brief description, hidden from customers.
    pub nickname: Option<String>,
    /// Existing product.
    pub product: Option<String>,
    /// Product to create.
    pub product_data: Option<ProductData>,
    /// Billing cycle, for recurring prices.
    pub recurring: Option<RecurringParams>,
    /// Whether the price includes taxes.
    pub tax_behavior: Option<TaxBehavior>,
    /// Move the lookup key from the price currently holding it.
    pub transfer_lookup_key: Option<bool>,
    /// Unit amount in the smallest currency unit.
    pub unit_amount: Option<i64>,
    /// Unit amount with up to 12 decimal places, instead of `unit_amount`.
    pub unit_amount_decimal: Option<String>,
}

impl CreatePrice {
    /// Price in `currency`.
    #[must_use]
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            active: None,
            lookup_key: None,
            metadata: None,
            nickname: None,
            product: None,
            product_data: None,
            recurring: None,
            tax_behavior: None,
            transfer_lookup_key: None,
            unit_amount: None,
            unit_amount_decimal: None,
        }
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdatePrice {
    /// Whether the price can be used for new purchases.
    pub active: Option<bool>,
    /// Lookup key.
    pub lookup_key: Option<Clearable<String>>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Brief description, hidden from customers.
    pub nickname: Option<Clearable<String>>,
    /// Whether the price includes taxes.
    pub tax_behavior: Option<TaxBehavior>,
    /// Move the lookup key from the price currently holding it.
    pub transfer_lookup_key: Option<bool>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListPrices {
    /// Only active (or only inactive) prices.
    pub active: Option<bool>,
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only prices in this currency.
    pub currency: Option<String>,
    /// Only prices with these lookup keys.
    #[param(list = "brackets")]
    pub lookup_keys: Option<Vec<String>>,
    /// Only prices of this product.
    pub product: Option<String>,
    /// Only one-time (or only recurring) prices.
    #[param(rename = "type")]
    pub type_: Option<PriceType>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Prices> {
    /// Creates a price.
    pub async fn create(&self, params: &CreatePrice) -> Result<Price> {
        self.send(Endpoint::post("/prices").form(params)?).await
    }

    /// Retrieves a price.
    pub async fn retrieve(&self, price: &str, expand: &[&str]) -> Result<Price> {
        self.send(
            Endpoint::get("/prices/{price}")
                .path_param("price", price)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a price. Amounts and currency cannot be changed.
    pub async fn update(&self, price: &str, params: &UpdatePrice) -> Result<Price> {
        self.send(
            Endpoint::post("/prices/{price}")
                .path_param("price", price)
                .form(params)?,
        )
        .await
    }

    /// Lists prices, most recent first.
    pub async fn list_all(&self, filter: &ListPrices) -> Result<List<Price>> {
        self.send(Endpoint::get("/prices").query(filter)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_form, to_query_string};

    #[test]
    fn recurring_price_with_inline_product() {
        let params = CreatePrice {
            unit_amount: Some(1200),
            recurring: Some(RecurringParams {
                interval_count: Some(3),
                ..RecurringParams::new(RecurringInterval::Month)
            }),
            product_data: Some(ProductData::new("Gold plan")),
            ..CreatePrice::new("usd")
        };

        insta::assert_snapshot!(
            String::from_utf8_lossy(&to_form(&params).expect("form")),
            @"currency=usd&product_data%5Bname%5D=Gold%20plan&recurring%5Binterval%5D=month&recurring%5Binterval_count%5D=3&unit_amount=1200"
        );
    }

    #[test]
    fn lookup_keys_use_brackets() {
        let filter = ListPrices {
            lookup_keys: Some(vec!["gold".into(), "silver".into()]),
            type_: Some(PriceType::Recurring),
            ..ListPrices::default()
        };

        assert_eq!(
            to_query_string(&filter).expect("query"),
            "lookup_keys%5B%5D=gold&lookup_keys%5B%5D=silver&type=recurring"
        );
    }
}
