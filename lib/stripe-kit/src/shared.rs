//! Models shared by several resources.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

/// Free-form key/value pairs attached to most objects.
pub type Metadata = IndexMap<String, String>;

// ============================================================================
// Lists and pagination
// ============================================================================

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List<T> {
    /// Always `list`.
    pub object: String,
    /// Objects on this page.
    pub data: Vec<T>,
    /// Whether more objects follow this page.
    pub has_more: bool,
    /// Path of the list endpoint.
    pub url: String,
}

impl<T> List<T> {
    /// Returns `true` when the page holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of objects on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl<T: Identifiable> List<T> {
    /// Id of the last object, to pass as `starting_after` for the next page.
    #[must_use]
    pub fn last_id(&self) -> Option<&str> {
        self.data.last().map(Identifiable::id)
    }
}

/// Objects carrying an `id`.
pub trait Identifiable {
    /// Unique identifier of the object.
    fn id(&self) -> &str;
}

/// Cursor parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct Pagination {
    /// Page size, between 1 and 100.
    pub limit: Option<u32>,
    /// Cursor: the id of the last object of the previous page.
    pub starting_after: Option<String>,
    /// Cursor: the id of the first object of the next page.
    pub ending_before: Option<String>,
}

impl Pagination {
    /// Pagination with a page size.
    #[must_use]
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Pagination continuing after `id`.
    #[must_use]
    pub fn after(id: impl Into<String>) -> Self {
        Self {
            starting_after: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Query of `GET /customers/{customer}/sources`, narrowed to one object type.
#[derive(Params)]
pub(crate) struct SourceListQuery<'a> {
    pub(crate) object: &'static str,
    #[param(flatten)]
    pub(crate) page: &'a Pagination,
}

/// Range filter on a timestamp, e.g. `created[gte]=...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct RangeQuery {
    /// Strictly after.
    pub gt: Option<DateTime<Utc>>,
    /// At or after.
    pub gte: Option<DateTime<Utc>>,
    /// Strictly before.
    pub lt: Option<DateTime<Utc>>,
    /// At or before.
    pub lte: Option<DateTime<Utc>>,
}

impl RangeQuery {
    /// Range between `from` (inclusive) and `to` (exclusive).
    #[must_use]
    pub const fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            gt: None,
            gte: Some(from),
            lt: Some(to),
            lte: None,
        }
    }
}

// ============================================================================
// Expandable fields
// ============================================================================

/// A related object: its id, or the object itself when the call asked for
/// it through `expand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    /// Only the id.
    Id(String),
    /// The inlined object.
    Object(Box<T>),
}

impl<T> Expandable<T> {
    /// The inlined object, if expanded.
    #[must_use]
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Object(object) => Some(object),
        }
    }

    /// Returns `true` when the object is inlined.
    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        matches!(self, Self::Object(_))
    }
}

impl<T: Identifiable> Expandable<T> {
    /// Id of the related object, expanded or not.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object(object) => object.id(),
        }
    }
}

/// Response of a delete call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// Id of the deleted object.
    pub id: String,
    /// Type of the deleted object.
    pub object: String,
    /// Always `true`.
    pub deleted: bool,
}

impl Identifiable for Deleted {
    fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Addresses
// ============================================================================

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// City, district, suburb, town, or village.
    pub city: Option<String>,
    /// Two-letter country code (ISO 3166-1 alpha-2).
    pub country: Option<String>,
    /// Street, PO box, or company name.
    pub line1: Option<String>,
    /// Apartment, suite, unit, or building.
    pub line2: Option<String>,
    /// ZIP or postal code.
    pub postal_code: Option<String>,
    /// State, county, province, or region.
    pub state: Option<String>,
}

/// Postal address parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct AddressParams {
    /// City, district, suburb, town, or village.
    pub city: Option<String>,
    /// Two-letter country code (ISO 3166-1 alpha-2).
    pub country: Option<String>,
    /// Street, PO box, or company name.
    pub line1: Option<String>,
    /// Apartment, suite, unit, or building.
    pub line2: Option<String>,
    /// ZIP or postal code.
    pub postal_code: Option<String>,
    /// State, county, province, or region.
    pub state: Option<String>,
}

/// Billing details of a payment method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    /// Billing address.
    pub address: Option<Address>,
    /// Email address.
    pub email: Option<String>,
    /// Full name.
    pub name: Option<String>,
    /// Phone number, including extension.
    pub phone: Option<String>,
}

/// Billing details parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct BillingDetailsParams {
    /// Billing address.
    pub address: Option<AddressParams>,
    /// Email address.
    pub email: Option<String>,
    /// Full name.
    pub name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

/// Shipping information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipping {
    /// Shipping address.
    pub address: Option<Address>,
    /// Delivery service (e.g. Fedex, UPS).
    pub carrier: Option<String>,
    /// Recipient name.
    pub name: Option<String>,
    /// Recipient phone number.
    pub phone: Option<String>,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
}

/// Shipping parameters. `address` and `name` are required by the API.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct ShippingParams {
    /// Shipping address.
    pub address: AddressParams,
    /// Recipient name.
    pub name: String,
    /// Delivery service.
    pub carrier: Option<String>,
    /// Recipient phone number.
    pub phone: Option<String>,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
}

impl ShippingParams {
    /// Shipping to `name` at `address`.
    #[must_use]
    pub fn new(name: impl Into<String>, address: AddressParams) -> Self {
        Self {
            address,
            name: name.into(),
            carrier: None,
            phone: None,
            tracking_number: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use chrono::TimeZone;

    use super::*;
    use crate::to_query_string;

    #[derive(Debug, Deserialize)]
    struct Thing {
        id: String,
    }

    impl Identifiable for Thing {
        fn id(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn expandable_decodes_both_forms() {
        let id: Expandable<Thing> = serde_json::from_str(r#""cus_1""#).expect("id");
        let object: Expandable<Thing> = serde_json::from_str(r#"{"id": "cus_2"}"#).expect("object");

        check!(!id.is_expanded());
        check!(id.id() == "cus_1");
        check!(id.as_object().is_none());
        check!(object.is_expanded());
        check!(object.id() == "cus_2");
    }

    #[test]
    fn list_cursor() {
        let list: List<Thing> = serde_json::from_str(
            r#"{"object": "list", "data": [{"id": "a"}, {"id": "b"}], "has_more": true, "url": "/v1/things"}"#,
        )
        .expect("list");

        check!(list.len() == 2);
        check!(list.has_more);
        let_assert!(Some(last) = list.last_id());
        check!(last == "b");
    }

    #[test]
    fn range_query_encodes_epoch_seconds() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date");
        let to = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).single().expect("date");

        let query = to_query_string(&RangeQuery::between(from, to)).expect("query");

        assert_eq!(query, "gte=1704067200&lt=1706745600");
    }

    #[test]
    fn pagination_skips_absent_cursors() {
        let query = to_query_string(&Pagination::limit(3)).expect("query");
        assert_eq!(query, "limit=3");
    }
}
