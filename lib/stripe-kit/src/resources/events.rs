//! Events: notifications of changes in the account.
//!
//! The object carried by an event depends on its type, so it is kept as raw
//! JSON and decoded on demand with [`Event::data_as`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use crate::routes::expand_query;
use crate::shared::{Identifiable, List, Pagination, RangeQuery};
use crate::{Endpoint, Error, Result, Routes, Transport};

/// Marker of the event routes.
pub enum Events {}

/// Event operations.
pub type EventRoutes<T> = Routes<T, Events>;

/// An event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier (`evt_...`).
    pub id: String,
    /// Always `event`.
    pub object: String,
    /// API version used to render `data`.
    pub api_version: Option<String>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Object concerned by the event.
    pub data: EventData,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Webhooks not yet delivered.
    pub pending_webhooks: u32,
    /// Request that caused the event.
    pub request: Option<EventRequest>,
    /// Event type (`customer.created`, `invoice.paid`, ...).
    #[serde(rename = "type")]
    pub type_: String,
}

impl Event {
    /// Decodes the object carried by the event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonDeserialization`] when the object does not have
    /// the shape of `M`.
    pub fn data_as<M: DeserializeOwned>(&self) -> Result<M> {
        let deserializer = self.data.object.clone();
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            let path = format!("data.object.{}", err.path());
            Error::json_deserialization(path, err.into_inner().to_string())
        })
    }
}

impl Identifiable for Event {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    /// The object, as rendered at the time of the event.
    pub object: serde_json::Value,
    /// Previous values of the changed attributes, for `*.updated` events.
    pub previous_attributes: Option<serde_json::Value>,
}

/// Request that caused an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    /// Request id, absent for automatic changes.
    pub id: Option<String>,
    /// Idempotency key of the request.
    pub idempotency_key: Option<String>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListEvents {
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only events whose webhooks were all delivered (or not).
    pub delivery_success: Option<bool>,
    /// Only events of this type (`*` wildcards allowed).
    #[param(rename = "type")]
    pub type_: Option<String>,
    /// Only events of these types.
    #[param(list = "brackets")]
    pub types: Option<Vec<String>>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Events> {
    /// Retrieves an event created in the last 30 days.
    pub async fn retrieve(&self, event: &str, expand: &[&str]) -> Result<Event> {
        self.send(
            Endpoint::get("/events/{event}")
                .path_param("event", event)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Lists events, most recent first.
    pub async fn list_all(&self, filter: &ListEvents) -> Result<List<Event>> {
        self.send(Endpoint::get("/events").query(filter)?).await
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use chrono::TimeZone;

    use super::*;
    use crate::resources::customers::Customer;
    use crate::to_query_string;

    fn customer_event(object: &str) -> Event {
        serde_json::from_str(&format!(
            r#"{{
                "id": "evt_1", "object": "event", "api_version": "2024-06-20",
                "created": 1700000000,
                "data": {{"object": {object}}},
                "livemode": false, "pending_webhooks": 0,
                "request": {{"id": "req_1", "idempotency_key": null}},
                "type": "customer.created"
            }}"#
        ))
        .expect("event")
    }

    #[test]
    fn data_decodes_as_customer() {
        let event = customer_event(
            r#"{"id": "cus_1", "object": "customer", "created": 1700000000,
                "livemode": false, "metadata": {"plan": "gold"}}"#,
        );

        let customer: Customer = event.data_as().expect("customer");
        check!(customer.id == "cus_1");
        check!(customer.metadata.get("plan").map(String::as_str) == Some("gold"));
    }

    #[test]
    fn data_errors_carry_the_path() {
        let event = customer_event(r#"{"id": 42}"#);

        let_assert!(Err(Error::JsonDeserialization { path, .. }) = event.data_as::<Customer>());
        check!(path.starts_with("data.object."));
    }

    #[test]
    fn types_filter_and_created_range() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("date");
        let filter = ListEvents {
            created: Some(RangeQuery {
                gte: Some(from),
                ..RangeQuery::default()
            }),
            types: Some(vec!["invoice.paid".into(), "invoice.voided".into()]),
            ..ListEvents::default()
        };

        assert_eq!(
            to_query_string(&filter).expect("query"),
            "created%5Bgte%5D=1704067200&types%5B%5D=invoice.paid&types%5B%5D=invoice.voided"
        );
    }
}
