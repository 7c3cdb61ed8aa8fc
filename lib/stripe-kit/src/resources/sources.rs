//! Sources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use crate::routes::expand_query;
use crate::shared::{Address, BillingDetailsParams, Identifiable, Metadata};
use crate::{Endpoint, Result, Routes, Transport};

/// Marker of the source routes.
pub enum Sources {}

/// Source operations.
pub type SourceRoutes<T> = Routes<T, Sources>;

/// A source: a payment instrument that may need customer action before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Unique identifier (`src_...`).
    pub id: String,
    /// Always `source`.
    pub object: String,
    /// Amount associated with the source, for single-use sources.
    pub amount: Option<i64>,
    /// Secret handed to the client side.
    pub client_secret: Option<String>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code, lowercase.
    pub currency: Option<String>,
    /// Customer the source is attached to.
    pub customer: Option<String>,
    /// Authentication flow (`redirect`, `receiver`, `none`, ...).
    pub flow: String,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Owner information.
    pub owner: Option<SourceOwner>,
    /// Current state.
    pub status: SourceStatus,
    /// Source type (`card`, `sepa_debit`, ...).
    #[serde(rename = "type")]
    pub type_: String,
    /// `reusable` or `single_use`.
    pub usage: Option<SourceUsage>,
}

impl Identifiable for Source {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Owner of a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOwner {
    /// Owner address.
    pub address: Option<Address>,
    /// Owner email.
    pub email: Option<String>,
    /// Owner name.
    pub name: Option<String>,
    /// Owner phone.
    pub phone: Option<String>,
}

/// State of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    /// Canceled.
    Canceled,
    /// Can be charged.
    Chargeable,
    /// Already used.
    Consumed,
    /// Authentication failed.
    Failed,
    /// Waiting for customer action.
    Pending,
}

/// Whether a source can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum SourceUsage {
    /// Can be charged several times.
    Reusable,
    /// Can be charged once.
    SingleUse,
}

/// Redirect flow parameters.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct SourceRedirectParams {
    /// Where the customer lands after authentication.
    pub return_url: String,
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreateSource {
    /// Source type.
    #[param(rename = "type")]
    pub type_: String,
    /// Amount, for single-use sources.
    pub amount: Option<i64>,
    /// Three-letter ISO currency code.
    pub currency: Option<String>,
    /// Customer owning the original source, when sharing it.
    pub customer: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Original source, when sharing it with a connected account.
    pub original_source: Option<String>,
    /// Owner information.
    pub owner: Option<BillingDetailsParams>,
    /// Redirect flow parameters.
    pub redirect: Option<SourceRedirectParams>,
    /// Statement descriptor.
    pub statement_descriptor: Option<String>,
    /// Token to create the source from.
    pub token: Option<String>,
    /// Whether the source can be reused.
    pub usage: Option<SourceUsage>,
}

impl CreateSource {
    /// Source of type `type_`.
    #[must_use]
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            amount: None,
            currency: None,
            customer: None,
            metadata: None,
            original_source: None,
            owner: None,
            redirect: None,
            statement_descriptor: None,
            token: None,
            usage: None,
        }
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateSource {
    /// Amount, for single-use sources.
    pub amount: Option<i64>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Owner information.
    pub owner: Option<BillingDetailsParams>,
}

/// Parameters of `attach`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct AttachSource {
    /// Source id.
    pub source: String,
}

impl AttachSource {
    /// Attach `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl<T: Transport> Routes<T, Sources> {
    /// Creates a source.
    pub async fn create(&self, params: &CreateSource) -> Result<Source> {
        self.send(Endpoint::post("/sources").form(params)?).await
    }

    /// Retrieves a source.
    ///
    /// `client_secret` is required when calling with a publishable key.
    pub async fn retrieve(
        &self,
        source: &str,
        client_secret: Option<&str>,
        expand: &[&str],
    ) -> Result<Source> {
        let query = expand_query(expand).with("client_secret", client_secret);
        self.send(
            Endpoint::get("/sources/{source}")
                .path_param("source", source)
                .query(&query)?,
        )
        .await
    }

    /// Updates a source.
    pub async fn update(&self, source: &str, params: &UpdateSource) -> Result<Source> {
        self.send(
            Endpoint::post("/sources/{source}")
                .path_param("source", source)
                .form(params)?,
        )
        .await
    }

    /// Attaches a source to a customer.
    pub async fn attach(&self, customer: &str, params: &AttachSource) -> Result<Source> {
        self.send(
            Endpoint::post("/customers/{customer}/sources")
                .path_param("customer", customer)
                .form(params)?,
        )
        .await
    }

    /// Detaches a source from a customer.
    pub async fn detach(&self, customer: &str, source: &str) -> Result<Source> {
        self.send(
            Endpoint::delete("/customers/{customer}/sources/{id}")
                .path_param("customer", customer)
                .path_param("id", source),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_form;

    #[test]
    fn create_with_redirect() {
        let params = CreateSource {
            amount: Some(500),
            currency: Some("eur".into()),
            redirect: Some(SourceRedirectParams {
                return_url: "https://shop.example.com/done".into(),
            }),
            usage: Some(SourceUsage::SingleUse),
            ..CreateSource::new("ideal")
        };

        assert_eq!(
            to_form(&params).expect("form"),
            "type=ideal&amount=500&currency=eur\
             &redirect%5Breturn_url%5D=https%3A%2F%2Fshop.example.com%2Fdone&usage=single_use"
        );
    }
}
