//! Cards attached to customers as payment sources.

use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use crate::routes::expand_query;
use crate::shared::{Deleted, Identifiable, List, Metadata, Pagination, SourceListQuery};
use crate::{Endpoint, Result, Routes, Transport};

/// Marker of the card routes.
pub enum Cards {}

/// Card operations.
pub type CardRoutes<T> = Routes<T, Cards>;

/// A card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier (`card_...`).
    pub id: String,
    /// Always `card`.
    pub object: String,
    /// Billing address city.
    pub address_city: Option<String>,
    /// Billing address country.
    pub address_country: Option<String>,
    /// Billing address, first line.
    pub address_line1: Option<String>,
    /// Result of the `address_line1` check.
    pub address_line1_check: Option<String>,
    /// Billing address, second line.
    pub address_line2: Option<String>,
    /// Billing address state.
    pub address_state: Option<String>,
    /// Billing ZIP or postal code.
    pub address_zip: Option<String>,
    /// Result of the `address_zip` check.
    pub address_zip_check: Option<String>,
    /// Card brand (`Visa`, `MasterCard`, ...).
    pub brand: String,
    /// Two-letter country code of the issuer.
    pub country: Option<String>,
    /// Customer owning the card.
    pub customer: Option<String>,
    /// Result of the CVC check.
    pub cvc_check: Option<String>,
    /// Expiration month.
    pub exp_month: u32,
    /// Expiration year.
    pub exp_year: u32,
    /// Fingerprint identifying the card number.
    pub fingerprint: Option<String>,
    /// `credit`, `debit`, `prepaid` or `unknown`.
    pub funding: String,
    /// Last four digits.
    pub last4: String,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Cardholder name.
    pub name: Option<String>,
}

impl Identifiable for Card {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreateCard {
    /// Card token (`tok_...`).
    pub source: String,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
}

impl CreateCard {
    /// Attaches the card behind `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            source: token.into(),
            metadata: None,
        }
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateCard {
    /// Billing address city.
    pub address_city: Option<String>,
    /// Billing address country.
    pub address_country: Option<String>,
    /// Billing address, first line.
    pub address_line1: Option<String>,
    /// Billing address, second line.
    pub address_line2: Option<String>,
    /// Billing address state.
    pub address_state: Option<String>,
    /// Billing ZIP or postal code.
    pub address_zip: Option<String>,
    /// Expiration month.
    pub exp_month: Option<u32>,
    /// Expiration year.
    pub exp_year: Option<u32>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Cardholder name.
    pub name: Option<String>,
}

impl<T: Transport> Routes<T, Cards> {
    /// Attaches a card to a customer.
    pub async fn create(&self, customer: &str, params: &CreateCard) -> Result<Card> {
        self.send(
            Endpoint::post("/customers/{customer}/sources")
                .path_param("customer", customer)
                .form(params)?,
        )
        .await
    }

    /// Retrieves a customer's card.
    pub async fn retrieve(&self, customer: &str, id: &str, expand: &[&str]) -> Result<Card> {
        self.send(
            Endpoint::get("/customers/{customer}/sources/{id}")
                .path_param("customer", customer)
                .path_param("id", id)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a customer's card.
    pub async fn update(&self, customer: &str, id: &str, params: &UpdateCard) -> Result<Card> {
        self.send(
            Endpoint::post("/customers/{customer}/sources/{id}")
                .path_param("customer", customer)
                .path_param("id", id)
                .form(params)?,
        )
        .await
    }

    /// Detaches and deletes a customer's card.
    pub async fn delete(&self, customer: &str, id: &str) -> Result<Deleted> {
        self.send(
            Endpoint::delete("/customers/{customer}/sources/{id}")
                .path_param("customer", customer)
                .path_param("id", id),
        )
        .await
    }

    /// Lists a customer's cards.
    pub async fn list_all(&self, customer: &str, page: &Pagination) -> Result<List<Card>> {
        let query = SourceListQuery {
            object: "card",
            page,
        };
        self.send(
            Endpoint::get("/customers/{customer}/sources")
                .path_param("customer", customer)
                .query(&query)?,
        )
        .await
    }
}
