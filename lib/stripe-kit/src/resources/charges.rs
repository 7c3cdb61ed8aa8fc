//! Charges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::balance_transactions::BalanceTransaction;
use super::customers::Customer;
use crate::routes::expand_query;
use crate::shared::{
    BillingDetails, Expandable, Identifiable, List, Metadata, Pagination, RangeQuery, Shipping,
    ShippingParams,
};
use crate::{Endpoint, Result, Routes, Transport};

/// Marker of the charge routes.
pub enum Charges {}

/// Charge operations.
pub type ChargeRoutes<T> = Routes<T, Charges>;

/// A charge on a card or another payment source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Unique identifier (`ch_...`).
    pub id: String,
    /// Always `charge`.
    pub object: String,
    /// Amount intended to be collected, in the smallest currency unit.
    pub amount: i64,
    /// Amount captured so far.
    #[serde(default)]
    pub amount_captured: i64,
    /// Amount refunded so far.
    #[serde(default)]
    pub amount_refunded: i64,
    /// Impact of the charge on the balance.
    pub balance_transaction: Option<Expandable<BalanceTransaction>>,
    /// Billing details of the payment method at the time of the charge.
    #[serde(default)]
    pub billing_details: BillingDetails,
    /// Whether the charge has been captured.
    pub captured: bool,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Customer charged.
    pub customer: Option<Expandable<Customer>>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Error code explaining the failure.
    pub failure_code: Option<String>,
    /// Message explaining the failure.
    pub failure_message: Option<String>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Whether the charge succeeded or was authorized for later capture.
    pub paid: bool,
    /// Payment intent that created the charge.
    pub payment_intent: Option<String>,
    /// Payment method id.
    pub payment_method: Option<String>,
    /// Where the receipt was sent.
    pub receipt_email: Option<String>,
    /// URL of the receipt.
    pub receipt_url: Option<String>,
    /// Whether the charge has been fully refunded.
    pub refunded: bool,
    /// Shipping information.
    pub shipping: Option<Shipping>,
    /// Statement descriptor shown on the customer's statement.
    pub statement_descriptor: Option<String>,
    /// Payment status.
    pub status: ChargeStatus,
}

impl Identifiable for Charge {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Status of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// Payment completed.
    Succeeded,
    /// Payment in progress.
    Pending,
    /// Payment failed.
    Failed,
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreateCharge {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Three-letter ISO currency code.
    pub currency: String,
    /// Fee moved to the application owner's account.
    pub application_fee_amount: Option<i64>,
    /// Capture immediately (default) or only authorize.
    pub capture: Option<bool>,
    /// Customer to charge.
    pub customer: Option<String>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Where to send the receipt.
    pub receipt_email: Option<String>,
    /// Shipping information.
    pub shipping: Option<ShippingParams>,
    /// Payment source to charge (token, card or source id).
    pub source: Option<String>,
    /// Statement descriptor for non-card charges.
    pub statement_descriptor: Option<String>,
    /// Suffix appended to the account's statement descriptor for card charges.
    pub statement_descriptor_suffix: Option<String>,
    /// Transfer group of the charge.
    pub transfer_group: Option<String>,
}

impl CreateCharge {
    /// Charge of `amount` in `currency`.
    #[must_use]
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            application_fee_amount: None,
            capture: None,
            customer: None,
            description: None,
            metadata: None,
            receipt_email: None,
            shipping: None,
            source: None,
            statement_descriptor: None,
            statement_descriptor_suffix: None,
            transfer_group: None,
        }
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateCharge {
    /// Customer to associate, when the charge has none.
    pub customer: Option<String>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Where to send the receipt.
    pub receipt_email: Option<String>,
    /// Shipping information.
    pub shipping: Option<ShippingParams>,
    /// Transfer group of the charge.
    pub transfer_group: Option<String>,
}

/// Parameters of `capture`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CaptureCharge {
    /// Amount to capture, the full amount when absent.
    pub amount: Option<i64>,
    /// Fee moved to the application owner's account.
    pub application_fee_amount: Option<i64>,
    /// Where to send the receipt.
    pub receipt_email: Option<String>,
    /// Statement descriptor for non-card charges.
    pub statement_descriptor: Option<String>,
    /// Suffix appended to the account's statement descriptor.
    pub statement_descriptor_suffix: Option<String>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListCharges {
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only charges of this customer.
    pub customer: Option<String>,
    /// Only charges created by this payment intent.
    pub payment_intent: Option<String>,
    /// Only charges in this transfer group.
    pub transfer_group: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Charges> {
    /// Creates a charge.
    pub async fn create(&self, params: &CreateCharge) -> Result<Charge> {
        self.send(Endpoint::post("/charges").form(params)?).await
    }

    /// Retrieves a charge.
    pub async fn retrieve(&self, charge: &str, expand: &[&str]) -> Result<Charge> {
        self.send(
            Endpoint::get("/charges/{charge}")
                .path_param("charge", charge)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a charge.
    pub async fn update(&self, charge: &str, params: &UpdateCharge) -> Result<Charge> {
        self.send(
            Endpoint::post("/charges/{charge}")
                .path_param("charge", charge)
                .form(params)?,
        )
        .await
    }

    /// Captures an uncaptured charge.
    pub async fn capture(&self, charge: &str, params: &CaptureCharge) -> Result<Charge> {
        self.send(
            Endpoint::post("/charges/{charge}/capture")
                .path_param("charge", charge)
                .form(params)?,
        )
        .await
    }

    /// Lists charges, most recent first.
    pub async fn list_all(&self, filter: &ListCharges) -> Result<List<Charge>> {
        self.send(Endpoint::get("/charges").query(filter)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_form;

    #[test]
    fn create_emits_required_fields_first() {
        let params = CreateCharge {
            source: Some("tok_visa".into()),
            capture: Some(false),
            ..CreateCharge::new(2000, "usd")
        };

        let body = to_form(&params).expect("form");

        assert_eq!(body, "amount=2000&currency=usd&capture=false&source=tok_visa");
    }

    #[test]
    fn decode_charge_with_expanded_customer() {
        let charge: Charge = serde_json::from_str(
            r#"{
                "id": "ch_1",
                "object": "charge",
                "amount": 2000,
                "balance_transaction": "txn_1",
                "captured": true,
                "created": 1700000000,
                "currency": "usd",
                "customer": {"id": "cus_1", "object": "customer", "created": 1690000000, "livemode": false},
                "livemode": false,
                "paid": true,
                "refunded": false,
                "status": "succeeded"
            }"#,
        )
        .expect("charge");

        assert_eq!(charge.status, ChargeStatus::Succeeded);
        let customer = charge.customer.expect("customer");
        assert!(customer.is_expanded());
        assert_eq!(customer.id(), "cus_1");
        assert_eq!(
            charge.balance_transaction.as_ref().map(Expandable::is_expanded),
            Some(false)
        );
    }
}
