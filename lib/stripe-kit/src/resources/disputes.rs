//! Disputes (chargebacks) and the evidence submitted against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::charges::Charge;
use crate::routes::expand_query;
use crate::shared::{Expandable, Identifiable, List, Metadata, Pagination, RangeQuery};
use crate::{Endpoint, ParameterValue, Result, Routes, Transport};

/// Marker of the dispute routes.
pub enum Disputes {}

/// Dispute operations.
pub type DisputeRoutes<T> = Routes<T, Disputes>;

/// A dispute raised by a cardholder against a charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    /// Unique identifier (`dp_...`).
    pub id: String,
    /// Always `dispute`.
    pub object: String,
    /// Disputed amount, in the smallest currency unit.
    pub amount: i64,
    /// Disputed charge.
    pub charge: Expandable<Charge>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Evidence submitted so far.
    #[serde(default)]
    pub evidence: DisputeEvidence,
    /// Deadlines and submission state of the evidence.
    pub evidence_details: Option<EvidenceDetails>,
    /// Whether the charge can still be refunded.
    pub is_charge_refundable: bool,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Payment intent of the disputed charge.
    pub payment_intent: Option<String>,
    /// Reason given by the cardholder (`fraudulent`, `duplicate`, ...).
    pub reason: String,
    /// Current state.
    pub status: DisputeStatus,
}

impl Identifiable for Dispute {
    fn id(&self) -> &str {
        &self.id
    }
}

/// State of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    /// Inquiry awaiting a response.
    WarningNeedsResponse,
    /// Inquiry response under review.
    WarningUnderReview,
    /// Inquiry closed without becoming a dispute.
    WarningClosed,
    /// Awaiting evidence.
    NeedsResponse,
    /// Evidence under review.
    UnderReview,
    /// The charge was refunded before the dispute was resolved.
    ChargeRefunded,
    /// Resolved in the merchant's favour.
    Won,
    /// Resolved in the cardholder's favour.
    Lost,
}

/// Evidence fields. Text fields hold free text, file fields hold file ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeEvidence {
    /// Server or activity logs showing the customer used the product.
    pub access_activity_log: Option<String>,
    /// Billing address of the customer.
    pub billing_address: Option<String>,
    /// File id of the cancellation policy.
    pub cancellation_policy: Option<String>,
    /// File id of communication with the customer.
    pub customer_communication: Option<String>,
    /// Customer email address.
    pub customer_email_address: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Description of the product or service.
    pub product_description: Option<String>,
    /// File id of the receipt.
    pub receipt: Option<String>,
    /// File id of the refund policy.
    pub refund_policy: Option<String>,
    /// Shipping carrier.
    pub shipping_carrier: Option<String>,
    /// Shipping date.
    pub shipping_date: Option<String>,
    /// Shipping tracking number.
    pub shipping_tracking_number: Option<String>,
    /// Any other relevant information.
    pub uncategorized_text: Option<String>,
}

/// Evidence deadlines and submission state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceDetails {
    /// Deadline to submit evidence.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub due_by: Option<DateTime<Utc>>,
    /// Whether evidence has been staged.
    pub has_evidence: bool,
    /// Whether the deadline has passed.
    pub past_due: bool,
    /// Number of times evidence has been submitted.
    pub submission_count: u32,
}

/// Evidence to stage or submit. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct DisputeEvidenceParams {
    /// Server or activity logs showing the customer used the product.
    pub access_activity_log: Option<String>,
    /// Billing address of the customer.
    pub billing_address: Option<String>,
    /// File id of the cancellation policy.
    pub cancellation_policy: Option<String>,
    /// File id of communication with the customer.
    pub customer_communication: Option<String>,
    /// Customer email address.
    pub customer_email_address: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Description of the product or service.
    pub product_description: Option<String>,
    /// File id of the receipt.
    pub receipt: Option<String>,
    /// File id of the refund policy.
    pub refund_policy: Option<String>,
    /// Shipping carrier.
    pub shipping_carrier: Option<String>,
    /// Shipping date.
    pub shipping_date: Option<String>,
    /// Shipping tracking number.
    pub shipping_tracking_number: Option<String>,
    /// Any other relevant information.
    pub uncategorized_text: Option<String>,
}

/// Parameters of `update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateDispute {
    /// Evidence to stage.
    pub evidence: Option<DisputeEvidenceParams>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Submit the evidence now instead of staging it.
    pub submit: Option<bool>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListDisputes {
    /// Only disputes of this charge.
    pub charge: Option<String>,
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only disputes of this payment intent.
    pub payment_intent: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Disputes> {
    /// Retrieves a dispute.
    pub async fn retrieve(&self, dispute: &str, expand: &[&str]) -> Result<Dispute> {
        self.send(
            Endpoint::get("/disputes/{dispute}")
                .path_param("dispute", dispute)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Stages or submits evidence, or updates metadata.
    pub async fn update(&self, dispute: &str, params: &UpdateDispute) -> Result<Dispute> {
        self.send(
            Endpoint::post("/disputes/{dispute}")
                .path_param("dispute", dispute)
                .form(params)?,
        )
        .await
    }

    /// Closes a dispute, accepting the loss. This cannot be undone.
    pub async fn close(&self, dispute: &str) -> Result<Dispute> {
        self.send(
            Endpoint::post("/disputes/{dispute}/close")
                .path_param("dispute", dispute)
                .form(&ParameterValue::map())?,
        )
        .await
    }

    /// Lists disputes, most recent first.
    pub async fn list_all(&self, filter: &ListDisputes) -> Result<List<Dispute>> {
        self.send(Endpoint::get("/disputes").query(filter)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_form;

    #[test]
    fn evidence_is_nested() {
        let params = UpdateDispute {
            evidence: Some(DisputeEvidenceParams {
                customer_name: Some("Jenny Rosen".into()),
                receipt: Some("file_123".into()),
                ..DisputeEvidenceParams::default()
            }),
            submit: Some(true),
            ..UpdateDispute::default()
        };

        let body = to_form(&params).expect("form");

        assert_eq!(
            body,
            "evidence%5Bcustomer_name%5D=Jenny%20Rosen&evidence%5Breceipt%5D=file_123&submit=true"
        );
    }
}
