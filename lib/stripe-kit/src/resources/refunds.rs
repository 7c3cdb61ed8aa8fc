//! Refunds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::balance_transactions::BalanceTransaction;
use super::charges::Charge;
use crate::routes::expand_query;
use crate::shared::{Expandable, Identifiable, List, Metadata, Pagination, RangeQuery};
use crate::{Endpoint, ParameterValue, Result, Routes, Transport};

/// Marker of the refund routes.
pub enum Refunds {}

/// Refund operations.
pub type RefundRoutes<T> = Routes<T, Refunds>;

/// A refund of a charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    /// Unique identifier (`re_...`).
    pub id: String,
    /// Always `refund`.
    pub object: String,
    /// Amount refunded, in the smallest currency unit.
    pub amount: i64,
    /// Impact of the refund on the balance.
    pub balance_transaction: Option<Expandable<BalanceTransaction>>,
    /// Refunded charge.
    pub charge: Option<Expandable<Charge>>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Refunded payment intent.
    pub payment_intent: Option<String>,
    /// Why the refund was issued.
    pub reason: Option<RefundReason>,
    /// Transaction number on the refund receipt.
    pub receipt_number: Option<String>,
    /// Current state.
    pub status: Option<RefundStatus>,
}

impl Identifiable for Refund {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Why a refund was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum RefundReason {
    /// Duplicate payment.
    Duplicate,
    /// Fraudulent payment.
    Fraudulent,
    /// The customer asked for it.
    RequestedByCustomer,
    /// An uncaptured charge expired. Set by the API only.
    ExpiredUncapturedCharge,
}

/// State of a refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    /// In progress.
    Pending,
    /// The customer must act.
    RequiresAction,
    /// Completed.
    Succeeded,
    /// Failed.
    Failed,
    /// Canceled.
    Canceled,
}

/// Parameters of `create`. Either `charge` or `payment_intent` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CreateRefund {
    /// Charge to refund.
    pub charge: Option<String>,
    /// Payment intent to refund.
    pub payment_intent: Option<String>,
    /// Amount to refund, the full remaining amount when absent.
    pub amount: Option<i64>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Why the refund is issued.
    pub reason: Option<RefundReason>,
    /// Also refund the application fee.
    pub refund_application_fee: Option<bool>,
    /// Also reverse the transfer.
    pub reverse_transfer: Option<bool>,
}

impl CreateRefund {
    /// Refund of `charge`.
    #[must_use]
    pub fn for_charge(charge: impl Into<String>) -> Self {
        Self {
            charge: Some(charge.into()),
            ..Self::default()
        }
    }

    /// Refund of `payment_intent`.
    #[must_use]
    pub fn for_payment_intent(payment_intent: impl Into<String>) -> Self {
        Self {
            payment_intent: Some(payment_intent.into()),
            ..Self::default()
        }
    }
}

/// Parameters of `update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateRefund {
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListRefunds {
    /// Only refunds of this charge.
    pub charge: Option<String>,
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only refunds of this payment intent.
    pub payment_intent: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Refunds> {
    /// Creates a refund.
    pub async fn create(&self, params: &CreateRefund) -> Result<Refund> {
        self.send(Endpoint::post("/refunds").form(params)?).await
    }

    /// Retrieves a refund.
    pub async fn retrieve(&self, refund: &str, expand: &[&str]) -> Result<Refund> {
        self.send(
            Endpoint::get("/refunds/{refund}")
                .path_param("refund", refund)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a refund's metadata.
    pub async fn update(&self, refund: &str, params: &UpdateRefund) -> Result<Refund> {
        self.send(
            Endpoint::post("/refunds/{refund}")
                .path_param("refund", refund)
                .form(params)?,
        )
        .await
    }

    /// Cancels a refund in `requires_action`.
    pub async fn cancel(&self, refund: &str) -> Result<Refund> {
        self.send(
            Endpoint::post("/refunds/{refund}/cancel")
                .path_param("refund", refund)
                .form(&ParameterValue::map())?,
        )
        .await
    }

    /// Lists refunds, most recent first.
    pub async fn list_all(&self, filter: &ListRefunds) -> Result<List<Refund>> {
        self.send(Endpoint::get("/refunds").query(filter)?).await
    }
}
