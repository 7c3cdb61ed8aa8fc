//! Setup intents: saving a payment method for later payments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::customers::Customer;
use super::payment_methods::PaymentMethod;
use crate::routes::expand_query;
use crate::shared::{Expandable, Identifiable, List, Metadata, Pagination, RangeQuery};
use crate::{ApiError, Endpoint, Result, Routes, Transport};

/// Marker of the setup intent routes.
pub enum SetupIntents {}

/// Setup intent operations.
pub type SetupIntentRoutes<T> = Routes<T, SetupIntents>;

/// A setup intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupIntent {
    /// Unique identifier (`seti_...`).
    pub id: String,
    /// Always `setup_intent`.
    pub object: String,
    /// Why the intent was canceled.
    pub cancellation_reason: Option<String>,
    /// Secret handed to the client side to confirm the setup.
    pub client_secret: Option<String>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Customer the payment method is saved for.
    pub customer: Option<Expandable<Customer>>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Error of the last setup attempt.
    pub last_setup_error: Option<ApiError>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Payment method being set up.
    pub payment_method: Option<Expandable<PaymentMethod>>,
    /// Payment method types the intent accepts.
    #[serde(default)]
    pub payment_method_types: Vec<String>,
    /// Current state.
    pub status: SetupIntentStatus,
    /// How the payment method will be used.
    pub usage: SetupIntentUsage,
}

impl Identifiable for SetupIntent {
    fn id(&self) -> &str {
        &self.id
    }
}

/// State of a setup intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupIntentStatus {
    /// Waiting for a payment method.
    RequiresPaymentMethod,
    /// Waiting for confirmation.
    RequiresConfirmation,
    /// Waiting for customer action.
    RequiresAction,
    /// Setup in progress.
    Processing,
    /// Canceled.
    Canceled,
    /// The payment method is ready.
    Succeeded,
}

/// How a saved payment method will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum SetupIntentUsage {
    /// While the customer is present.
    OnSession,
    /// While the customer is away.
    OffSession,
}

/// Reason given when canceling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum SetupIntentCancellationReason {
    /// The customer left.
    Abandoned,
    /// The customer asked for it.
    RequestedByCustomer,
    /// Duplicate setup.
    Duplicate,
}

/// Parameters of `create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CreateSetupIntent {
    /// Confirm immediately.
    pub confirm: Option<bool>,
    /// Customer to save the payment method for.
    pub customer: Option<String>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Payment method to set up.
    pub payment_method: Option<String>,
    /// Payment method types accepted.
    #[param(list = "brackets")]
    pub payment_method_types: Option<Vec<String>>,
    /// Where to redirect after authentication (with `confirm`).
    pub return_url: Option<String>,
    /// How the payment method will be used.
    pub usage: Option<SetupIntentUsage>,
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateSetupIntent {
    /// Customer to save the payment method for.
    pub customer: Option<String>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Payment method to set up.
    pub payment_method: Option<String>,
    /// Payment method types accepted.
    #[param(list = "brackets")]
    pub payment_method_types: Option<Vec<String>>,
}

/// Parameters of `confirm`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ConfirmSetupIntent {
    /// Payment method to set up.
    pub payment_method: Option<String>,
    /// Where to redirect after authentication.
    pub return_url: Option<String>,
}

/// Parameters of `cancel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CancelSetupIntent {
    /// Why the intent is canceled.
    pub cancellation_reason: Option<SetupIntentCancellationReason>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListSetupIntents {
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only intents of this customer.
    pub customer: Option<String>,
    /// Only intents for this payment method.
    pub payment_method: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, SetupIntents> {
    /// Creates a setup intent.
    pub async fn create(&self, params: &CreateSetupIntent) -> Result<SetupIntent> {
        self.send(Endpoint::post("/setup_intents").form(params)?)
            .await
    }

    /// Retrieves a setup intent.
    ///
    /// `client_secret` is required when calling with a publishable key.
    pub async fn retrieve(
        &self,
        intent: &str,
        client_secret: Option<&str>,
        expand: &[&str],
    ) -> Result<SetupIntent> {
        let query = expand_query(expand).with("client_secret", client_secret);
        self.send(
            Endpoint::get("/setup_intents/{intent}")
                .path_param("intent", intent)
                .query(&query)?,
        )
        .await
    }

    /// Updates a setup intent.
    pub async fn update(&self, intent: &str, params: &UpdateSetupIntent) -> Result<SetupIntent> {
        self.send(
            Endpoint::post("/setup_intents/{intent}")
                .path_param("intent", intent)
                .form(params)?,
        )
        .await
    }

    /// Confirms that the customer intends to save the payment method.
    pub async fn confirm(&self, intent: &str, params: &ConfirmSetupIntent) -> Result<SetupIntent> {
        self.send(
            Endpoint::post("/setup_intents/{intent}/confirm")
                .path_param("intent", intent)
                .form(params)?,
        )
        .await
    }

    /// Cancels a setup intent.
    pub async fn cancel(&self, intent: &str, params: &CancelSetupIntent) -> Result<SetupIntent> {
        self.send(
            Endpoint::post("/setup_intents/{intent}/cancel")
                .path_param("intent", intent)
                .form(params)?,
        )
        .await
    }

    /// Lists setup intents, most recent first.
    pub async fn list_all(&self, filter: &ListSetupIntents) -> Result<List<SetupIntent>> {
        self.send(Endpoint::get("/setup_intents").query(filter)?)
            .await
    }
}
