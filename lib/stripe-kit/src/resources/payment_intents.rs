//! Payment intents: the lifecycle of collecting one payment.
//!
//! ```ignore
//! use stripe_kit::resources::payment_intents::{CaptureMethod, CreatePaymentIntent};
//!
//! let intent = client
//!     .payment_intents()
//!     .with_idempotency_key(order.id.to_string())
//!     .create(&CreatePaymentIntent {
//!         capture_method: Some(CaptureMethod::Manual),
//!         payment_method_types: Some(vec!["card".into()]),
//!         ..CreatePaymentIntent::new(order.total, "eur")
//!     })
//!     .await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::charges::Charge;
use super::customers::Customer;
use super::payment_methods::PaymentMethod;
use crate::routes::expand_query;
use crate::shared::{
    Expandable, Identifiable, List, Metadata, Pagination, RangeQuery, Shipping, ShippingParams,
};
use crate::{ApiError, Clearable, Endpoint, Result, Routes, Transport};

/// Marker of the payment intent routes.
pub enum PaymentIntents {}

/// Payment intent operations.
pub type PaymentIntentRoutes<T> = Routes<T, PaymentIntents>;

/// A payment intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Unique identifier (`pi_...`).
    pub id: String,
    /// Always `payment_intent`.
    pub object: String,
    /// Amount intended to be collected, in the smallest currency unit.
    pub amount: i64,
    /// Amount that can be captured.
    #[serde(default)]
    pub amount_capturable: i64,
    /// Amount received.
    #[serde(default)]
    pub amount_received: i64,
    /// When the intent was canceled.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub canceled_at: Option<DateTime<Utc>>,
    /// Why the intent was canceled.
    pub cancellation_reason: Option<String>,
    /// When the funds are captured.
    pub capture_method: CaptureMethod,
    /// Secret handed to the client side to confirm the payment.
    pub client_secret: Option<String>,
    /// How the intent is confirmed.
    pub confirmation_method: Option<ConfirmationMethod>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Customer paying.
    pub customer: Option<Expandable<Customer>>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Error of the last payment attempt.
    pub last_payment_error: Option<ApiError>,
    /// Latest charge created by this intent.
    pub latest_charge: Option<Expandable<Charge>>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Payment method used.
    pub payment_method: Option<Expandable<PaymentMethod>>,
    /// Payment method types the intent accepts.
    #[serde(default)]
    pub payment_method_types: Vec<String>,
    /// Where the receipt is sent.
    pub receipt_email: Option<String>,
    /// Whether the payment method is saved for later.
    pub setup_future_usage: Option<SetupFutureUsage>,
    /// Shipping information.
    pub shipping: Option<Shipping>,
    /// Statement descriptor for non-card charges.
    pub statement_descriptor: Option<String>,
    /// Current state.
    pub status: PaymentIntentStatus,
}

impl Identifiable for PaymentIntent {
    fn id(&self) -> &str {
        &self.id
    }
}

/// State of a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    /// Waiting for a payment method.
    RequiresPaymentMethod,
    /// Waiting for confirmation.
    RequiresConfirmation,
    /// Waiting for customer action (3-D Secure, redirect...).
    RequiresAction,
    /// Payment in progress.
    Processing,
    /// Authorized, waiting for capture.
    RequiresCapture,
    /// Canceled.
    Canceled,
    /// Paid.
    Succeeded,
}

/// When the funds are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum CaptureMethod {
    /// As soon as the customer authorizes the payment.
    Automatic,
    /// Asynchronously, after authorization.
    AutomaticAsync,
    /// When `capture` is called.
    Manual,
}

/// How a payment intent is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum ConfirmationMethod {
    /// With a publishable key, client side.
    Automatic,
    /// With a secret key, server side.
    Manual,
}

/// Whether and how the payment method is saved for later payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum SetupFutureUsage {
    /// For payments while the customer is present.
    OnSession,
    /// For payments while the customer is away.
    OffSession,
}

/// Reason given when canceling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum CancellationReason {
    /// Duplicate payment.
    Duplicate,
    /// Fraudulent payment.
    Fraudulent,
    /// The customer asked for it.
    RequestedByCustomer,
    /// The customer left.
    Abandoned,
}

/// Automatic payment methods configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Params)]
pub struct AutomaticPaymentMethods {
    /// Let the dashboard settings pick the payment methods.
    pub enabled: bool,
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreatePaymentIntent {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Three-letter ISO currency code.
    pub currency: String,
    /// Automatic payment methods configuration.
    pub automatic_payment_methods: Option<AutomaticPaymentMethods>,
    /// When the funds are captured.
    pub capture_method: Option<CaptureMethod>,
    /// Confirm immediately.
    pub confirm: Option<bool>,
    /// How the intent is confirmed.
    pub confirmation_method: Option<ConfirmationMethod>,
    /// Customer paying.
    pub customer: Option<String>,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// The customer is not present (with `confirm`).
    pub off_session: Option<bool>,
    /// Payment method to use.
    pub payment_method: Option<String>,
    /// Payment method types accepted.
    #[param(list = "brackets")]
    pub payment_method_types: Option<Vec<String>>,
    /// Where to send the receipt.
    pub receipt_email: Option<String>,
    /// Where to redirect after authentication (with `confirm`).
    pub return_url: Option<String>,
    /// Save the payment method for later.
    pub setup_future_usage: Option<SetupFutureUsage>,
    /// Shipping information.
    pub shipping: Option<ShippingParams>,
    /// Statement descriptor for non-card charges.
    pub statement_descriptor: Option<String>,
}

impl CreatePaymentIntent {
    /// Payment intent of `amount` in `currency`.
    #[must_use]
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            automatic_payment_methods: None,
            capture_method: None,
            confirm: None,
            confirmation_method: None,
            customer: None,
            description: None,
            metadata: None,
            off_session: None,
            payment_method: None,
            payment_method_types: None,
            receipt_email: None,
            return_url: None,
            setup_future_usage: None,
            shipping: None,
            statement_descriptor: None,
        }
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdatePaymentIntent {
    /// Amount in the smallest currency unit.
    pub amount: Option<i64>,
    /// Three-letter ISO currency code.
    pub currency: Option<String>,
    /// Customer paying.
    pub customer: Option<String>,
    /// Arbitrary description.
    pub description: Option<Clearable<String>>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Payment method to use.
    pub payment_method: Option<String>,
    /// Payment method types accepted.
    #[param(list = "brackets")]
    pub payment_method_types: Option<Vec<String>>,
    /// Where to send the receipt.
    pub receipt_email: Option<Clearable<String>>,
    /// Save the payment method for later.
    pub setup_future_usage: Option<Clearable<SetupFutureUsage>>,
    /// Shipping information.
    pub shipping: Option<Clearable<ShippingParams>>,
    /// Statement descriptor for non-card charges.
    pub statement_descriptor: Option<String>,
}

/// Parameters of `confirm`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ConfirmPaymentIntent {
    /// The customer is not present.
    pub off_session: Option<bool>,
    /// Payment method to use.
    pub payment_method: Option<String>,
    /// Where to send the receipt.
    pub receipt_email: Option<Clearable<String>>,
    /// Where to redirect after authentication.
    pub return_url: Option<String>,
    /// Save the payment method for later.
    pub setup_future_usage: Option<Clearable<SetupFutureUsage>>,
    /// Shipping information.
    pub shipping: Option<Clearable<ShippingParams>>,
}

/// Parameters of `capture`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CapturePaymentIntent {
    /// Amount to capture, the full capturable amount when absent.
    pub amount_to_capture: Option<i64>,
    /// Fee moved to the application owner's account.
    pub application_fee_amount: Option<i64>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Statement descriptor for non-card charges.
    pub statement_descriptor: Option<String>,
}

/// Parameters of `cancel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CancelPaymentIntent {
    /// Why the intent is canceled.
    pub cancellation_reason: Option<CancellationReason>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListPaymentIntents {
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only intents of this customer.
    pub customer: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, PaymentIntents> {
    /// Creates a payment intent.
    pub async fn create(&self, params: &CreatePaymentIntent) -> Result<PaymentIntent> {
        self.send(Endpoint::post("/payment_intents").form(params)?)
            .await
    }

    /// Retrieves a payment intent.
    ///
    /// `client_secret` is required when calling with a publishable key.
    pub async fn retrieve(
        &self,
        intent: &str,
        client_secret: Option<&str>,
        expand: &[&str],
    ) -> Result<PaymentIntent> {
        let query = expand_query(expand).with("client_secret", client_secret);
        self.send(
            Endpoint::get("/payment_intents/{intent}")
                .path_param("intent", intent)
                .query(&query)?,
        )
        .await
    }

    /// Updates a payment intent.
    pub async fn update(&self, intent: &str, params: &UpdatePaymentIntent) -> Result<PaymentIntent> {
        self.send(
            Endpoint::post("/payment_intents/{intent}")
                .path_param("intent", intent)
                .form(params)?,
        )
        .await
    }

    /// Confirms that the customer intends to pay.
    pub async fn confirm(
        &self,
        intent: &str,
        params: &ConfirmPaymentIntent,
    ) -> Result<PaymentIntent> {
        self.send(
            Endpoint::post("/payment_intents/{intent}/confirm")
                .path_param("intent", intent)
                .form(params)?,
        )
        .await
    }

    /// Captures the funds of an intent in `requires_capture`.
    pub async fn capture(
        &self,
        intent: &str,
        params: &CapturePaymentIntent,
    ) -> Result<PaymentIntent> {
        self.send(
            Endpoint::post("/payment_intents/{intent}/capture")
                .path_param("intent", intent)
                .form(params)?,
        )
        .await
    }

    /// Cancels a payment intent.
    pub async fn cancel(&self, intent: &str, params: &CancelPaymentIntent) -> Result<PaymentIntent> {
        self.send(
            Endpoint::post("/payment_intents/{intent}/cancel")
                .path_param("intent", intent)
                .form(params)?,
        )
        .await
    }

    /// Lists payment intents, most recent first.
    pub async fn list_all(&self, filter: &ListPaymentIntents) -> Result<List<PaymentIntent>> {
        self.send(Endpoint::get("/payment_intents").query(filter)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiErrorKind, to_form};

    #[test]
    fn payment_method_types_use_brackets() {
        let params = CreatePaymentIntent {
            payment_method_types: Some(vec!["card".into(), "sepa_debit".into()]),
            capture_method: Some(CaptureMethod::Manual),
            ..CreatePaymentIntent::new(1099, "eur")
        };

        assert_eq!(
            to_form(&params).expect("form"),
            "amount=1099&currency=eur&capture_method=manual\
             &payment_method_types%5B%5D=card&payment_method_types%5B%5D=sepa_debit"
        );
    }

    #[test]
    fn decode_intent_with_payment_error() {
        let intent: PaymentIntent = serde_json::from_str(
            r#"{
                "id": "pi_1",
                "object": "payment_intent",
                "amount": 1099,
                "capture_method": "automatic_async",
                "created": 1700000000,
                "currency": "eur",
                "last_payment_error": {"type": "card_error", "code": "card_declined", "decline_code": "insufficient_funds"},
                "livemode": false,
                "payment_method_types": ["card"],
                "status": "requires_payment_method"
            }"#,
        )
        .expect("intent");

        assert_eq!(intent.status, PaymentIntentStatus::RequiresPaymentMethod);
        assert_eq!(intent.capture_method, CaptureMethod::AutomaticAsync);
        let error = intent.last_payment_error.expect("error");
        assert_eq!(error.kind, ApiErrorKind::CardError);
        assert_eq!(error.decline_code.as_deref(), Some("insufficient_funds"));
    }
}
