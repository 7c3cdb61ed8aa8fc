//! Invoices.
//!
//! An invoice starts as a `draft`, is `finalize`d into `open`, then ends
//! `paid`, `void` or `uncollectible`. Drafts can be deleted; finalized
//! invoices can only be voided.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::charges::Charge;
use super::customers::Customer;
use super::payment_intents::PaymentIntent;
use super::prices::Price;
use crate::routes::expand_query;
use crate::shared::{Deleted, Expandable, Identifiable, List, Metadata, Pagination, RangeQuery};
use crate::{Clearable, Endpoint, ParameterValue, Result, Routes, Transport};

/// Marker of the invoice routes.
pub enum Invoices {}

/// Invoice operations.
pub type InvoiceRoutes<T> = Routes<T, Invoices>;

/// An invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier (`in_...`). Absent on upcoming invoices.
    pub id: Option<String>,
    /// Always `invoice`.
    pub object: String,
    /// Final amount due.
    pub amount_due: i64,
    /// Amount paid so far.
    pub amount_paid: i64,
    /// Amount left to pay.
    pub amount_remaining: i64,
    /// Number of payment attempts made.
    pub attempt_count: u32,
    /// Whether a payment was attempted.
    pub attempted: bool,
    /// Whether the invoice advances automatically.
    pub auto_advance: Option<bool>,
    /// Latest charge.
    pub charge: Option<Expandable<Charge>>,
    /// How the invoice is collected.
    pub collection_method: CollectionMethod,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Customer billed.
    pub customer: Option<Expandable<Customer>>,
    /// Customer email at finalization.
    pub customer_email: Option<String>,
    /// Memo shown to customers.
    pub description: Option<String>,
    /// Due date, for invoices sent to the customer.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub due_date: Option<DateTime<Utc>>,
    /// Hosted payment page.
    pub hosted_invoice_url: Option<String>,
    /// PDF download link.
    pub invoice_pdf: Option<String>,
    /// Line items.
    pub lines: List<InvoiceLineItem>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Human-readable number.
    pub number: Option<String>,
    /// Whether the invoice is paid.
    pub paid: bool,
    /// Payment intent collecting the invoice.
    pub payment_intent: Option<Expandable<PaymentIntent>>,
    /// Current state.
    pub status: Option<InvoiceStatus>,
    /// Total before discounts and taxes.
    pub subtotal: i64,
    /// Total after discounts and taxes.
    pub total: i64,
}

impl Identifiable for Invoice {
    fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// A line of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Unique identifier (`il_...`).
    pub id: String,
    /// Always `line_item`.
    pub object: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Description shown to customers.
    pub description: Option<String>,
    /// Whether the line is a proration.
    #[serde(default)]
    pub proration: bool,
    /// Price of the line.
    pub price: Option<Price>,
    /// Quantity.
    pub quantity: Option<u64>,
    /// `invoiceitem` or `subscription`.
    #[serde(rename = "type")]
    pub type_: String,
}

impl Identifiable for InvoiceLineItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// State of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Still editable.
    Draft,
    /// Finalized, waiting for payment.
    Open,
    /// Paid.
    Paid,
    /// Written off.
    Uncollectible,
    /// Canceled.
    Void,
}

/// How an invoice is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum CollectionMethod {
    /// The default payment method is charged.
    ChargeAutomatically,
    /// The invoice is emailed to the customer.
    SendInvoice,
}

/// Parameters of `create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CreateInvoice {
    /// Whether the invoice advances automatically.
    pub auto_advance: Option<bool>,
    /// How the invoice is collected.
    pub collection_method: Option<CollectionMethod>,
    /// Three-letter ISO currency code.
    pub currency: Option<String>,
    /// Customer billed.
    pub customer: Option<String>,
    /// Days until due, with `send_invoice`.
    pub days_until_due: Option<u32>,
    /// Payment method to charge.
    pub default_payment_method: Option<String>,
    /// Memo shown to customers.
    pub description: Option<String>,
    /// Due date, with `send_invoice`.
    pub due_date: Option<DateTime<Utc>>,
    /// Footer shown to customers.
    pub footer: Option<String>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Pull in pending invoice items (`exclude` or `include`).
    pub pending_invoice_items_behavior: Option<String>,
    /// Statement descriptor.
    pub statement_descriptor: Option<String>,
    /// Subscription to invoice.
    pub subscription: Option<String>,
}

impl CreateInvoice {
    /// Draft invoice for `customer`.
    #[must_use]
    pub fn for_customer(customer: impl Into<String>) -> Self {
        Self {
            customer: Some(customer.into()),
            ..Self::default()
        }
    }
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateInvoice {
    /// Whether the invoice advances automatically.
    pub auto_advance: Option<bool>,
    /// How the invoice is collected.
    pub collection_method: Option<CollectionMethod>,
    /// Days until due, with `send_invoice`.
    pub days_until_due: Option<u32>,
    /// Payment method to charge.
    pub default_payment_method: Option<Clearable<String>>,
    /// Memo shown to customers.
    pub description: Option<Clearable<String>>,
    /// Due date, with `send_invoice`.
    pub due_date: Option<DateTime<Utc>>,
    /// Footer shown to customers.
    pub footer: Option<Clearable<String>>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
    /// Statement descriptor.
    pub statement_descriptor: Option<Clearable<String>>,
}

/// Parameters of `finalize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct FinalizeInvoice {
    /// Whether the invoice advances automatically once finalized.
    pub auto_advance: Option<bool>,
}

/// Parameters of `pay`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct PayInvoice {
    /// Mark the invoice paid, without charging.
    pub forgive: Option<bool>,
    /// Customer is away.
    pub off_session: Option<bool>,
    /// Pay outside of Stripe.
    pub paid_out_of_band: Option<bool>,
    /// Payment method to charge.
    pub payment_method: Option<String>,
    /// Payment source to charge.
    pub source: Option<String>,
}

/// Filters of `list_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListInvoices {
    /// Only invoices collected this way.
    pub collection_method: Option<CollectionMethod>,
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only invoices of this customer.
    pub customer: Option<String>,
    /// Due date range.
    pub due_date: Option<RangeQuery>,
    /// Only invoices in this state.
    pub status: Option<InvoiceStatus>,
    /// Only invoices of this subscription.
    pub subscription: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, Invoices> {
    /// Creates a draft invoice.
    pub async fn create(&self, params: &CreateInvoice) -> Result<Invoice> {
        self.send(Endpoint::post("/invoices").form(params)?).await
    }

    /// Retrieves an invoice.
    pub async fn retrieve(&self, invoice: &str, expand: &[&str]) -> Result<Invoice> {
        self.send(
            Endpoint::get("/invoices/{invoice}")
                .path_param("invoice", invoice)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates an invoice.
    pub async fn update(&self, invoice: &str, params: &UpdateInvoice) -> Result<Invoice> {
        self.send(
            Endpoint::post("/invoices/{invoice}")
                .path_param("invoice", invoice)
                .form(params)?,
        )
        .await
    }

    /// Deletes a draft invoice.
    pub async fn delete(&self, invoice: &str) -> Result<Deleted> {
        self.send(Endpoint::delete("/invoices/{invoice}").path_param("invoice", invoice))
            .await
    }

    /// Finalizes a draft invoice.
    pub async fn finalize(&self, invoice: &str, params: &FinalizeInvoice) -> Result<Invoice> {
        self.send(
            Endpoint::post("/invoices/{invoice}/finalize")
                .path_param("invoice", invoice)
                .form(params)?,
        )
        .await
    }

    /// Attempts to collect payment for an open invoice.
    pub async fn pay(&self, invoice: &str, params: &PayInvoice) -> Result<Invoice> {
        self.send(
            Endpoint::post("/invoices/{invoice}/pay")
                .path_param("invoice", invoice)
                .form(params)?,
        )
        .await
    }

    /// Emails an open invoice to the customer.
    pub async fn send_invoice(&self, invoice: &str) -> Result<Invoice> {
        self.action(invoice, "/invoices/{invoice}/send").await
    }

    /// Voids an open invoice.
    pub async fn void(&self, invoice: &str) -> Result<Invoice> {
        self.action(invoice, "/invoices/{invoice}/void").await
    }

    /// Marks an open invoice as uncollectible.
    pub async fn mark_uncollectible(&self, invoice: &str) -> Result<Invoice> {
        self.action(invoice, "/invoices/{invoice}/mark_uncollectible")
            .await
    }

    /// Lists invoices, most recent first.
    pub async fn list_all(&self, filter: &ListInvoices) -> Result<List<Invoice>> {
        self.send(Endpoint::get("/invoices").query(filter)?).await
    }

    async fn action(&self, invoice: &str, template: &'static str) -> Result<Invoice> {
        self.send(
            Endpoint::post(template)
                .path_param("invoice", invoice)
                .form(&ParameterValue::map())?,
        )
        .await
    }
}
