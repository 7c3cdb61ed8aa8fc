//! Payment methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::customers::Customer;
use crate::routes::expand_query;
use crate::shared::{
    BillingDetails, BillingDetailsParams, Expandable, Identifiable, List, Metadata, Pagination,
};
use crate::{Endpoint, ParameterValue, Result, Routes, Transport};

/// Marker of the payment method routes.
pub enum PaymentMethods {}

/// Payment method operations.
pub type PaymentMethodRoutes<T> = Routes<T, PaymentMethods>;

/// A payment instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Unique identifier (`pm_...`).
    pub id: String,
    /// Always `payment_method`.
    pub object: String,
    /// Billing details.
    #[serde(default)]
    pub billing_details: BillingDetails,
    /// Card details, for `card` payment methods.
    pub card: Option<PaymentMethodCard>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Customer the payment method is attached to.
    pub customer: Option<Expandable<Customer>>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Payment method type (`card`, `sepa_debit`, ...).
    #[serde(rename = "type")]
    pub type_: String,
}

impl Identifiable for PaymentMethod {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Card details of a payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodCard {
    /// Card brand (`visa`, `mastercard`, ...).
    pub brand: String,
    /// Two-letter country code of the issuer.
    pub country: Option<String>,
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
}

/// Payment method types accepted when creating or listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Params)]
#[param(rename_all = "snake_case")]
pub enum PaymentMethodType {
    /// Card payments.
    Card,
    /// ACSS pre-authorized debits.
    AcssDebit,
    /// BACS Direct Debit.
    BacsDebit,
    /// SEPA Direct Debit.
    SepaDebit,
    /// US bank accounts (ACH).
    UsBankAccount,
    /// Link.
    Link,
}

/// Card details for `create`: either raw details or a card token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct CardDetailsParams {
    /// Card number.
    pub number: Option<String>,
    /// Expiration month.
    pub exp_month: Option<u32>,
    /// Expiration year.
    pub exp_year: Option<u32>,
    /// Card security code.
    pub cvc: Option<String>,
    /// Card token, instead of raw details.
    pub token: Option<String>,
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreatePaymentMethod {
    /// Payment method type.
    #[param(rename = "type")]
    pub type_: PaymentMethodType,
    /// Billing details.
    pub billing_details: Option<BillingDetailsParams>,
    /// Card details, for `card`.
    pub card: Option<CardDetailsParams>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
}

impl CreatePaymentMethod {
    /// Payment method of type `type_`.
    #[must_use]
    pub const fn new(type_: PaymentMethodType) -> Self {
        Self {
            type_,
            billing_details: None,
            card: None,
            metadata: None,
        }
    }
}

/// Card fields that can be updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdateCardParams {
    /// Expiration month.
    pub exp_month: Option<u32>,
    /// Expiration year.
    pub exp_year: Option<u32>,
}

/// Parameters of `update`. Only the fields set are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct UpdatePaymentMethod {
    /// Billing details.
    pub billing_details: Option<BillingDetailsParams>,
    /// Card expiration.
    pub card: Option<UpdateCardParams>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
}

/// Parameters of `attach`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct AttachPaymentMethod {
    /// Customer to attach to.
    pub customer: String,
}

impl AttachPaymentMethod {
    /// Attach to `customer`.
    #[must_use]
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
        }
    }
}

/// Filters of `list_all`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct ListPaymentMethods {
    /// Customer whose payment methods to list.
    pub customer: String,
    /// Payment method type.
    #[param(rename = "type")]
    pub type_: PaymentMethodType,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl ListPaymentMethods {
    /// Payment methods of type `type_` attached to `customer`.
    #[must_use]
    pub fn new(customer: impl Into<String>, type_: PaymentMethodType) -> Self {
        Self {
            customer: customer.into(),
            type_,
            page: Pagination::default(),
        }
    }
}

impl<T: Transport> Routes<T, PaymentMethods> {
    /// Creates a payment method.
    pub async fn create(&self, params: &CreatePaymentMethod) -> Result<PaymentMethod> {
        self.send(Endpoint::post("/payment_methods").form(params)?)
            .await
    }

    /// Retrieves a payment method.
    pub async fn retrieve(&self, payment_method: &str, expand: &[&str]) -> Result<PaymentMethod> {
        self.send(
            Endpoint::get("/payment_methods/{payment_method}")
                .path_param("payment_method", payment_method)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a payment method.
    pub async fn update(
        &self,
        payment_method: &str,
        params: &UpdatePaymentMethod,
    ) -> Result<PaymentMethod> {
        self.send(
            Endpoint::post("/payment_methods/{payment_method}")
                .path_param("payment_method", payment_method)
                .form(params)?,
        )
        .await
    }

    /// Lists a customer's payment methods of one type.
    pub async fn list_all(&self, filter: &ListPaymentMethods) -> Result<List<PaymentMethod>> {
        self.send(Endpoint::get("/payment_methods").query(filter)?)
            .await
    }

    /// Attaches a payment method to a customer.
    pub async fn attach(
        &self,
        payment_method: &str,
        params: &AttachPaymentMethod,
    ) -> Result<PaymentMethod> {
        self.send(
            Endpoint::post("/payment_methods/{payment_method}/attach")
                .path_param("payment_method", payment_method)
                .form(params)?,
        )
        .await
    }

    /// Detaches a payment method from its customer.
    pub async fn detach(&self, payment_method: &str) -> Result<PaymentMethod> {
        self.send(
            Endpoint::post("/payment_methods/{payment_method}/detach")
                .path_param("payment_method", payment_method)
                .form(&ParameterValue::map())?,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_form, to_query_string};

    #[test]
    fn create_card_payment_method() {
        let params = CreatePaymentMethod {
            card: Some(CardDetailsParams {
                token: Some("tok_visa".into()),
                ..CardDetailsParams::default()
            }),
            ..CreatePaymentMethod::new(PaymentMethodType::Card)
        };

        assert_eq!(
            to_form(&params).expect("form"),
            "type=card&card%5Btoken%5D=tok_visa"
        );
    }

    #[test]
    fn list_requires_customer_and_type() {
        let filter = ListPaymentMethods::new("cus_1", PaymentMethodType::SepaDebit);

        assert_eq!(
            to_query_string(&filter).expect("query"),
            "customer=cus_1&type=sepa_debit"
        );
    }
}
