//! Tokens: single-use references to card or bank account details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use super::bank_accounts::{AccountHolderType, BankAccount};
use super::cards::Card;
use crate::routes::expand_query;
use crate::shared::Identifiable;
use crate::{Endpoint, Result, Routes, Transport};

/// Marker of the token routes.
pub enum Tokens {}

/// Token operations.
pub type TokenRoutes<T> = Routes<T, Tokens>;

/// A token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique identifier (`tok_...` or `btok_...`).
    pub id: String,
    /// Always `token`.
    pub object: String,
    /// Tokenized bank account.
    pub bank_account: Option<BankAccount>,
    /// Tokenized card.
    pub card: Option<Card>,
    /// IP address of the client that created the token.
    pub client_ip: Option<String>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Live mode or test mode.
    pub livemode: bool,
    /// `card`, `bank_account`, ...
    #[serde(rename = "type")]
    pub type_: String,
    /// Whether the token has been used.
    pub used: bool,
}

impl Identifiable for Token {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Card details to tokenize.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CardTokenParams {
    /// Card number.
    pub number: String,
    /// Expiration month.
    pub exp_month: u32,
    /// Expiration year.
    pub exp_year: u32,
    /// Card security code.
    pub cvc: Option<String>,
    /// Cardholder name.
    pub name: Option<String>,
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
    /// Currency of debit cards used for payouts.
    pub currency: Option<String>,
}

impl CardTokenParams {
    /// Card `number` expiring `exp_month`/`exp_year`.
    #[must_use]
    pub fn new(number: impl Into<String>, exp_month: u32, exp_year: u32) -> Self {
        Self {
            number: number.into(),
            exp_month,
            exp_year,
            cvc: None,
            name: None,
            address_city: None,
            address_country: None,
            address_line1: None,
            address_line2: None,
            address_state: None,
            address_zip: None,
            currency: None,
        }
    }
}

/// Parameters of `create_card`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreateCardToken {
    /// Card details.
    pub card: CardTokenParams,
    /// Customer whose card to tokenize (connected accounts only).
    pub customer: Option<String>,
}

impl CreateCardToken {
    /// Token for `card`.
    #[must_use]
    pub const fn new(card: CardTokenParams) -> Self {
        Self {
            card,
            customer: None,
        }
    }
}

/// Bank account details to tokenize.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct BankAccountTokenParams {
    /// Two-letter country code of the bank.
    pub country: String,
    /// Three-letter ISO currency code.
    pub currency: String,
    /// Account number.
    pub account_number: String,
    /// Routing number, when the country uses one.
    pub routing_number: Option<String>,
    /// Name of the account holder.
    pub account_holder_name: Option<String>,
    /// Kind of account holder.
    pub account_holder_type: Option<AccountHolderType>,
}

impl BankAccountTokenParams {
    /// Account `account_number` held in `country`, in `currency`.
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        currency: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            currency: currency.into(),
            account_number: account_number.into(),
            routing_number: None,
            account_holder_name: None,
            account_holder_type: None,
        }
    }
}

/// Parameters of `create_bank_account`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreateBankAccountToken {
    /// Bank account details.
    pub bank_account: BankAccountTokenParams,
    /// Customer whose account to tokenize (connected accounts only).
    pub customer: Option<String>,
}

impl CreateBankAccountToken {
    /// Token for `bank_account`.
    #[must_use]
    pub const fn new(bank_account: BankAccountTokenParams) -> Self {
        Self {
            bank_account,
            customer: None,
        }
    }
}

impl<T: Transport> Routes<T, Tokens> {
    /// Creates a card token.
    pub async fn create_card(&self, params: &CreateCardToken) -> Result<Token> {
        self.send(Endpoint::post("/tokens").form(params)?).await
    }

    /// Creates a bank account token.
    pub async fn create_bank_account(&self, params: &CreateBankAccountToken) -> Result<Token> {
        self.send(Endpoint::post("/tokens").form(params)?).await
    }

    /// Retrieves a token.
    pub async fn retrieve(&self, token: &str, expand: &[&str]) -> Result<Token> {
        self.send(
            Endpoint::get("/tokens/{token}")
                .path_param("token", token)
                .query(&expand_query(expand))?,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_form;

    #[test]
    fn card_details_are_nested() {
        let params = CreateCardToken::new(CardTokenParams {
            cvc: Some("314".into()),
            ..CardTokenParams::new("4242424242424242", 12, 2030)
        });

        insta::assert_snapshot!(
            String::from_utf8_lossy(&to_form(&params).expect("form")),
            @"card%5Bnumber%5D=4242424242424242&card%5Bexp_month%5D=12&card%5Bexp_year%5D=2030&card%5Bcvc%5D=314"
        );
    }
}
