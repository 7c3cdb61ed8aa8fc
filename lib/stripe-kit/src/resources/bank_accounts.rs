//! Bank accounts attached to customers as payment sources.

use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use crate::routes::expand_query;
use crate::shared::{Deleted, Identifiable, List, Metadata, Pagination, SourceListQuery};
use crate::{Endpoint, Result, Routes, Transport};

/// Marker of the bank account routes.
pub enum BankAccounts {}

/// Bank account operations.
pub type BankAccountRoutes<T> = Routes<T, BankAccounts>;

/// A bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Unique identifier (`ba_...`).
    pub id: String,
    /// Always `bank_account`.
    pub object: String,
    /// Name of the account holder.
    pub account_holder_name: Option<String>,
    /// Kind of account holder.
    pub account_holder_type: Option<AccountHolderType>,
    /// Name of the bank.
    pub bank_name: Option<String>,
    /// Two-letter country code of the bank.
    pub country: String,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Customer owning the account.
    pub customer: Option<String>,
    /// Fingerprint identifying the account number.
    pub fingerprint: Option<String>,
    /// Last four digits of the account number.
    pub last4: String,
    /// Attached key/value pairs.
    #[serde(default)]
    pub metadata: Metadata,
    /// Routing transit number.
    pub routing_number: Option<String>,
    /// Verification state.
    pub status: BankAccountStatus,
}

impl Identifiable for BankAccount {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Kind of account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Params)]
#[serde(rename_all = "snake_case")]
#[param(rename_all = "snake_case")]
pub enum AccountHolderType {
    /// A person.
    Individual,
    /// A business.
    Company,
}

/// Verification state of a bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankAccountStatus {
    /// Not verified yet.
    New,
    /// Micro-deposits were sent and can be verified.
    Validated,
    /// Verified.
    Verified,
    /// Verification failed.
    VerificationFailed,
    /// A transfer to the account failed.
    Errored,
}

/// Parameters of `create`.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct CreateBankAccount {
    /// Bank account token (`btok_...`).
    pub source: String,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
}

impl CreateBankAccount {
    /// Attaches the bank account behind `token`.
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
pub struct UpdateBankAccount {
    /// Name of the account holder.
    pub account_holder_name: Option<String>,
    /// Kind of account holder.
    pub account_holder_type: Option<AccountHolderType>,
    /// Attached key/value pairs.
    pub metadata: Option<Metadata>,
}

/// Parameters of `verify`: the two micro-deposit amounts, in cents.
#[derive(Debug, Clone, PartialEq, Eq, Params)]
pub struct VerifyBankAccount {
    /// Deposit amounts, in the order they appear on the statement.
    #[param(list = "brackets")]
    pub amounts: Vec<i64>,
}

impl VerifyBankAccount {
    /// Verification with the two deposit amounts.
    #[must_use]
    pub fn new(first: i64, second: i64) -> Self {
        Self {
            amounts: vec![first, second],
        }
    }
}

impl<T: Transport> Routes<T, BankAccounts> {
    /// Attaches a bank account to a customer.
    pub async fn create(&self, customer: &str, params: &CreateBankAccount) -> Result<BankAccount> {
        self.send(
            Endpoint::post("/customers/{customer}/sources")
                .path_param("customer", customer)
                .form(params)?,
        )
        .await
    }

    /// Retrieves a customer's bank account.
    pub async fn retrieve(&self, customer: &str, id: &str, expand: &[&str]) -> Result<BankAccount> {
        self.send(
            Endpoint::get("/customers/{customer}/sources/{id}")
                .path_param("customer", customer)
                .path_param("id", id)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Updates a customer's bank account.
    pub async fn update(
        &self,
        customer: &str,
        id: &str,
        params: &UpdateBankAccount,
    ) -> Result<BankAccount> {
        self.send(
            Endpoint::post("/customers/{customer}/sources/{id}")
                .path_param("customer", customer)
                .path_param("id", id)
                .form(params)?,
        )
        .await
    }

    /// Verifies a bank account with the micro-deposit amounts.
    pub async fn verify(
        &self,
        customer: &str,
        id: &str,
        params: &VerifyBankAccount,
    ) -> Result<BankAccount> {
        self.send(
            Endpoint::post("/customers/{customer}/sources/{id}/verify")
                .path_param("customer", customer)
                .path_param("id", id)
                .form(params)?,
        )
        .await
    }

    /// Detaches and deletes a customer's bank account.
    pub async fn delete(&self, customer: &str, id: &str) -> Result<Deleted> {
        self.send(
            Endpoint::delete("/customers/{customer}/sources/{id}")
                .path_param("customer", customer)
                .path_param("id", id),
        )
        .await
    }

    /// Lists a customer's bank accounts.
    pub async fn list_all(&self, customer: &str, page: &Pagination) -> Result<List<BankAccount>> {
        let query = SourceListQuery {
            object: "bank_account",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_form, to_query_string};

    #[test]
    fn verify_amounts_use_brackets() {
        let body = to_form(&VerifyBankAccount::new(32, 45)).expect("form");
        assert_eq!(body, "amounts%5B%5D=32&amounts%5B%5D=45");
    }

    #[test]
    fn list_query_narrows_to_bank_accounts() {
        let query = SourceListQuery {
            object: "bank_account",
            page: &Pagination::limit(10),
        };

        assert_eq!(
            to_query_string(&query).expect("query"),
            "object=bank_account&limit=10"
        );
    }

    #[test]
    fn account_holder_type_wire_names() {
        let params = UpdateBankAccount {
            account_holder_type: Some(AccountHolderType::Company),
            ..UpdateBankAccount::default()
        };

        assert_eq!(
            to_form(&params).expect("form"),
            "account_holder_type=company"
        );
    }
}
