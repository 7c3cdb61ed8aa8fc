//! Balance transactions: every movement of funds on the account balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe_kit_macro::Params;

use crate::routes::expand_query;
use crate::shared::{Identifiable, List, Pagination, RangeQuery};
use crate::{Endpoint, Result, Routes, Transport};

/// Marker of the balance transaction routes.
pub enum BalanceTransactions {}

/// Balance transaction operations.
pub type BalanceTransactionRoutes<T> = Routes<T, BalanceTransactions>;

/// One movement of funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTransaction {
    /// Unique identifier (`txn_...`).
    pub id: String,
    /// Always `balance_transaction`.
    pub object: String,
    /// Gross amount, in the smallest currency unit.
    pub amount: i64,
    /// When the funds become available.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub available_on: DateTime<Utc>,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Arbitrary description.
    pub description: Option<String>,
    /// Fees paid for this transaction.
    pub fee: i64,
    /// Breakdown of `fee`.
    #[serde(default)]
    pub fee_details: Vec<Fee>,
    /// Net impact on the balance (`amount - fee`).
    pub net: i64,
    /// Reporting category (`charge`, `refund`, `payout`, ...).
    pub reporting_category: String,
    /// Id of the object that caused this transaction.
    pub source: Option<String>,
    /// Whether the funds are available yet.
    pub status: BalanceTransactionStatus,
    /// Transaction type.
    #[serde(rename = "type")]
    pub type_: String,
}

impl Identifiable for BalanceTransaction {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A fee item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Fee amount, in the smallest currency unit.
    pub amount: i64,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// `application_fee`, `stripe_fee` or `tax`.
    #[serde(rename = "type")]
    pub type_: String,
}

/// Availability of the funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceTransactionStatus {
    /// Funds can be paid out.
    Available,
    /// Funds are on their way.
    Pending,
}

/// Filters of the balance transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Params)]
pub struct ListBalanceTransactions {
    /// Creation time range.
    pub created: Option<RangeQuery>,
    /// Only transactions in this currency.
    pub currency: Option<String>,
    /// Only transactions paid out by this payout.
    pub payout: Option<String>,
    /// Only transactions caused by this object.
    pub source: Option<String>,
    /// Only transactions of this type.
    #[param(rename = "type")]
    pub type_: Option<String>,
    /// Page size and cursors.
    #[param(flatten)]
    pub page: Pagination,
}

impl<T: Transport> Routes<T, BalanceTransactions> {
    /// Retrieves a balance transaction.
    pub async fn retrieve(&self, id: &str, expand: &[&str]) -> Result<BalanceTransaction> {
        self.send(
            Endpoint::get("/balance_transactions/{id}")
                .path_param("id", id)
                .query(&expand_query(expand))?,
        )
        .await
    }

    /// Lists balance transactions, most recent first.
    pub async fn list_all(
        &self,
        filter: &ListBalanceTransactions,
    ) -> Result<List<BalanceTransaction>> {
        self.send(Endpoint::get("/balance_transactions").query(filter)?)
            .await
    }
}
