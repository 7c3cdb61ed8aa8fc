//! Account balance.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Endpoint, Result, Routes, Transport};

/// Marker of the balance routes.
pub enum Balances {}

/// Balance operations.
pub type BalanceRoutes<T> = Routes<T, Balances>;

/// Funds of the account, per currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Always `balance`.
    pub object: String,
    /// Funds available for payouts.
    pub available: Vec<BalanceAmount>,
    /// Funds not yet available.
    pub pending: Vec<BalanceAmount>,
    /// Funds reserved for connected accounts' negative balances, when any.
    #[serde(default)]
    pub connect_reserved: Vec<BalanceAmount>,
    /// Live mode or test mode.
    pub livemode: bool,
}

/// An amount in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAmount {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Breakdown by source type (`card`, `bank_account`, ...).
    #[serde(default)]
    pub source_types: IndexMap<String, i64>,
}

impl Balance {
    /// Available amount in `currency`, if the account holds any.
    #[must_use]
    pub fn available_in(&self, currency: &str) -> Option<i64> {
        self.available
            .iter()
            .find(|amount| amount.currency.eq_ignore_ascii_case(currency))
            .map(|amount| amount.amount)
    }
}

impl<T: Transport> Routes<T, Balances> {
    /// Retrieves the current account balance.
    pub async fn retrieve(&self) -> Result<Balance> {
        self.send(Endpoint::get("/balance")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_balance() {
        let balance: Balance = serde_json::from_str(
            r#"{
                "object": "balance",
                "available": [{"amount": 2217713, "currency": "usd", "source_types": {"card": 2217713}}],
                "pending": [{"amount": 0, "currency": "usd"}],
                "livemode": false
            }"#,
        )
        .expect("balance");

        assert_eq!(balance.available_in("USD"), Some(2_217_713));
        assert_eq!(balance.available_in("eur"), None);
        assert!(balance.pending[0].source_types.is_empty());
        assert!(balance.connect_reserved.is_empty());
    }
}
