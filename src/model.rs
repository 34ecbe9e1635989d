use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the `prices` table, keyed by symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinPrice {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}

/// One row of the `balances` table, keyed by `(user_id, symbol)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: String,
    pub symbol: String,
    pub amount: f64,
}

impl Balance {
    /// Composite storage key, e.g. `1#BTC`.
    pub fn key(&self) -> String {
        balance_key(&self.user_id, &self.symbol)
    }
}

pub fn balance_key(user_id: &str, symbol: &str) -> String {
    format!("{}#{}", user_id, symbol.to_uppercase())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub price: f64,
}

/// Uppercase symbol -> catalog entry.
pub type PriceCatalog = BTreeMap<String, CatalogEntry>;

/// A catalog coin joined with one user's holding of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinBalance {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub amount: f64,
    pub value: f64,
}

impl CoinBalance {
    pub fn new(symbol: String, entry: &CatalogEntry, amount: f64) -> Self {
        Self {
            symbol,
            name: entry.name.clone(),
            price: entry.price,
            amount,
            value: amount * entry.price,
        }
    }

    pub fn is_held(&self) -> bool {
        self.amount > 0.0
    }
}

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub hello: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}
