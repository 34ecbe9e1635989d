use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::database::Database;
use crate::error::StoreResult;
use crate::model::{CatalogEntry, CoinBalance, PriceCatalog};

/// Read the whole price catalog, following scan pages until exhausted.
/// Symbols are uppercased; if two stored keys differ only in case, the one
/// scanned last wins.
pub async fn load_prices(db: &Database) -> StoreResult<PriceCatalog> {
    let mut catalog = PriceCatalog::new();
    let mut after: Option<String> = None;

    loop {
        let page = db.scan_prices(after.as_deref(), db.page_size()).await?;
        for price in page.items {
            catalog.insert(
                price.symbol.to_uppercase(),
                CatalogEntry {
                    name: price.name,
                    price: price.price,
                },
            );
        }
        match page.last_key {
            Some(key) => after = Some(key),
            None => break,
        }
    }

    Ok(catalog)
}

/// Uppercase symbol -> amount held by `user_id`.
pub async fn load_user_balances(db: &Database, user_id: &str) -> StoreResult<HashMap<String, f64>> {
    let mut amounts = HashMap::new();
    let mut after: Option<String> = None;

    loop {
        let page = db.scan_balances(Some(user_id), after.as_deref(), db.page_size()).await?;
        for balance in page.items {
            amounts.insert(balance.symbol.to_uppercase(), balance.amount);
        }
        match page.last_key {
            Some(key) => after = Some(key),
            None => break,
        }
    }

    Ok(amounts)
}

pub async fn list_balances_for_user(db: &Database, user_id: &str) -> StoreResult<Vec<CoinBalance>> {
    let catalog = load_prices(db).await?;
    let amounts = load_user_balances(db, user_id).await?;
    Ok(merge_balances(&catalog, &amounts))
}

/// One row per catalog symbol, ordered by [`holding_order`]. Balances for
/// symbols missing from the catalog are dropped.
pub fn merge_balances(catalog: &PriceCatalog, amounts: &HashMap<String, f64>) -> Vec<CoinBalance> {
    for symbol in amounts.keys().filter(|s| !catalog.contains_key(*s)) {
        debug!(symbol = %symbol, "Ignoring balance for symbol missing from catalog");
    }

    let mut rows: Vec<CoinBalance> = catalog
        .iter()
        .map(|(symbol, entry)| {
            let amount = amounts.get(symbol).copied().unwrap_or(0.0);
            CoinBalance::new(symbol.clone(), entry, amount)
        })
        .collect();

    rows.sort_by(holding_order);
    rows
}

/// Held coins first, largest amount first; everything else, and ties, by symbol.
pub fn holding_order(a: &CoinBalance, b: &CoinBalance) -> Ordering {
    b.is_held()
        .cmp(&a.is_held())
        .then_with(|| {
            if a.is_held() && b.is_held() {
                b.amount.total_cmp(&a.amount)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.symbol.to_uppercase().cmp(&b.symbol.to_uppercase()))
}
