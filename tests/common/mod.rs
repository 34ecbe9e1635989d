#![allow(dead_code)]

use cryptofi_api::database::Table;
use cryptofi_api::{Balance, CoinPrice, Database};

pub async fn empty_db() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.create_table(Table::Prices).await.unwrap();
    db.create_table(Table::Balances).await.unwrap();
    db
}

pub async fn put_prices(db: &Database, prices: &[(&str, &str, f64)]) {
    for (symbol, name, price) in prices {
        db.put_price(&CoinPrice {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price: *price,
        })
        .await
        .unwrap();
    }
}

pub async fn put_balances(db: &Database, user_id: &str, balances: &[(&str, f64)]) {
    for (symbol, amount) in balances {
        db.put_balance(&Balance {
            user_id: user_id.to_string(),
            symbol: symbol.to_string(),
            amount: *amount,
        })
        .await
        .unwrap();
    }
}

/// BTC, ETH, BCH, LTC, XLM with users "1" and "2".
pub async fn sample_db() -> Database {
    let db = empty_db().await;
    put_prices(
        &db,
        &[
            ("BTC", "Bitcoin", 68000.0),
            ("ETH", "Ethereum", 3400.0),
            ("BCH", "Bitcoin Cash", 420.0),
            ("LTC", "Litecoin", 85.0),
            ("XLM", "Stellar", 0.12),
        ],
    )
    .await;
    put_balances(&db, "1", &[("BTC", 0.25), ("ETH", 1.5)]).await;
    put_balances(&db, "2", &[("BTC", 1.0), ("ETH", 10.0)]).await;
    db
}

pub fn seed_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
