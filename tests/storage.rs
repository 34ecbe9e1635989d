mod common;

use common::{empty_db, put_balances, put_prices, sample_db};
use cryptofi_api::database::{Table, TableStatus};
use cryptofi_api::portfolio::{list_balances_for_user, load_prices, load_user_balances};
use cryptofi_api::StoreError;

fn symbols(rows: &[cryptofi_api::CoinBalance]) -> Vec<&str> {
    rows.iter().map(|r| r.symbol.as_str()).collect()
}

#[tokio::test]
async fn test_create_table_reports_existing_table() {
    let db = cryptofi_api::Database::in_memory().await.unwrap();
    assert_eq!(db.create_table(Table::Prices).await.unwrap(), TableStatus::Created);
    assert_eq!(db.create_table(Table::Prices).await.unwrap(), TableStatus::AlreadyExists);
    assert!(db.is_empty(Table::Prices).await.unwrap());
}

#[tokio::test]
async fn test_loader_follows_every_page() {
    let db = sample_db().await.with_page_size(2);

    let first = db.scan_prices(None, 2).await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.last_key.as_deref(), Some("BTC"));

    let catalog = load_prices(&db).await.unwrap();
    let keys: Vec<&str> = catalog.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["BCH", "BTC", "ETH", "LTC", "XLM"]);
    assert_eq!(catalog["XLM"].price, 0.12);
    assert_eq!(catalog["BCH"].name, "Bitcoin Cash");
}

#[tokio::test]
async fn test_page_size_of_one_still_loads_everything() {
    let db = sample_db().await.with_page_size(1);
    let rows = list_balances_for_user(&db, "1").await.unwrap();
    assert_eq!(symbols(&rows), vec!["ETH", "BTC", "BCH", "LTC", "XLM"]);
}

#[tokio::test]
async fn test_lowercase_symbols_are_uppercased() {
    let db = empty_db().await;
    put_prices(&db, &[("btc", "Bitcoin", 68000.0), ("Eth", "Ethereum", 3400.0)]).await;
    put_balances(&db, "7", &[("eth", 2.0)]).await;

    let catalog = load_prices(&db).await.unwrap();
    assert!(catalog.contains_key("BTC"));
    assert!(catalog.contains_key("ETH"));

    let rows = list_balances_for_user(&db, "7").await.unwrap();
    assert_eq!(symbols(&rows), vec!["ETH", "BTC"]);
    assert_eq!(rows[0].amount, 2.0);
    assert_eq!(rows[0].value, 6800.0);

    let price = db.get_price("bTc").await.unwrap().unwrap();
    assert_eq!(price.name, "Bitcoin");
}

#[tokio::test]
async fn test_user_filter_compares_strings() {
    let db = sample_db().await;
    put_balances(&db, "01", &[("LTC", 3.0)]).await;

    let one = load_user_balances(&db, "1").await.unwrap();
    assert_eq!(one.len(), 2);
    assert_eq!(one["BTC"], 0.25);
    assert!(!one.contains_key("LTC"));

    let zero_one = load_user_balances(&db, "01").await.unwrap();
    assert_eq!(zero_one.len(), 1);
    assert_eq!(zero_one["LTC"], 3.0);
}

#[tokio::test]
async fn test_numeric_user_id_column_matches_string_lookup() {
    let db = sample_db().await;
    sqlx::query("INSERT INTO balances (pk, user_id, symbol, amount) VALUES ('9#XLM', 9, 'XLM', 100.0)")
        .execute(db.pool())
        .await
        .unwrap();

    let rows = list_balances_for_user(&db, "9").await.unwrap();
    assert_eq!(rows[0].symbol, "XLM");
    assert_eq!(rows[0].amount, 100.0);
}

#[tokio::test]
async fn test_seeded_users_order_as_expected() {
    let db = sample_db().await;

    let user1 = list_balances_for_user(&db, "1").await.unwrap();
    assert_eq!(symbols(&user1), vec!["ETH", "BTC", "BCH", "LTC", "XLM"]);
    assert_eq!(user1[0].value, 5100.0);
    assert_eq!(user1[1].value, 17000.0);

    let user2 = list_balances_for_user(&db, "2").await.unwrap();
    assert_eq!(symbols(&user2), vec!["ETH", "BTC", "BCH", "LTC", "XLM"]);
    assert_eq!(user2[0].amount, 10.0);

    let nobody = list_balances_for_user(&db, "unknown").await.unwrap();
    assert_eq!(symbols(&nobody), vec!["BCH", "BTC", "ETH", "LTC", "XLM"]);
    assert!(nobody.iter().all(|r| r.amount == 0.0));
}

#[tokio::test]
async fn test_empty_catalog_ignores_balances() {
    let db = empty_db().await;
    put_balances(&db, "1", &[("BTC", 5.0)]).await;
    assert!(list_balances_for_user(&db, "1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_price_is_rejected() {
    let db = sample_db().await;
    sqlx::query("INSERT INTO prices (symbol, name, price) VALUES ('DOGE', 'Dogecoin', NULL)")
        .execute(db.pool())
        .await
        .unwrap();

    match load_prices(&db).await {
        Err(StoreError::MalformedRecord { table, key, .. }) => {
            assert_eq!(table, "prices");
            assert_eq!(key, "DOGE");
        }
        other => panic!("expected malformed record, got {:?}", other),
    }
}

#[tokio::test]
async fn test_negative_amount_is_rejected() {
    let db = sample_db().await;
    sqlx::query("INSERT INTO balances (pk, user_id, symbol, amount) VALUES ('1#LTC', '1', 'LTC', -2.0)")
        .execute(db.pool())
        .await
        .unwrap();

    let err = list_balances_for_user(&db, "1").await.unwrap_err();
    assert!(matches!(err, StoreError::MalformedRecord { table: "balances", .. }));
}

#[tokio::test]
async fn test_closed_storage_propagates_error() {
    let db = sample_db().await;
    db.close().await;

    let err = list_balances_for_user(&db, "1").await.unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));
}
