use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::time::Duration;
use tracing::info;

use crate::config::StorageConfig;
use crate::error::{StoreError, StoreResult};
use crate::model::{Balance, CoinPrice};

/// The two collections the service reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Prices,
    Balances,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Prices => "prices",
            Table::Balances => "balances",
        }
    }

    // Non-key columns stay nullable; rows are validated when read.
    fn schema(self) -> &'static str {
        match self {
            Table::Prices => {
                r#"
                CREATE TABLE IF NOT EXISTS prices (
                    symbol TEXT PRIMARY KEY NOT NULL,
                    name TEXT,
                    price REAL
                );
                "#
            }
            Table::Balances => {
                r#"
                CREATE TABLE IF NOT EXISTS balances (
                    pk TEXT PRIMARY KEY NOT NULL,
                    user_id TEXT,
                    symbol TEXT,
                    amount REAL
                );
                "#
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Created,
    AlreadyExists,
}

/// One page of a keyset scan. `last_key` is set when the page came back full;
/// pass it as `after` to fetch the next page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub last_key: Option<String>,
}

impl<T> Page<T> {
    /// Build a page from `(primary key, item)` pairs in scan order.
    fn new(keyed: Vec<(String, T)>, limit: u32) -> Self {
        let full = keyed.len() as u64 >= u64::from(limit);
        let mut last_key = None;
        let mut items = Vec::with_capacity(keyed.len());
        for (key, item) in keyed {
            last_key = Some(key);
            items.push(item);
        }
        Self {
            items,
            last_key: if full { last_key } else { None },
        }
    }
}

pub struct Database {
    pool: SqlitePool,
    page_size: u32,
}

impl Database {
    pub async fn connect(config: &StorageConfig) -> StoreResult<Self> {
        // url may carry credentials, keep it out of the logs
        info!(max_connections = config.max_connections, "Connecting to storage");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;

        Ok(Self {
            pool,
            page_size: config.scan_page_size,
        })
    }

    /// Private in-memory database. Held on a single connection that never
    /// expires, since each SQLite memory connection is its own database.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self {
            pool,
            page_size: StorageConfig::default().scan_page_size,
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn table_exists(&self, table: Table) -> StoreResult<bool> {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table.name())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Create the table unless it already exists. An existing table is not an error.
    pub async fn create_table(&self, table: Table) -> StoreResult<TableStatus> {
        if self.table_exists(table).await? {
            return Ok(TableStatus::AlreadyExists);
        }
        sqlx::query(table.schema()).execute(&self.pool).await?;
        Ok(TableStatus::Created)
    }

    pub async fn is_empty(&self, table: Table) -> StoreResult<bool> {
        let row = sqlx::query(&format!("SELECT 1 FROM {} LIMIT 1", table.name()))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_none())
    }

    pub async fn scan_prices(&self, after: Option<&str>, limit: u32) -> StoreResult<Page<CoinPrice>> {
        let rows = sqlx::query(
            r#"
            SELECT symbol, name, price
            FROM prices
            WHERE (?1 IS NULL OR symbol > ?1)
            ORDER BY symbol ASC
            LIMIT ?2
            "#,
        )
        .bind(after)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let keyed = rows
            .iter()
            .map(|row| price_from_row(row).map(|p| (p.symbol.clone(), p)))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Page::new(keyed, limit))
    }

    /// Scan balances ordered by composite key, optionally restricted to one user.
    /// User ids are compared as strings.
    pub async fn scan_balances(
        &self,
        user_id: Option<&str>,
        after: Option<&str>,
        limit: u32,
    ) -> StoreResult<Page<Balance>> {
        let rows = sqlx::query(
            r#"
            SELECT pk, user_id, symbol, amount
            FROM balances
            WHERE (?1 IS NULL OR user_id = ?1)
              AND (?2 IS NULL OR pk > ?2)
            ORDER BY pk ASC
            LIMIT ?3
            "#,
        )
        .bind(user_id)
        .bind(after)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let keyed = rows.iter().map(balance_from_row).collect::<StoreResult<Vec<_>>>()?;
        Ok(Page::new(keyed, limit))
    }

    /// Point lookup, case-insensitive on the symbol.
    pub async fn get_price(&self, symbol: &str) -> StoreResult<Option<CoinPrice>> {
        let row = sqlx::query(
            r#"
            SELECT symbol, name, price
            FROM prices
            WHERE UPPER(symbol) = ?
            ORDER BY symbol DESC
            LIMIT 1
            "#,
        )
        .bind(symbol.to_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(price_from_row).transpose()
    }

    /// Insert a price, replacing any record with the same symbol.
    pub async fn put_price(&self, price: &CoinPrice) -> StoreResult<()> {
        self.put_prices(std::slice::from_ref(price)).await
    }

    /// Insert all prices in one transaction; nothing is written if any insert fails.
    pub async fn put_prices(&self, prices: &[CoinPrice]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for price in prices {
            sqlx::query("INSERT OR REPLACE INTO prices (symbol, name, price) VALUES (?, ?, ?)")
                .bind(&price.symbol)
                .bind(&price.name)
                .bind(price.price)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Insert a balance, replacing any record with the same (user, symbol) key.
    pub async fn put_balance(&self, balance: &Balance) -> StoreResult<()> {
        self.put_balances(std::slice::from_ref(balance)).await
    }

    /// Insert all balances in one transaction; nothing is written if any insert fails.
    pub async fn put_balances(&self, balances: &[Balance]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for balance in balances {
            sqlx::query("INSERT OR REPLACE INTO balances (pk, user_id, symbol, amount) VALUES (?, ?, ?, ?)")
                .bind(balance.key())
                .bind(&balance.user_id)
                .bind(&balance.symbol)
                .bind(balance.amount)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        info!("Closing storage connection pool");
        self.pool.close().await;
    }
}

fn price_from_row(row: &SqliteRow) -> StoreResult<CoinPrice> {
    let symbol: String = row.try_get("symbol")?;
    let name: Option<String> = row.try_get("name")?;
    let name = name.ok_or_else(|| StoreError::malformed("prices", &symbol, "missing name"))?;
    let price = number_column(row, "prices", &symbol, "price")?;
    Ok(CoinPrice { symbol, name, price })
}

fn balance_from_row(row: &SqliteRow) -> StoreResult<(String, Balance)> {
    let pk: String = row.try_get("pk")?;
    let user_id: Option<String> = row.try_get("user_id")?;
    let symbol: Option<String> = row.try_get("symbol")?;
    let user_id = user_id.ok_or_else(|| StoreError::malformed("balances", &pk, "missing user_id"))?;
    let symbol = symbol.ok_or_else(|| StoreError::malformed("balances", &pk, "missing symbol"))?;
    let amount = number_column(row, "balances", &pk, "amount")?;
    Ok((pk, Balance { user_id, symbol, amount }))
}

/// Read a required, finite, non-negative number.
fn number_column(row: &SqliteRow, table: &'static str, key: &str, column: &str) -> StoreResult<f64> {
    let value: Option<f64> = row
        .try_get(column)
        .map_err(|e| StoreError::malformed(table, key, format!("{}: {}", column, e)))?;
    match value {
        None => Err(StoreError::malformed(table, key, format!("missing {}", column))),
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(StoreError::malformed(table, key, format!("invalid {} {}", column, v)))
        }
        Some(v) => Ok(v),
    }
}
