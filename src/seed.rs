use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::SeedConfig;
use crate::database::{Database, Table, TableStatus};
use crate::model::{Balance, CoinPrice};

#[derive(Debug, Deserialize)]
struct PriceSeed {
    prices: Vec<PriceSeedEntry>,
}

#[derive(Debug, Deserialize)]
struct PriceSeedEntry {
    #[serde(alias = "coin")]
    symbol: String,
    name: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct BalanceSeed {
    user_balances: Vec<UserBalanceSeed>,
}

#[derive(Debug, Deserialize)]
struct UserBalanceSeed {
    user_id: SeedUserId,
    balances: BTreeMap<String, f64>,
}

/// Seed files use both `"1"` and `1` for user ids; both mean the string "1".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeedUserId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for SeedUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedUserId::Text(s) => f.write_str(s),
            SeedUserId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Table already had data
    NotEmpty,
    Seeded(usize),
    /// Seed document missing or malformed
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableReport {
    pub status: TableStatus,
    pub seed: SeedOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub prices: TableReport,
    pub balances: TableReport,
}

/// Create both tables if absent and seed whichever is empty. Safe to repeat:
/// existing tables are kept, each table is seeded in one transaction, and
/// seed writes overwrite by key.
pub async fn ensure_tables_and_seed(db: &Database, config: &SeedConfig) -> Result<SeedReport> {
    let prices = {
        let (status, empty) = prepare_table(db, Table::Prices).await?;
        let seed = if !empty {
            SeedOutcome::NotEmpty
        } else {
            match read_price_seed(&config.prices_path) {
                Ok(records) => {
                    db.put_prices(&records).await?;
                    seeded(Table::Prices, records.len())
                }
                Err(e) => skipped(Table::Prices, &config.prices_path, e),
            }
        };
        TableReport { status, seed }
    };

    let balances = {
        let (status, empty) = prepare_table(db, Table::Balances).await?;
        let seed = if !empty {
            SeedOutcome::NotEmpty
        } else {
            match read_balance_seed(&config.balances_path) {
                Ok(records) => {
                    db.put_balances(&records).await?;
                    seeded(Table::Balances, records.len())
                }
                Err(e) => skipped(Table::Balances, &config.balances_path, e),
            }
        };
        TableReport { status, seed }
    };

    Ok(SeedReport { prices, balances })
}

/// Returns the table status and whether the table is empty.
async fn prepare_table(db: &Database, table: Table) -> Result<(TableStatus, bool)> {
    let status = db
        .create_table(table)
        .await
        .with_context(|| format!("failed to create table {}", table.name()))?;
    if status == TableStatus::Created {
        info!(table = table.name(), "Created table");
    }

    let empty = db.is_empty(table).await?;
    Ok((status, empty))
}

fn seeded(table: Table, count: usize) -> SeedOutcome {
    info!(table = table.name(), count, "Seeded table");
    SeedOutcome::Seeded(count)
}

fn skipped(table: Table, path: &Path, err: anyhow::Error) -> SeedOutcome {
    warn!(
        table = table.name(),
        path = %path.display(),
        error = %format!("{:#}", err),
        "Seed document unavailable, skipping seed"
    );
    SeedOutcome::Skipped
}

fn read_price_seed(path: &Path) -> Result<Vec<CoinPrice>> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let seed: PriceSeed = serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    seed.prices
        .into_iter()
        .map(|p| {
            anyhow::ensure!(
                p.price.is_finite() && p.price >= 0.0,
                "invalid price {} for {}",
                p.price,
                p.symbol
            );
            Ok(CoinPrice {
                symbol: p.symbol.to_uppercase(),
                name: p.name,
                price: p.price,
            })
        })
        .collect()
}

fn read_balance_seed(path: &Path) -> Result<Vec<Balance>> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let seed: BalanceSeed = serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    let mut records = Vec::new();
    for user in seed.user_balances {
        let user_id = user.user_id.to_string();
        for (symbol, amount) in user.balances {
            anyhow::ensure!(
                amount.is_finite() && amount >= 0.0,
                "invalid amount {} for user {} {}",
                amount,
                user_id,
                symbol
            );
            records.push(Balance {
                user_id: user_id.clone(),
                symbol: symbol.to_uppercase(),
                amount,
            });
        }
    }
    Ok(records)
}
