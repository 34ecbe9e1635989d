pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod portfolio;
pub mod seed;

pub use config::AppConfig;
pub use database::Database;
pub use error::StoreError;
pub use model::{Balance, CoinBalance, CoinPrice};
pub use portfolio::{list_balances_for_user, load_prices};
pub use seed::ensure_tables_and_seed;
