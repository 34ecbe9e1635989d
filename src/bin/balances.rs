use anyhow::Result;
use clap::Parser;
use cryptofi_api::export::{generate_filename, save_to_csv};
use cryptofi_api::logging;
use cryptofi_api::{ensure_tables_and_seed, list_balances_for_user, AppConfig, Database};
use std::path::PathBuf;

/// Print a user's coin balances, held coins first.
#[derive(Debug, Parser)]
#[command(name = "balances")]
struct Args {
    /// User identifier, compared as a string
    user_id: String,

    /// Write the rows to this CSV file
    #[arg(long, conflicts_with = "export")]
    csv: Option<PathBuf>,

    /// Write the rows to a timestamped CSV file in the current directory
    #[arg(long)]
    export: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    logging::init("warn");

    let args = Args::parse();
    let config = AppConfig::from_env();

    let db = Database::connect(&config.storage).await?;
    ensure_tables_and_seed(&db, &config.seed).await?;
    let rows = list_balances_for_user(&db, &args.user_id).await?;
    db.close().await;

    println!("{:<8} {:<16} {:>14} {:>16} {:>16}", "Symbol", "Name", "Price(USD)", "Amount", "Value(USD)");
    println!("{}", "-".repeat(74));
    for r in &rows {
        println!(
            "{:<8} {:<16} {:>14.2} {:>16.8} {:>16.2}",
            r.symbol, r.name, r.price, r.amount, r.value
        );
    }

    let target = match (args.csv, args.export) {
        (Some(path), _) => Some(path),
        (None, true) => Some(PathBuf::from(generate_filename(&args.user_id))),
        (None, false) => None,
    };
    if let Some(path) = target {
        save_to_csv(&rows, &path)?;
        println!("\nData saved to: {}", path.display());
    }

    Ok(())
}
