use anyhow::Result;
use chrono::Utc;
use csv::Writer;
use std::fs::OpenOptions;
use std::path::Path;

use crate::model::CoinBalance;

pub fn save_to_csv<P: AsRef<Path>>(rows: &[CoinBalance], file_path: P) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(file_path)?;

    let mut wtr = Writer::from_writer(file);

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn generate_filename(user_id: &str) -> String {
    let now = Utc::now();
    let safe_user: String = user_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("balances_{}_{}.csv", safe_user, now.format("%Y%m%d_%H%M%S"))
}
