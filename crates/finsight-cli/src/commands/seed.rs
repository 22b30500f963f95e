//! Sample data seeding command

use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::seed::seed_sample_transactions;

use super::open_db;

pub fn cmd_seed(db_path: &Path, email: &str, no_encrypt: bool) -> Result<()> {
    println!("🌱 Seeding sample transactions for {}...", email);

    let db = open_db(db_path, no_encrypt)?;
    let report =
        seed_sample_transactions(&db, email).context("Failed to seed sample transactions")?;

    println!();
    for tx in &report.transactions {
        println!("   {:>10}  {}", format!("{:.2}", tx.amount), tx.description);
    }
    println!();
    println!("   Transactions added: {}", report.transactions.len());
    println!("   Monthly income:     {:.2}", report.user_income);
    println!("   Sample expenses:    {:.2}", report.total_sample_expenses);
    println!(
        "   Savings:            {:.2} ({:.2}%)",
        report.savings, report.savings_rate
    );

    Ok(())
}
