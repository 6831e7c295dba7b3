//! The `inspect` command.

use serde_json::json;
use std::path::Path;
use tradebook_model::{BillStatus, UserDataDocument};
use tradebook_store::{FileStore, LocalStore};

/// Prints a summary of the stored document.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(path)?;
    let Some(doc) = store.load() else {
        println!("No document stored at {}", path.display());
        return Ok(());
    };

    match format {
        "json" => print_json(&doc)?,
        _ => print_text(&doc),
    }
    Ok(())
}

fn print_text(doc: &UserDataDocument) {
    let entry_count: usize = doc.days.iter().map(|d| d.entries.len()).sum();
    let pending = doc.pending_bills().len();
    let paid = doc
        .personal_bills
        .iter()
        .filter(|b| b.status == BillStatus::Paid)
        .count();

    println!("Setup");
    println!("  configured:     {}", doc.setup.configured);
    println!("  initial bank:   {:.2}", doc.setup.initial_bank);
    println!("  target:         {:.2} ({}%)", doc.meta_value(), doc.setup.meta_percent);
    println!("  stop:           {:.2} ({}%)", doc.stop_value(), doc.setup.stop_percent);
    println!("Balance");
    println!("  current bank:   {:.2}", doc.current_bank());
    println!("  profit:         {:+.2}", doc.profit());
    println!("  profitability:  {:+.2}%", doc.profitability_percent());
    println!("Collections");
    println!("  days:           {} ({} entries)", doc.days.len(), entry_count);
    println!("  operations:     {}", doc.operations.len());
    println!("  deposits:       {}", doc.financial.deposits.len());
    println!("  withdrawals:    {}", doc.financial.withdrawals.len());
    println!("  bills:          {} pending, {} paid", pending, paid);
}

fn print_json(doc: &UserDataDocument) -> Result<(), Box<dyn std::error::Error>> {
    let entry_count: usize = doc.days.iter().map(|d| d.entries.len()).sum();
    let summary = json!({
        "configured": doc.setup.configured,
        "initialBank": doc.setup.initial_bank,
        "currentBank": doc.current_bank(),
        "profit": doc.profit(),
        "profitabilityPercent": doc.profitability_percent(),
        "days": doc.days.len(),
        "entries": entry_count,
        "operations": doc.operations.len(),
        "deposits": doc.financial.deposits.len(),
        "withdrawals": doc.financial.withdrawals.len(),
        "pendingBills": doc.pending_bills().len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
