//! The `verify` command.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tradebook_model::{BillStatus, UserDataDocument};

/// Checks the slot for structural problems.
///
/// An empty slot verifies clean; a slot that exists but does not parse,
/// or a document violating its invariants, fails with a non-zero exit.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            println!("Slot is empty; nothing to verify");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let doc: UserDataDocument = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(err) => {
            println!("FAIL: slot does not parse as a document: {err}");
            return Err("verification failed".into());
        }
    };

    let issues = check_document(&doc);
    if issues.is_empty() {
        println!("OK: document verifies clean");
        Ok(())
    } else {
        for issue in &issues {
            println!("FAIL: {issue}");
        }
        Err(format!("verification failed with {} issue(s)", issues.len()).into())
    }
}

/// Structural checks over a parsed document.
pub fn check_document(doc: &UserDataDocument) -> Vec<String> {
    let mut issues = Vec::new();

    let mut dates = HashSet::new();
    for day in &doc.days {
        if !dates.insert(day.date) {
            issues.push(format!("duplicate trading day date {}", day.date));
        }
        for entry in &day.entries {
            if entry.value <= 0.0 {
                issues.push(format!(
                    "entry {} in day {} has non-positive value {}",
                    entry.id, day.date, entry.value
                ));
            }
        }
    }

    for movement in doc
        .financial
        .deposits
        .iter()
        .chain(doc.financial.withdrawals.iter())
    {
        if movement.value <= 0.0 {
            issues.push(format!(
                "cash movement {} has non-positive value {}",
                movement.id, movement.value
            ));
        }
    }

    for operation in &doc.operations {
        if operation.value <= 0.0 {
            issues.push(format!(
                "operation {} has non-positive value {}",
                operation.id, operation.value
            ));
        }
    }

    for bill in &doc.personal_bills {
        if bill.value <= 0.0 {
            issues.push(format!(
                "bill {} has non-positive value {}",
                bill.id, bill.value
            ));
        }
        match bill.status {
            BillStatus::Paid if bill.paid_at.is_none() => {
                issues.push(format!("bill {} is paid but has no paid_at", bill.id));
            }
            BillStatus::Pending if bill.paid_at.is_some() => {
                issues.push(format!("bill {} is pending but carries paid_at", bill.id));
            }
            _ => {}
        }
    }

    issues
}
