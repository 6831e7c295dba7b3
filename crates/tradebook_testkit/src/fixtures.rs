//! Document and store fixtures.

use chrono::NaiveDate;
use tradebook_model::{
    BillCategory, PaymentMethod, Period, TradeResult, UserDataDocument,
};
use tradebook_store::{LocalStore, MemoryStore};

/// A configured document with no history.
pub fn configured_document() -> UserDataDocument {
    let mut doc = UserDataDocument::default();
    doc.configure(1000.0, 10.0, 5.0);
    doc
}

/// A configured document with a few days of trading, cash movements and
/// bills — enough surface to exercise every collection.
pub fn sample_document() -> UserDataDocument {
    let mut doc = configured_document();

    doc.add_deposit(
        200.0,
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        PaymentMethod::Pix,
        "aporte",
    )
    .expect("fixture deposit");
    doc.add_withdrawal(
        50.0,
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        PaymentMethod::Ted,
        "",
    )
    .expect("fixture withdrawal");

    let day = doc
        .add_day(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap())
        .expect("fixture day");
    doc.add_entry(&day, Period::Morning, TradeResult::Win, 80.0)
        .expect("fixture entry");
    doc.add_entry(&day, Period::Afternoon, TradeResult::Loss, 30.0)
        .expect("fixture entry");

    doc.add_bill(
        "Conta de Luz",
        BillCategory::Luz,
        120.0,
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
        "",
        true,
    )
    .expect("fixture bill");

    doc
}

/// A memory store already holding [`sample_document`].
pub fn populated_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.save(&sample_document()).expect("fixture save");
    store
}

/// Scenario builders for larger or odder documents.
pub mod scenarios {
    use super::*;

    /// A configured document with `day_count` consecutive trading days,
    /// one winning entry each.
    pub fn document_with_history(day_count: u32) -> UserDataDocument {
        let mut doc = configured_document();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        for offset in 0..day_count {
            let date = start + chrono::Days::new(u64::from(offset));
            let day = doc.add_day(date).expect("scenario day");
            doc.add_entry(&day, Period::Morning, TradeResult::Win, 10.0)
                .expect("scenario entry");
        }
        doc
    }

    /// A store whose slot holds text that is not a document.
    pub fn corrupt_store() -> MemoryStore {
        MemoryStore::with_raw("{\"setup\": \"this is not the document you expect\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_document_is_internally_consistent() {
        let doc = sample_document();
        // 1000 + 200 - 50 + 80 - 30
        assert_eq!(doc.current_bank(), 1200.0);
        assert_eq!(doc.operations.len(), 2);
        assert_eq!(doc.pending_bills().len(), 1);
    }

    #[test]
    fn populated_store_roundtrips() {
        let store = populated_store();
        let doc = store.load().unwrap();
        assert!(doc.setup.configured);
    }

    #[test]
    fn history_scenario_scales() {
        let doc = scenarios::document_with_history(30);
        assert_eq!(doc.days.len(), 30);
        assert_eq!(doc.current_bank(), 1300.0);
    }

    #[test]
    fn corrupt_store_loads_as_absent() {
        assert!(scenarios::corrupt_store().load().is_none());
    }
}
