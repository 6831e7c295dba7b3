//! Property tests for the balance derivation.

use chrono::NaiveDate;
use proptest::prelude::*;
use tradebook_model::{PaymentMethod, Period, TradeResult, UserDataDocument};

fn any_value() -> impl Strategy<Value = f64> {
    // Positive, finite, wire-realistic amounts.
    (1u32..=1_000_000).prop_map(|cents| cents as f64 / 100.0)
}

proptest! {
    #[test]
    fn bank_matches_naive_sum(
        initial in any_value(),
        deposits in prop::collection::vec(any_value(), 0..8),
        withdrawals in prop::collection::vec(any_value(), 0..8),
        entries in prop::collection::vec((any_value(), prop::bool::ANY), 0..16),
    ) {
        let mut doc = UserDataDocument::default();
        doc.configure(initial, 10.0, 5.0);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let mut expected = initial;
        for value in &deposits {
            doc.add_deposit(*value, date, PaymentMethod::Pix, "").unwrap();
            expected += value;
        }
        for value in &withdrawals {
            doc.add_withdrawal(*value, date, PaymentMethod::Ted, "").unwrap();
            expected -= value;
        }

        let day_id = doc.add_day(date).unwrap();
        for (value, win) in &entries {
            let result = if *win { TradeResult::Win } else { TradeResult::Loss };
            doc.add_entry(&day_id, Period::Morning, result, *value).unwrap();
            if *win { expected += value } else { expected -= value }
        }

        prop_assert!((doc.current_bank() - expected).abs() < 1e-6);
        prop_assert!((doc.profit() - (expected - initial)).abs() < 1e-6);
    }

    #[test]
    fn serde_preserves_content(
        initial in any_value(),
        deposits in prop::collection::vec(any_value(), 0..4),
    ) {
        let mut doc = UserDataDocument::default();
        doc.configure(initial, 10.0, 5.0);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for value in &deposits {
            doc.add_deposit(*value, date, PaymentMethod::Pix, "").unwrap();
        }

        let text = doc.canonical_json();
        let parsed: UserDataDocument = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(parsed.canonical_json(), text);
    }
}
