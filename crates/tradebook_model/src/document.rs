//! Document operations: mutations, derived figures, content identity.

use crate::error::{ModelError, ModelResult};
use crate::id::generate_id;
use crate::types::{
    Bill, BillCategory, BillStatus, CashMovement, DayEntry, MovementKind, OperationKind,
    OperationRecord, PaymentMethod, Period, TradeResult, TradingDay, UserDataDocument,
};
use chrono::{Months, NaiveDate, Utc};

/// Serializes a document to its canonical JSON text.
///
/// The model contains no maps, so serialization order is fixed and two
/// equal documents always produce byte-identical text. This is the
/// comparison every sync tier uses; nothing else inspects fields.
pub fn canonical_json_of(doc: &UserDataDocument) -> String {
    // A struct of plain fields cannot fail to serialize.
    serde_json::to_string(doc).unwrap_or_default()
}

impl UserDataDocument {
    /// Canonical JSON text of this document.
    pub fn canonical_json(&self) -> String {
        canonical_json_of(self)
    }

    /// Whether this document and `other` hold the same content.
    pub fn content_equals(&self, other: &UserDataDocument) -> bool {
        self.canonical_json() == other.canonical_json()
    }

    /// Completes setup with the given capital and percentages.
    pub fn configure(&mut self, initial_bank: f64, meta_percent: f64, stop_percent: f64) {
        self.setup.initial_bank = initial_bank;
        self.setup.meta_percent = meta_percent;
        self.setup.stop_percent = stop_percent;
        self.setup.configured = true;
    }

    /// Creates a new trading day. Dates are unique across days.
    ///
    /// Returns the new day's id.
    pub fn add_day(&mut self, date: NaiveDate) -> ModelResult<String> {
        if self.days.iter().any(|d| d.date == date) {
            return Err(ModelError::DuplicateDay(date));
        }

        let id = generate_id();
        self.days.push(TradingDay {
            id: id.clone(),
            date,
            entries: Vec::new(),
        });
        Ok(id)
    }

    /// Records a trade outcome in the given day and appends the matching
    /// row to the operations log.
    ///
    /// Returns the new entry's id.
    pub fn add_entry(
        &mut self,
        day_id: &str,
        period: Period,
        result: TradeResult,
        value: f64,
    ) -> ModelResult<String> {
        if value <= 0.0 {
            return Err(ModelError::NonPositiveValue(value));
        }

        let day = self
            .days
            .iter_mut()
            .find(|d| d.id == day_id)
            .ok_or_else(|| ModelError::DayNotFound(day_id.to_string()))?;
        let date = day.date;

        let now = Utc::now();
        let entry_id = generate_id();
        day.entries.push(DayEntry {
            id: entry_id.clone(),
            period,
            result,
            value,
            created_at: now,
        });

        self.operations.push(OperationRecord {
            id: generate_id(),
            kind: match result {
                TradeResult::Win => OperationKind::Win,
                TradeResult::Loss => OperationKind::Loss,
            },
            value,
            date,
            category: "Trading".to_string(),
            notes: format!("{} - {}", period.display_name(), date),
            timestamp: now,
        });

        Ok(entry_id)
    }

    /// Removes an entry from a day. The operations log is append-only and
    /// keeps its row.
    pub fn remove_entry(&mut self, day_id: &str, entry_id: &str) -> ModelResult<()> {
        let day = self
            .days
            .iter_mut()
            .find(|d| d.id == day_id)
            .ok_or_else(|| ModelError::DayNotFound(day_id.to_string()))?;

        let before = day.entries.len();
        day.entries.retain(|e| e.id != entry_id);
        if day.entries.len() == before {
            return Err(ModelError::EntryNotFound {
                day_id: day_id.to_string(),
                entry_id: entry_id.to_string(),
            });
        }
        Ok(())
    }

    /// Records a deposit. Returns the new movement's id.
    pub fn add_deposit(
        &mut self,
        value: f64,
        date: NaiveDate,
        method: PaymentMethod,
        notes: impl Into<String>,
    ) -> ModelResult<String> {
        let movement = Self::movement(MovementKind::Deposit, value, date, method, notes)?;
        let id = movement.id.clone();
        self.financial.deposits.push(movement);
        Ok(id)
    }

    /// Records a withdrawal. Returns the new movement's id.
    pub fn add_withdrawal(
        &mut self,
        value: f64,
        date: NaiveDate,
        method: PaymentMethod,
        notes: impl Into<String>,
    ) -> ModelResult<String> {
        let movement = Self::movement(MovementKind::Withdrawal, value, date, method, notes)?;
        let id = movement.id.clone();
        self.financial.withdrawals.push(movement);
        Ok(id)
    }

    fn movement(
        kind: MovementKind,
        value: f64,
        date: NaiveDate,
        method: PaymentMethod,
        notes: impl Into<String>,
    ) -> ModelResult<CashMovement> {
        if value <= 0.0 {
            return Err(ModelError::NonPositiveValue(value));
        }
        Ok(CashMovement {
            id: generate_id(),
            kind,
            value,
            date,
            method,
            notes: notes.into(),
            timestamp: Utc::now(),
        })
    }

    /// Adds a personal bill. Returns the new bill's id.
    pub fn add_bill(
        &mut self,
        name: impl Into<String>,
        category: BillCategory,
        value: f64,
        due_date: NaiveDate,
        notes: impl Into<String>,
        recurring: bool,
    ) -> ModelResult<String> {
        if value <= 0.0 {
            return Err(ModelError::NonPositiveValue(value));
        }

        let id = generate_id();
        self.personal_bills.push(Bill {
            id: id.clone(),
            name: name.into(),
            category,
            value,
            due_date,
            notes: notes.into(),
            recurring,
            status: BillStatus::Pending,
            created_at: Utc::now(),
            paid_at: None,
        });
        Ok(id)
    }

    /// Marks a bill as paid.
    ///
    /// A recurring bill spawns its successor: same name, category, value
    /// and notes, due one month later, pending, fresh id. Returns the
    /// successor's id when one was created.
    pub fn mark_bill_paid(&mut self, bill_id: &str) -> ModelResult<Option<String>> {
        let now = Utc::now();
        let bill = self
            .personal_bills
            .iter_mut()
            .find(|b| b.id == bill_id)
            .ok_or_else(|| ModelError::BillNotFound(bill_id.to_string()))?;

        bill.status = BillStatus::Paid;
        bill.paid_at = Some(now);

        if !bill.recurring {
            return Ok(None);
        }

        let next_due = bill
            .due_date
            .checked_add_months(Months::new(1))
            .unwrap_or(bill.due_date);
        let next = Bill {
            id: generate_id(),
            due_date: next_due,
            status: BillStatus::Pending,
            created_at: now,
            paid_at: None,
            ..bill.clone()
        };
        let next_id = next.id.clone();
        self.personal_bills.push(next);
        Ok(Some(next_id))
    }

    /// Reverts a bill to pending.
    pub fn mark_bill_pending(&mut self, bill_id: &str) -> ModelResult<()> {
        let bill = self
            .personal_bills
            .iter_mut()
            .find(|b| b.id == bill_id)
            .ok_or_else(|| ModelError::BillNotFound(bill_id.to_string()))?;

        bill.status = BillStatus::Pending;
        bill.paid_at = None;
        Ok(())
    }

    /// Removes a bill.
    pub fn remove_bill(&mut self, bill_id: &str) -> ModelResult<()> {
        let before = self.personal_bills.len();
        self.personal_bills.retain(|b| b.id != bill_id);
        if self.personal_bills.len() == before {
            return Err(ModelError::BillNotFound(bill_id.to_string()));
        }
        Ok(())
    }

    /// Current bank: initial capital, plus deposits, minus withdrawals,
    /// plus won entries, minus lost entries.
    pub fn current_bank(&self) -> f64 {
        let mut total = self.setup.initial_bank;

        for deposit in &self.financial.deposits {
            total += deposit.value;
        }
        for withdrawal in &self.financial.withdrawals {
            total -= withdrawal.value;
        }
        for day in &self.days {
            for entry in &day.entries {
                match entry.result {
                    TradeResult::Win => total += entry.value,
                    TradeResult::Loss => total -= entry.value,
                }
            }
        }

        total
    }

    /// Target bank value derived from the setup percentages.
    pub fn meta_value(&self) -> f64 {
        self.setup.initial_bank * (1.0 + self.setup.meta_percent / 100.0)
    }

    /// Stop-loss bank value derived from the setup percentages.
    pub fn stop_value(&self) -> f64 {
        self.setup.initial_bank * (1.0 - self.setup.stop_percent / 100.0)
    }

    /// Profit relative to the initial capital.
    pub fn profit(&self) -> f64 {
        self.current_bank() - self.setup.initial_bank
    }

    /// Profitability as a percentage of the initial capital.
    ///
    /// Zero when the account has no initial capital.
    pub fn profitability_percent(&self) -> f64 {
        if self.setup.initial_bank == 0.0 {
            return 0.0;
        }
        (self.current_bank() / self.setup.initial_bank - 1.0) * 100.0
    }

    /// Bills still pending, soonest due first.
    pub fn pending_bills(&self) -> Vec<&Bill> {
        let mut pending: Vec<&Bill> = self
            .personal_bills
            .iter()
            .filter(|b| b.status == BillStatus::Pending)
            .collect();
        pending.sort_by_key(|b| b.due_date);
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn configured() -> UserDataDocument {
        let mut doc = UserDataDocument::default();
        doc.configure(1000.0, 10.0, 5.0);
        doc
    }

    #[test]
    fn configure_sets_flag() {
        let doc = configured();
        assert!(doc.setup.configured);
        assert_eq!(doc.setup.initial_bank, 1000.0);
        assert_eq!(doc.meta_value(), 1100.0);
        assert_eq!(doc.stop_value(), 950.0);
    }

    #[test]
    fn duplicate_day_rejected() {
        let mut doc = configured();
        doc.add_day(date(2024, 3, 1)).unwrap();

        let result = doc.add_day(date(2024, 3, 1));
        assert_eq!(result, Err(ModelError::DuplicateDay(date(2024, 3, 1))));
        assert_eq!(doc.days.len(), 1);
    }

    #[test]
    fn entry_feeds_operations_log() {
        let mut doc = configured();
        let day_id = doc.add_day(date(2024, 3, 1)).unwrap();
        doc.add_entry(&day_id, Period::Morning, TradeResult::Win, 50.0)
            .unwrap();

        assert_eq!(doc.operations.len(), 1);
        let op = &doc.operations[0];
        assert_eq!(op.kind, OperationKind::Win);
        assert_eq!(op.value, 50.0);
        assert_eq!(op.category, "Trading");
        assert_eq!(op.notes, "Manhã - 2024-03-01");
    }

    #[test]
    fn entry_into_unknown_day_fails() {
        let mut doc = configured();
        let result = doc.add_entry("missing", Period::Night, TradeResult::Loss, 10.0);
        assert!(matches!(result, Err(ModelError::DayNotFound(_))));
    }

    #[test]
    fn non_positive_values_rejected() {
        let mut doc = configured();
        let day_id = doc.add_day(date(2024, 3, 1)).unwrap();

        assert!(matches!(
            doc.add_entry(&day_id, Period::Morning, TradeResult::Win, 0.0),
            Err(ModelError::NonPositiveValue(_))
        ));
        assert!(matches!(
            doc.add_deposit(-5.0, date(2024, 3, 1), PaymentMethod::Pix, ""),
            Err(ModelError::NonPositiveValue(_))
        ));
    }

    #[test]
    fn remove_entry_keeps_operations_row() {
        let mut doc = configured();
        let day_id = doc.add_day(date(2024, 3, 1)).unwrap();
        let entry_id = doc
            .add_entry(&day_id, Period::Afternoon, TradeResult::Loss, 25.0)
            .unwrap();

        doc.remove_entry(&day_id, &entry_id).unwrap();
        assert!(doc.days[0].entries.is_empty());
        assert_eq!(doc.operations.len(), 1);
    }

    #[test]
    fn current_bank_combines_all_sources() {
        let mut doc = configured();
        doc.add_deposit(200.0, date(2024, 3, 1), PaymentMethod::Pix, "")
            .unwrap();
        doc.add_withdrawal(100.0, date(2024, 3, 2), PaymentMethod::Ted, "")
            .unwrap();
        let day_id = doc.add_day(date(2024, 3, 3)).unwrap();
        doc.add_entry(&day_id, Period::Morning, TradeResult::Win, 50.0)
            .unwrap();
        doc.add_entry(&day_id, Period::Night, TradeResult::Loss, 30.0)
            .unwrap();

        // 1000 + 200 - 100 + 50 - 30
        assert_eq!(doc.current_bank(), 1120.0);
        assert_eq!(doc.profit(), 120.0);
        assert!((doc.profitability_percent() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn profitability_of_unconfigured_account_is_zero() {
        let doc = UserDataDocument::default();
        assert_eq!(doc.profitability_percent(), 0.0);
    }

    #[test]
    fn paid_recurring_bill_spawns_successor() {
        let mut doc = configured();
        let bill_id = doc
            .add_bill(
                "Aluguel",
                BillCategory::Aluguel,
                1200.0,
                date(2024, 3, 10),
                "",
                true,
            )
            .unwrap();

        let next_id = doc.mark_bill_paid(&bill_id).unwrap();
        assert!(next_id.is_some());
        assert_eq!(doc.personal_bills.len(), 2);

        let paid = doc.personal_bills.iter().find(|b| b.id == bill_id).unwrap();
        assert_eq!(paid.status, BillStatus::Paid);
        assert!(paid.paid_at.is_some());

        let next = &doc.personal_bills[1];
        assert_eq!(next.status, BillStatus::Pending);
        assert_eq!(next.due_date, date(2024, 4, 10));
        assert!(next.paid_at.is_none());
        assert_ne!(next.id, bill_id);
    }

    #[test]
    fn paid_one_shot_bill_spawns_nothing() {
        let mut doc = configured();
        let bill_id = doc
            .add_bill("Luz", BillCategory::Luz, 80.0, date(2024, 3, 5), "", false)
            .unwrap();

        let next = doc.mark_bill_paid(&bill_id).unwrap();
        assert!(next.is_none());
        assert_eq!(doc.personal_bills.len(), 1);
    }

    #[test]
    fn bill_can_revert_to_pending() {
        let mut doc = configured();
        let bill_id = doc
            .add_bill("Luz", BillCategory::Luz, 80.0, date(2024, 3, 5), "", false)
            .unwrap();

        doc.mark_bill_paid(&bill_id).unwrap();
        doc.mark_bill_pending(&bill_id).unwrap();

        let bill = &doc.personal_bills[0];
        assert_eq!(bill.status, BillStatus::Pending);
        assert!(bill.paid_at.is_none());
    }

    #[test]
    fn pending_bills_sorted_by_due_date() {
        let mut doc = configured();
        doc.add_bill("B", BillCategory::Outro, 10.0, date(2024, 3, 20), "", false)
            .unwrap();
        doc.add_bill("A", BillCategory::Outro, 10.0, date(2024, 3, 5), "", false)
            .unwrap();
        let paid_id = doc
            .add_bill("C", BillCategory::Outro, 10.0, date(2024, 3, 1), "", false)
            .unwrap();
        doc.mark_bill_paid(&paid_id).unwrap();

        let pending = doc.pending_bills();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].name, "A");
        assert_eq!(pending[1].name, "B");
    }

    #[test]
    fn content_equality_tracks_mutations() {
        let mut a = configured();
        let b = a.clone();
        assert!(a.content_equals(&b));

        a.add_day(date(2024, 3, 1)).unwrap();
        assert!(!a.content_equals(&b));
    }

    #[test]
    fn canonical_json_roundtrips() {
        let mut doc = configured();
        let day_id = doc.add_day(date(2024, 3, 1)).unwrap();
        doc.add_entry(&day_id, Period::Morning, TradeResult::Win, 50.0)
            .unwrap();
        doc.add_bill("Luz", BillCategory::Luz, 80.0, date(2024, 3, 5), "", true)
            .unwrap();

        let parsed: UserDataDocument = serde_json::from_str(&doc.canonical_json()).unwrap();
        assert!(parsed.content_equals(&doc));
    }
}
