//! Document types.
//!
//! All types serialize in the wire shape existing devices write: camelCase
//! field names, lowercase enum tags where the source used lowercase
//! strings, uppercase tags where it used uppercase ones.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The single aggregate of all user financial and trading state.
///
/// This is the unit of synchronization: local and remote tiers always read
/// and write the whole document, never a sub-entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataDocument {
    /// Account setup: initial capital and target/stop percentages.
    pub setup: Setup,
    /// Trading days, in creation order.
    pub days: Vec<TradingDay>,
    /// Deposits and withdrawals.
    pub financial: Financial,
    /// Derived log of trading outcomes, appended alongside day entries.
    pub operations: Vec<OperationRecord>,
    /// Personal bills. Absent in documents written before bills existed.
    #[serde(default)]
    pub personal_bills: Vec<Bill>,
}

/// Account setup parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    /// Initial capital.
    pub initial_bank: f64,
    /// Daily target, percent of the initial capital.
    pub meta_percent: f64,
    /// Stop loss, percent of the initial capital.
    pub stop_percent: f64,
    /// Whether the user has completed setup.
    pub configured: bool,
}

/// One trading day with its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingDay {
    /// Opaque id.
    pub id: String,
    /// Calendar date. Unique across all days in a document.
    pub date: NaiveDate,
    /// Entries recorded for the day.
    pub entries: Vec<DayEntry>,
}

/// A single trade outcome within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    /// Opaque id.
    pub id: String,
    /// Session period.
    pub period: Period,
    /// Win or loss.
    pub result: TradeResult,
    /// Traded value.
    pub value: f64,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

/// Trading session period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Morning session.
    Morning,
    /// Afternoon session.
    Afternoon,
    /// Night session.
    Night,
}

impl Period {
    /// Human-readable name, as used in operation notes.
    pub fn display_name(&self) -> &'static str {
        match self {
            Period::Morning => "Manhã",
            Period::Afternoon => "Tarde",
            Period::Night => "Noite",
        }
    }
}

/// Outcome of a single trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    /// The trade won.
    Win,
    /// The trade lost.
    Loss,
}

/// Deposits and withdrawals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financial {
    /// Money paid in.
    pub deposits: Vec<CashMovement>,
    /// Money taken out.
    pub withdrawals: Vec<CashMovement>,
}

/// A deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashMovement {
    /// Opaque id.
    pub id: String,
    /// Movement direction.
    #[serde(rename = "type")]
    pub kind: MovementKind,
    /// Amount moved.
    pub value: f64,
    /// Value date.
    pub date: NaiveDate,
    /// Payment method.
    pub method: PaymentMethod,
    /// Free-form notes.
    pub notes: String,
    /// When the movement was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Money paid into the account.
    Deposit,
    /// Money taken out of the account.
    Withdrawal,
}

/// Payment method for deposits and withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Instant transfer.
    Pix,
    /// Wire transfer.
    #[serde(rename = "TED")]
    Ted,
    /// Bank slip.
    Boleto,
    /// Cash.
    Dinheiro,
}

/// One row of the derived trading-outcomes log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    /// Opaque id.
    pub id: String,
    /// Outcome kind.
    #[serde(rename = "type")]
    pub kind: OperationKind,
    /// Traded value.
    pub value: f64,
    /// Date of the day the entry belongs to.
    pub date: NaiveDate,
    /// Category label.
    pub category: String,
    /// Free-form notes (period and date of the originating entry).
    pub notes: String,
    /// When the operation was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Kind of a logged operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// A winning trade.
    Win,
    /// A losing trade.
    Loss,
}

/// A personal bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Opaque id.
    pub id: String,
    /// Display name, e.g. "Conta de Luz - Dezembro".
    pub name: String,
    /// Bill category.
    pub category: BillCategory,
    /// Amount due.
    pub value: f64,
    /// Due date.
    pub due_date: NaiveDate,
    /// Free-form notes.
    pub notes: String,
    /// Whether the bill repeats monthly.
    pub recurring: bool,
    /// Payment status.
    pub status: BillStatus,
    /// When the bill was created.
    pub created_at: DateTime<Utc>,
    /// When the bill was paid, if it was.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Fixed bill categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillCategory {
    /// Water.
    Agua,
    /// Electricity.
    Luz,
    /// Rent.
    Aluguel,
    /// Internet.
    Internet,
    /// Phone.
    Telefone,
    /// Groceries.
    Mercado,
    /// Fuel.
    Gasolina,
    /// Gym.
    Academia,
    /// Health.
    Saude,
    /// Education.
    Educacao,
    /// Transport.
    Transporte,
    /// Leisure.
    Lazer,
    /// Anything else.
    #[default]
    Outro,
}

/// Payment status of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Not yet paid.
    Pending,
    /// Paid.
    Paid,
}
