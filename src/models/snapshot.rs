use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::budget::SeverityTier;
use crate::models::TransactionRecord;

/// One row of today's itemized spending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseLine {
    pub description: String,
    /// Sum of the quantities that were recorded; `None` if none were.
    pub quantity: Option<u32>,
    pub total: Decimal,
}

/// The day's financial picture for one outlet.
///
/// Built only by [`crate::ledger::derive_daily_snapshot`]; read-only after
/// that. A new record set or a new "now" means a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySnapshot {
    pub(crate) day: NaiveDate,
    pub(crate) opening_balance: Decimal,
    pub(crate) inflow_today: Decimal,
    pub(crate) outflow_today: Decimal,
    pub(crate) budget_limit: Decimal,
    pub(crate) utilization_percent: i64,
    pub(crate) severity: SeverityTier,
    pub(crate) todays_transactions: Vec<TransactionRecord>,
    pub(crate) expense_breakdown: Vec<ExpenseLine>,
    pub(crate) skipped_records: usize,
    pub(crate) total_mismatches: Vec<String>,
    pub(crate) partial_itemizations: Vec<String>,
}

impl DailySnapshot {
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    pub fn inflow_today(&self) -> Decimal {
        self.inflow_today
    }

    pub fn outflow_today(&self) -> Decimal {
        self.outflow_today
    }

    /// Always recomputed from its three terms.
    pub fn current_balance(&self) -> Decimal {
        self.opening_balance + self.inflow_today - self.outflow_today
    }

    pub fn budget_limit(&self) -> Decimal {
        self.budget_limit
    }

    pub fn utilization_percent(&self) -> i64 {
        self.utilization_percent
    }

    pub fn severity(&self) -> SeverityTier {
        self.severity
    }

    /// Today's records in the order the store supplied them.
    pub fn todays_transactions(&self) -> &[TransactionRecord] {
        &self.todays_transactions
    }

    pub fn expense_breakdown(&self) -> &[ExpenseLine] {
        &self.expense_breakdown
    }

    /// Records dropped because the id, timestamp or grand total failed to parse.
    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    /// Ids of today's records whose line items do not sum to the grand total.
    pub fn total_mismatches(&self) -> &[String] {
        &self.total_mismatches
    }

    /// Ids of today's records that kept their grand total but lost one or
    /// more unparsable line items. Their breakdown entry falls back to the
    /// category.
    pub fn partial_itemizations(&self) -> &[String] {
        &self.partial_itemizations
    }
}
