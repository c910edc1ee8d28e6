//! Turns an unordered, multi-day batch of stored transactions into the
//! outlet's [`DailySnapshot`] for the local day containing `reference_instant`.
//!
//! The derivation is a pure function of its inputs: it never reads the clock,
//! the host time zone or any shared state. Malformed records are logged,
//! counted in [`DailySnapshot::skipped_records`] and otherwise ignored. A
//! record with bad line items still counts in full by its grand total.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::budget;
use crate::calendar;
use crate::categorize::FlowClassifier;
use crate::error::LedgerError;
use crate::models::{
    DailySnapshot, ExpenseLine, FlowDirection, StoredTransaction, TransactionRecord,
};

/// Everything about the outlet a derivation needs besides the records.
#[derive(Debug, Clone, Copy)]
pub struct DayContext {
    /// Cash on hand at the start of the local day, owned by the store.
    pub opening_balance: Decimal,
    pub budget_limit: Decimal,
    /// "Now". Decides which local day is today.
    pub reference_instant: DateTime<Utc>,
    pub time_zone: Tz,
}

/// Derive today's snapshot using the built-in receipt categories.
pub fn derive_daily_snapshot(
    records: &[StoredTransaction],
    context: &DayContext,
) -> Result<DailySnapshot, LedgerError> {
    derive_with_classifier(records, context, &FlowClassifier::default())
}

/// Derive today's snapshot, deciding inflow versus outflow with `classifier`.
pub fn derive_with_classifier(
    records: &[StoredTransaction],
    context: &DayContext,
    classifier: &FlowClassifier,
) -> Result<DailySnapshot, LedgerError> {
    if context.budget_limit < Decimal::ZERO {
        return Err(LedgerError::InvalidConfiguration(format!(
            "budget limit must not be negative, got {}",
            context.budget_limit
        )));
    }

    let day = calendar::local_date(context.reference_instant, context.time_zone);

    let mut skipped_records = 0;
    let mut todays_transactions = Vec::new();
    for stored in records {
        match stored.parse(context.time_zone) {
            Ok(record) => {
                if calendar::is_same_day(record.timestamp, day, context.time_zone) {
                    todays_transactions.push(record);
                }
            }
            Err(err) => {
                tracing::warn!("skipping record: {err}");
                skipped_records += 1;
            }
        }
    }

    let mut inflow_today = Decimal::ZERO;
    let mut outflow_today = Decimal::ZERO;
    let mut breakdown = Breakdown::default();
    let mut total_mismatches = Vec::new();
    let mut partial_itemizations = Vec::new();

    for record in &todays_transactions {
        match classifier.direction_of(record) {
            FlowDirection::Inflow => inflow_today += record.abs_total(),
            FlowDirection::Outflow => {
                outflow_today += record.abs_total();
                breakdown.add(record);
            }
        }
        if record.has_total_mismatch() {
            tracing::warn!(
                "record `{}`: line items sum to {} but grand total is {}; using grand total",
                record.id,
                record.line_items_total(),
                record.grand_total
            );
            total_mismatches.push(record.id.clone());
        }
        if record.is_partially_itemized() {
            partial_itemizations.push(record.id.clone());
        }
    }

    let utilization_percent = budget::utilization_percent(outflow_today, context.budget_limit);
    let severity = budget::classify(utilization_percent);

    tracing::debug!(
        %day,
        records = records.len(),
        today = todays_transactions.len(),
        skipped = skipped_records,
        %inflow_today,
        %outflow_today,
        utilization_percent,
        %severity,
        "derived daily snapshot"
    );

    Ok(DailySnapshot {
        day,
        opening_balance: context.opening_balance,
        inflow_today,
        outflow_today,
        budget_limit: context.budget_limit,
        utilization_percent,
        severity,
        todays_transactions,
        expense_breakdown: breakdown.lines,
        skipped_records,
        total_mismatches,
        partial_itemizations,
    })
}

/// Per-item spending, merged by description in first-seen order. A record
/// without a complete set of line items is booked under its category.
#[derive(Default)]
struct Breakdown {
    lines: Vec<ExpenseLine>,
}

impl Breakdown {
    fn add(&mut self, record: &TransactionRecord) {
        if record.line_items.is_empty() || record.is_partially_itemized() {
            self.merge(&record.category, None, record.abs_total());
            return;
        }
        for item in &record.line_items {
            self.merge(&item.description, item.quantity, item.line_total.abs());
        }
    }

    fn merge(&mut self, description: &str, quantity: Option<u32>, total: Decimal) {
        match self.lines.iter_mut().find(|l| l.description == description) {
            Some(line) => {
                line.total += total;
                line.quantity = match (line.quantity, quantity) {
                    (Some(a), Some(b)) => Some(a.saturating_add(b)),
                    (a, b) => a.or(b),
                };
            }
            None => self.lines.push(ExpenseLine {
                description: description.to_string(),
                quantity,
                total,
            }),
        }
    }
}

#[cfg(test)]
mod tests;
