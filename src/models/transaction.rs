use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::calendar;
use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

impl FlowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inflow => "in",
            Self::Outflow => "out",
        }
    }
}

impl std::fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction exactly as the store handed it over. Nothing is parsed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredTransaction {
    pub id: String,
    pub timestamp: String,
    pub category: String,
    pub grand_total: String,
    pub line_items: Vec<StoredLineItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredLineItem {
    pub description: String,
    /// Empty means "not itemized by quantity".
    pub quantity: String,
    pub line_total: String,
}

/// A validated transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub category: String,
    /// Authoritative for balance math, even when line items disagree.
    pub grand_total: Decimal,
    pub line_items: Vec<LineItem>,
    /// Line items left out because they failed to parse. The record itself
    /// still counts in full.
    pub dropped_line_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub description: String,
    pub quantity: Option<u32>,
    pub line_total: Decimal,
}

impl StoredTransaction {
    /// Validate the record. Offset-less timestamps are read as outlet-local
    /// wall-clock times in `time_zone`.
    ///
    /// Only a missing id, timestamp or grand total rejects the record. A bad
    /// line item is logged and dropped.
    pub fn parse(&self, time_zone: Tz) -> Result<TransactionRecord, LedgerError> {
        if self.id.trim().is_empty() {
            return Err(LedgerError::malformed(&self.id, "missing id"));
        }
        let timestamp = calendar::parse_timestamp(&self.timestamp, time_zone).ok_or_else(|| {
            LedgerError::malformed(&self.id, format!("unparsable timestamp '{}'", self.timestamp))
        })?;
        let grand_total = parse_amount(&self.grand_total).ok_or_else(|| {
            LedgerError::malformed(&self.id, format!("unparsable grand total '{}'", self.grand_total))
        })?;

        let mut line_items = Vec::with_capacity(self.line_items.len());
        let mut dropped_line_items = 0;
        for (i, item) in self.line_items.iter().enumerate() {
            match item.parse(&self.id, i + 1) {
                Ok(parsed) => line_items.push(parsed),
                Err(err) => {
                    tracing::warn!("dropping line item: {err}");
                    dropped_line_items += 1;
                }
            }
        }

        Ok(TransactionRecord {
            id: self.id.clone(),
            timestamp,
            category: self.category.trim().to_string(),
            grand_total,
            line_items,
            dropped_line_items,
        })
    }
}

impl StoredLineItem {
    pub(crate) fn parse(&self, record_id: &str, position: usize) -> Result<LineItem, LedgerError> {
        let line_total = parse_amount(&self.line_total).ok_or_else(|| {
            LedgerError::malformed(
                record_id,
                format!("line {position}: unparsable total '{}'", self.line_total),
            )
        })?;

        let raw_qty = self.quantity.trim();
        let quantity = if raw_qty.is_empty() {
            None
        } else {
            match raw_qty.parse::<u32>() {
                Ok(q) if q > 0 => Some(q),
                _ => {
                    return Err(LedgerError::malformed(
                        record_id,
                        format!("line {position}: quantity '{raw_qty}' is not a positive integer"),
                    ))
                }
            }
        };

        Ok(LineItem {
            description: self.description.trim().to_string(),
            quantity,
            line_total,
        })
    }
}

impl TransactionRecord {
    pub fn abs_total(&self) -> Decimal {
        self.grand_total.abs()
    }

    pub fn line_items_total(&self) -> Decimal {
        self.line_items.iter().map(|item| item.line_total).sum()
    }

    /// True when every line item parsed and their magnitudes do not add up
    /// to the magnitude of the grand total.
    pub fn has_total_mismatch(&self) -> bool {
        if self.line_items.is_empty() || self.is_partially_itemized() {
            return false;
        }
        let items: Decimal = self.line_items.iter().map(|item| item.line_total.abs()).sum();
        items != self.abs_total()
    }

    pub fn is_partially_itemized(&self) -> bool {
        self.dropped_line_items > 0
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}
