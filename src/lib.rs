//! Petty-cash ledger core for a retail outlet: turns the store's raw
//! transaction records into the day's [`DailySnapshot`] (opening balance,
//! today's inflow/outflow, current balance, itemized spending, budget
//! utilization and its severity tier).

pub mod budget;
pub mod calendar;
pub mod categorize;
pub mod config;
pub mod currency;
pub mod error;
pub mod ledger;
pub mod models;
pub mod scaling;
pub mod store;

pub use budget::{classify, SeverityTier};
pub use currency::format_currency;
pub use error::LedgerError;
pub use ledger::{derive_daily_snapshot, derive_with_classifier, DayContext};
pub use models::{DailySnapshot, StoredTransaction, TransactionRecord};
