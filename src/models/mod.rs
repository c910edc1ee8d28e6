mod receipt_rule;
mod snapshot;
mod transaction;

pub use receipt_rule::ReceiptRule;
pub use snapshot::{DailySnapshot, ExpenseLine};
pub use transaction::{FlowDirection, LineItem, StoredLineItem, StoredTransaction, TransactionRecord};
