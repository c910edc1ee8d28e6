use serde::{Deserialize, Serialize};

/// Marks every category it matches as a receipt (cash coming in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRule {
    pub pattern: String,
    #[serde(default, rename = "regex")]
    pub is_regex: bool,
}

impl ReceiptRule {
    pub fn new_contains(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_regex: false,
        }
    }

    pub fn new_regex(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_regex: true,
        }
    }

    /// Category names the outlet app files receipts under.
    pub fn defaults() -> Vec<ReceiptRule> {
        ["cash-in", "cash in", "receipt", "pemasukan", "kas masuk"]
            .into_iter()
            .map(Self::new_contains)
            .collect()
    }
}
