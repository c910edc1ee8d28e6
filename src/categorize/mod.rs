use regex::{Regex, RegexBuilder};

use crate::models::{FlowDirection, ReceiptRule, TransactionRecord};

/// Decides whether a transaction category is a receipt (inflow) or an
/// expense (outflow). Anything no rule matches is an outflow.
pub struct FlowClassifier {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    pattern: String,
    regex: Option<Regex>,
    is_regex: bool,
}

impl FlowClassifier {
    /// Compile `rules`. Returns the classifier and the patterns of any regex
    /// rules that failed to compile; those rules never match.
    pub fn new(rules: &[ReceiptRule]) -> (Self, Vec<String>) {
        let mut bad_patterns = Vec::new();
        let compiled = rules
            .iter()
            .map(|r| {
                let regex = if r.is_regex {
                    match RegexBuilder::new(&r.pattern).case_insensitive(true).build() {
                        Ok(re) => Some(re),
                        Err(_) => {
                            bad_patterns.push(r.pattern.clone());
                            None
                        }
                    }
                } else {
                    None
                };
                CompiledRule {
                    pattern: r.pattern.to_lowercase(),
                    regex,
                    is_regex: r.is_regex,
                }
            })
            .collect();

        (Self { rules: compiled }, bad_patterns)
    }

    pub fn is_receipt(&self, category: &str) -> bool {
        let lower = category.trim().to_lowercase();
        if lower.is_empty() {
            return false;
        }

        self.rules.iter().any(|rule| {
            if rule.is_regex {
                rule.regex.as_ref().is_some_and(|re| re.is_match(category.trim()))
            } else {
                !rule.pattern.is_empty() && lower.contains(&rule.pattern)
            }
        })
    }

    pub fn direction(&self, category: &str) -> FlowDirection {
        if self.is_receipt(category) {
            FlowDirection::Inflow
        } else {
            FlowDirection::Outflow
        }
    }

    pub fn direction_of(&self, record: &TransactionRecord) -> FlowDirection {
        self.direction(&record.category)
    }
}

impl Default for FlowClassifier {
    fn default() -> Self {
        // The built-in rules are plain substrings and always compile.
        Self::new(&ReceiptRule::defaults()).0
    }
}
