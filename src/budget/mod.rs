use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Budget pressure shown to operators. Presentation picks warning colors from
/// this value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityTier {
    Normal,
    Warning,
    Danger,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    pub fn all() -> &'static [SeverityTier] {
        &[Self::Normal, Self::Warning, Self::Danger]
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upper bound (inclusive) of the normal tier.
pub const WARNING_ABOVE: i64 = 50;
/// Upper bound (inclusive) of the warning tier.
pub const DANGER_ABOVE: i64 = 80;

/// Map a utilization percentage to its tier.
///
/// `..=50` is normal (negatives included), `51..=80` is warning, `81..` is
/// danger.
pub fn classify(utilization_percent: i64) -> SeverityTier {
    if utilization_percent <= WARNING_ABOVE {
        SeverityTier::Normal
    } else if utilization_percent <= DANGER_ABOVE {
        SeverityTier::Warning
    } else {
        SeverityTier::Danger
    }
}

/// `round(outflow / limit * 100)`, or `0` when no budget is configured.
///
/// The division stays in exact decimal arithmetic; halves round away from
/// zero.
pub fn utilization_percent(outflow: Decimal, budget_limit: Decimal) -> i64 {
    if budget_limit <= Decimal::ZERO {
        return 0;
    }
    let ratio = match outflow
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(budget_limit))
    {
        Some(ratio) => ratio,
        None => return i64::MAX,
    };
    ratio
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}
