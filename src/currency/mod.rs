use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::FlowDirection;

pub const CURRENCY_PREFIX: &str = "Rp";
pub const GROUP_SEPARATOR: char = '.';

/// Format a Rupiah amount with `.` thousand separators and no decimals.
/// e.g. `1234567` → `"Rp 1.234.567"`, `-42500` → `"-Rp 42.500"`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = group_digits(rounded.abs());
    if rounded < Decimal::ZERO {
        format!("-{CURRENCY_PREFIX} {digits}")
    } else {
        format!("{CURRENCY_PREFIX} {digits}")
    }
}

/// Format the magnitude of `amount` with the sign implied by `direction`,
/// so a refund stored as a negative outflow still prints one sign.
/// e.g. `(5000, Inflow)` → `"+Rp 5.000"`
/// Amounts that round to zero print unsigned.
pub fn format_flow(amount: Decimal, direction: FlowDirection) -> String {
    let magnitude = amount.abs();
    let rounded = magnitude.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return format_currency(magnitude);
    }
    let sign = match direction {
        FlowDirection::Inflow => '+',
        FlowDirection::Outflow => '-',
    };
    format!("{sign}{}", format_currency(magnitude))
}

fn group_digits(whole: Decimal) -> String {
    let int_part = format!("{whole:.0}");
    int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(&GROUP_SEPARATOR.to_string())
}
