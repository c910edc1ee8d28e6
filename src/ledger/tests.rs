#![allow(clippy::unwrap_used)]

use super::*;
use crate::budget::SeverityTier;
use crate::models::{ReceiptRule, StoredLineItem};
use chrono_tz::Asia::Jakarta;
use rust_decimal_macros::dec;

// 2024-03-10 14:00 in Jakarta
const NOW: &str = "2024-03-10T07:00:00Z";

fn context(opening: Decimal, budget_limit: Decimal) -> DayContext {
    DayContext {
        opening_balance: opening,
        budget_limit,
        reference_instant: DateTime::parse_from_rfc3339(NOW)
            .unwrap()
            .with_timezone(&Utc),
        time_zone: Jakarta,
    }
}

fn record(id: &str, timestamp: &str, category: &str, total: &str) -> StoredTransaction {
    StoredTransaction {
        id: id.into(),
        timestamp: timestamp.into(),
        category: category.into(),
        grand_total: total.into(),
        line_items: Vec::new(),
    }
}

fn expense(id: &str, total: &str) -> StoredTransaction {
    record(id, "2024-03-10T09:00:00+07:00", "general expense", total)
}

fn item(description: &str, quantity: &str, line_total: &str) -> StoredLineItem {
    StoredLineItem {
        description: description.into(),
        quantity: quantity.into(),
        line_total: line_total.into(),
    }
}

fn scenario_records() -> Vec<StoredTransaction> {
    vec![
        expense("out-1", "30000"),
        record("in-1", "2024-03-10T10:00:00+07:00", "cash-in", "5000"),
        expense("out-2", "20000"),
    ]
}

fn ids(snapshot: &DailySnapshot) -> Vec<&str> {
    snapshot
        .todays_transactions()
        .iter()
        .map(|r| r.id.as_str())
        .collect()
}

// ── End-to-end scenarios ──────────────────────────────────────

#[test]
fn test_scenario_half_budget_is_normal() {
    let snap = derive_daily_snapshot(&scenario_records(), &context(dec!(100000), dec!(100000)))
        .unwrap();
    assert_eq!(snap.day(), chrono::NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert_eq!(snap.opening_balance(), dec!(100000));
    assert_eq!(snap.outflow_today(), dec!(50000));
    assert_eq!(snap.inflow_today(), dec!(5000));
    assert_eq!(snap.current_balance(), dec!(55000));
    assert_eq!(snap.utilization_percent(), 50);
    assert_eq!(snap.severity(), SeverityTier::Normal);
    assert_eq!(snap.skipped_records(), 0);
}

#[test]
fn test_scenario_full_budget_is_danger() {
    let snap = derive_daily_snapshot(&scenario_records(), &context(dec!(100000), dec!(50000)))
        .unwrap();
    assert_eq!(snap.utilization_percent(), 100);
    assert_eq!(snap.severity(), SeverityTier::Danger);
    assert_eq!(snap.current_balance(), dec!(55000));
}

#[test]
fn test_warning_tier() {
    let records = vec![expense("out-1", "60000")];
    let snap = derive_daily_snapshot(&records, &context(dec!(0), dec!(100000))).unwrap();
    assert_eq!(snap.utilization_percent(), 60);
    assert_eq!(snap.severity(), SeverityTier::Warning);
}

// ── Budget edge policy ────────────────────────────────────────

#[test]
fn test_zero_budget_is_zero_percent_normal() {
    let snap = derive_daily_snapshot(&scenario_records(), &context(dec!(100000), dec!(0)))
        .unwrap();
    assert_eq!(snap.outflow_today(), dec!(50000));
    assert_eq!(snap.utilization_percent(), 0);
    assert_eq!(snap.severity(), SeverityTier::Normal);
}

#[test]
fn test_negative_budget_is_invalid_configuration() {
    let err = derive_daily_snapshot(&scenario_records(), &context(dec!(0), dec!(-1))).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidConfiguration(_)));
}

#[test]
fn test_utilization_ignores_inflow() {
    let records = vec![
        expense("out-1", "40000"),
        record("in-1", "2024-03-10T10:00:00+07:00", "cash-in", "40000"),
    ];
    let snap = derive_daily_snapshot(&records, &context(dec!(0), dec!(50000))).unwrap();
    assert_eq!(snap.utilization_percent(), 80);
    assert_eq!(snap.severity(), SeverityTier::Warning);
}

// ── Balance arithmetic ────────────────────────────────────────

#[test]
fn test_current_balance_matches_terms() {
    let snap = derive_daily_snapshot(&scenario_records(), &context(dec!(12345), dec!(1))).unwrap();
    assert_eq!(
        snap.current_balance(),
        snap.opening_balance() + snap.inflow_today() - snap.outflow_today()
    );
}

#[test]
fn test_overdraft_balance_goes_negative() {
    let records = vec![expense("out-1", "150000")];
    let snap = derive_daily_snapshot(&records, &context(dec!(100000), dec!(200000))).unwrap();
    assert_eq!(snap.current_balance(), dec!(-50000));
}

#[test]
fn test_many_small_amounts_sum_exactly() {
    let records: Vec<StoredTransaction> = (0..1000)
        .map(|i| expense(&format!("out-{i}"), "0.1"))
        .collect();
    let snap = derive_daily_snapshot(&records, &context(dec!(0), dec!(1000))).unwrap();
    assert_eq!(snap.outflow_today(), dec!(100));
    assert_eq!(snap.utilization_percent(), 10);
}

#[test]
fn test_negative_grand_total_uses_magnitude() {
    let records = vec![expense("out-1", "-30000")];
    let snap = derive_daily_snapshot(&records, &context(dec!(100000), dec!(100000))).unwrap();
    assert_eq!(snap.outflow_today(), dec!(30000));
    assert_eq!(snap.current_balance(), dec!(70000));
}

#[test]
fn test_no_records() {
    let snap = derive_daily_snapshot(&[], &context(dec!(75000), dec!(100000))).unwrap();
    assert_eq!(snap.inflow_today(), Decimal::ZERO);
    assert_eq!(snap.outflow_today(), Decimal::ZERO);
    assert_eq!(snap.current_balance(), dec!(75000));
    assert!(snap.todays_transactions().is_empty());
    assert!(snap.expense_breakdown().is_empty());
}

// ── Day partitioning ──────────────────────────────────────────

#[test]
fn test_other_days_excluded_from_sums_and_list() {
    let records = vec![
        record("yesterday", "2024-03-09T23:59:59+07:00", "general expense", "99000"),
        expense("today", "10000"),
        record("tomorrow", "2024-03-11T00:00:00+07:00", "cash-in", "77000"),
    ];
    let snap = derive_daily_snapshot(&records, &context(dec!(0), dec!(100000))).unwrap();
    assert_eq!(ids(&snap), vec!["today"]);
    assert_eq!(snap.outflow_today(), dec!(10000));
    assert_eq!(snap.inflow_today(), Decimal::ZERO);
}

#[test]
fn test_day_is_local_not_utc() {
    // 2024-03-09T18:00Z is already 01:00 on the 10th in Jakarta
    let records = vec![
        record("local-today", "2024-03-09T18:00:00Z", "general expense", "1000"),
        record("utc-today", "2024-03-10T17:30:00Z", "general expense", "2000"),
    ];
    let snap = derive_daily_snapshot(&records, &context(dec!(0), dec!(0))).unwrap();
    assert_eq!(ids(&snap), vec!["local-today"]);
}

#[test]
fn test_naive_timestamps_read_in_outlet_zone() {
    let records = vec![record("naive", "2024-03-10 00:30:00", "general expense", "1000")];
    let snap = derive_daily_snapshot(&records, &context(dec!(0), dec!(0))).unwrap();
    assert_eq!(ids(&snap), vec!["naive"]);
}

// ── Ordering ──────────────────────────────────────────────────

#[test]
fn test_todays_transactions_keep_input_order() {
    let records = vec![
        expense("b", "1"),
        record("old", "2024-03-01T09:00:00+07:00", "general expense", "5"),
        expense("c", "300"),
        expense("a", "20"),
    ];
    let snap = derive_daily_snapshot(&records, &context(dec!(0), dec!(0))).unwrap();
    assert_eq!(ids(&snap), vec!["b", "c", "a"]);
}

#[test]
fn test_reordering_does_not_change_totals() {
    let ctx = context(dec!(100000), dec!(100000));
    let forward = scenario_records();
    let mut reversed = scenario_records();
    reversed.reverse();

    let a = derive_daily_snapshot(&forward, &ctx).unwrap();
    let b = derive_daily_snapshot(&reversed, &ctx).unwrap();
    assert_eq!(a.opening_balance(), b.opening_balance());
    assert_eq!(a.inflow_today(), b.inflow_today());
    assert_eq!(a.outflow_today(), b.outflow_today());
    assert_eq!(a.current_balance(), b.current_balance());
    assert_eq!(ids(&a), vec!["out-1", "in-1", "out-2"]);
    assert_eq!(ids(&b), vec!["out-2", "in-1", "out-1"]);
}

#[test]
fn test_derivation_is_deterministic() {
    let ctx = context(dec!(100000), dec!(100000));
    let a = derive_daily_snapshot(&scenario_records(), &ctx).unwrap();
    let b = derive_daily_snapshot(&scenario_records(), &ctx).unwrap();
    assert_eq!(a, b);
}

// ── Malformed records ─────────────────────────────────────────

#[test]
fn test_malformed_records_skipped_and_counted() {
    let mut records = scenario_records();
    records.push(record("bad-time", "garbage", "general expense", "1000"));
    records.push(expense("bad-amount", "1.000,00"));
    records.push(record("", "2024-03-10T09:00:00+07:00", "general expense", "1000"));

    let snap = derive_daily_snapshot(&records, &context(dec!(100000), dec!(100000))).unwrap();
    assert_eq!(snap.skipped_records(), 3);
    assert_eq!(snap.outflow_today(), dec!(50000));
    assert_eq!(ids(&snap), vec!["out-1", "in-1", "out-2"]);
}

#[test]
fn test_bad_line_item_keeps_record_in_balance() {
    let mut rec = expense("qty", "30000");
    rec.line_items = vec![item("Gas", "1.5", "20000"), item("Ice", "1", "10000")];

    let snap = derive_daily_snapshot(&[rec], &context(dec!(100000), dec!(100000))).unwrap();
    assert_eq!(snap.skipped_records(), 0);
    assert_eq!(snap.outflow_today(), dec!(30000));
    assert_eq!(snap.current_balance(), dec!(70000));
    assert_eq!(snap.partial_itemizations(), &["qty".to_string()]);
    assert!(snap.total_mismatches().is_empty());

    let lines = snap.expense_breakdown();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].description, "general expense");
    assert_eq!(lines[0].total, dec!(30000));
}

// ── Line items ────────────────────────────────────────────────

#[test]
fn test_grand_total_authoritative_and_mismatch_flagged() {
    let mut rec = expense("mismatch", "30000");
    rec.line_items = vec![item("Gas", "1", "20000")];
    let mut ok = expense("ok", "10000");
    ok.line_items = vec![item("Ice", "2", "10000")];

    let snap = derive_daily_snapshot(&[rec, ok], &context(dec!(0), dec!(0))).unwrap();
    assert_eq!(snap.outflow_today(), dec!(40000));
    assert_eq!(snap.total_mismatches(), &["mismatch".to_string()]);
}

#[test]
fn test_negative_total_with_positive_items_is_not_a_mismatch() {
    let mut rec = expense("neg", "-30000");
    rec.line_items = vec![item("Gas", "1", "20000"), item("Ice", "1", "10000")];

    let snap = derive_daily_snapshot(&[rec], &context(dec!(0), dec!(0))).unwrap();
    assert_eq!(snap.outflow_today(), dec!(30000));
    assert!(snap.total_mismatches().is_empty());
    assert!(snap.partial_itemizations().is_empty());
}

#[test]
fn test_expense_breakdown_merges_items_in_first_seen_order() {
    let mut first = expense("out-1", "35000");
    first.line_items = vec![item("Ice", "2", "10000"), item("Gas", "1", "25000")];
    let mut second = expense("out-2", "5000");
    second.line_items = vec![item("Ice", "1", "5000")];
    let unitemized = record("out-3", "2024-03-10T11:00:00+07:00", "Parking", "2000");
    let mut receipt = record("in-1", "2024-03-10T12:00:00+07:00", "cash-in", "9000");
    receipt.line_items = vec![item("Top up", "", "9000")];

    let snap = derive_daily_snapshot(
        &[first, second, unitemized, receipt],
        &context(dec!(0), dec!(0)),
    )
    .unwrap();

    let lines = snap.expense_breakdown();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].description, "Ice");
    assert_eq!(lines[0].quantity, Some(3));
    assert_eq!(lines[0].total, dec!(15000));
    assert_eq!(lines[1].description, "Gas");
    assert_eq!(lines[1].total, dec!(25000));
    assert_eq!(lines[2].description, "Parking");
    assert_eq!(lines[2].quantity, None);
    assert_eq!(lines[2].total, dec!(2000));
}

#[test]
fn test_expense_breakdown_quantity_partial() {
    let mut first = expense("out-1", "1000");
    first.line_items = vec![item("Snack", "", "1000")];
    let mut second = expense("out-2", "2000");
    second.line_items = vec![item("Snack", "4", "2000")];

    let snap = derive_daily_snapshot(&[first, second], &context(dec!(0), dec!(0))).unwrap();
    let lines = snap.expense_breakdown();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, Some(4));
    assert_eq!(lines[0].total, dec!(3000));
}

// ── Custom classifier ─────────────────────────────────────────

#[test]
fn test_custom_receipt_rules() {
    let (classifier, bad) = FlowClassifier::new(&[ReceiptRule::new_contains("setoran")]);
    assert!(bad.is_empty());
    let records = vec![
        record("dep", "2024-03-10T08:00:00+07:00", "Setoran Modal", "50000"),
        record("in", "2024-03-10T08:30:00+07:00", "cash-in", "5000"),
    ];
    let snap =
        derive_with_classifier(&records, &context(dec!(0), dec!(100000)), &classifier).unwrap();
    assert_eq!(snap.inflow_today(), dec!(50000));
    assert_eq!(snap.outflow_today(), dec!(5000));
}
