use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use pettycash::calendar;
use pettycash::config::OutletConfig;
use pettycash::currency::{format_currency, format_flow};
use pettycash::ledger::{self, DayContext};
use pettycash::models::FlowDirection;
use pettycash::scaling::{ScaleFactors, Viewport, DEFAULT_MODERATE_FACTOR};
use pettycash::store;

/// Commands that must work even when the config file is broken. Returns
/// `None` for anything that needs the config.
pub(crate) fn without_config(command: &str) -> Option<Result<()>> {
    match command {
        "--help" | "-h" | "help" => {
            print_usage();
            Some(Ok(()))
        }
        "--version" | "-V" | "version" => {
            println!("pettycash {}", env!("CARGO_PKG_VERSION"));
            Some(Ok(()))
        }
        _ => None,
    }
}

pub(crate) fn as_cli(args: &[String], config: &OutletConfig, config_path: &Path) -> Result<()> {
    match args[1].as_str() {
        "snapshot" | "s" => cli_snapshot(&args[2..], config),
        "scale" => cli_scale(&args[2..]),
        "config" => cli_config(config, config_path),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("PettyCash - daily petty-cash snapshot for a retail outlet");
    println!();
    println!("Usage: pettycash <command>");
    println!();
    println!("Commands:");
    println!("  snapshot <records.csv>        Print today's cash snapshot");
    println!("    --at <rfc3339>              Reference instant (default: now)");
    println!("    --opening <amount>          Opening balance (default: config)");
    println!("    --budget <amount>           Daily budget limit (default: config)");
    println!("    --tz <zone>                 Outlet time zone (default: config)");
    println!("  scale <width> <height>        Print scale factors for a viewport");
    println!("    --ratio <dpr>               Device pixel ratio (default: 1)");
    println!("  config                        Show config path and effective values");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn parse_amount(raw: &str, what: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).with_context(|| format!("Invalid {what}: '{raw}'"))
}

fn cli_snapshot(args: &[String], config: &OutletConfig) -> Result<()> {
    let file_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .ok_or_else(|| anyhow::anyhow!("Usage: pettycash snapshot <records.csv> [--at <rfc3339>]"))?;

    let time_zone = match flag(args, "--tz") {
        Some(name) => calendar::parse_time_zone(name)?,
        None => config.zone()?,
    };
    let opening_balance = match flag(args, "--opening") {
        Some(raw) => parse_amount(raw, "opening balance")?,
        None => config.opening_balance,
    };
    let budget_limit = match flag(args, "--budget") {
        Some(raw) => parse_amount(raw, "budget limit")?,
        None => config.budget_limit,
    };
    let reference_instant = match flag(args, "--at") {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --at timestamp: '{raw}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let records = store::read_records(Path::new(file_path))?;
    let context = DayContext {
        opening_balance,
        budget_limit,
        reference_instant,
        time_zone,
    };
    let classifier = config.classifier();
    let snapshot = ledger::derive_with_classifier(&records, &context, &classifier)?;

    println!("{} - {} ({})", config.outlet_name, snapshot.day(), time_zone);
    println!("{}", "─".repeat(48));
    println!("  Opening:    {}", format_currency(snapshot.opening_balance()));
    println!(
        "  Cash in:    {}",
        format_flow(snapshot.inflow_today(), FlowDirection::Inflow)
    );
    println!(
        "  Cash out:   {}",
        format_flow(snapshot.outflow_today(), FlowDirection::Outflow)
    );
    println!("  Balance:    {}", format_currency(snapshot.current_balance()));
    println!(
        "  Budget:     {} ({}% used, {})",
        format_currency(snapshot.budget_limit()),
        snapshot.utilization_percent(),
        snapshot.severity()
    );

    if !snapshot.todays_transactions().is_empty() {
        println!();
        println!("Today's Transactions:");
        for record in snapshot.todays_transactions() {
            let direction = classifier.direction_of(record);
            println!(
                "  {}  {:<24} {:>16}",
                record.timestamp.with_timezone(&time_zone).format("%H:%M"),
                record.category,
                format_flow(record.grand_total, direction)
            );
        }
    }

    if !snapshot.expense_breakdown().is_empty() {
        println!();
        println!("Expense Breakdown:");
        for line in snapshot.expense_breakdown() {
            let qty = line.quantity.map(|q| format!("x{q}")).unwrap_or_default();
            println!(
                "  {:<24} {:>5} {:>16}",
                line.description,
                qty,
                format_currency(line.total)
            );
        }
    }

    if snapshot.skipped_records() > 0 {
        println!();
        println!("Skipped {} malformed record(s)", snapshot.skipped_records());
    }
    if !snapshot.total_mismatches().is_empty() {
        println!(
            "Line items differ from grand total for: {}",
            snapshot.total_mismatches().join(", ")
        );
    }
    if !snapshot.partial_itemizations().is_empty() {
        println!(
            "Unreadable line items dropped for: {}",
            snapshot.partial_itemizations().join(", ")
        );
    }

    Ok(())
}

fn cli_scale(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: pettycash scale <width> <height> [--ratio <dpr>]");
    }
    let width: f64 = args[0]
        .parse()
        .with_context(|| format!("Invalid width: '{}'", args[0]))?;
    let height: f64 = args[1]
        .parse()
        .with_context(|| format!("Invalid height: '{}'", args[1]))?;
    let pixel_ratio: f64 = match flag(args, "--ratio") {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid pixel ratio: '{raw}'"))?,
        None => 1.0,
    };

    let factors = ScaleFactors::for_viewport(Viewport::new(width, height, pixel_ratio));
    println!("Viewport {width}x{height} @{pixel_ratio}x");
    println!("  Tablet:          {}", factors.is_tablet);
    println!("  Small phone:     {}", factors.is_small_phone);
    println!("  horizontal(16):  {:.2}", factors.horizontal_scale(16.0));
    println!("  vertical(16):    {:.2}", factors.vertical_scale(16.0));
    println!(
        "  moderate(16):    {:.2}",
        factors.moderate_scale(16.0, DEFAULT_MODERATE_FACTOR)
    );
    println!("  font(14):        {:.2}", factors.font_scale(14.0));
    Ok(())
}

fn cli_config(config: &OutletConfig, config_path: &Path) -> Result<()> {
    let state = if config_path.exists() { "" } else { " (not found, using defaults)" };
    println!("# {}{state}", config_path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
