use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::models::{StoredLineItem, StoredTransaction};

/// Column positions of a store export, located by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CsvLayout {
    pub(crate) id: usize,
    pub(crate) timestamp: usize,
    pub(crate) category: usize,
    pub(crate) grand_total: usize,
    pub(crate) item_description: Option<usize>,
    pub(crate) item_quantity: Option<usize>,
    pub(crate) item_total: Option<usize>,
}

impl CsvLayout {
    pub(crate) fn from_headers(headers: &[String]) -> Result<Self> {
        let h: Vec<String> = headers
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();
        let required = |name: &str| {
            col_index(&h, name)
                .ok_or_else(|| anyhow::anyhow!("Missing required column '{name}'"))
        };

        Ok(Self {
            id: required("id")?,
            timestamp: required("timestamp")?,
            category: required("category")?,
            grand_total: required("grand_total")?,
            item_description: col_index(&h, "item_description"),
            item_quantity: col_index(&h, "item_quantity"),
            item_total: col_index(&h, "item_total"),
        })
    }
}

fn col_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Read a store export from disk. One row per line item; rows sharing an id
/// are one transaction, kept in the order each id first appears. A row with
/// a blank id stands alone.
pub fn read_records(path: &Path) -> Result<Vec<StoredTransaction>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open records file: {}", path.display()))?;
    read_records_from(file).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<StoredTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut rows = rdr.records();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header
            .context("Failed to read CSV header")?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => anyhow::bail!("CSV file is empty"),
    };
    let layout = CsvLayout::from_headers(&headers)?;

    let mut records: Vec<StoredTransaction> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for (i, result) in rows.enumerate() {
        // header is line 1
        let row = result.with_context(|| format!("Failed to read CSV row {}", i + 2))?;
        let field = |col: usize| row.get(col).map(|s| s.trim()).unwrap_or("").to_string();
        let optional = |col: Option<usize>| col.map(&field).unwrap_or_default();

        let id = field(layout.id);
        if id.is_empty() && row.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        // a blank id never groups; the engine rejects each such row on its own
        let existing = if id.is_empty() { None } else { by_id.get(&id).copied() };
        let idx = match existing {
            Some(idx) => idx,
            None => {
                records.push(StoredTransaction {
                    id: id.clone(),
                    timestamp: field(layout.timestamp),
                    category: field(layout.category),
                    grand_total: field(layout.grand_total),
                    line_items: Vec::new(),
                });
                if !id.is_empty() {
                    by_id.insert(id, records.len() - 1);
                }
                records.len() - 1
            }
        };

        let item = StoredLineItem {
            description: optional(layout.item_description),
            quantity: optional(layout.item_quantity),
            line_total: optional(layout.item_total),
        };
        if !(item.description.is_empty() && item.quantity.is_empty() && item.line_total.is_empty())
        {
            records[idx].line_items.push(item);
        }
    }

    tracing::debug!(records = records.len(), "read store export");
    Ok(records)
}

#[cfg(test)]
#[path = "csv_export_tests.rs"]
mod tests;
