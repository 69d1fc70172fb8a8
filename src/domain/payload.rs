//! Load and save contract for the dataset exchange format.

use serde_json::Value;

use super::competitor::{default_competitors, max_competitor_sales};
use super::dataset::{CompetitorProductEntry, Dataset, DerivedMetric, ProductValue};
use super::error::BcgError;

/// Top-level sections every accepted payload must carry.
pub const REQUIRED_SECTIONS: [&str; 4] = [
    "salesForecast",
    "marketGrowthRates",
    "competitorSales",
    "bcgTable",
];

fn malformed(reason: impl Into<String>) -> BcgError {
    BcgError::MalformedPayload {
        reason: reason.into(),
    }
}

/// Decode a raw payload, which may be a JSON-encoded string or an already
/// parsed value. Nothing is returned unless the whole payload decodes.
pub fn parse_payload(raw: &Value) -> Result<Dataset, BcgError> {
    let parsed;
    let value = match raw {
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text)
                .map_err(|e| malformed(format!("invalid JSON: {}", e)))?;
            &parsed
        }
        other => other,
    };

    let object = value
        .as_object()
        .ok_or_else(|| malformed("payload is not an object"))?;
    for section in REQUIRED_SECTIONS {
        match object.get(section) {
            Some(v) if !v.is_null() => {}
            _ => return Err(malformed(format!("missing section {}", section))),
        }
    }

    serde_json::from_value(value.clone()).map_err(|e| malformed(e.to_string()))
}

/// Fill in what the rest of a payload determines: a zero growth row for each
/// live product a period lacks, a default competitor block for a product that
/// has none, every stored competitor maximum, and one bcg row per product in
/// sales-forecast order. Stored metric values are kept so the gate can still
/// tell whether they are stale. Orphans and duplicates are left for
/// [`Dataset::check_integrity`] to report.
pub fn repair(mut dataset: Dataset) -> Dataset {
    let ids = dataset.product_ids();

    for period in &mut dataset.market_growth_rates.periods {
        for &id in &ids {
            if period.value_for(id).is_none() {
                period.product_values.push(ProductValue {
                    product_id: id,
                    value: 0.0,
                });
            }
        }
    }

    for (index, &id) in ids.iter().enumerate() {
        if dataset.competitor_entry(id).is_none() {
            dataset.competitor_sales.products.push(CompetitorProductEntry {
                product_id: id,
                competitors: default_competitors(index + 1),
                max_competitor_sales: 0.0,
            });
        }
    }
    for entry in &mut dataset.competitor_sales.products {
        entry.max_competitor_sales = max_competitor_sales(&entry.competitors);
    }

    let stored = std::mem::take(&mut dataset.bcg_table.products);
    dataset.bcg_table.products = ids
        .iter()
        .map(|&id| {
            stored
                .iter()
                .find(|m| m.product_id == id)
                .cloned()
                .unwrap_or_else(|| DerivedMetric::zero(id))
        })
        .collect();

    dataset
}

/// Parse a payload, repair its derivable parts, and require the structural
/// invariants to hold on the result.
pub fn parse_consistent(raw: &Value) -> Result<Dataset, BcgError> {
    let dataset = repair(parse_payload(raw)?);
    dataset
        .check_integrity()
        .map_err(|e| malformed(e.to_string()))?;
    Ok(dataset)
}

pub fn to_payload(dataset: &Dataset) -> Result<Value, BcgError> {
    serde_json::to_value(dataset).map_err(|e| BcgError::Storage {
        reason: format!("failed to encode dataset: {}", e),
    })
}
