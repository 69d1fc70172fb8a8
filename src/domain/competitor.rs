//! Competitor sales aggregation.

use super::dataset::CompetitorEntry;

/// Fixed number of competitors tracked for every product.
pub const COMPETITORS_PER_PRODUCT: usize = 9;

/// Highest sales figure among a product's competitors; 0 for an empty set.
pub fn max_competitor_sales(competitors: &[CompetitorEntry]) -> f64 {
    competitors
        .iter()
        .map(|c| c.sales)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// The nine zero-sales competitors created alongside a new product.
///
/// `product_number` is the 1-based position of the product at creation time;
/// competitor labels follow `CP{product_number}-{1..=9}`.
pub fn default_competitors(product_number: usize) -> Vec<CompetitorEntry> {
    (1..=COMPETITORS_PER_PRODUCT)
        .map(|i| {
            let label = format!("CP{}-{}", product_number, i);
            CompetitorEntry {
                id: label.clone(),
                name: label,
                sales: 0.0,
            }
        })
        .collect()
}
