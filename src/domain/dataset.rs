//! Portfolio dataset: the four interrelated collections keyed by product id.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::competitor::{max_competitor_sales, COMPETITORS_PER_PRODUCT};
use super::error::BcgError;
use super::numeric::deserialize_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodId(pub u64);

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub sales: f64,
}

/// One market growth observation (percent) for a product within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductValue {
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: PeriodId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product_values: Vec<ProductValue>,
}

impl Period {
    pub fn value_for(&self, product_id: ProductId) -> Option<f64> {
        self.product_values
            .iter()
            .find(|pv| pv.product_id == product_id)
            .map(|pv| pv.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorProductEntry {
    pub product_id: ProductId,
    #[serde(default)]
    pub competitors: Vec<CompetitorEntry>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub max_competitor_sales: f64,
}

/// Derived market metrics for one product. Regenerated wholesale by the
/// derivation engine, never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetric {
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub tcm: f64,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub prm: f64,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub sales_percentage: f64,
}

impl DerivedMetric {
    pub fn zero(product_id: ProductId) -> Self {
        DerivedMetric {
            product_id,
            tcm: 0.0,
            prm: 0.0,
            sales_percentage: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesForecast {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketGrowthRates {
    #[serde(default)]
    pub periods: Vec<Period>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSales {
    #[serde(default)]
    pub products: Vec<CompetitorProductEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BcgTable {
    #[serde(default)]
    pub products: Vec<DerivedMetric>,
}

/// The full portfolio matrix. All four sections are required on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub sales_forecast: SalesForecast,
    pub market_growth_rates: MarketGrowthRates,
    pub competitor_sales: CompetitorSales,
    pub bcg_table: BcgTable,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.sales_forecast.products
    }

    pub fn periods(&self) -> &[Period] {
        &self.market_growth_rates.periods
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.sales_forecast.products.iter().find(|p| p.id == id)
    }

    pub fn period(&self, id: PeriodId) -> Option<&Period> {
        self.market_growth_rates.periods.iter().find(|p| p.id == id)
    }

    pub fn has_product(&self, id: ProductId) -> bool {
        self.product(id).is_some()
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        self.sales_forecast.products.iter().map(|p| p.id).collect()
    }

    pub fn competitor_entry(&self, id: ProductId) -> Option<&CompetitorProductEntry> {
        self.competitor_sales
            .products
            .iter()
            .find(|cp| cp.product_id == id)
    }

    pub fn metric(&self, id: ProductId) -> Option<&DerivedMetric> {
        self.bcg_table.products.iter().find(|m| m.product_id == id)
    }

    pub fn total_sales(&self) -> f64 {
        self.sales_forecast.products.iter().map(|p| p.sales).sum()
    }

    /// Growth observations for a product across all periods, in period order.
    /// Periods without a row for the product contribute nothing.
    pub fn growth_values(&self, id: ProductId) -> Vec<f64> {
        self.market_growth_rates
            .periods
            .iter()
            .flat_map(|period| {
                period
                    .product_values
                    .iter()
                    .filter(move |pv| pv.product_id == id)
                    .map(|pv| pv.value)
            })
            .collect()
    }

    /// Stored maximum competitor sales for a product, 0 when the product has
    /// no competitor entry.
    pub fn max_competitor_sales(&self, id: ProductId) -> f64 {
        self.competitor_entry(id)
            .map(|cp| cp.max_competitor_sales)
            .unwrap_or(0.0)
    }

    pub fn product_name(&self, id: ProductId) -> String {
        self.product(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Product {}", id))
    }

    /// Whether a product or period already uses this id.
    pub fn id_in_use(&self, id: u64) -> bool {
        self.sales_forecast.products.iter().any(|p| p.id.0 == id)
            || self.market_growth_rates.periods.iter().any(|p| p.id.0 == id)
    }

    /// Verify the structural invariants: identical product id sets across all
    /// collections, nine competitors per product, and a consistent stored
    /// competitor maximum.
    pub fn check_integrity(&self) -> Result<(), BcgError> {
        let expected: BTreeSet<ProductId> = self.product_ids().into_iter().collect();
        if expected.len() != self.sales_forecast.products.len() {
            return Err(integrity("duplicate product id in sales forecast"));
        }

        let competitor_ids: Vec<ProductId> = self
            .competitor_sales
            .products
            .iter()
            .map(|cp| cp.product_id)
            .collect();
        check_same_ids(&expected, &competitor_ids, "competitor sales")?;

        let metric_ids: Vec<ProductId> = self
            .bcg_table
            .products
            .iter()
            .map(|m| m.product_id)
            .collect();
        check_same_ids(&expected, &metric_ids, "bcg table")?;

        for period in &self.market_growth_rates.periods {
            let ids: Vec<ProductId> = period.product_values.iter().map(|pv| pv.product_id).collect();
            check_same_ids(&expected, &ids, &format!("period {}", period.id))?;
        }

        for entry in &self.competitor_sales.products {
            if entry.competitors.len() != COMPETITORS_PER_PRODUCT {
                return Err(integrity(&format!(
                    "product {} has {} competitors, expected {}",
                    entry.product_id,
                    entry.competitors.len(),
                    COMPETITORS_PER_PRODUCT
                )));
            }
            let max = max_competitor_sales(&entry.competitors);
            if max.to_bits() != entry.max_competitor_sales.to_bits() {
                return Err(integrity(&format!(
                    "product {} stores max competitor sales {} but competitors peak at {}",
                    entry.product_id, entry.max_competitor_sales, max
                )));
            }
        }

        Ok(())
    }
}

fn integrity(reason: &str) -> BcgError {
    BcgError::Integrity {
        reason: reason.to_string(),
    }
}

fn check_same_ids(
    expected: &BTreeSet<ProductId>,
    actual: &[ProductId],
    collection: &str,
) -> Result<(), BcgError> {
    let found: BTreeSet<ProductId> = actual.iter().copied().collect();
    if found.len() != actual.len() {
        return Err(integrity(&format!("duplicate product id in {}", collection)));
    }
    if let Some(orphan) = found.difference(expected).next() {
        return Err(integrity(&format!(
            "{} references unknown product {}",
            collection, orphan
        )));
    }
    if let Some(missing) = expected.difference(&found).next() {
        return Err(integrity(&format!(
            "{} is missing product {}",
            collection, missing
        )));
    }
    Ok(())
}
