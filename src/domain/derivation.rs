//! Derived market metrics: growth rate average (TCM), relative market
//! position (PRM) and share of total sales.

use super::dataset::{Dataset, DerivedMetric, Product};
use super::gate::{gate, Publication};
use super::numeric::finite_or_zero;

/// Relative market position saturates at this ratio.
pub const PRM_CAP: f64 = 2.0;

/// Compute one metric row per product, in sales-forecast order.
///
/// Reads the sales forecast, growth rates and competitor sales; the stored
/// `bcgTable` is ignored. Calling it twice on the same dataset yields
/// bit-identical rows.
pub fn derive_metrics(dataset: &Dataset) -> Vec<DerivedMetric> {
    let shares = SalesScale::of(dataset.products());
    dataset
        .products()
        .iter()
        .map(|product| derive_one(dataset, product, &shares))
        .collect()
}

fn derive_one(dataset: &Dataset, product: &Product, shares: &SalesScale) -> DerivedMetric {
    DerivedMetric {
        product_id: product.id,
        tcm: mean(&dataset.growth_values(product.id)),
        prm: relative_market_position(product.sales, dataset.max_competitor_sales(product.id)),
        sales_percentage: shares.percentage(product.sales),
    }
}

/// Sales divisor for share computation. When the plain total overflows,
/// every figure is first divided by the largest magnitude.
struct SalesScale {
    divisor: f64,
    total: f64,
}

impl SalesScale {
    fn of(products: &[Product]) -> Self {
        let total: f64 = products.iter().map(|p| p.sales).sum();
        if total.is_finite() {
            return SalesScale { divisor: 1.0, total };
        }
        let divisor = products.iter().map(|p| p.sales.abs()).fold(0.0, f64::max);
        SalesScale {
            divisor,
            total: products.iter().map(|p| p.sales / divisor).sum(),
        }
    }

    fn percentage(&self, sales: f64) -> f64 {
        sales_percentage(sales / self.divisor, self.total)
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        return sum / n;
    }
    finite_or_zero(values.iter().map(|v| v / n).sum())
}

pub fn relative_market_position(sales: f64, max_competitor_sales: f64) -> f64 {
    if max_competitor_sales > 0.0 {
        finite_or_zero((sales / max_competitor_sales).min(PRM_CAP))
    } else {
        0.0
    }
}

pub fn sales_percentage(sales: f64, total_sales: f64) -> f64 {
    if total_sales == 0.0 {
        0.0
    } else {
        finite_or_zero(sales / total_sales * 100.0)
    }
}

/// Recompute derived metrics and replace the stored table only when the gate
/// publishes. Returns the settled dataset and the gate decision.
pub fn settle(dataset: &Dataset) -> (Dataset, Publication) {
    let fresh = derive_metrics(dataset);
    match gate(&dataset.bcg_table.products, &fresh) {
        Publication::Publish => {
            let mut next = dataset.clone();
            next.bcg_table.products = fresh;
            (next, Publication::Publish)
        }
        Publication::NoOp => (dataset.clone(), Publication::NoOp),
    }
}
