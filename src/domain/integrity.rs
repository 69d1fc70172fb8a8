//! Referential integrity manager.
//!
//! Structural operations and field setters over a [`Dataset`] snapshot. Every
//! function takes the current snapshot by reference and returns a new one, so a
//! failed operation leaves the caller's dataset untouched. Derived metrics are
//! not recomputed here; see [`super::derivation::settle`].

use super::competitor::{default_competitors, max_competitor_sales};
use super::dataset::{
    CompetitorProductEntry, Dataset, DerivedMetric, Period, PeriodId, Product, ProductId,
    ProductValue,
};
use super::error::BcgError;
use super::numeric::ToNumber;
use crate::ports::id_port::IdPort;

/// Prefixes used for default product and period names.
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    pub product_prefix: String,
    pub period_prefix: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            product_prefix: "Product".to_string(),
            period_prefix: "Period".to_string(),
        }
    }
}

/// Candidate id from the port, bumped past any id already in the dataset.
pub fn fresh_id(dataset: &Dataset, ids: &dyn IdPort) -> u64 {
    let mut id = ids.next_id();
    while dataset.id_in_use(id) {
        id += 1;
    }
    id
}

pub fn add_product(dataset: &Dataset, ids: &dyn IdPort, labels: &Labels) -> (Dataset, ProductId) {
    let id = ProductId(fresh_id(dataset, ids));
    let number = dataset.sales_forecast.products.len() + 1;
    let mut next = dataset.clone();

    next.sales_forecast.products.push(Product {
        id,
        name: format!("{} {}", labels.product_prefix, number),
        sales: 0.0,
    });
    next.competitor_sales.products.push(CompetitorProductEntry {
        product_id: id,
        competitors: default_competitors(number),
        max_competitor_sales: 0.0,
    });
    next.bcg_table.products.push(DerivedMetric::zero(id));
    for period in &mut next.market_growth_rates.periods {
        period.product_values.push(ProductValue {
            product_id: id,
            value: 0.0,
        });
    }

    (next, id)
}

/// Remove a product and every row that references it.
pub fn remove_product(dataset: &Dataset, id: ProductId) -> Result<Dataset, BcgError> {
    if !dataset.has_product(id) {
        return Err(BcgError::ProductNotFound { id });
    }
    let mut next = dataset.clone();

    next.sales_forecast.products.retain(|p| p.id != id);
    next.competitor_sales.products.retain(|cp| cp.product_id != id);
    next.bcg_table.products.retain(|m| m.product_id != id);
    for period in &mut next.market_growth_rates.periods {
        period.product_values.retain(|pv| pv.product_id != id);
    }

    Ok(next)
}

pub fn add_period(dataset: &Dataset, ids: &dyn IdPort, labels: &Labels) -> (Dataset, PeriodId) {
    let id = PeriodId(fresh_id(dataset, ids));
    let number = dataset.market_growth_rates.periods.len() + 1;
    let mut next = dataset.clone();

    next.market_growth_rates.periods.push(Period {
        id,
        name: format!("{} {}", labels.period_prefix, number),
        product_values: dataset
            .sales_forecast
            .products
            .iter()
            .map(|p| ProductValue {
                product_id: p.id,
                value: 0.0,
            })
            .collect(),
    });

    (next, id)
}

pub fn remove_period(dataset: &Dataset, id: PeriodId) -> Result<Dataset, BcgError> {
    if dataset.period(id).is_none() {
        return Err(BcgError::PeriodNotFound { id });
    }
    let mut next = dataset.clone();
    next.market_growth_rates.periods.retain(|p| p.id != id);
    Ok(next)
}

pub fn rename_product(dataset: &Dataset, id: ProductId, name: &str) -> Result<Dataset, BcgError> {
    let mut next = dataset.clone();
    let product = product_mut(&mut next, id)?;
    product.name = name.to_string();
    Ok(next)
}

pub fn set_product_sales<N: ToNumber + ?Sized>(
    dataset: &Dataset,
    id: ProductId,
    sales: &N,
) -> Result<Dataset, BcgError> {
    let mut next = dataset.clone();
    let product = product_mut(&mut next, id)?;
    product.sales = sales.to_number();
    Ok(next)
}

/// Set one growth observation. A period lacking a row for the product gets
/// one appended instead of failing.
pub fn set_period_value<N: ToNumber + ?Sized>(
    dataset: &Dataset,
    period_id: PeriodId,
    product_id: ProductId,
    value: &N,
) -> Result<Dataset, BcgError> {
    if !dataset.has_product(product_id) {
        return Err(BcgError::ProductNotFound { id: product_id });
    }
    let value = value.to_number();
    let mut next = dataset.clone();
    let period = next
        .market_growth_rates
        .periods
        .iter_mut()
        .find(|p| p.id == period_id)
        .ok_or(BcgError::PeriodNotFound { id: period_id })?;

    match period
        .product_values
        .iter_mut()
        .find(|pv| pv.product_id == product_id)
    {
        Some(pv) => pv.value = value,
        None => period.product_values.push(ProductValue { product_id, value }),
    }

    Ok(next)
}

/// Set one competitor's sales and refresh the product's competitor maximum.
pub fn set_competitor_sales<N: ToNumber + ?Sized>(
    dataset: &Dataset,
    product_id: ProductId,
    competitor_id: &str,
    sales: &N,
) -> Result<Dataset, BcgError> {
    let mut next = dataset.clone();
    let entry = next
        .competitor_sales
        .products
        .iter_mut()
        .find(|cp| cp.product_id == product_id)
        .ok_or(BcgError::ProductNotFound { id: product_id })?;

    let competitor = entry
        .competitors
        .iter_mut()
        .find(|c| c.id == competitor_id)
        .ok_or_else(|| BcgError::CompetitorNotFound {
            product: product_id,
            competitor: competitor_id.to_string(),
        })?;
    competitor.sales = sales.to_number();
    entry.max_competitor_sales = max_competitor_sales(&entry.competitors);

    Ok(next)
}

fn product_mut(dataset: &mut Dataset, id: ProductId) -> Result<&mut Product, BcgError> {
    dataset
        .sales_forecast
        .products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(BcgError::ProductNotFound { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedIds(Cell<u64>);

    impl IdPort for FixedIds {
        fn next_id(&self) -> u64 {
            let id = self.0.get();
            self.0.set(id + 1);
            id
        }
    }

    fn two_products_one_period() -> (Dataset, ProductId, ProductId, PeriodId) {
        let ids = FixedIds(Cell::new(100));
        let labels = Labels::default();
        let ds = Dataset::new();
        let (ds, a) = add_product(&ds, &ids, &labels);
        let (ds, b) = add_product(&ds, &ids, &labels);
        let (ds, p) = add_period(&ds, &ids, &labels);
        (ds, a, b, p)
    }

    #[test]
    fn add_product_populates_every_collection() {
        let (ds, a, b, p) = two_products_one_period();

        assert_eq!(ds.products().len(), 2);
        assert_eq!(ds.product(a).unwrap().name, "Product 1");
        assert_eq!(ds.product(b).unwrap().name, "Product 2");
        assert_eq!(ds.competitor_entry(b).unwrap().competitors[0].id, "CP2-1");
        assert_eq!(ds.max_competitor_sales(b), 0.0);
        assert_eq!(ds.metric(a), Some(&DerivedMetric::zero(a)));
        assert_eq!(ds.period(p).unwrap().product_values.len(), 2);
        assert!(ds.check_integrity().is_ok());
    }

    #[test]
    fn add_product_extends_existing_periods() {
        let ids = FixedIds(Cell::new(1));
        let labels = Labels::default();
        let (ds, p) = add_period(&Dataset::new(), &ids, &labels);
        assert!(ds.period(p).unwrap().product_values.is_empty());

        let (ds, a) = add_product(&ds, &ids, &labels);
        assert_eq!(ds.period(p).unwrap().value_for(a), Some(0.0));
        assert!(ds.check_integrity().is_ok());
    }

    #[test]
    fn fresh_ids_skip_ids_in_use() {
        let ids = FixedIds(Cell::new(5));
        let labels = Labels::default();
        let (ds, a) = add_product(&Dataset::new(), &ids, &labels);
        assert_eq!(a, ProductId(5));

        let stuck = FixedIds(Cell::new(5));
        assert_eq!(fresh_id(&ds, &stuck), 6);
    }

    #[test]
    fn custom_labels_name_new_rows() {
        let ids = FixedIds(Cell::new(1));
        let labels = Labels {
            product_prefix: "Producto".into(),
            period_prefix: "Año".into(),
        };
        let (ds, a) = add_product(&Dataset::new(), &ids, &labels);
        let (ds, p) = add_period(&ds, &ids, &labels);
        assert_eq!(ds.product(a).unwrap().name, "Producto 1");
        assert_eq!(ds.period(p).unwrap().name, "Año 1");
    }

    #[test]
    fn remove_product_cascades() {
        let (ds, a, b, p) = two_products_one_period();
        let ds = remove_product(&ds, a).unwrap();

        assert!(ds.product(a).is_none());
        assert!(ds.competitor_entry(a).is_none());
        assert!(ds.metric(a).is_none());
        assert!(ds.period(p).unwrap().value_for(a).is_none());
        assert!(ds.product(b).is_some());
        assert!(ds.check_integrity().is_ok());
    }

    #[test]
    fn remove_missing_product_reports_not_found() {
        let (ds, _, _, _) = two_products_one_period();
        let err = remove_product(&ds, ProductId(9)).unwrap_err();
        assert!(matches!(err, BcgError::ProductNotFound { id } if id == ProductId(9)));
    }

    #[test]
    fn remove_period_leaves_products() {
        let (ds, a, _, p) = two_products_one_period();
        let ds = remove_period(&ds, p).unwrap();
        assert!(ds.periods().is_empty());
        assert!(ds.product(a).is_some());
        assert!(matches!(
            remove_period(&ds, p),
            Err(BcgError::PeriodNotFound { .. })
        ));
    }

    #[test]
    fn setters_do_not_touch_input() {
        let (ds, a, _, _) = two_products_one_period();
        let renamed = rename_product(&ds, a, "Widget").unwrap();
        assert_eq!(renamed.product(a).unwrap().name, "Widget");
        assert_eq!(ds.product(a).unwrap().name, "Product 1");
    }

    #[test]
    fn set_product_sales_coerces() {
        let (ds, a, _, _) = two_products_one_period();
        let ds = set_product_sales(&ds, a, "1200").unwrap();
        assert_eq!(ds.product(a).unwrap().sales, 1200.0);
        let ds = set_product_sales(&ds, a, "lots").unwrap();
        assert_eq!(ds.product(a).unwrap().sales, 0.0);
        let ds = set_product_sales(&ds, a, &45.5).unwrap();
        assert_eq!(ds.product(a).unwrap().sales, 45.5);
    }

    #[test]
    fn set_period_value_updates_existing_row() {
        let (ds, a, _, p) = two_products_one_period();
        let ds = set_period_value(&ds, p, a, "12.5").unwrap();
        assert_eq!(ds.period(p).unwrap().value_for(a), Some(12.5));
        assert_eq!(ds.period(p).unwrap().product_values.len(), 2);
    }

    #[test]
    fn set_period_value_inserts_missing_row() {
        let (mut ds, a, _, p) = two_products_one_period();
        ds.market_growth_rates.periods[0]
            .product_values
            .retain(|pv| pv.product_id != a);

        let ds = set_period_value(&ds, p, a, &8.0).unwrap();
        assert_eq!(ds.period(p).unwrap().value_for(a), Some(8.0));
        assert!(ds.check_integrity().is_ok());
    }

    #[test]
    fn set_period_value_unknown_ids() {
        let (ds, a, _, p) = two_products_one_period();
        assert!(matches!(
            set_period_value(&ds, PeriodId(1), a, "1"),
            Err(BcgError::PeriodNotFound { .. })
        ));
        assert!(matches!(
            set_period_value(&ds, p, ProductId(1), "1"),
            Err(BcgError::ProductNotFound { .. })
        ));
    }

    #[test]
    fn set_competitor_sales_refreshes_max() {
        let (ds, a, _, _) = two_products_one_period();
        let ds = set_competitor_sales(&ds, a, "CP1-3", "400").unwrap();
        let ds = set_competitor_sales(&ds, a, "CP1-7", &150.0).unwrap();
        assert_eq!(ds.max_competitor_sales(a), 400.0);

        let ds = set_competitor_sales(&ds, a, "CP1-3", "oops").unwrap();
        assert_eq!(ds.max_competitor_sales(a), 150.0);
        assert!(ds.check_integrity().is_ok());
    }

    #[test]
    fn set_competitor_sales_unknown_competitor() {
        let (ds, a, _, _) = two_products_one_period();
        let err = set_competitor_sales(&ds, a, "CP2-1", "10").unwrap_err();
        assert!(matches!(err, BcgError::CompetitorNotFound { .. }));
    }
}
