//! Change-detection gate between the derivation engine and downstream
//! notification.
//!
//! A recompute that produces the stored table again must not notify, or a
//! host that recomputes on every notification would never settle.

use super::dataset::DerivedMetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publication {
    Publish,
    NoOp,
}

impl Publication {
    pub fn is_publish(self) -> bool {
        self == Publication::Publish
    }
}

/// Compare the stored table with a fresh one, row by row in order.
pub fn gate(current: &[DerivedMetric], fresh: &[DerivedMetric]) -> Publication {
    let unchanged = current.len() == fresh.len()
        && current.iter().zip(fresh).all(|(a, b)| same_metric(a, b));
    if unchanged {
        Publication::NoOp
    } else {
        Publication::Publish
    }
}

// Floats compare by bit pattern so equality stays reflexive even for NaN.
fn same_metric(a: &DerivedMetric, b: &DerivedMetric) -> bool {
    a.product_id == b.product_id
        && a.tcm.to_bits() == b.tcm.to_bits()
        && a.prm.to_bits() == b.prm.to_bits()
        && a.sales_percentage.to_bits() == b.sales_percentage.to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::ProductId;

    fn row(id: u64, tcm: f64, prm: f64, pct: f64) -> DerivedMetric {
        DerivedMetric {
            product_id: ProductId(id),
            tcm,
            prm,
            sales_percentage: pct,
        }
    }

    #[test]
    fn identical_tables_are_noop() {
        let a = vec![row(1, 10.0, 1.0, 40.0), row(2, 3.0, 0.5, 60.0)];
        assert_eq!(gate(&a, &a.clone()), Publication::NoOp);
        assert_eq!(gate(&[], &[]), Publication::NoOp);
    }

    #[test]
    fn value_change_publishes() {
        let a = vec![row(1, 10.0, 1.0, 40.0)];
        let b = vec![row(1, 10.0, 1.0, 40.000001)];
        assert_eq!(gate(&a, &b), Publication::Publish);
    }

    #[test]
    fn reordering_publishes() {
        let a = vec![row(1, 1.0, 1.0, 50.0), row(2, 1.0, 1.0, 50.0)];
        let b = vec![row(2, 1.0, 1.0, 50.0), row(1, 1.0, 1.0, 50.0)];
        assert_eq!(gate(&a, &b), Publication::Publish);
    }

    #[test]
    fn length_change_publishes() {
        let a = vec![row(1, 1.0, 1.0, 100.0)];
        assert!(gate(&a, &[]).is_publish());
        assert!(gate(&[], &a).is_publish());
    }

    #[test]
    fn nan_rows_still_settle() {
        let a = vec![row(1, f64::NAN, 0.0, 0.0)];
        assert_eq!(gate(&a, &a.clone()), Publication::NoOp);
    }
}
