//! BCG quadrant classification.

use std::fmt;

use super::dataset::{Dataset, DerivedMetric};

/// Growth rate at or above which a market counts as high growth.
pub const TCM_THRESHOLD: f64 = 10.0;
/// Relative position at or above which a product leads its market.
pub const PRM_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Star,
    QuestionMark,
    CashCow,
    Dog,
}

impl Quadrant {
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::Star => "Star",
            Quadrant::QuestionMark => "Question Mark",
            Quadrant::CashCow => "Cash Cow",
            Quadrant::Dog => "Dog",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Quadrant::Star => "⭐",
            Quadrant::QuestionMark => "❓",
            Quadrant::CashCow => "🐄",
            Quadrant::Dog => "🐕",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Quadrant,
    pub icon: &'static str,
}

/// Thresholds are inclusive on the high side. NaN compares low on both axes.
pub fn classify(tcm: f64, prm: f64) -> Classification {
    let high_growth = tcm >= TCM_THRESHOLD;
    let leader = prm >= PRM_THRESHOLD;
    let category = match (high_growth, leader) {
        (true, true) => Quadrant::Star,
        (true, false) => Quadrant::QuestionMark,
        (false, true) => Quadrant::CashCow,
        (false, false) => Quadrant::Dog,
    };
    Classification {
        category,
        icon: category.icon(),
    }
}

/// A derived row joined with its product name and quadrant, for readers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedProduct {
    pub name: String,
    pub metric: DerivedMetric,
    pub classification: Classification,
}

pub fn classify_all(dataset: &Dataset) -> Vec<ClassifiedProduct> {
    dataset
        .bcg_table
        .products
        .iter()
        .map(|m| ClassifiedProduct {
            name: dataset.product_name(m.product_id),
            metric: m.clone(),
            classification: classify(m.tcm, m.prm),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::{Product, ProductId};

    #[test]
    fn boundaries_are_inclusive_on_high_side() {
        assert_eq!(classify(10.0, 1.0).category, Quadrant::Star);
        assert_eq!(classify(9.999, 1.0).category, Quadrant::CashCow);
        assert_eq!(classify(10.0, 0.999).category, Quadrant::QuestionMark);
        assert_eq!(classify(9.0, 0.5).category, Quadrant::Dog);
    }

    #[test]
    fn extremes() {
        assert_eq!(classify(250.0, 2.0).category, Quadrant::Star);
        assert_eq!(classify(-15.0, 0.0).category, Quadrant::Dog);
        assert_eq!(classify(0.0, 2.0).category, Quadrant::CashCow);
    }

    #[test]
    fn icon_matches_category() {
        let c = classify(12.0, 0.2);
        assert_eq!(c.category, Quadrant::QuestionMark);
        assert_eq!(c.icon, "❓");
        assert_eq!(classify(12.0, 1.2).icon, "⭐");
        assert_eq!(classify(1.0, 1.2).icon, "🐄");
        assert_eq!(classify(1.0, 0.2).icon, "🐕");
    }

    #[test]
    fn nan_lands_in_dog() {
        assert_eq!(classify(f64::NAN, f64::NAN).category, Quadrant::Dog);
    }

    #[test]
    fn labels_display() {
        assert_eq!(Quadrant::QuestionMark.to_string(), "Question Mark");
        assert_eq!(Quadrant::CashCow.to_string(), "Cash Cow");
    }

    #[test]
    fn classify_all_joins_names() {
        let mut ds = Dataset::new();
        ds.sales_forecast.products.push(Product {
            id: ProductId(1),
            name: "Widget".into(),
            sales: 10.0,
        });
        ds.bcg_table.products.push(DerivedMetric {
            product_id: ProductId(1),
            tcm: 14.0,
            prm: 1.5,
            sales_percentage: 100.0,
        });

        let rows = classify_all(&ds);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Widget");
        assert_eq!(rows[0].classification.category, Quadrant::Star);
    }
}
