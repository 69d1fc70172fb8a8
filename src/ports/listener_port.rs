//! Downstream notification port for published metrics.

use crate::domain::dataset::Dataset;

/// Receives the settled dataset whenever the change-detection gate publishes
/// a new derived metric table.
pub trait MetricsListener {
    fn metrics_published(&self, dataset: &Dataset);
}
