//! Report generation port trait.

use crate::domain::dataset::Dataset;
use crate::domain::error::BcgError;

/// Port for writing a settled dataset to some output.
pub trait ReportPort {
    fn write(&self, dataset: &Dataset, output_path: &str) -> Result<(), BcgError>;
}
