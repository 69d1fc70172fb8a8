//! Bubble chart point export as CSV.
//!
//! One row per derived metric: x = prm, y = tcm, bubble size = sales share,
//! plus the product name and quadrant so a plotting tool needs no joins.

use serde::Serialize;
use std::io;

use crate::domain::classification::classify_all;
use crate::domain::dataset::Dataset;
use crate::domain::error::BcgError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Serialize)]
struct PointRow<'a> {
    product: &'a str,
    prm: f64,
    tcm: f64,
    sales_percentage: f64,
    category: &'static str,
}

pub struct PointsCsvAdapter;

impl PointsCsvAdapter {
    pub fn write_to<W: io::Write>(&self, dataset: &Dataset, out: W) -> Result<(), BcgError> {
        let mut writer = csv::Writer::from_writer(out);
        for row in classify_all(dataset) {
            writer
                .serialize(PointRow {
                    product: &row.name,
                    prm: row.metric.prm,
                    tcm: row.metric.tcm,
                    sales_percentage: row.metric.sales_percentage,
                    category: row.classification.category.label(),
                })
                .map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ReportPort for PointsCsvAdapter {
    fn write(&self, dataset: &Dataset, output_path: &str) -> Result<(), BcgError> {
        let file = std::fs::File::create(output_path).map_err(|e| BcgError::Storage {
            reason: format!("failed to create {}: {}", output_path, e),
        })?;
        self.write_to(dataset, file)
    }
}

fn csv_error(e: csv::Error) -> BcgError {
    BcgError::Storage {
        reason: format!("CSV write error: {}", e),
    }
}
