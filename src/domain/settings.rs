//! Settings for a matrix session and its host.

use std::path::PathBuf;

use super::config_validation::validate_matrix_config;
use super::error::BcgError;
use super::integrity::Labels;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DATASET_PATH: &str = "bcg_matrix.json";

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSettings {
    pub dataset_path: PathBuf,
    pub decimals: usize,
    pub show_icons: bool,
    pub labels: Labels,
}

impl Default for MatrixSettings {
    fn default() -> Self {
        MatrixSettings {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            decimals: 2,
            show_icons: true,
            labels: Labels::default(),
        }
    }
}

impl MatrixSettings {
    /// Validate and read settings, falling back to defaults for absent keys.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BcgError> {
        validate_matrix_config(config)?;
        let defaults = MatrixSettings::default();
        let labels = Labels {
            product_prefix: config
                .get_string("labels", "product_prefix")
                .unwrap_or(defaults.labels.product_prefix),
            period_prefix: config
                .get_string("labels", "period_prefix")
                .unwrap_or(defaults.labels.period_prefix),
        };
        Ok(MatrixSettings {
            dataset_path: config
                .get_string("storage", "dataset_path")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),
            decimals: config.get_int("display", "decimals", defaults.decimals as i64) as usize,
            show_icons: config.get_bool("display", "show_icons", defaults.show_icons),
            labels,
        })
    }
}
