//! Configuration validation.
//!
//! Validates all config fields before a session is built from them.

use crate::domain::error::BcgError;
use crate::ports::config_port::ConfigPort;

pub const MAX_DECIMALS: i64 = 6;

pub fn validate_matrix_config(config: &dyn ConfigPort) -> Result<(), BcgError> {
    validate_dataset_path(config)?;
    validate_decimals(config)?;
    validate_labels(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> BcgError {
    BcgError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_dataset_path(config: &dyn ConfigPort) -> Result<(), BcgError> {
    match config.get_string("storage", "dataset_path") {
        Some(s) if s.trim().is_empty() => Err(invalid(
            "storage",
            "dataset_path",
            "dataset_path must not be empty",
        )),
        _ => Ok(()),
    }
}

fn validate_decimals(config: &dyn ConfigPort) -> Result<(), BcgError> {
    if let Some(raw) = config.get_string("display", "decimals") {
        if raw.trim().parse::<i64>().is_err() {
            return Err(invalid("display", "decimals", "decimals must be an integer"));
        }
    }
    let value = config.get_int("display", "decimals", 2);
    if !(0..=MAX_DECIMALS).contains(&value) {
        return Err(invalid(
            "display",
            "decimals",
            &format!("decimals must be between 0 and {}", MAX_DECIMALS),
        ));
    }
    Ok(())
}

fn validate_labels(config: &dyn ConfigPort) -> Result<(), BcgError> {
    for key in ["product_prefix", "period_prefix"] {
        if let Some(s) = config.get_string("labels", key) {
            if s.trim().is_empty() {
                return Err(invalid("labels", key, &format!("{} must not be empty", key)));
            }
        }
    }
    Ok(())
}
