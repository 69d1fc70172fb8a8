//! Domain error types.

use super::dataset::{PeriodId, ProductId};

/// Top-level error type for bcgmatrix.
#[derive(Debug, thiserror::Error)]
pub enum BcgError {
    #[error("product {id} not found")]
    ProductNotFound { id: ProductId },

    #[error("period {id} not found")]
    PeriodNotFound { id: PeriodId },

    #[error("competitor {competitor} not found for product {product}")]
    CompetitorNotFound {
        product: ProductId,
        competitor: String,
    },

    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("integrity violation: {reason}")]
    Integrity { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BcgError> for std::process::ExitCode {
    fn from(err: &BcgError) -> Self {
        let code: u8 = match err {
            BcgError::Io(_) | BcgError::Storage { .. } => 1,
            BcgError::ConfigParse { .. } | BcgError::ConfigInvalid { .. } => 2,
            BcgError::ProductNotFound { .. }
            | BcgError::PeriodNotFound { .. }
            | BcgError::CompetitorNotFound { .. } => 3,
            BcgError::MalformedPayload { .. } => 4,
            BcgError::Integrity { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
