//! Dataset persistence port.

use crate::domain::error::BcgError;
use serde_json::Value;

/// Fetches and stores the raw exchange payload of one matrix.
///
/// Implementations move bytes only; validation of the payload belongs to
/// [`crate::domain::payload`].
pub trait DatasetPort {
    /// `Ok(None)` when nothing has been saved yet.
    fn fetch(&self) -> Result<Option<Value>, BcgError>;

    fn save(&self, payload: &Value) -> Result<(), BcgError>;
}
