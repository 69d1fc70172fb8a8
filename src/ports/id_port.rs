//! Synthetic identifier source port.

/// Supplies candidate ids for new products and periods.
///
/// Candidates need not be unique on their own; the integrity manager bumps a
/// candidate past any id already present in the dataset.
pub trait IdPort {
    fn next_id(&self) -> u64;
}
