/// Errors raised while building instance batches.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Either the reservation failed or the request exceeds the configured
    /// per-batch limit.
    #[error("batch allocation of {requested} instances failed: {reason}")]
    BatchAllocation { requested: usize, reason: String },
}
