//! Error types.

/// Errors that can occur during detection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Significance is the fraction of bootstrap trials, which requires at
    /// least one trial.
    #[error("bootstrap iteration count must be at least one")]
    InvalidIterations,
}
