use thiserror::Error;

/// Failures that collapse into an `error` status at the report boundary.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("history store failure: {0}")]
    StoreFailure(String),

    #[error("progress computation failed: {0}")]
    ComputationFailure(String),
}

impl ProgressError {
    pub fn store(err: anyhow::Error) -> Self {
        Self::StoreFailure(format!("{err:#}"))
    }
}
