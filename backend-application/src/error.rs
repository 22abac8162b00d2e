use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Innermost cause, for the `details` field of error payloads.
    pub fn details(&self) -> Option<String> {
        match self {
            AppError::Internal(err) => {
                let root = err.root_cause().to_string();
                (root != err.to_string()).then_some(root)
            }
            _ => None,
        }
    }
}
