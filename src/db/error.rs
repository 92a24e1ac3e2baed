use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read application registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed application registry: {0}")]
    Json(#[from] serde_json::Error),
    #[error("application registry lock poisoned")]
    Poisoned,
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
