use engine::EngineError;
use thiserror::Error;

use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Everything a store operation can surface to the presentation layer.
///
/// Engine errors are detected locally, before any repository call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
