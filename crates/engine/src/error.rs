use editoria_core::error::CoreError;
use editoria_core::ports::{CollaboratorError, StoreError};

/// Errors surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),

    #[error("External service error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

pub type EngineResult<T> = Result<T, EngineError>;
