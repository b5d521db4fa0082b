//! Errores de persistencia.
//! Mapea errores de E/S y de serde a variantes con la ruta afectada, y de ahí
//! a `FlowError` para el core.

use std::io;
use std::path::PathBuf;

use flow_core::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error at {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed document {}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(),
                   source }
    }
}

impl From<PersistenceError> for FlowError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Io { path, source } => FlowError::Storage { path,
                                                                          message: source.to_string() },
            PersistenceError::Malformed { path, message } => FlowError::Malformed { path, message },
            PersistenceError::Serialization(m) => FlowError::Serialization(m),
            PersistenceError::LockPoisoned(m) => FlowError::LockPoisoned(m),
            PersistenceError::Config(m) => FlowError::InvalidArgument(m),
        }
    }
}
