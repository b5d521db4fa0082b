//! Errores específicos del core de flow.
//!
//! Taxonomía:
//! - fallos por entidad (transform/validación) NO aparecen aquí: viajan como
//!   `EntityFailure` y se registran sin abortar el batch.
//! - lectura de fuentes y documentos corruptos: `Source` / `Malformed`.
//! - escritura de repositorios: `Storage` (fatal para la ejecución actual).
//! - transiciones inválidas: `InvalidState`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum FlowError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("source read failed: {0}")]
    Source(String),
    #[error("storage failure at {}: {message}", .path.display())]
    Storage { path: PathBuf, message: String },
    #[error("malformed document {}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl FlowError {
    /// Ruta del archivo implicado, si el error la conoce.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            FlowError::Storage { path, .. } | FlowError::Malformed { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(e: serde_json::Error) -> Self {
        FlowError::Serialization(e.to_string())
    }
}
