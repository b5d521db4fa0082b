use std::io;
use std::path::PathBuf;

use flow_core::FlowError;
use flow_domain::DomainError;
use flow_persistence::PersistenceError;
use thiserror::Error;

/// Errores del binario y de las funciones de composición.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de flujo: {0}")]
    Flow(#[from] FlowError),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Error de dominio: {0}")]
    Domain(#[from] DomainError),
    #[error("Error en IO ({}): {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_variant_format() {
        let err: AppError = FlowError::InvalidState("processor 'x' is already running".into()).into();
        assert!(err.to_string().starts_with("Error de flujo: "));
    }

    #[test]
    fn io_variant_names_the_path() {
        let err = AppError::Io { path: "/in/customers.txt".into(),
                                 source: io::Error::other("falló IO") };
        assert_eq!(err.to_string(), "Error en IO (/in/customers.txt): falló IO");
    }
}
