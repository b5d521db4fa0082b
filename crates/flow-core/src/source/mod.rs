//! Fuentes de consulta paginadas (pull).
//!
//! Contrato de `QuerySource::pull(checkpoint, page_size)`:
//! - devuelve como máximo `page_size` entidades en orden de la fuente a partir
//!   de `checkpoint`, y el nuevo checkpoint (`checkpoint + devueltas`);
//! - `checkpoint >= len` devuelve paquete vacío y checkpoint sin cambios
//!   (condición terminal, no es error);
//! - es re-ejecutable: misma entrada sobre una fuente sin cambios, misma página.

mod in_memory;
mod package_source;

pub use in_memory::InMemoryQuerySource;
pub use package_source::PackageQuerySource;

use crate::errors::FlowError;
use crate::model::{FlowId, Package};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse<T> {
    pub package: Package<T>,
    pub checkpoint: usize,
}

impl<T> QueryResponse<T> {
    pub fn is_empty(&self) -> bool {
        self.package.is_empty()
    }

    pub fn returned(&self) -> usize {
        self.package.len()
    }
}

pub trait QuerySource<T>: Send + Sync {
    /// Identificador de la fuente (clave de su `QueryResponseState`).
    fn source_id(&self) -> &str;

    /// Flow al que pertenecen los paquetes producidos.
    fn flow_id(&self) -> &FlowId;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pull(&self, checkpoint: usize, page_size: usize) -> Result<QueryResponse<T>, FlowError>;
}

/// Paginación común de las fuentes respaldadas por una lista en memoria.
pub(crate) fn page_of<T: Clone>(flow_id: &FlowId,
                                items: &[T],
                                checkpoint: usize,
                                page_size: usize)
                                -> Result<QueryResponse<T>, FlowError> {
    if page_size == 0 {
        return Err(FlowError::InvalidArgument("page_size must be greater than zero".into()));
    }
    if checkpoint >= items.len() {
        return Ok(QueryResponse { package: Package::empty(flow_id.clone()),
                                  checkpoint });
    }
    let end = checkpoint.saturating_add(page_size).min(items.len());
    Ok(QueryResponse { package: Package::new(flow_id.clone(), items[checkpoint..end].to_vec()),
                       checkpoint: end })
}
