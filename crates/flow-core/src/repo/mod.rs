//! Repositorios del flow: contratos y backend en memoria.
//!
//! Las implementaciones durables (archivos) viven en `flow-persistence` y
//! deben mantener paridad con el backend en memoria.

mod memory;
mod traits;

pub use memory::{InMemoryEnricherLogRepository, InMemoryPackageRepository, InMemoryProcessStateRepository,
                 InMemoryQueryResponseStateRepository};
pub use traits::{EnricherLogRepository, EntityIter, PackageIter, PackageRepository, ProcessStateRepository,
                 QueryResponseStateRepository};
