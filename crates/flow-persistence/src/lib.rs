//! flow-persistence
//!
//! Backend de archivos JSON para los repositorios del core. Paridad 1:1 con
//! los repositorios en memoria de `flow-core`.
//!
//! Módulos:
//! - `config`: raíz de trabajo y tamaño de página desde `.env` / entorno.
//! - `packages`: paquetes de entidades (`packages/`).
//! - `state`: checkpoints de procesador y de fuente (`state/`).
//! - `enrichment`: logs de enriquecimiento con copia `.bak` (`enrichment/`).
//!
//! Cada repositorio serializa su propio acceso con un `Mutex`; no hay
//! bloqueo entre procesos.

pub mod config;
pub mod enrichment;
pub mod error;
mod fs;
pub mod packages;
pub mod state;

pub use config::{init_dotenv, FlowStoreConfig};
pub use enrichment::FileEnricherLogRepository;
pub use error::PersistenceError;
pub use packages::{package_files, FilePackageRepository};
pub use state::{FileProcessStateRepository, FileQueryResponseStateRepository};

use std::sync::Arc;

use flow_core::{FlowEntitySpec, ProcessEntityError, ProcessError, ProcessorStores};

/// Stores de un procesador sobre archivos bajo `config.base_path`.
pub fn file_stores<TOut: FlowEntitySpec>(config: &FlowStoreConfig) -> ProcessorStores<TOut> {
    ProcessorStores { output: Arc::new(FilePackageRepository::<TOut>::new(config)),
                      errors: Arc::new(FilePackageRepository::<ProcessEntityError>::new(config)),
                      batch_errors: Arc::new(FilePackageRepository::<ProcessError>::new(config)),
                      process_states: Arc::new(FileProcessStateRepository::new(config)),
                      query_states: Arc::new(FileQueryResponseStateRepository::new(config)) }
}
