use std::fmt;

use crate::enrichment::EnrichmentLog;
use crate::errors::FlowError;
use crate::model::{FlowEntitySpec, FlowId, FlowProcessState, Package, QueryResponseState};

/// Secuencia perezosa de paquetes. Es finita; para recorrerla de nuevo basta
/// con volver a llamar a `get`.
pub type PackageIter<T> = Box<dyn Iterator<Item = Result<Package<T>, FlowError>>>;

/// Secuencia perezosa de entidades (paquetes aplanados).
pub type EntityIter<T> = Box<dyn Iterator<Item = Result<T, FlowError>>>;

/// Almacén de paquetes de un tipo de entidad.
pub trait PackageRepository<T: FlowEntitySpec>: Send + Sync {
    /// Persiste el paquete completo. Sobrescribe el existente para el mismo
    /// `FlowId`.
    fn save(&self, package: &Package<T>) -> Result<(), FlowError>;

    /// Enumera todos los paquetes del tipo `T`.
    fn get(&self) -> Result<PackageIter<T>, FlowError>;

    /// Enumera las entidades de todos los paquetes, en orden de paquete.
    fn get_entities(&self) -> Result<EntityIter<T>, FlowError> {
        let packages = self.get()?;
        Ok(Box::new(packages.flat_map(|p| -> EntityIter<T> {
                                match p {
                                    Ok(pkg) => Box::new(pkg.data.into_iter().map(Ok)),
                                    Err(e) => Box::new(std::iter::once(Err(e))),
                                }
                            })))
    }
}

/// Checkpoint por (procesador, tipo de entidad).
pub trait ProcessStateRepository: Send + Sync {
    /// Estado guardado o uno nuevo (checkpoint 0) si no existe.
    fn get(&self, processor_name: &str, entity: &str) -> Result<FlowProcessState, FlowError>;

    /// Sobrescribe el estado completo.
    fn save(&self, entity: &str, state: &FlowProcessState) -> Result<(), FlowError>;
}

/// Cursor por (procesador, tipo de entidad, fuente).
pub trait QueryResponseStateRepository: Send + Sync {
    /// Estado guardado o uno nuevo con `page_size` si no existe.
    fn get(&self,
           processor_name: &str,
           entity: &str,
           source_id: &str,
           page_size: usize)
           -> Result<QueryResponseState, FlowError>;

    fn save(&self, processor_name: &str, entity: &str, state: &QueryResponseState) -> Result<(), FlowError>;
}

/// Log de enriquecimientos por (flow, tipo de entidad fuente).
pub trait EnricherLogRepository: Send + Sync + fmt::Debug {
    fn get(&self, flow: &FlowId, source_entity_type: &str) -> Result<Option<EnrichmentLog>, FlowError>;

    fn save(&self, log: &EnrichmentLog) -> Result<(), FlowError>;
}
