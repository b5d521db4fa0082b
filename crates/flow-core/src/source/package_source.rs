use crate::errors::FlowError;
use crate::model::{FlowBatch, FlowEntitySpec, FlowId};
use crate::repo::PackageRepository;

use super::{page_of, QueryResponse, QuerySource};

/// Fuente que lee paquetes ya persistidos.
///
/// En la construcción aplana todas las entidades del repositorio en una lista
/// en memoria y luego pagina sobre ella. Los paquetes se ordenan por el número
/// de batch de su nombre (`flow/procesador#n`), así un paquete nuevo siempre
/// queda al final y los checkpoints por índice siguen siendo válidos. Los
/// paquetes sin número van detrás, en el orden del repositorio. Un paquete
/// corrupto hace fallar la construcción con el error del repositorio (que
/// identifica el archivo).
#[derive(Debug, Clone)]
pub struct PackageQuerySource<T> {
    source_id: String,
    flow_id: FlowId,
    items: Vec<T>,
}

impl<T: FlowEntitySpec> PackageQuerySource<T> {
    pub fn from_repository(source_id: impl Into<String>,
                           flow_id: FlowId,
                           repository: &dyn PackageRepository<T>)
                           -> Result<Self, FlowError> {
        let mut packages = repository.get()?.collect::<Result<Vec<_>, FlowError>>()?;
        packages.sort_by_key(|p| FlowBatch::number_from_package_name(&p.flow_id.name).unwrap_or(u64::MAX));
        let items = packages.into_iter().flat_map(|p| p.data).collect();
        Ok(Self { source_id: source_id.into(),
                  flow_id,
                  items })
    }
}

impl<T: FlowEntitySpec> QuerySource<T> for PackageQuerySource<T> {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn flow_id(&self) -> &FlowId {
        &self.flow_id
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn pull(&self, checkpoint: usize, page_size: usize) -> Result<QueryResponse<T>, FlowError> {
        page_of(&self.flow_id, &self.items, checkpoint, page_size)
    }
}
