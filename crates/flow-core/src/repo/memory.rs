//! Backend en memoria. Mismo contrato que los repositorios de archivos; cada
//! instancia protege su estado con un único `Mutex`.
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::traits::{EnricherLogRepository, PackageIter, PackageRepository, ProcessStateRepository,
                    QueryResponseStateRepository};
use crate::enrichment::EnrichmentLog;
use crate::errors::FlowError;
use crate::model::{FlowEntitySpec, FlowId, FlowProcessState, Package, QueryResponseState};

fn guard<'a, V>(lock: &'a Mutex<V>, what: &str) -> Result<MutexGuard<'a, V>, FlowError> {
    lock.lock().map_err(|_| FlowError::LockPoisoned(what.to_string()))
}

/// Paquetes indexados por GUID del flow (orden de enumeración = orden de GUID,
/// igual que el backend de archivos).
#[derive(Debug)]
pub struct InMemoryPackageRepository<T> {
    packages: Mutex<BTreeMap<Uuid, Package<T>>>,
}

impl<T> InMemoryPackageRepository<T> {
    pub fn new() -> Self {
        Self { packages: Mutex::new(BTreeMap::new()) }
    }
}

impl<T> Default for InMemoryPackageRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FlowEntitySpec> PackageRepository<T> for InMemoryPackageRepository<T> {
    fn save(&self, package: &Package<T>) -> Result<(), FlowError> {
        guard(&self.packages, "package repository")?.insert(package.flow_id.id, package.clone());
        Ok(())
    }

    fn get(&self) -> Result<PackageIter<T>, FlowError> {
        let snapshot: Vec<Package<T>> = guard(&self.packages, "package repository")?.values().cloned().collect();
        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProcessStateRepository {
    states: Mutex<HashMap<(String, String), FlowProcessState>>,
}

impl InMemoryProcessStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessStateRepository for InMemoryProcessStateRepository {
    fn get(&self, processor_name: &str, entity: &str) -> Result<FlowProcessState, FlowError> {
        let states = guard(&self.states, "process state repository")?;
        Ok(states.get(&(processor_name.to_string(), entity.to_string()))
                 .cloned()
                 .unwrap_or_else(|| FlowProcessState::new(processor_name)))
    }

    fn save(&self, entity: &str, state: &FlowProcessState) -> Result<(), FlowError> {
        guard(&self.states, "process state repository")?.insert((state.processor_name.clone(), entity.to_string()),
                                                                 state.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryQueryResponseStateRepository {
    states: Mutex<HashMap<(String, String, String), QueryResponseState>>,
}

impl InMemoryQueryResponseStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryResponseStateRepository for InMemoryQueryResponseStateRepository {
    fn get(&self,
           processor_name: &str,
           entity: &str,
           source_id: &str,
           page_size: usize)
           -> Result<QueryResponseState, FlowError> {
        let states = guard(&self.states, "query response state repository")?;
        let key = (processor_name.to_string(), entity.to_string(), source_id.to_string());
        Ok(states.get(&key)
                 .cloned()
                 .unwrap_or_else(|| QueryResponseState::new(source_id, page_size)))
    }

    fn save(&self, processor_name: &str, entity: &str, state: &QueryResponseState) -> Result<(), FlowError> {
        let key = (processor_name.to_string(), entity.to_string(), state.source_id.clone());
        guard(&self.states, "query response state repository")?.insert(key, state.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEnricherLogRepository {
    logs: Mutex<HashMap<(Uuid, String), EnrichmentLog>>,
}

impl InMemoryEnricherLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EnricherLogRepository for InMemoryEnricherLogRepository {
    fn get(&self, flow: &FlowId, source_entity_type: &str) -> Result<Option<EnrichmentLog>, FlowError> {
        let logs = guard(&self.logs, "enricher log repository")?;
        Ok(logs.get(&(flow.id, source_entity_type.to_string())).cloned())
    }

    fn save(&self, log: &EnrichmentLog) -> Result<(), FlowError> {
        guard(&self.logs, "enricher log repository")?.insert((log.flow.id, log.source_entity_type.clone()), log.clone());
        Ok(())
    }
}
