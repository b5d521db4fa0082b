//! Repositorios de estado sobre archivos en `state/`.
//!
//! - `{processor}__{ENTITY}.process.json`: un `FlowProcessState`.
//! - `{processor}__{ENTITY}__{source}.query.json`: lista de
//!   `QueryResponseState`; `save` hace upsert por `SourceId`.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use flow_core::{FlowError, FlowProcessState, ProcessStateRepository, QueryResponseState,
                QueryResponseStateRepository};
use log::debug;

use crate::config::FlowStoreConfig;
use crate::error::PersistenceError;
use crate::fs::{file_key, read_json, write_json_atomic};

fn lock<'a>(m: &'a Mutex<()>, what: &str) -> Result<MutexGuard<'a, ()>, PersistenceError> {
    m.lock().map_err(|_| PersistenceError::LockPoisoned(what.to_string()))
}

#[derive(Debug)]
pub struct FileProcessStateRepository {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileProcessStateRepository {
    pub fn new(config: &FlowStoreConfig) -> Self {
        Self { dir: config.state_dir(),
               lock: Mutex::new(()) }
    }

    pub fn path_for(&self, processor_name: &str, entity: &str) -> PathBuf {
        self.dir.join(format!("{}__{}.process.json", file_key(processor_name), file_key(entity)))
    }
}

impl ProcessStateRepository for FileProcessStateRepository {
    fn get(&self, processor_name: &str, entity: &str) -> Result<FlowProcessState, FlowError> {
        let _guard = lock(&self.lock, "process state repository")?;
        let path = self.path_for(processor_name, entity);
        Ok(read_json::<FlowProcessState>(&path)?.unwrap_or_else(|| FlowProcessState::new(processor_name)))
    }

    fn save(&self, entity: &str, state: &FlowProcessState) -> Result<(), FlowError> {
        let _guard = lock(&self.lock, "process state repository")?;
        let path = self.path_for(&state.processor_name, entity);
        write_json_atomic(&path, state)?;
        debug!("state:saved path={} checkpoint={} batch={}",
               path.display(),
               state.checkpoint,
               state.batch_id);
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileQueryResponseStateRepository {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileQueryResponseStateRepository {
    pub fn new(config: &FlowStoreConfig) -> Self {
        Self { dir: config.state_dir(),
               lock: Mutex::new(()) }
    }

    pub fn path_for(&self, processor_name: &str, entity: &str, source_id: &str) -> PathBuf {
        self.dir.join(format!("{}__{}__{}.query.json",
                              file_key(processor_name),
                              file_key(entity),
                              file_key(source_id)))
    }
}

impl QueryResponseStateRepository for FileQueryResponseStateRepository {
    fn get(&self,
           processor_name: &str,
           entity: &str,
           source_id: &str,
           page_size: usize)
           -> Result<QueryResponseState, FlowError> {
        let _guard = lock(&self.lock, "query response state repository")?;
        let path = self.path_for(processor_name, entity, source_id);
        let states = read_json::<Vec<QueryResponseState>>(&path)?.unwrap_or_default();
        Ok(states.into_iter()
                 .find(|s| s.source_id == source_id)
                 .unwrap_or_else(|| QueryResponseState::new(source_id, page_size)))
    }

    fn save(&self, processor_name: &str, entity: &str, state: &QueryResponseState) -> Result<(), FlowError> {
        let _guard = lock(&self.lock, "query response state repository")?;
        let path = self.path_for(processor_name, entity, &state.source_id);
        let mut states = read_json::<Vec<QueryResponseState>>(&path)?.unwrap_or_default();
        match states.iter_mut().find(|s| s.source_id == state.source_id) {
            Some(existing) => *existing = state.clone(),
            None => states.push(state.clone()),
        }
        write_json_atomic(&path, &states)?;
        debug!("query_state:saved path={} source={} checkpoint={}",
               path.display(),
               state.source_id,
               state.checkpoint);
        Ok(())
    }
}
