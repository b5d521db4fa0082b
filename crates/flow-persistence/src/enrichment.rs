//! `EnricherLogRepository` sobre archivos:
//! `enrichment/{flow uuid}__{source entity type}.log.json` más una copia
//! `.bak` con la versión anterior.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use flow_core::{EnricherLogRepository, EnrichmentLog, FlowError, FlowId};
use log::debug;

use crate::config::FlowStoreConfig;
use crate::error::PersistenceError;
use crate::fs::{file_key, read_json, write_json_atomic};

#[derive(Debug)]
pub struct FileEnricherLogRepository {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileEnricherLogRepository {
    pub fn new(config: &FlowStoreConfig) -> Self {
        Self { dir: config.enrichment_dir(),
               lock: Mutex::new(()) }
    }

    pub fn path_for(&self, flow: &FlowId, source_entity_type: &str) -> PathBuf {
        self.dir.join(format!("{}__{}.log.json", flow.id, file_key(source_entity_type)))
    }

    pub fn backup_path_for(&self, flow: &FlowId, source_entity_type: &str) -> PathBuf {
        backup_of(&self.path_for(flow, source_entity_type))
    }
}

fn backup_of(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> Result<(), PersistenceError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PersistenceError::io(path, e)),
    }
}

impl EnricherLogRepository for FileEnricherLogRepository {
    fn get(&self, flow: &FlowId, source_entity_type: &str) -> Result<Option<EnrichmentLog>, FlowError> {
        let _guard = self.lock
                         .lock()
                         .map_err(|_| PersistenceError::LockPoisoned("enricher log repository".into()))?;
        Ok(read_json::<EnrichmentLog>(&self.path_for(flow, source_entity_type))?)
    }

    /// Borra el `.bak` previo, mueve el documento actual a `.bak` y escribe el
    /// nuevo contenido.
    fn save(&self, log: &EnrichmentLog) -> Result<(), FlowError> {
        let _guard = self.lock
                         .lock()
                         .map_err(|_| PersistenceError::LockPoisoned("enricher log repository".into()))?;
        let path = self.path_for(&log.flow, &log.source_entity_type);
        let backup = backup_of(&path);
        if path.exists() {
            remove_if_exists(&backup)?;
            fs::rename(&path, &backup).map_err(|e| PersistenceError::io(&path, e))?;
        }
        write_json_atomic(&path, log)?;
        debug!("enrichment:saved path={} entries={} exceptions={}",
               path.display(),
               log.logs.len(),
               log.exceptions.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::EnrichmentAddress;
    use tempfile::tempdir;

    #[test]
    fn missing_log_is_none() {
        let dir = tempdir().unwrap();
        let repo = FileEnricherLogRepository::new(&FlowStoreConfig::new(dir.path()));
        assert!(repo.get(&FlowId::new("f"), "Customer").unwrap().is_none());
    }

    #[test]
    fn second_save_keeps_previous_version_as_backup() {
        let dir = tempdir().unwrap();
        let repo = FileEnricherLogRepository::new(&FlowStoreConfig::new(dir.path()));
        let flow = FlowId::new("customers");
        let address = EnrichmentAddress::new("postal-codes", "customers");

        let mut log = EnrichmentLog::new(flow.clone(), "PostalCode");
        repo.save(&log).unwrap();
        assert!(!repo.backup_path_for(&flow, "PostalCode").exists());

        log.record("Region", &address, 12);
        repo.save(&log).unwrap();

        let current = repo.get(&flow, "PostalCode").unwrap().unwrap();
        assert!(current.get_has_been_processed("Region", &address));
        let raw = fs::read_to_string(repo.backup_path_for(&flow, "PostalCode")).unwrap();
        let previous: EnrichmentLog = serde_json::from_str(&raw).unwrap();
        assert!(previous.logs.is_empty());

        log.record("Country", &address, 3);
        repo.save(&log).unwrap();
        let raw = fs::read_to_string(repo.backup_path_for(&flow, "PostalCode")).unwrap();
        let previous: EnrichmentLog = serde_json::from_str(&raw).unwrap();
        assert_eq!(previous.logs.len(), 1);
    }
}
