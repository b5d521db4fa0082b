//! `PackageRepository` sobre archivos: un documento por paquete en
//! `packages/{ENTITY}__{flow uuid}.json`.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Mutex;

use flow_core::repo::PackageIter;
use flow_core::{FlowError, FlowEntitySpec, Package, PackageRepository};
use log::debug;

use crate::config::FlowStoreConfig;
use crate::error::PersistenceError;
use crate::fs::{file_key, list_files, read_json, write_json_atomic};

const SUFFIX: &str = ".json";

fn package_prefix(entity_name: &str) -> String {
    format!("{}__", file_key(entity_name))
}

/// Documentos de paquete de `entity_name` bajo `packages/`, ordenados por
/// nombre. Un directorio inexistente no es error; cualquier otro fallo de
/// lectura sí.
pub fn package_files(config: &FlowStoreConfig, entity_name: &str) -> Result<Vec<PathBuf>, FlowError> {
    Ok(list_files(&config.packages_dir(), &package_prefix(entity_name), SUFFIX)?)
}

pub struct FilePackageRepository<T> {
    dir: PathBuf,
    prefix: String,
    lock: Mutex<()>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: FlowEntitySpec> FilePackageRepository<T> {
    pub fn new(config: &FlowStoreConfig) -> Self {
        Self { dir: config.packages_dir(),
               prefix: package_prefix(T::ENTITY_NAME),
               lock: Mutex::new(()),
               _entity: PhantomData }
    }

    /// Ruta del documento de un paquete.
    pub fn path_for(&self, package: &Package<T>) -> PathBuf {
        self.dir.join(format!("{}{}{SUFFIX}", self.prefix, package.flow_id.id))
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl<T> std::fmt::Debug for FilePackageRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePackageRepository")
         .field("dir", &self.dir)
         .field("prefix", &self.prefix)
         .finish()
    }
}

impl<T: FlowEntitySpec> PackageRepository<T> for FilePackageRepository<T> {
    fn save(&self, package: &Package<T>) -> Result<(), FlowError> {
        let _guard = self.lock
                         .lock()
                         .map_err(|_| PersistenceError::LockPoisoned("package repository".into()))?;
        let path = self.path_for(package);
        write_json_atomic(&path, package)?;
        debug!("package:saved path={} items={}", path.display(), package.len());
        Ok(())
    }

    /// La lista de archivos se toma al llamar; cada documento se lee al
    /// avanzar el iterador.
    fn get(&self) -> Result<PackageIter<T>, FlowError> {
        let files = {
            let _guard = self.lock
                             .lock()
                             .map_err(|_| PersistenceError::LockPoisoned("package repository".into()))?;
            list_files(&self.dir, &self.prefix, SUFFIX)?
        };
        debug!("package:list dir={} files={}", self.dir.display(), files.len());
        Ok(Box::new(files.into_iter().map(|path| -> Result<Package<T>, FlowError> {
                                         match read_json::<Package<T>>(&path)? {
                                             Some(pkg) => Ok(pkg),
                                             // borrado entre el listado y la lectura
                                             None => Err(PersistenceError::io(&path,
                                                                              std::io::ErrorKind::NotFound.into())
                                                         .into()),
                                         }
                                     })))
    }
}
