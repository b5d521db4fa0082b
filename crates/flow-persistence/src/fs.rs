//! Lectura/escritura de documentos JSON.
//!
//! Las escrituras van a un temporal en el mismo directorio y se renombran
//! sobre el destino: un lector nunca ve un documento a medio escribir.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::PersistenceError;

pub(crate) fn write_json_atomic<V: Serialize + ?Sized>(path: &Path, value: &V) -> Result<(), PersistenceError> {
    let dir = path.parent()
                  .ok_or_else(|| PersistenceError::Config(format!("{} has no parent directory", path.display())))?;
    fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| PersistenceError::Serialization(e.to_string()))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistenceError::io(dir, e))?;
    tmp.write_all(&bytes).map_err(|e| PersistenceError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| PersistenceError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| PersistenceError::io(path, e.error))?;
    Ok(())
}

/// `Ok(None)` si el archivo no existe.
pub(crate) fn read_json<V: DeserializeOwned>(path: &Path) -> Result<Option<V>, PersistenceError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistenceError::io(path, e)),
    };
    serde_json::from_slice(&bytes).map(Some)
                                  .map_err(|e| PersistenceError::Malformed { path: path.to_path_buf(),
                                                                             message: e.to_string() })
}

/// Archivos de `dir` cuyo nombre empieza por `prefix` y termina en `suffix`,
/// ordenados por nombre. Un directorio inexistente se trata como vacío.
pub(crate) fn list_files(dir: &Path, prefix: &str, suffix: &str) -> Result<Vec<PathBuf>, PersistenceError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(PersistenceError::io(dir, e)),
    };
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PersistenceError::io(dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(prefix) && name.ends_with(suffix) && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Segmento de nombre de archivo: se usa tal cual si es seguro, si no su hash.
pub(crate) fn file_key(raw: &str) -> String {
    let safe = !raw.is_empty()
               && raw.len() <= 64
               && raw.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
               && !raw.starts_with('.')
               && !raw.contains("__");
    if safe {
        raw.to_string()
    } else {
        flow_core::hashing::short_hash(raw)
    }
}
