//! Configuración del almacén de archivos desde variables de entorno.
//! Convención: `FLOW_BASE_PATH` y `FLOW_PAGE_SIZE` (opcionales).

use std::env;
use std::path::{Path, PathBuf};

use dotenvy::dotenv;
use flow_core::constants::DEFAULT_PAGE_SIZE;
use once_cell::sync::Lazy;

use crate::error::PersistenceError;

pub const ENV_BASE_PATH: &str = "FLOW_BASE_PATH";
pub const ENV_PAGE_SIZE: &str = "FLOW_PAGE_SIZE";
pub const DEFAULT_BASE_PATH: &str = "./flow-data";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Raíz de trabajo de los repositorios de archivos.
///
/// Los repositorios reciben esta estructura explícitamente; nunca se usa el
/// directorio actual como valor implícito.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStoreConfig {
    pub base_path: PathBuf,
    pub page_size: usize,
}

impl FlowStoreConfig {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into(),
               page_size: DEFAULT_PAGE_SIZE }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Lee `FLOW_BASE_PATH` / `FLOW_PAGE_SIZE` (tras cargar `.env`).
    /// Un `FLOW_PAGE_SIZE` no numérico o cero es un error de configuración.
    pub fn from_env() -> Result<Self, PersistenceError> {
        Lazy::force(&DOTENV_LOADED);
        let base_path = env::var(ENV_BASE_PATH).unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string());
        let page_size = match env::var(ENV_PAGE_SIZE) {
            Ok(raw) => parse_page_size(&raw)?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };
        Ok(Self::new(base_path).with_page_size(page_size))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.base_path.join("packages")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.base_path.join("state")
    }

    pub fn enrichment_dir(&self) -> PathBuf {
        self.base_path.join("enrichment")
    }
}

fn parse_page_size(raw: &str) -> Result<usize, PersistenceError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(PersistenceError::Config(format!("{ENV_PAGE_SIZE} must be greater than zero"))),
        Ok(n) => Ok(n),
        Err(e) => Err(PersistenceError::Config(format!("{ENV_PAGE_SIZE}='{raw}': {e}"))),
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdirectories_hang_from_base_path() {
        let cfg = FlowStoreConfig::new("/tmp/flow").with_page_size(25);
        assert_eq!(cfg.packages_dir(), PathBuf::from("/tmp/flow/packages"));
        assert_eq!(cfg.state_dir(), PathBuf::from("/tmp/flow/state"));
        assert_eq!(cfg.enrichment_dir(), PathBuf::from("/tmp/flow/enrichment"));
        assert_eq!(cfg.page_size, 25);
    }

    #[test]
    fn page_size_parsing() {
        assert_eq!(parse_page_size(" 50 ").unwrap(), 50);
        assert!(matches!(parse_page_size("0"), Err(PersistenceError::Config(_))));
        assert!(matches!(parse_page_size("many"), Err(PersistenceError::Config(_))));
    }
}
