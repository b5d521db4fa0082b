//! Capacidad de logging inyectable.
//!
//! Cada componente recibe un `Arc<dyn FlowLogger>` en su construcción en lugar
//! de depender de un logger global. `LogFacade` reenvía al facade `log` con un
//! target por componente; `MemoryLogger` guarda los registros (útil en tests).

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use log::Level;

pub trait FlowLogger: Send + Sync + Debug {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message)
    }
    fn info(&self, message: &str) {
        self.log(Level::Info, message)
    }
    fn warn(&self, message: &str) {
        self.log(Level::Warn, message)
    }
    fn error(&self, message: &str) {
        self.log(Level::Error, message)
    }
}

/// Logger por defecto: delega en las macros de `log`.
#[derive(Debug, Clone)]
pub struct LogFacade {
    target: String,
}

impl LogFacade {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    /// Atajo para obtener directamente el trait object compartido.
    pub fn shared(target: impl Into<String>) -> Arc<dyn FlowLogger> {
        Arc::new(Self::new(target))
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl FlowLogger for LogFacade {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: self.target.as_str(), level, "{message}");
    }
}

/// Logger en memoria.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// ¿Existe algún registro del nivel dado que contenga `needle`?
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records().iter().any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl FlowLogger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_keeps_levels_and_order() {
        let logger = MemoryLogger::new();
        logger.info("batch 1 persisted");
        logger.warn("entity 3 rejected");
        let records = logger.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, Level::Info);
        assert!(logger.contains(Level::Warn, "entity 3"));
        assert!(!logger.contains(Level::Error, "entity 3"));
    }

    #[test]
    fn log_facade_keeps_target() {
        let facade = LogFacade::new("flow::processor");
        assert_eq!(facade.target(), "flow::processor");
        // Sin logger instalado el facade es un no-op.
        facade.error("nothing installed");
    }
}
