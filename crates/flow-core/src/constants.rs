//! Constantes del core.

/// Tamaño de página usado cuando la configuración no indica otro.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Nombre de entidad con el que se persisten los errores por entidad.
pub const PROCESS_ENTITY_ERROR_NAME: &str = "ProcessEntityError";

/// Nombre de entidad con el que se persisten los rechazos de batch completo.
pub const PROCESS_ERROR_NAME: &str = "ProcessError";
