//! Procesador batch: orquesta fuente, transform, especificaciones y
//! repositorios.
//!
//! Bucle por página (secuencial, sin paralelismo interno):
//! 1. cargar `FlowProcessState` (checkpoint 0 en la primera ejecución);
//! 2. `pull` a la fuente desde el checkpoint; página vacía => `Completed`;
//! 3. transformar cada entidad; un fallo se registra y se sigue;
//! 4. validar por entidad y luego por colección;
//! 5. persistir paquete válido, paquete de errores, cursor de la fuente y por
//!    último el checkpoint (los datos siempre antes que el checkpoint);
//! 6. avanzar y repetir.
//!
//! Cualquier error fuera del trabajo por entidad lleva a `Faulted` y se
//! devuelve al llamador; el último checkpoint bueno queda en disco.

pub mod builder;
pub mod core;
mod report;
mod status;
mod transform;

pub use builder::{ProcessorBuilder, ProcessorOptions, ProcessorStores};
pub use core::Processor;
pub use report::ProcessorReport;
pub use status::ProcessorStatus;
pub use transform::Transform;
