/// Estado de un `Processor`.
///
/// Transiciones válidas:
/// - `Created` -> `Running`
/// - `Running` -> `Completed` | `Faulted` | `Paused`
/// - `Completed` | `Faulted` | `Paused` -> `Running` (re-invocación: reanuda
///   desde el último checkpoint persistido)
///
/// `start` mientras está `Running` es un error de precondición.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorStatus {
    /// Construido, nunca iniciado.
    Created,
    /// Ejecutando el bucle pull/transform/persist.
    Running,
    /// Se detuvo tras `max_batches` páginas; la fuente no está agotada.
    Paused,
    /// La fuente se agotó.
    Completed,
    /// Un error fuera del procesamiento por entidad detuvo el bucle.
    Faulted,
}
