//! Enriquecimiento idempotente.
//!
//! Un `Enricher` aumenta un conjunto de entidades destino con datos de un
//! conjunto fuente. El `EnrichmentLog` de cada (flow, tipo de entidad fuente)
//! recuerda qué pasadas ya se aplicaron, de modo que re-ejecutar tras un
//! reinicio no las repite.

mod enricher;
mod journal;
mod runner;

pub use journal::{EnrichmentAddress, EnrichmentException, EnrichmentLog, EnrichmentLogEntry};
pub use enricher::Enricher;
pub use runner::{EnrichmentOutcome, EnrichmentProcessor};
