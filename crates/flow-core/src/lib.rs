//! flow-core: núcleo del procesamiento por lotes (ETL) con checkpoints.
//!
//! Un `Processor` lee páginas de una `QuerySource`, transforma cada entidad,
//! valida el resultado y persiste paquetes de salida y de errores antes de
//! avanzar el checkpoint. El estado persistido permite reanudar tras un
//! fallo sin reprocesar lotes ya confirmados.
pub mod agent;
pub mod constants;
pub mod enrichment;
pub mod errors;
pub mod hashing;
pub mod logging;
pub mod model;
pub mod processor;
pub mod repo;
pub mod source;
pub mod specification;

pub use agent::{Agent, AgentAggregate, ProcessorAgent};
pub use enrichment::{Enricher, EnrichmentAddress, EnrichmentLog, EnrichmentOutcome, EnrichmentProcessor};
pub use errors::FlowError;
pub use logging::{FlowLogger, LogFacade, MemoryLogger};
pub use model::{EntityFailure, FlowBatch, FlowEntity, FlowEntitySpec, FlowId, FlowProcessState, Package,
                ProcessEntityError, ProcessError, QueryResponseState};
pub use processor::{Processor, ProcessorOptions, ProcessorReport, ProcessorStatus, ProcessorStores, Transform};
pub use repo::{EnricherLogRepository, InMemoryEnricherLogRepository, InMemoryPackageRepository,
               InMemoryProcessStateRepository, InMemoryQueryResponseStateRepository, PackageRepository,
               ProcessStateRepository, QueryResponseStateRepository};
pub use source::{InMemoryQuerySource, PackageQuerySource, QueryResponse, QuerySource};
pub use specification::{AcceptAll, CollectionSpecificationProvider, CollectionValidationResult,
                        EntitySpecificationProvider, Rule, RuleSet, UniqueBy, ValidationResult};
