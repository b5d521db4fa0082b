//! Builder de `Processor`.
//!
//! La composición es explícita: quien construye el procesador entrega la
//! fuente, el transform, los repositorios y (opcionalmente) proveedores de
//! especificaciones y logger. Sin fuente o sin transform `build` falla.

use std::fmt;
use std::sync::Arc;

use super::core::Processor;
use super::Transform;
use crate::constants::DEFAULT_PAGE_SIZE;
use crate::errors::FlowError;
use crate::logging::{FlowLogger, LogFacade};
use crate::model::{FlowEntitySpec, FlowId, ProcessEntityError, ProcessError};
use crate::repo::{InMemoryPackageRepository, InMemoryProcessStateRepository, InMemoryQueryResponseStateRepository,
                  PackageRepository, ProcessStateRepository, QueryResponseStateRepository};
use crate::source::QuerySource;
use crate::specification::{AcceptAll, CollectionSpecificationProvider, EntitySpecificationProvider};

/// Opciones de ejecución.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorOptions {
    /// Nombre estable: forma parte de la clave de los archivos de estado.
    pub name: String,
    pub page_size: usize,
    /// Máximo de páginas por invocación (`None` = hasta agotar la fuente).
    pub max_batches: Option<usize>,
}

impl ProcessorOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               page_size: DEFAULT_PAGE_SIZE,
               max_batches: None }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_batches(mut self, max_batches: usize) -> Self {
        self.max_batches = Some(max_batches);
        self
    }
}

/// Repositorios que usa un procesador.
pub struct ProcessorStores<TOut: FlowEntitySpec> {
    pub output: Arc<dyn PackageRepository<TOut>>,
    pub errors: Arc<dyn PackageRepository<ProcessEntityError>>,
    /// Rechazos de batch completo; se escriben antes del checkpoint.
    pub batch_errors: Arc<dyn PackageRepository<ProcessError>>,
    pub process_states: Arc<dyn ProcessStateRepository>,
    pub query_states: Arc<dyn QueryResponseStateRepository>,
}

impl<TOut: FlowEntitySpec> ProcessorStores<TOut> {
    /// Todos los repositorios en memoria.
    pub fn in_memory() -> Self {
        Self { output: Arc::new(InMemoryPackageRepository::<TOut>::new()),
               errors: Arc::new(InMemoryPackageRepository::<ProcessEntityError>::new()),
               batch_errors: Arc::new(InMemoryPackageRepository::<ProcessError>::new()),
               process_states: Arc::new(InMemoryProcessStateRepository::new()),
               query_states: Arc::new(InMemoryQueryResponseStateRepository::new()) }
    }
}

impl<TOut: FlowEntitySpec> Clone for ProcessorStores<TOut> {
    fn clone(&self) -> Self {
        Self { output: Arc::clone(&self.output),
               errors: Arc::clone(&self.errors),
               batch_errors: Arc::clone(&self.batch_errors),
               process_states: Arc::clone(&self.process_states),
               query_states: Arc::clone(&self.query_states) }
    }
}

impl<TOut: FlowEntitySpec> fmt::Debug for ProcessorStores<TOut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorStores").finish_non_exhaustive()
    }
}

pub struct ProcessorBuilder<TIn: FlowEntitySpec, TOut: FlowEntitySpec> {
    options: ProcessorOptions,
    flow: FlowId,
    stores: ProcessorStores<TOut>,
    source: Option<Box<dyn QuerySource<TIn>>>,
    transform: Option<Box<dyn Transform<TIn, TOut>>>,
    entity_specs: Box<dyn EntitySpecificationProvider<TOut>>,
    collection_specs: Box<dyn CollectionSpecificationProvider<TOut>>,
    logger: Option<Arc<dyn FlowLogger>>,
}

impl<TIn: FlowEntitySpec, TOut: FlowEntitySpec> ProcessorBuilder<TIn, TOut> {
    pub fn new(options: ProcessorOptions, flow: FlowId, stores: ProcessorStores<TOut>) -> Self {
        Self { options,
               flow,
               stores,
               source: None,
               transform: None,
               entity_specs: Box::new(AcceptAll),
               collection_specs: Box::new(AcceptAll),
               logger: None }
    }

    pub fn source<S>(mut self, source: S) -> Self
        where S: QuerySource<TIn> + 'static
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn boxed_source(mut self, source: Box<dyn QuerySource<TIn>>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn transform<F>(mut self, transform: F) -> Self
        where F: Transform<TIn, TOut> + 'static
    {
        self.transform = Some(Box::new(transform));
        self
    }

    pub fn entity_specifications<P>(mut self, provider: P) -> Self
        where P: EntitySpecificationProvider<TOut> + 'static
    {
        self.entity_specs = Box::new(provider);
        self
    }

    pub fn collection_specifications<P>(mut self, provider: P) -> Self
        where P: CollectionSpecificationProvider<TOut> + 'static
    {
        self.collection_specs = Box::new(provider);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn FlowLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build(self) -> Result<Processor<TIn, TOut>, FlowError> {
        if self.options.name.trim().is_empty() {
            return Err(FlowError::InvalidArgument("processor name must not be empty".into()));
        }
        if self.options.page_size == 0 {
            return Err(FlowError::InvalidArgument("page_size must be greater than zero".into()));
        }
        let source = self.source
                         .ok_or_else(|| FlowError::InvalidArgument("processor requires a query source".into()))?;
        let transform = self.transform
                            .ok_or_else(|| FlowError::InvalidArgument("processor requires a transform".into()))?;
        let logger = self.logger
                         .unwrap_or_else(|| LogFacade::shared(format!("flow::processor::{}", self.options.name)));
        Ok(Processor::from_parts(self.options,
                                 self.flow,
                                 self.stores,
                                 source,
                                 transform,
                                 self.entity_specs,
                                 self.collection_specs,
                                 logger))
    }
}
