//! Núcleo del `Processor`.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::builder::{ProcessorBuilder, ProcessorOptions, ProcessorStores};
use super::{ProcessorReport, ProcessorStatus, Transform};
use crate::errors::FlowError;
use crate::logging::FlowLogger;
use crate::model::{FlowBatch, FlowEntity, FlowEntitySpec, FlowId, Package, ProcessEntityError, ProcessError};
use crate::source::QuerySource;
use crate::specification::{CollectionSpecificationProvider, EntitySpecificationProvider};

/// Resultado de aplicar transform + especificaciones a una página. No hace I/O.
#[derive(Debug)]
pub(crate) struct PageOutcome<TOut> {
    pub valid: Vec<TOut>,
    pub errors: Vec<ProcessEntityError>,
    pub batch_error: Option<ProcessError>,
}

/// Procesador batch reanudable.
///
/// El estado vive tras un `Mutex` para que un procesador compartido entre
/// hilos no pueda ejecutarse dos veces a la vez.
pub struct Processor<TIn: FlowEntitySpec, TOut: FlowEntitySpec> {
    options: ProcessorOptions,
    flow: FlowId,
    stores: ProcessorStores<TOut>,
    source: Box<dyn QuerySource<TIn>>,
    transform: Box<dyn Transform<TIn, TOut>>,
    entity_specs: Box<dyn EntitySpecificationProvider<TOut>>,
    collection_specs: Box<dyn CollectionSpecificationProvider<TOut>>,
    logger: Arc<dyn FlowLogger>,
    input: FlowEntity,
    output: FlowEntity,
    status: Mutex<ProcessorStatus>,
}

impl<TIn: FlowEntitySpec, TOut: FlowEntitySpec> Processor<TIn, TOut> {
    /// Crea un builder; ver `ProcessorBuilder`.
    #[inline]
    pub fn builder(options: ProcessorOptions, flow: FlowId, stores: ProcessorStores<TOut>) -> ProcessorBuilder<TIn, TOut> {
        ProcessorBuilder::new(options, flow, stores)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(options: ProcessorOptions,
                             flow: FlowId,
                             stores: ProcessorStores<TOut>,
                             source: Box<dyn QuerySource<TIn>>,
                             transform: Box<dyn Transform<TIn, TOut>>,
                             entity_specs: Box<dyn EntitySpecificationProvider<TOut>>,
                             collection_specs: Box<dyn CollectionSpecificationProvider<TOut>>,
                             logger: Arc<dyn FlowLogger>)
                             -> Self {
        Self { options,
               flow,
               stores,
               source,
               transform,
               entity_specs,
               collection_specs,
               logger,
               input: FlowEntity::of::<TIn>(),
               output: FlowEntity::of::<TOut>(),
               status: Mutex::new(ProcessorStatus::Created) }
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn flow(&self) -> &FlowId {
        &self.flow
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Tipo de entidad leído; su nombre es la clave de los estados.
    pub fn input_entity(&self) -> &FlowEntity {
        &self.input
    }

    pub fn output_entity(&self) -> &FlowEntity {
        &self.output
    }

    pub fn status(&self) -> Result<ProcessorStatus, FlowError> {
        self.status
            .lock()
            .map(|s| *s)
            .map_err(|_| FlowError::LockPoisoned(format!("processor '{}' status", self.options.name)))
    }

    /// Ejecuta el bucle hasta agotar la fuente (o `max_batches`).
    ///
    /// Devuelve `InvalidState` si el procesador ya está en ejecución.
    pub fn start(&self) -> Result<ProcessorReport, FlowError> {
        self.enter_running()?;
        let result = self.run_loop();
        let next = match &result {
            Ok(report) if report.completed => ProcessorStatus::Completed,
            Ok(_) => ProcessorStatus::Paused,
            Err(_) => ProcessorStatus::Faulted,
        };
        self.set_status(next)?;
        match &result {
            Ok(report) => self.logger.info(&format!("start:done processor={} status={:?} batches={} valid={} invalid={} checkpoint={}",
                                                    self.options.name,
                                                    next,
                                                    report.batches,
                                                    report.valid,
                                                    report.invalid,
                                                    report.checkpoint)),
            Err(e) => self.logger.error(&format!("start:faulted processor={} err={e}", self.options.name)),
        }
        result
    }

    fn enter_running(&self) -> Result<(), FlowError> {
        let mut status = self.status
                             .lock()
                             .map_err(|_| FlowError::LockPoisoned(format!("processor '{}' status", self.options.name)))?;
        if *status == ProcessorStatus::Running {
            return Err(FlowError::InvalidState(format!("processor '{}' is already running", self.options.name)));
        }
        *status = ProcessorStatus::Running;
        Ok(())
    }

    fn set_status(&self, next: ProcessorStatus) -> Result<(), FlowError> {
        let mut status = self.status
                             .lock()
                             .map_err(|_| FlowError::LockPoisoned(format!("processor '{}' status", self.options.name)))?;
        *status = next;
        Ok(())
    }

    fn run_loop(&self) -> Result<ProcessorReport, FlowError> {
        let name = self.options.name.as_str();
        let entity = self.input.name();
        let page_size = self.options.page_size;

        let mut state = self.stores.process_states.get(name, entity)?;
        let mut query_state = self.stores
                                  .query_states
                                  .get(name, entity, self.source.source_id(), page_size)?;
        query_state.page_size = page_size;
        self.logger.info(&format!("start:resume processor={name} entity={entity} output={} source={} checkpoint={} batch={}",
                                  self.output.name(),
                                  self.source.source_id(),
                                  state.checkpoint,
                                  state.batch_id));

        let mut report = ProcessorReport::new(name, state.checkpoint);
        loop {
            if let Some(max) = self.options.max_batches {
                if report.batches >= max {
                    report.checkpoint = state.checkpoint;
                    return Ok(report);
                }
            }

            let response = self.source.pull(state.checkpoint, page_size)?;
            if response.is_empty() {
                state.mark_completed(Utc::now());
                self.stores.process_states.save(entity, &state)?;
                report.checkpoint = state.checkpoint;
                report.completed = true;
                return Ok(report);
            }

            let batch = FlowBatch::new(self.flow.clone(), state.batch_id).increment();
            let returned = response.returned();
            let outcome = self.process_page(&batch, state.checkpoint, &response.package.data);
            self.logger.debug(&format!("batch:processed batch={batch} items={returned} valid={} invalid={}",
                                       outcome.valid.len(),
                                       outcome.errors.len()));

            // Datos primero; el checkpoint es el punto de commit.
            let package_flow = batch.package_flow_id(name);
            let valid_count = outcome.valid.len();
            if valid_count > 0 {
                self.stores.output.save(&Package::new(package_flow.clone(), outcome.valid))?;
            }
            if !outcome.errors.is_empty() {
                self.stores.errors.save(&Package::new(package_flow.clone(), outcome.errors.clone()))?;
            }
            if let Some(batch_error) = &outcome.batch_error {
                self.stores.batch_errors.save(&Package::new(package_flow, vec![batch_error.clone()]))?;
            }
            query_state.checkpoint = response.checkpoint;
            self.stores.query_states.save(name, entity, &query_state)?;
            state.advance(batch.number, response.checkpoint);
            self.stores.process_states.save(entity, &state)?;

            report.batches += 1;
            report.processed += returned;
            report.valid += valid_count;
            report.invalid += outcome.errors.len();
            report.checkpoint = state.checkpoint;
            report.entity_errors.extend(outcome.errors);
            report.batch_errors.extend(outcome.batch_error);
        }
    }

    /// Transform + validación de una página. `first_index` es el índice global
    /// de la primera entidad.
    pub(crate) fn process_page(&self, batch: &FlowBatch, first_index: usize, inputs: &[TIn]) -> PageOutcome<TOut> {
        let mut errors: Vec<ProcessEntityError> = Vec::new();
        let mut indices: Vec<usize> = Vec::with_capacity(inputs.len());
        let mut outputs: Vec<TOut> = Vec::with_capacity(inputs.len());

        for (offset, input) in inputs.iter().enumerate() {
            let index = first_index + offset;
            match self.transform.transform(input) {
                Ok(out) => {
                    let verdict = self.entity_specs.validate(&out);
                    if verdict.is_valid {
                        indices.push(index);
                        outputs.push(out);
                    } else {
                        self.logger.warn(&format!("entity:invalid batch={batch} index={index} rules={}",
                                                  verdict.messages.join("; ")));
                        errors.push(ProcessEntityError::new(index, &out, verdict.messages));
                    }
                }
                Err(failure) => {
                    self.logger.warn(&format!("entity:transform_failed batch={batch} index={index} err={failure}"));
                    errors.push(ProcessEntityError::new(index, input, failure.messages));
                }
            }
        }

        let collection = self.collection_specs.validate(&outputs);
        let mut valid = Vec::with_capacity(outputs.len());
        let mut batch_error = None;
        if collection.rejects_whole_collection() && !outputs.is_empty() {
            self.logger.warn(&format!("batch:rejected batch={batch} rules={}", collection.messages.join("; ")));
            for (index, out) in indices.into_iter().zip(outputs) {
                errors.push(ProcessEntityError::new(index, &out, collection.messages.clone()));
            }
            batch_error = Some(ProcessError { batch_id: batch.number,
                                              checkpoint: first_index,
                                              messages: collection.messages.clone() });
        } else {
            for (position, (index, out)) in indices.into_iter().zip(outputs).enumerate() {
                match collection.violations.get(&position) {
                    Some(messages) => {
                        self.logger.warn(&format!("entity:invalid batch={batch} index={index} rules={}",
                                                  messages.join("; ")));
                        errors.push(ProcessEntityError::new(index, &out, messages.clone()));
                    }
                    None => valid.push(out),
                }
            }
        }

        errors.sort_by_key(|e| e.index);
        PageOutcome { valid,
                      errors,
                      batch_error }
    }
}

impl<TIn: FlowEntitySpec, TOut: FlowEntitySpec> fmt::Debug for Processor<TIn, TOut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
         .field("options", &self.options)
         .field("flow", &self.flow)
         .field("source", &self.source.source_id())
         .finish_non_exhaustive()
    }
}
