use super::Agent;
use crate::errors::FlowError;
use crate::model::FlowEntitySpec;
use crate::processor::{Processor, ProcessorReport};

/// Adapta un `Processor` a `Agent`: `start` ejecuta el procesador y guarda el
/// último reporte.
pub struct ProcessorAgent<TIn: FlowEntitySpec, TOut: FlowEntitySpec> {
    processor: Processor<TIn, TOut>,
    running: bool,
    last_report: Option<ProcessorReport>,
}

impl<TIn: FlowEntitySpec, TOut: FlowEntitySpec> ProcessorAgent<TIn, TOut> {
    pub fn new(processor: Processor<TIn, TOut>) -> Self {
        Self { processor,
               running: false,
               last_report: None }
    }

    pub fn last_report(&self) -> Option<&ProcessorReport> {
        self.last_report.as_ref()
    }

    pub fn processor(&self) -> &Processor<TIn, TOut> {
        &self.processor
    }
}

impl<TIn: FlowEntitySpec, TOut: FlowEntitySpec> Agent for ProcessorAgent<TIn, TOut> {
    fn name(&self) -> &str {
        self.processor.name()
    }

    fn start(&mut self) -> Result<(), FlowError> {
        if self.running {
            return Err(FlowError::InvalidState(format!("agent '{}' already running", self.name())));
        }
        let report = self.processor.start()?;
        self.last_report = Some(report);
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), FlowError> {
        if !self.running {
            return Err(FlowError::InvalidState(format!("agent '{}' was never started", self.name())));
        }
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityFailure, FlowId};
    use crate::processor::{ProcessorOptions, ProcessorStores};
    use crate::source::InMemoryQuerySource;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Word(String);

    impl FlowEntitySpec for Word {
        const ENTITY_NAME: &'static str = "Word";
    }

    fn upper(w: &Word) -> Result<Word, EntityFailure> {
        Ok(Word(w.0.to_uppercase()))
    }

    fn agent() -> ProcessorAgent<Word, Word> {
        let flow = FlowId::new("words");
        let p = Processor::builder(ProcessorOptions::new("upper"), flow.clone(), ProcessorStores::in_memory())
            .source(InMemoryQuerySource::new("words", flow, vec![Word("a".into()), Word("b".into())]))
            .transform(upper)
            .build()
            .unwrap();
        ProcessorAgent::new(p)
    }

    #[test]
    fn start_runs_processor_and_keeps_report() {
        let mut a = agent();
        a.start().unwrap();
        assert!(a.is_running());
        assert_eq!(a.last_report().unwrap().valid, 2);
        a.stop().unwrap();
        assert!(!a.is_running());
    }

    #[test]
    fn stop_before_start_is_precondition_violation() {
        let mut a = agent();
        assert!(matches!(a.stop(), Err(FlowError::InvalidState(_))));
    }
}
