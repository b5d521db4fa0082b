use serde::{Deserialize, Serialize};

use crate::model::{ProcessEntityError, ProcessError};

/// Resumen de una invocación de `Processor::start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessorReport {
    pub processor_name: String,
    /// Checkpoint desde el que se reanudó.
    pub resumed_from: usize,
    /// Checkpoint final persistido.
    pub checkpoint: usize,
    pub batches: usize,
    pub processed: usize,
    pub valid: usize,
    pub invalid: usize,
    pub completed: bool,
    pub entity_errors: Vec<ProcessEntityError>,
    pub batch_errors: Vec<ProcessError>,
}

impl ProcessorReport {
    pub fn new(processor_name: impl Into<String>, resumed_from: usize) -> Self {
        Self { processor_name: processor_name.into(),
               resumed_from,
               checkpoint: resumed_from,
               batches: 0,
               processed: 0,
               valid: 0,
               invalid: 0,
               completed: false,
               entity_errors: vec![],
               batch_errors: vec![] }
    }
}
