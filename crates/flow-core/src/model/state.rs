//! Estado persistido de procesadores y fuentes.
//!
//! - `FlowProcessState`: checkpoint por (procesador, tipo de entidad). Sólo el
//!   `Processor` lo muta, después de aplicar una página completa.
//! - `QueryResponseState`: cursor por fuente upstream.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlowProcessState {
    pub processor_name: String,
    pub checkpoint: usize,
    pub batch_id: u64,
    pub completed: Option<DateTime<Utc>>,
}

impl FlowProcessState {
    /// Estado inicial (primera ejecución).
    pub fn new(processor_name: impl Into<String>) -> Self {
        Self { processor_name: processor_name.into(),
               checkpoint: 0,
               batch_id: 0,
               completed: None }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }

    /// Registra un batch aplicado: nuevo checkpoint y número de batch.
    pub fn advance(&mut self, batch_number: u64, checkpoint: usize) {
        self.batch_id = batch_number;
        self.checkpoint = checkpoint;
        self.completed = None;
    }

    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.completed = Some(at);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResponseState {
    pub source_id: String,
    pub checkpoint: usize,
    pub page_size: usize,
}

impl QueryResponseState {
    pub fn new(source_id: impl Into<String>, page_size: usize) -> Self {
        Self { source_id: source_id.into(),
               checkpoint: 0,
               page_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_clears_completion() {
        let mut s = FlowProcessState::new("import");
        s.mark_completed(Utc::now());
        assert!(s.is_completed());
        s.advance(4, 40);
        assert!(!s.is_completed());
        assert_eq!((s.batch_id, s.checkpoint), (4, 40));
    }

    #[test]
    fn process_state_document_shape() {
        let json = serde_json::to_value(FlowProcessState::new("import")).unwrap();
        for field in ["ProcessorName", "Checkpoint", "BatchId", "Completed"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
