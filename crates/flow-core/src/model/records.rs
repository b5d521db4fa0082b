//! Registros de fallo.
//!
//! `EntityFailure` es el lado `Err` de un transform/enricher: la lista ordenada
//! de mensajes. `ProcessEntityError` es lo que se persiste por cada entidad
//! rechazada; `ProcessError` describe el rechazo de un batch completo.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FlowEntitySpec;
use crate::constants::{PROCESS_ENTITY_ERROR_NAME, PROCESS_ERROR_NAME};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityFailure {
    pub messages: Vec<String>,
}

impl EntityFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { messages: vec![message.into()] }
    }

    pub fn with_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

impl fmt::Display for EntityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

impl From<String> for EntityFailure {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for EntityFailure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessEntityError {
    /// Índice global en la fuente (no relativo a la página).
    pub index: usize,
    pub payload: Value,
    pub messages: Vec<String>,
}

impl ProcessEntityError {
    /// Si el payload no se puede serializar se guarda `null` y el error de
    /// serialización se añade a `messages`.
    pub fn new<P: Serialize>(index: usize, payload: &P, mut messages: Vec<String>) -> Self {
        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                messages.push(format!("payload serialization failed: {e}"));
                Value::Null
            }
        };
        Self { index, payload, messages }
    }
}

impl FlowEntitySpec for ProcessEntityError {
    const ENTITY_NAME: &'static str = PROCESS_ENTITY_ERROR_NAME;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessError {
    pub batch_id: u64,
    pub checkpoint: usize,
    pub messages: Vec<String>,
}

impl FlowEntitySpec for ProcessError {
    const ENTITY_NAME: &'static str = PROCESS_ERROR_NAME;
}
