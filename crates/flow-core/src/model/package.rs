//! `Package<T>`: colección acotada y ordenada de entidades + flow propietario.
//! Es la unidad de almacenamiento durable; se serializa completa.
use serde::{Deserialize, Serialize};

use super::FlowId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Package<T> {
    pub flow_id: FlowId,
    pub data: Vec<T>,
}

impl<T> Package<T> {
    pub fn new(flow_id: FlowId, data: Vec<T>) -> Self {
        Self { flow_id, data }
    }

    pub fn empty(flow_id: FlowId) -> Self {
        Self { flow_id, data: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}
