//! Identificadores de flow y batch.
//!
//! - `FlowId`: GUID + nombre legible. La igualdad (y el hash) usan sólo el GUID;
//!   el nombre es informativo.
//! - `FlowBatch`: clave compuesta (flow, número). `increment` devuelve el batch
//!   siguiente sin mutar el original.
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlowId {
    pub id: Uuid,
    pub name: String,
}

impl FlowId {
    /// Nuevo flow con GUID aleatorio.
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(),
               name: name.into() }
    }

    /// Restaura un flow conocido (p.ej. leído desde configuración o CLI).
    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

impl PartialEq for FlowId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FlowId {}

impl Hash for FlowId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Unidad de ejecución dentro de un flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlowBatch {
    pub flow: FlowId,
    pub number: u64,
}

impl FlowBatch {
    pub fn new(flow: FlowId, number: u64) -> Self {
        Self { flow, number }
    }

    /// Batch siguiente (número + 1). `self` queda intacto.
    pub fn increment(&self) -> Self {
        Self { flow: self.flow.clone(),
               number: self.number + 1 }
    }

    /// FlowId determinista del paquete que `processor` produce en este batch.
    ///
    /// Derivado (uuid v5) del GUID del flow, del nombre del procesador y del
    /// número de batch: re-procesar el mismo batch tras una caída sobrescribe
    /// el mismo paquete, y dos procesadores del mismo flow nunca comparten
    /// archivo.
    pub fn package_flow_id(&self, processor: &str) -> FlowId {
        let id = Uuid::new_v5(&self.flow.id, format!("{processor}#{}", self.number).as_bytes());
        FlowId::with_id(id, format!("{}/{processor}#{}", self.flow.name, self.number))
    }

    /// Número de batch codificado al final del nombre de un paquete
    /// (`flow/procesador#n`).
    pub fn number_from_package_name(name: &str) -> Option<u64> {
        name.rsplit_once('#').and_then(|(_, n)| n.parse().ok())
    }
}

impl fmt::Display for FlowBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.flow.name, self.number)
    }
}
