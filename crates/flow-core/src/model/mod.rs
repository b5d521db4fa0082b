//! Modelos neutrales del flow (identificadores, paquetes, estado, errores).

pub mod entity;
pub mod ids;
pub mod package;
pub mod records;
pub mod state;

pub use entity::{FlowEntity, FlowEntitySpec};
pub use ids::{FlowBatch, FlowId};
pub use package::Package;
pub use records::{EntityFailure, ProcessEntityError, ProcessError};
pub use state::{FlowProcessState, QueryResponseState};
