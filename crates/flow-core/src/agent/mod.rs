//! Agentes de larga duración y su agregado.
//!
//! `AgentAggregate` arranca los agentes en serie (orden de inserción) y los
//! detiene en orden inverso. Detener un agente que nunca arrancó, o arrancar
//! uno que ya corre, es un error de precondición.

mod aggregate;
mod processor_agent;

pub use aggregate::AgentAggregate;
pub use processor_agent::ProcessorAgent;

use crate::errors::FlowError;

pub trait Agent: Send {
    fn name(&self) -> &str;
    fn start(&mut self) -> Result<(), FlowError>;
    fn stop(&mut self) -> Result<(), FlowError>;
    fn is_running(&self) -> bool;
}
