use std::sync::Arc;

use super::Agent;
use crate::errors::FlowError;
use crate::logging::{FlowLogger, LogFacade};

pub struct AgentAggregate {
    agents: Vec<Box<dyn Agent>>,
    started: bool,
    logger: Arc<dyn FlowLogger>,
}

impl AgentAggregate {
    pub fn new() -> Self {
        Self { agents: vec![],
               started: false,
               logger: LogFacade::shared("flow::agents") }
    }

    pub fn with_logger(mut self, logger: Arc<dyn FlowLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn add<A: Agent + 'static>(&mut self, agent: A) -> &mut Self {
        self.agents.push(Box::new(agent));
        self
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    /// Arranca todos los agentes en orden. Si uno falla, detiene los que ya
    /// arrancaron (orden inverso) y devuelve el error original.
    pub fn start_all(&mut self) -> Result<(), FlowError> {
        if self.started {
            return Err(FlowError::InvalidState("agent aggregate already started".into()));
        }
        for i in 0..self.agents.len() {
            let name = self.agents[i].name().to_string();
            self.logger.info(&format!("agent:start name={name}"));
            if let Err(e) = self.agents[i].start() {
                self.logger.error(&format!("agent:start_failed name={name} err={e}"));
                for started in self.agents[..i].iter_mut().rev() {
                    if let Err(stop_err) = started.stop() {
                        self.logger.warn(&format!("agent:rollback_failed name={} err={stop_err}", started.name()));
                    }
                }
                return Err(e);
            }
        }
        self.started = true;
        Ok(())
    }

    /// Detiene los agentes en marcha en orden inverso.
    pub fn stop_all(&mut self) -> Result<(), FlowError> {
        if !self.started {
            return Err(FlowError::InvalidState("agent aggregate was never started".into()));
        }
        for agent in self.agents.iter_mut().rev() {
            if agent.is_running() {
                self.logger.info(&format!("agent:stop name={}", agent.name()));
                agent.stop()?;
            }
        }
        self.started = false;
        Ok(())
    }
}

impl Default for AgentAggregate {
    fn default() -> Self {
        Self::new()
    }
}
