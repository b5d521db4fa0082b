//! Especificaciones de negocio (validación por predicados).
//!
//! El `Processor` consume dos proveedores:
//! - `EntitySpecificationProvider`: valida cada entidad transformada.
//! - `CollectionSpecificationProvider`: valida la página ya filtrada; puede
//!   señalar entidades concretas (`violations`) o rechazar la colección
//!   completa (`is_valid == false` sin violaciones).

mod rules;

pub use rules::{AcceptAll, Rule, RuleSet, UniqueBy};

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub messages: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { is_valid: true,
               messages: vec![] }
    }

    pub fn invalid(messages: Vec<String>) -> Self {
        Self { is_valid: false,
               messages }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionValidationResult {
    pub is_valid: bool,
    pub messages: Vec<String>,
    /// Posición dentro del slice validado -> mensajes de reglas violadas.
    pub violations: BTreeMap<usize, Vec<String>>,
}

impl CollectionValidationResult {
    pub fn valid() -> Self {
        Self { is_valid: true,
               messages: vec![],
               violations: BTreeMap::new() }
    }

    /// Rechazo de la colección completa (sin señalar entidades).
    pub fn rejected(messages: Vec<String>) -> Self {
        Self { is_valid: false,
               messages,
               violations: BTreeMap::new() }
    }

    pub fn add_violation(&mut self, position: usize, message: impl Into<String>) {
        self.is_valid = false;
        self.violations.entry(position).or_default().push(message.into());
    }

    pub fn rejects_whole_collection(&self) -> bool {
        !self.is_valid && self.violations.is_empty()
    }
}

impl Default for CollectionValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

pub trait EntitySpecificationProvider<T>: Send + Sync {
    fn validate(&self, entity: &T) -> ValidationResult;
}

pub trait CollectionSpecificationProvider<T>: Send + Sync {
    fn validate(&self, entities: &[T]) -> CollectionValidationResult;
}
