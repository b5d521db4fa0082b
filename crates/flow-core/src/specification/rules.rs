use std::collections::HashSet;
use std::fmt;

use super::{CollectionSpecificationProvider, CollectionValidationResult, EntitySpecificationProvider, ValidationResult};

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type KeyFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Regla con nombre: predicado + mensaje cuando no se cumple.
pub struct Rule<T> {
    name: String,
    message: String,
    predicate: Predicate<T>,
}

impl<T> Rule<T> {
    pub fn new<F>(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
        where F: Fn(&T) -> bool + Send + Sync + 'static
    {
        Self { name: name.into(),
               message: message.into(),
               predicate: Box::new(predicate) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_satisfied_by(&self, entity: &T) -> bool {
        (self.predicate)(entity)
    }

    fn violation(&self) -> String {
        format!("{}: {}", self.name, self.message)
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).field("message", &self.message).finish()
    }
}

/// Conjunto ordenado de reglas por entidad. Los mensajes conservan el orden de
/// declaración.
#[derive(Debug)]
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self { rules: vec![] }
    }

    pub fn with(mut self, rule: Rule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntitySpecificationProvider<T> for RuleSet<T> {
    fn validate(&self, entity: &T) -> ValidationResult {
        let messages: Vec<String> = self.rules
                                        .iter()
                                        .filter(|r| !r.is_satisfied_by(entity))
                                        .map(Rule::violation)
                                        .collect();
        if messages.is_empty() {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(messages)
        }
    }
}

/// Regla de colección: la clave debe ser única; se marcan las apariciones
/// posteriores a la primera.
pub struct UniqueBy<T> {
    name: String,
    key: KeyFn<T>,
}

impl<T> UniqueBy<T> {
    pub fn new<F>(name: impl Into<String>, key: F) -> Self
        where F: Fn(&T) -> String + Send + Sync + 'static
    {
        Self { name: name.into(),
               key: Box::new(key) }
    }
}

impl<T> fmt::Debug for UniqueBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueBy").field("name", &self.name).finish()
    }
}

impl<T> CollectionSpecificationProvider<T> for UniqueBy<T> {
    fn validate(&self, entities: &[T]) -> CollectionValidationResult {
        let mut result = CollectionValidationResult::valid();
        let mut seen = HashSet::new();
        for (position, entity) in entities.iter().enumerate() {
            let key = (self.key)(entity);
            if !seen.insert(key.clone()) {
                result.add_violation(position, format!("{}: duplicate key '{key}'", self.name));
            }
        }
        result
    }
}

/// Proveedor que acepta todo (por defecto en ambos niveles).
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<T> EntitySpecificationProvider<T> for AcceptAll {
    fn validate(&self, _entity: &T) -> ValidationResult {
        ValidationResult::valid()
    }
}

impl<T> CollectionSpecificationProvider<T> for AcceptAll {
    fn validate(&self, _entities: &[T]) -> CollectionValidationResult {
        CollectionValidationResult::valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positive_even() -> RuleSet<i64> {
        RuleSet::new().with(Rule::new("positive", "must be > 0", |v: &i64| *v > 0))
                      .with(Rule::new("even", "must be even", |v: &i64| v % 2 == 0))
    }

    #[test]
    fn rule_set_reports_every_violated_rule_in_order() {
        let rules = positive_even();
        assert!(rules.validate(&4).is_valid);
        let r = rules.validate(&-3);
        assert!(!r.is_valid);
        assert_eq!(r.messages, vec!["positive: must be > 0".to_string(), "even: must be even".to_string()]);
    }

    #[test]
    fn unique_by_flags_later_duplicates() {
        let spec = UniqueBy::<&str>::new("unique-code", |s| s.to_lowercase());
        let r = spec.validate(&["a", "B", "A", "c", "b"]);
        assert!(!r.is_valid);
        assert!(!r.rejects_whole_collection());
        assert_eq!(r.violations.keys().copied().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn rejected_collection_has_no_positions() {
        let r = CollectionValidationResult::rejected(vec!["batch total mismatch".into()]);
        assert!(r.rejects_whole_collection());
    }
}
