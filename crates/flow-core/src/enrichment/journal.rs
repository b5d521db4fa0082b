use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::FlowId;

/// Par (fuente, destino) sobre el que se aplica una pasada.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrichmentAddress {
    pub source_id: String,
    pub target_id: String,
}

impl EnrichmentAddress {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self { source_id: source_id.into(),
               target_id: target_id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrichmentLogEntry {
    pub output_type_id: String,
    pub source_address_id: String,
    pub target_address_id: String,
    pub enriched_at: DateTime<Utc>,
    pub count: usize,
}

impl EnrichmentLogEntry {
    fn matches(&self, output_type_id: &str, address: &EnrichmentAddress) -> bool {
        self.output_type_id == output_type_id
        && self.source_address_id == address.source_id
        && self.target_address_id == address.target_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrichmentException {
    pub output_type_id: String,
    pub source_address_id: String,
    pub target_address_id: String,
    pub raised_at: DateTime<Utc>,
    pub message: String,
}

/// Log de enriquecimientos de un (flow, tipo de entidad fuente).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrichmentLog {
    pub flow: FlowId,
    pub source_entity_type: String,
    #[serde(default)]
    pub logs: Vec<EnrichmentLogEntry>,
    #[serde(default)]
    pub exceptions: Vec<EnrichmentException>,
}

impl EnrichmentLog {
    pub fn new(flow: FlowId, source_entity_type: impl Into<String>) -> Self {
        Self { flow,
               source_entity_type: source_entity_type.into(),
               logs: vec![],
               exceptions: vec![] }
    }

    /// Verdadero sólo si existe una entrada con el mismo tipo de salida y la
    /// misma dirección fuente y destino.
    pub fn get_has_been_processed(&self, output_type_id: &str, address: &EnrichmentAddress) -> bool {
        self.logs.iter().any(|e| e.matches(output_type_id, address))
    }

    pub fn record(&mut self, output_type_id: &str, address: &EnrichmentAddress, count: usize) -> &EnrichmentLogEntry {
        self.logs.push(EnrichmentLogEntry { output_type_id: output_type_id.to_string(),
                                            source_address_id: address.source_id.clone(),
                                            target_address_id: address.target_id.clone(),
                                            enriched_at: Utc::now(),
                                            count });
        &self.logs[self.logs.len() - 1]
    }

    pub fn record_exception(&mut self, output_type_id: &str, address: &EnrichmentAddress, message: impl Into<String>) {
        self.exceptions.push(EnrichmentException { output_type_id: output_type_id.to_string(),
                                                   source_address_id: address.source_id.clone(),
                                                   target_address_id: address.target_id.clone(),
                                                   raised_at: Utc::now(),
                                                   message: message.into() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with_region_pass() -> EnrichmentLog {
        let mut log = EnrichmentLog::new(FlowId::new("customers"), "PostalRegion");
        log.record("Customer.Region", &EnrichmentAddress::new("regions-2024", "customers"), 12);
        log
    }

    #[test]
    fn processed_only_on_exact_match() {
        let log = log_with_region_pass();
        assert!(log.get_has_been_processed("Customer.Region", &EnrichmentAddress::new("regions-2024", "customers")));
    }

    #[test]
    fn any_differing_field_is_not_processed() {
        let log = log_with_region_pass();
        assert!(!log.get_has_been_processed("Customer.Segment", &EnrichmentAddress::new("regions-2024", "customers")));
        assert!(!log.get_has_been_processed("Customer.Region", &EnrichmentAddress::new("regions-2025", "customers")));
        assert!(!log.get_has_been_processed("Customer.Region", &EnrichmentAddress::new("regions-2024", "suppliers")));
    }

    #[test]
    fn exceptions_do_not_count_as_processed() {
        let mut log = EnrichmentLog::new(FlowId::new("customers"), "PostalRegion");
        let address = EnrichmentAddress::new("regions-2024", "customers");
        log.record_exception("Customer.Region", &address, "region table empty");
        assert!(!log.get_has_been_processed("Customer.Region", &address));
        assert_eq!(log.exceptions.len(), 1);
    }

    #[test]
    fn document_shape() {
        let json = serde_json::to_value(log_with_region_pass()).unwrap();
        for field in ["Flow", "SourceEntityType", "Logs", "Exceptions"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
