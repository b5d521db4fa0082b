//! Enriquecimiento de región a partir de códigos postales.
use std::collections::HashMap;

use flow_core::{EntityFailure, Enricher, FlowEntitySpec};
use serde::{Deserialize, Serialize};

use crate::Customer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostalCode {
    pub code: String,
    pub region: String,
}

impl FlowEntitySpec for PostalCode {
    const ENTITY_NAME: &'static str = "PostalCode";
}

impl PostalCode {
    pub fn new(code: &str, region: &str) -> Self {
        Self { code: code.to_uppercase(),
               region: region.to_string() }
    }
}

/// Completa `Customer::region` para los clientes sin región cuyo código
/// postal aparece en la tabla. Sin tabla no hay nada que aplicar y se
/// considera un fallo.
#[derive(Debug, Default)]
pub struct PostalRegionEnricher;

pub const REGION_OUTPUT_TYPE: &str = "Customer.Region";

impl Enricher<PostalCode, Customer> for PostalRegionEnricher {
    fn output_type_id(&self) -> &str {
        REGION_OUTPUT_TYPE
    }

    fn enrich(&self, sources: &[PostalCode], targets: &mut [Customer]) -> Result<usize, EntityFailure> {
        if sources.is_empty() {
            return Err(EntityFailure::new("postal code table is empty"));
        }
        let regions: HashMap<&str, &str> = sources.iter().map(|p| (p.code.as_str(), p.region.as_str())).collect();
        let mut enriched = 0;
        for customer in targets.iter_mut().filter(|c| c.region.is_none()) {
            if let Some(region) = regions.get(customer.postal_code.as_str()) {
                customer.region = Some(region.to_string());
                enriched += 1;
            }
        }
        Ok(enriched)
    }
}
