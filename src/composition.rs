//! Funciones de composición: construyen procesadores y repositorios sobre una
//! `FlowStoreConfig` explícita.

use std::sync::Arc;

use flow_core::{EnricherLogRepository, EnrichmentAddress, EnrichmentOutcome, EnrichmentProcessor, FlowError, FlowId,
                FlowLogger, InMemoryQuerySource, Package, PackageRepository, Processor, ProcessorOptions,
                ProcessorReport};
use flow_domain::{customer_rules, normalize_customer, unique_email, Customer, CustomerRecord, PostalCode,
                  PostalRegionEnricher};
use flow_persistence::{file_stores, FileEnricherLogRepository, FilePackageRepository, FlowStoreConfig};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;

pub const CUSTOMER_IMPORT: &str = "customer-import";
pub const CUSTOMER_SOURCE: &str = "crm-export";
pub const POSTAL_SOURCE: &str = "postal-codes";

/// Flow estable entre ejecuciones: reanudar reescribe los mismos paquetes.
pub fn customer_import_flow() -> FlowId {
    FlowId::with_id(Uuid::new_v5(&Uuid::NAMESPACE_OID, b"flowbatch.customer-import"), CUSTOMER_IMPORT)
}

pub fn customer_import_processor(config: &FlowStoreConfig,
                                 flow: FlowId,
                                 records: Vec<CustomerRecord>,
                                 logger: Option<Arc<dyn FlowLogger>>)
                                 -> Result<Processor<CustomerRecord, Customer>, FlowError> {
    let mut builder = Processor::builder(ProcessorOptions::new(CUSTOMER_IMPORT).with_page_size(config.page_size),
                                         flow.clone(),
                                         file_stores(config))
        .source(InMemoryQuerySource::new(CUSTOMER_SOURCE, flow, records))
        .transform(normalize_customer)
        .entity_specifications(customer_rules())
        .collection_specifications(unique_email());
    if let Some(logger) = logger {
        builder = builder.logger(logger);
    }
    builder.build()
}

pub fn enrichment_processor(config: &FlowStoreConfig, logger: Option<Arc<dyn FlowLogger>>) -> EnrichmentProcessor {
    let logs: Arc<dyn EnricherLogRepository> = Arc::new(FileEnricherLogRepository::new(config));
    let runner = EnrichmentProcessor::new(logs);
    match logger {
        Some(logger) => runner.with_logger(logger),
        None => runner,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportSummary {
    pub report: ProcessorReport,
    pub enriched_packages: usize,
    pub skipped_packages: usize,
    pub failed_packages: usize,
    pub enriched_customers: usize,
}

/// Importa clientes y completa su región paquete a paquete. Cada paquete de
/// salida es un destino de enriquecimiento distinto, así que una segunda
/// ejecución sólo enriquece los paquetes nuevos.
pub fn run_customer_import(config: &FlowStoreConfig,
                           flow: FlowId,
                           records: Vec<CustomerRecord>,
                           postal_codes: &[PostalCode],
                           logger: Option<Arc<dyn FlowLogger>>)
                           -> Result<ImportSummary, AppError> {
    let processor = customer_import_processor(config, flow.clone(), records, logger.clone())?;
    let report = processor.start()?;

    let customers = FilePackageRepository::<Customer>::new(config);
    let packages = customers.get()?.collect::<Result<Vec<_>, FlowError>>()?;
    let runner = enrichment_processor(config, logger);
    let mut summary = ImportSummary { report,
                                      enriched_packages: 0,
                                      skipped_packages: 0,
                                      failed_packages: 0,
                                      enriched_customers: 0 };
    for mut package in packages {
        let address = EnrichmentAddress::new(POSTAL_SOURCE, package.flow_id.id.to_string());
        let package_flow = package.flow_id.clone();
        let outcome = runner.run_and_persist(&flow,
                                             &PostalRegionEnricher,
                                             &address,
                                             postal_codes,
                                             &mut package.data,
                                             |enriched| customers.save(&Package::new(package_flow, enriched.to_vec())))?;
        match outcome {
            EnrichmentOutcome::Skipped => summary.skipped_packages += 1,
            EnrichmentOutcome::Applied { count } => {
                summary.enriched_packages += 1;
                summary.enriched_customers += count;
            }
            EnrichmentOutcome::Failed { .. } => summary.failed_packages += 1,
        }
    }
    Ok(summary)
}
