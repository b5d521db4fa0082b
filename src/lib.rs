//! flowbatch
//!
//! Composición del núcleo `flow-core` con el backend de archivos
//! (`flow-persistence`) y el dominio de ejemplo (`flow-domain`).
//! El binario `main-core` usa estas funciones; los tests end-to-end también.

pub mod composition;
pub mod errors;

pub use composition::{customer_import_flow, customer_import_processor, enrichment_processor, run_customer_import,
                      ImportSummary};
pub use errors::AppError;
