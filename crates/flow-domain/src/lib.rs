// flow-domain: entidades de ejemplo (importación de clientes)
pub mod customer;
pub mod error;
pub mod postal;
pub mod rules;
pub mod sample;

pub use customer::{normalize_customer, Customer, CustomerRecord};
pub use error::DomainError;
pub use postal::{PostalCode, PostalRegionEnricher, REGION_OUTPUT_TYPE};
pub use rules::{customer_rules, unique_email};
pub use sample::{sample_customers, sample_postal_codes};
