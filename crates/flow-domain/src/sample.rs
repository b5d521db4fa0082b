//! Datos de ejemplo para el binario `main-core` y los tests end-to-end.
use crate::{CustomerRecord, PostalCode};

pub fn sample_customers() -> Vec<CustomerRecord> {
    vec![CustomerRecord::new("c-001", "Ana  García", "Ana.Garcia@example.com", "28013"),
         CustomerRecord::new("c-002", "Luis Pérez", "luis@example.com", "08001"),
         CustomerRecord::new("c-003", "", "nobody@example.com", "41001"),
         CustomerRecord::new("c-004", "Marta Ruiz", "marta-at-example.com", "46001"),
         CustomerRecord::new("c-005", "Ana G.", "ana.garcia@example.com", "28013"),
         CustomerRecord::new("c-006", "Jon Etxebarria", "jon@example.com", "48001"),
         CustomerRecord::new("c-007", "Sara Gil", "sara@example.com", "50001")]
}

pub fn sample_postal_codes() -> Vec<PostalCode> {
    vec![PostalCode::new("28013", "Madrid"),
         PostalCode::new("08001", "Barcelona"),
         PostalCode::new("41001", "Sevilla"),
         PostalCode::new("46001", "Valencia"),
         PostalCode::new("48001", "Bizkaia")]
}
