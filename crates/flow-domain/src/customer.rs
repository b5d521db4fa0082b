// customer.rs
use flow_core::{EntityFailure, FlowEntitySpec};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Registro de cliente tal como llega del sistema origen (sin normalizar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub postal_code: String,
}

impl FlowEntitySpec for CustomerRecord {
    const ENTITY_NAME: &'static str = "CustomerRecord";
}

impl CustomerRecord {
    pub fn new(id: &str, name: &str, email: &str, postal_code: &str) -> Self {
        Self { id: id.to_string(),
               name: name.to_string(),
               email: email.to_string(),
               postal_code: postal_code.to_string() }
    }

    /// Parsea una línea `id;nombre;email;código postal`.
    pub fn parse_line(line: &str) -> Result<Self, DomainError> {
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        match fields.as_slice() {
            [id, name, email, postal_code] => Ok(Self::new(id, name, email, postal_code)),
            _ => Err(DomainError::ParseError(format!("expected 4 fields separated by ';', got {}: '{line}'",
                                                     fields.len()))),
        }
    }

    /// Parsea un bloque de texto; ignora líneas vacías y las que empiezan por `#`.
    pub fn parse_lines(text: &str) -> Result<Vec<Self>, DomainError> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(Self::parse_line)
            .collect()
    }
}

/// Cliente normalizado. `region` lo completa el enriquecimiento postal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    pub customer_id: String,
    pub display_name: String,
    pub email: String,
    pub postal_code: String,
    #[serde(default)]
    pub region: Option<String>,
}

impl FlowEntitySpec for Customer {
    const ENTITY_NAME: &'static str = "Customer";
}

impl Customer {
    /// Normaliza un registro: recorta espacios, colapsa el nombre, email en
    /// minúsculas y código postal en mayúsculas sin espacios.
    pub fn from_record(record: &CustomerRecord) -> Result<Self, DomainError> {
        let customer_id = record.id.trim().to_string();
        if customer_id.is_empty() {
            return Err(DomainError::ValidationError("customer id is empty".to_string()));
        }
        let display_name = record.name.split_whitespace().collect::<Vec<_>>().join(" ");
        if display_name.is_empty() {
            return Err(DomainError::ValidationError(format!("customer {customer_id} has no name")));
        }
        Ok(Customer { customer_id,
                      display_name,
                      email: record.email.trim().to_lowercase(),
                      postal_code: record.postal_code.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase(),
                      region: None })
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {} <{}>>", self.customer_id, self.display_name, self.email)
    }
}

/// Transform del procesador de importación.
pub fn normalize_customer(record: &CustomerRecord) -> Result<Customer, EntityFailure> {
    Customer::from_record(record).map_err(|e| EntityFailure::new(e.to_string()))
}
