//! Especificaciones de clientes.
use flow_core::{Rule, RuleSet, UniqueBy};

use crate::Customer;

/// Reglas por entidad: email con forma `local@dominio.tld` y código postal
/// alfanumérico de 3 a 10 caracteres.
pub fn customer_rules() -> RuleSet<Customer> {
    RuleSet::new().with(Rule::new("email-format", "email must look like local@domain.tld", |c: &Customer| {
                            looks_like_email(&c.email)
                        }))
                  .with(Rule::new("postal-code", "postal code must be 3-10 alphanumeric characters", |c: &Customer| {
                            (3..=10).contains(&c.postal_code.len())
                            && c.postal_code.chars().all(|ch| ch.is_ascii_alphanumeric())
                        }))
}

/// Regla de colección: email único dentro de la página.
pub fn unique_email() -> UniqueBy<Customer> {
    UniqueBy::new("unique-email", |c: &Customer| c.email.clone())
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.starts_with('.') && domain.contains('.') && !domain.ends_with('.')
            && !domain.contains('@')
        }
        None => false,
    }
}
