//! Tipos de entidad que participan en un flow.
//!
//! `FlowEntitySpec` se implementa para cada tipo de datos que viaja en
//! paquetes; su `ENTITY_NAME` es la clave estable usada en nombres de archivo.
//! `FlowEntity` es la descripción en runtime (nombre + tipo cualificado +
//! instante de creación).

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub trait FlowEntitySpec: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Nombre estable (no cambiar sin migrar los archivos existentes).
    const ENTITY_NAME: &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlowEntity {
    pub name: String,
    pub type_id: String,
    pub created_at: DateTime<Utc>,
}

impl FlowEntity {
    pub fn of<T: FlowEntitySpec>() -> Self {
        Self { name: T::ENTITY_NAME.to_string(),
               type_id: std::any::type_name::<T>().to_string(),
               created_at: Utc::now() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Serialize, Deserialize)]
    struct Invoice {
        number: u32,
    }

    impl FlowEntitySpec for Invoice {
        const ENTITY_NAME: &'static str = "Invoice";
    }

    #[test]
    fn flow_entity_describes_type() {
        let e = FlowEntity::of::<Invoice>();
        assert_eq!(e.name(), "Invoice");
        assert!(e.type_id.ends_with("Invoice"));
    }
}
