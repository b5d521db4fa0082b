//! Hash helpers – abstracción para permitir cambiar de algoritmo sin tocar resto del core.

use blake3::Hasher;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Primeros 16 caracteres hex del hash; suficiente para derivar nombres de
/// archivo a partir de identificadores arbitrarios.
pub fn short_hash(input: &str) -> String {
    let mut full = hash_str(input);
    full.truncate(16);
    full
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_is_stable_prefix() {
        let a = short_hash("https://crm.example.org/customers?page=1");
        let b = short_hash("https://crm.example.org/customers?page=1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(hash_str("https://crm.example.org/customers?page=1").starts_with(&a));
    }
}
