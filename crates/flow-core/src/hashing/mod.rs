//! Helpers de hashing (claves estables para nombres de archivo).

pub mod hash;

pub use hash::{hash_str, short_hash};
