use crate::model::EntityFailure;

/// Pasada de enriquecimiento: aplica datos de `sources` sobre `targets`.
pub trait Enricher<S, T>: Send + Sync {
    /// Identificador del tipo de salida que produce esta pasada; clave de
    /// idempotencia en el `EnrichmentLog`.
    fn output_type_id(&self) -> &str;

    /// Devuelve cuántas entidades destino se modificaron.
    fn enrich(&self, sources: &[S], targets: &mut [T]) -> Result<usize, EntityFailure>;
}
