use crate::model::EntityFailure;

/// Transformación de una entidad de entrada a una de salida.
///
/// El fallo es un valor (`EntityFailure`), no un pánico: el procesador lo
/// registra y sigue con la siguiente entidad. Debe ser idempotente, porque la
/// última página de una ejecución interrumpida se vuelve a procesar.
pub trait Transform<TIn, TOut>: Send + Sync {
    fn transform(&self, input: &TIn) -> Result<TOut, EntityFailure>;
}

impl<TIn, TOut, F> Transform<TIn, TOut> for F where F: Fn(&TIn) -> Result<TOut, EntityFailure> + Send + Sync
{
    fn transform(&self, input: &TIn) -> Result<TOut, EntityFailure> {
        self(input)
    }
}
