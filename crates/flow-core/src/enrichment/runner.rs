use std::sync::Arc;

use super::{Enricher, EnrichmentAddress, EnrichmentLog};
use crate::errors::FlowError;
use crate::logging::{FlowLogger, LogFacade};
use crate::model::{FlowEntitySpec, FlowId};
use crate::repo::EnricherLogRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Ya existía una entrada para (tipo de salida, dirección).
    Skipped,
    Applied { count: usize },
    /// El enricher falló; queda registrado en `Exceptions` y se puede reintentar.
    Failed { message: String },
}

/// Ejecuta enrichers consultando y actualizando el `EnrichmentLog`.
#[derive(Debug)]
pub struct EnrichmentProcessor {
    logs: Arc<dyn EnricherLogRepository>,
    logger: Arc<dyn FlowLogger>,
}

impl EnrichmentProcessor {
    pub fn new(logs: Arc<dyn EnricherLogRepository>) -> Self {
        Self { logs,
               logger: LogFacade::shared("flow::enrichment") }
    }

    pub fn with_logger(mut self, logger: Arc<dyn FlowLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Aplica `enricher` salvo que el log indique que ya se aplicó para esta
    /// dirección. Los errores de repositorio se propagan; los del enricher se
    /// registran en el log.
    ///
    /// No persiste los destinos: si hay que guardarlos, usar
    /// `run_and_persist`.
    pub fn run<S, T, E>(&self,
                        flow: &FlowId,
                        enricher: &E,
                        address: &EnrichmentAddress,
                        sources: &[S],
                        targets: &mut [T])
                        -> Result<EnrichmentOutcome, FlowError>
        where S: FlowEntitySpec,
              E: Enricher<S, T> + ?Sized
    {
        self.run_and_persist(flow, enricher, address, sources, targets, |_| Ok(()))
    }

    /// Como `run`, pero tras un enriquecimiento exitoso llama a `persist` con
    /// los destinos modificados antes de guardar el log. Si `persist` falla el
    /// log no cambia y la siguiente ejecución vuelve a aplicar el enricher.
    pub fn run_and_persist<S, T, E, P>(&self,
                                       flow: &FlowId,
                                       enricher: &E,
                                       address: &EnrichmentAddress,
                                       sources: &[S],
                                       targets: &mut [T],
                                       persist: P)
                                       -> Result<EnrichmentOutcome, FlowError>
        where S: FlowEntitySpec,
              E: Enricher<S, T> + ?Sized,
              P: FnOnce(&[T]) -> Result<(), FlowError>
    {
        let source_type = S::ENTITY_NAME;
        let output_type = enricher.output_type_id();
        let mut log = self.logs
                          .get(flow, source_type)?
                          .unwrap_or_else(|| EnrichmentLog::new(flow.clone(), source_type));

        if log.get_has_been_processed(output_type, address) {
            self.logger.info(&format!("enrich:skip flow={} output={output_type} source={} target={}",
                                      flow.id, address.source_id, address.target_id));
            return Ok(EnrichmentOutcome::Skipped);
        }

        let outcome = match enricher.enrich(sources, targets) {
            Ok(count) => {
                // datos antes que el log: el log es el punto de commit
                persist(targets)?;
                log.record(output_type, address, count);
                self.logger.info(&format!("enrich:applied flow={} output={output_type} count={count}", flow.id));
                EnrichmentOutcome::Applied { count }
            }
            Err(failure) => {
                let message = failure.to_string();
                log.record_exception(output_type, address, message.clone());
                self.logger.warn(&format!("enrich:failed flow={} output={output_type} err={message}", flow.id));
                EnrichmentOutcome::Failed { message }
            }
        };
        self.logs.save(&log)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityFailure;
    use crate::repo::InMemoryEnricherLogRepository;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Rate {
        currency: String,
        factor: f64,
    }

    impl FlowEntitySpec for Rate {
        const ENTITY_NAME: &'static str = "Rate";
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Price {
        currency: String,
        amount: f64,
    }

    struct ToEuro;

    impl Enricher<Rate, Price> for ToEuro {
        fn output_type_id(&self) -> &str {
            "Price.Eur"
        }

        fn enrich(&self, sources: &[Rate], targets: &mut [Price]) -> Result<usize, EntityFailure> {
            let mut changed = 0;
            for price in targets.iter_mut().filter(|p| p.currency != "EUR") {
                let rate = sources.iter()
                                  .find(|r| r.currency == price.currency)
                                  .ok_or_else(|| EntityFailure::new(format!("no rate for {}", price.currency)))?;
                price.amount *= rate.factor;
                price.currency = "EUR".into();
                changed += 1;
            }
            Ok(changed)
        }
    }

    fn prices() -> Vec<Price> {
        vec![Price { currency: "USD".into(), amount: 10.0 }, Price { currency: "EUR".into(), amount: 5.0 }]
    }

    #[test]
    fn second_run_is_skipped() {
        let repo = Arc::new(InMemoryEnricherLogRepository::new());
        let runner = EnrichmentProcessor::new(repo.clone());
        let flow = FlowId::new("prices");
        let address = EnrichmentAddress::new("ecb-rates", "catalog");
        let rates = vec![Rate { currency: "USD".into(), factor: 0.5 }];

        let mut targets = prices();
        let first = runner.run(&flow, &ToEuro, &address, &rates, &mut targets).unwrap();
        assert_eq!(first, EnrichmentOutcome::Applied { count: 1 });
        assert_eq!(targets[0].amount, 5.0);

        let mut again = prices();
        let second = runner.run(&flow, &ToEuro, &address, &rates, &mut again).unwrap();
        assert_eq!(second, EnrichmentOutcome::Skipped);
        assert_eq!(again, prices());

        let log = repo.get(&flow, "Rate").unwrap().unwrap();
        assert_eq!(log.logs.len(), 1);
        assert_eq!(log.logs[0].count, 1);
    }

    #[test]
    fn failure_is_logged_and_retry_allowed() {
        let repo = Arc::new(InMemoryEnricherLogRepository::new());
        let runner = EnrichmentProcessor::new(repo.clone());
        let flow = FlowId::new("prices");
        let address = EnrichmentAddress::new("ecb-rates", "catalog");

        let no_rates: Vec<Rate> = vec![];
        let mut targets = prices();
        let failed = runner.run(&flow, &ToEuro, &address, &no_rates, &mut targets).unwrap();
        assert_eq!(failed, EnrichmentOutcome::Failed { message: "no rate for USD".into() });

        let rates = vec![Rate { currency: "USD".into(), factor: 2.0 }];
        let mut targets = prices();
        let retried = runner.run(&flow, &ToEuro, &address, &rates, &mut targets).unwrap();
        assert_eq!(retried, EnrichmentOutcome::Applied { count: 1 });

        let log = repo.get(&flow, "Rate").unwrap().unwrap();
        assert_eq!(log.exceptions.len(), 1);
        assert_eq!(log.logs.len(), 1);
    }

    #[test]
    fn failed_persist_leaves_the_address_unprocessed() {
        let repo = Arc::new(InMemoryEnricherLogRepository::new());
        let runner = EnrichmentProcessor::new(repo.clone());
        let flow = FlowId::new("prices");
        let address = EnrichmentAddress::new("ecb-rates", "catalog");
        let rates = vec![Rate { currency: "USD".into(), factor: 0.5 }];

        let mut targets = prices();
        let err = runner.run_and_persist(&flow, &ToEuro, &address, &rates, &mut targets, |_| {
                            Err(FlowError::Storage { path: "/readonly/Price.json".into(),
                                                     message: "permission denied".into() })
                        })
                        .unwrap_err();
        assert!(matches!(err, FlowError::Storage { .. }));
        assert!(repo.get(&flow, "Rate").unwrap().is_none());

        let mut saved: Vec<Price> = Vec::new();
        let mut targets = prices();
        let retried = runner.run_and_persist(&flow, &ToEuro, &address, &rates, &mut targets, |data| {
                                saved = data.to_vec();
                                Ok(())
                            })
                            .unwrap();
        assert_eq!(retried, EnrichmentOutcome::Applied { count: 1 });
        assert_eq!(saved[0].currency, "EUR");
        assert_eq!(repo.get(&flow, "Rate").unwrap().unwrap().logs.len(), 1);
    }

    #[test]
    fn persist_is_not_called_when_skipped_or_failed() {
        let repo = Arc::new(InMemoryEnricherLogRepository::new());
        let runner = EnrichmentProcessor::new(repo.clone());
        let flow = FlowId::new("prices");
        let address = EnrichmentAddress::new("ecb-rates", "catalog");
        let mut calls = 0;

        let no_rates: Vec<Rate> = vec![];
        let failed = runner.run_and_persist(&flow, &ToEuro, &address, &no_rates, &mut prices(), |_| {
                               calls += 1;
                               Ok(())
                           })
                           .unwrap();
        assert!(matches!(failed, EnrichmentOutcome::Failed { .. }));

        let rates = vec![Rate { currency: "USD".into(), factor: 0.5 }];
        runner.run(&flow, &ToEuro, &address, &rates, &mut prices()).unwrap();
        let skipped = runner.run_and_persist(&flow, &ToEuro, &address, &rates, &mut prices(), |_| {
                                calls += 1;
                                Ok(())
                            })
                            .unwrap();
        assert_eq!(skipped, EnrichmentOutcome::Skipped);
        assert_eq!(calls, 0);
    }

    #[test]
    fn debug_output_names_the_log_repository() {
        let runner = EnrichmentProcessor::new(Arc::new(InMemoryEnricherLogRepository::new()));
        assert!(format!("{runner:?}").contains("InMemoryEnricherLogRepository"));
    }
}
