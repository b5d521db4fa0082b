use flow_core::{EntityFailure, FlowEntitySpec, FlowError, FlowId, InMemoryQuerySource, PackageRepository, Processor,
                ProcessorOptions, ProcessorStatus, ProcessStateRepository, Rule, RuleSet};
use flow_persistence::{file_stores, FilePackageRepository, FileProcessStateRepository, FlowStoreConfig};
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Reading {
    sensor: String,
    value: f64,
}

impl FlowEntitySpec for Reading {
    const ENTITY_NAME: &'static str = "Reading";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Celsius {
    sensor: String,
    celsius: f64,
}

impl FlowEntitySpec for Celsius {
    const ENTITY_NAME: &'static str = "Celsius";
}

fn readings(n: usize) -> Vec<Reading> {
    (0..n).map(|i| Reading { sensor: format!("s{i}"),
                             value: 32.0 + i as f64 * 9.0 })
          .collect()
}

fn to_celsius(r: &Reading) -> Result<Celsius, EntityFailure> {
    if r.sensor.is_empty() {
        return Err(EntityFailure::new("sensor id missing"));
    }
    Ok(Celsius { sensor: r.sensor.clone(),
                 celsius: (r.value - 32.0) * 5.0 / 9.0 })
}

fn processor(cfg: &FlowStoreConfig, items: Vec<Reading>, max_batches: Option<usize>) -> Processor<Reading, Celsius> {
    named_processor(cfg, "to-celsius", items, max_batches)
}

fn named_processor(cfg: &FlowStoreConfig,
                   name: &str,
                   items: Vec<Reading>,
                   max_batches: Option<usize>)
                   -> Processor<Reading, Celsius> {
    let flow = FlowId::with_id(uuid::Uuid::nil(), "sensors");
    let mut options = ProcessorOptions::new(name).with_page_size(2);
    if let Some(max) = max_batches {
        options = options.with_max_batches(max);
    }
    Processor::builder(options, flow.clone(), file_stores(cfg))
        .source(InMemoryQuerySource::new("sensor-feed", flow, items))
        .transform(to_celsius)
        .entity_specifications(RuleSet::new().with(Rule::new("below-boiling", "must be < 100", |c: &Celsius| {
                                                       c.celsius < 100.0
                                                   })))
        .build()
        .unwrap()
}

#[test]
fn a_new_process_resumes_from_files() {
    let dir = tempdir().unwrap();
    let cfg = FlowStoreConfig::new(dir.path());

    let first = processor(&cfg, readings(5), Some(1)).start().unwrap();
    assert!(!first.completed);
    assert_eq!(first.checkpoint, 2);

    // repositorios nuevos: sólo los archivos conservan el progreso
    let second = processor(&cfg, readings(5), None).start().unwrap();
    assert_eq!(second.resumed_from, 2);
    assert!(second.completed);
    assert_eq!(second.processed, 3);

    let states = FileProcessStateRepository::new(&cfg);
    let state = states.get("to-celsius", "Reading").unwrap();
    assert_eq!(state.checkpoint, 5);
    assert_eq!(state.batch_id, 3);
    assert!(state.is_completed());

    let outputs = FilePackageRepository::<Celsius>::new(&cfg);
    assert_eq!(outputs.get().unwrap().count(), 3);
    assert_eq!(outputs.get_entities().unwrap().count(), 5);
    assert!(cfg.state_dir().join("to-celsius__Reading__sensor-feed.query.json").is_file());
}

#[test]
fn invalid_entities_land_in_the_error_package_store() {
    let dir = tempdir().unwrap();
    let cfg = FlowStoreConfig::new(dir.path());
    let report = processor(&cfg, readings_with_two_invalid(), None).start().unwrap();
    assert_eq!(report.valid, 3);
    assert_eq!(report.invalid, 2);

    let errors = FilePackageRepository::<flow_core::ProcessEntityError>::new(&cfg);
    let mut persisted: Vec<_> = errors.get_entities().unwrap().map(|e| e.unwrap()).collect();
    persisted.sort_by_key(|e| e.index);
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0].index, 3);
    assert_eq!(persisted[0].messages, vec!["below-boiling: must be < 100".to_string()]);
    assert_eq!(persisted[1].index, 4);
    assert_eq!(persisted[1].messages, vec!["sensor id missing".to_string()]);
}

fn readings_with_two_invalid() -> Vec<Reading> {
    let mut items = readings(3);
    items.push(Reading { sensor: "hot".into(),
                         value: 250.0 });
    items.push(Reading { sensor: String::new(),
                         value: 40.0 });
    items
}

#[test]
fn processors_sharing_a_flow_keep_separate_packages() {
    let dir = tempdir().unwrap();
    let cfg = FlowStoreConfig::new(dir.path());

    for name in ["first", "second"] {
        let report = named_processor(&cfg, name, readings_with_two_invalid(), None).start().unwrap();
        assert_eq!(report.valid, 3);
        assert_eq!(report.invalid, 2);
    }

    let errors = FilePackageRepository::<flow_core::ProcessEntityError>::new(&cfg);
    assert_eq!(errors.get_entities().unwrap().count(), 4);
    let outputs = FilePackageRepository::<Celsius>::new(&cfg);
    assert_eq!(outputs.get().unwrap().count(), 6);
    assert_eq!(outputs.get_entities().unwrap().count(), 6);
}

#[test]
fn corrupted_state_faults_the_processor_with_the_file_path() {
    let dir = tempdir().unwrap();
    let cfg = FlowStoreConfig::new(dir.path());
    std::fs::create_dir_all(cfg.state_dir()).unwrap();
    let state_file = cfg.state_dir().join("to-celsius__Reading.process.json");
    std::fs::write(&state_file, "{\"ProcessorName\": ").unwrap();

    let p = processor(&cfg, readings(2), None);
    match p.start() {
        Err(FlowError::Malformed { path, .. }) => assert_eq!(path, state_file),
        other => panic!("expected malformed state, got {other:?}"),
    }
    assert_eq!(p.status().unwrap(), ProcessorStatus::Faulted);
}
