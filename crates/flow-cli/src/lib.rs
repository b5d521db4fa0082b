//! Inspección de un directorio de trabajo de flows: estados, paquetes y logs
//! de enriquecimiento. Imprime documentos JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flow_core::{EnricherLogRepository, FlowError, FlowId, ProcessStateRepository, QueryResponseStateRepository};
use flow_persistence::{package_files, FileEnricherLogRepository, FileProcessStateRepository,
                       FileQueryResponseStateRepository, FlowStoreConfig};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "flow-cli")]
#[command(version, about = "Inspect a flow working directory")]
pub struct Cli {
    /// Directorio base (packages/, state/, enrichment/)
    #[arg(long, env = "FLOW_BASE_PATH", default_value = "./flow-data")]
    pub base: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Checkpoint de un procesador para un tipo de entidad
    State {
        #[arg(long)]
        processor: String,
        #[arg(long)]
        entity: String,
    },
    /// Cursor de una fuente
    QueryState {
        #[arg(long)]
        processor: String,
        #[arg(long)]
        entity: String,
        #[arg(long)]
        source: String,
    },
    /// Resumen de los paquetes de un tipo de entidad
    Packages {
        #[arg(long)]
        entity: String,
    },
    /// Log de enriquecimiento de un flow
    Enrichment {
        #[arg(long)]
        flow: Uuid,
        #[arg(long = "source-entity")]
        source_entity: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

fn to_pretty<V: serde::Serialize>(value: &V) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Flow(e.into()))
}

pub fn run(cli: &Cli) -> Result<String, CliError> {
    let config = FlowStoreConfig::new(&cli.base);
    match &cli.command {
        Command::State { processor, entity } => {
            let repo = FileProcessStateRepository::new(&config);
            if !repo.path_for(processor, entity).exists() {
                return Err(CliError::NotFound(format!("state {processor}/{entity}")));
            }
            to_pretty(&repo.get(processor, entity)?)
        }
        Command::QueryState { processor, entity, source } => {
            let repo = FileQueryResponseStateRepository::new(&config);
            if !repo.path_for(processor, entity, source).exists() {
                return Err(CliError::NotFound(format!("query state {processor}/{entity}/{source}")));
            }
            to_pretty(&repo.get(processor, entity, source, config.page_size)?)
        }
        Command::Packages { entity } => to_pretty(&package_summary(&config, entity)?),
        Command::Enrichment { flow, source_entity } => {
            let repo = FileEnricherLogRepository::new(&config);
            let flow = FlowId::with_id(*flow, "");
            match repo.get(&flow, source_entity)? {
                Some(log) => to_pretty(&log),
                None => Err(CliError::NotFound(format!("enrichment log {}/{source_entity}", flow.id))),
            }
        }
    }
}

/// Los paquetes se leen como JSON genérico: la CLI no conoce los tipos de
/// entidad concretos.
fn package_summary(config: &FlowStoreConfig, entity: &str) -> Result<Value, CliError> {
    let files = package_files(config, entity)?;
    let mut packages = Vec::with_capacity(files.len());
    let mut total = 0usize;
    for path in files {
        let raw = std::fs::read_to_string(&path).map_err(|e| FlowError::Storage { path: path.clone(),
                                                                                    message: e.to_string() })?;
        let doc: Value = serde_json::from_str(&raw).map_err(|e| FlowError::Malformed { path: path.clone(),
                                                                                          message: e.to_string() })?;
        let items = doc.get("Data").and_then(Value::as_array).map_or(0, Vec::len);
        total += items;
        packages.push(serde_json::json!({
            "File": path.file_name().and_then(|n| n.to_str()).unwrap_or_default(),
            "FlowId": doc.get("FlowId").cloned().unwrap_or(Value::Null),
            "Items": items,
        }));
    }
    Ok(serde_json::json!({ "Entity": entity, "Packages": packages, "TotalItems": total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::{FlowEntitySpec, FlowProcessState, Package, PackageRepository};
    use flow_persistence::FilePackageRepository;
    use serde::{Deserialize, Serialize};
    use tempfile::tempdir;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Item(u32);

    impl FlowEntitySpec for Item {
        const ENTITY_NAME: &'static str = "Item";
    }

    fn cli(base: &std::path::Path, command: Command) -> Cli {
        Cli { base: base.to_path_buf(),
              command }
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["flow-cli", "--base", "/tmp/x", "state", "--processor", "p", "--entity", "E"])
            .unwrap();
        assert_eq!(cli.base, PathBuf::from("/tmp/x"));
        assert!(matches!(cli.command, Command::State { .. }));
    }

    #[test]
    fn missing_state_is_not_found() {
        let dir = tempdir().unwrap();
        let out = run(&cli(dir.path(), Command::State { processor: "p".into(),
                                                        entity: "E".into() }));
        assert!(matches!(out, Err(CliError::NotFound(_))));
    }

    #[test]
    fn prints_state_and_package_summary() {
        let dir = tempdir().unwrap();
        let config = FlowStoreConfig::new(dir.path());
        let mut state = FlowProcessState::new("p");
        state.advance(1, 2);
        FileProcessStateRepository::new(&config).save("Item", &state).unwrap();
        FilePackageRepository::<Item>::new(&config).save(&Package::new(FlowId::new("f"), vec![Item(1), Item(2)]))
                                                   .unwrap();

        let out = run(&cli(dir.path(), Command::State { processor: "p".into(),
                                                        entity: "Item".into() })).unwrap();
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["Checkpoint"], 2);

        let out = run(&cli(dir.path(), Command::Packages { entity: "Item".into() })).unwrap();
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["TotalItems"], 2);
        assert_eq!(json["Packages"].as_array().unwrap().len(), 1);
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Tagged(u32);

    impl FlowEntitySpec for Tagged {
        const ENTITY_NAME: &'static str = "crm::Tagged";
    }

    #[test]
    fn package_summary_uses_the_stored_file_key() {
        let dir = tempdir().unwrap();
        let config = FlowStoreConfig::new(dir.path());
        FilePackageRepository::<Tagged>::new(&config).save(&Package::new(FlowId::new("f"), vec![Tagged(7)]))
                                                     .unwrap();

        let out = run(&cli(dir.path(), Command::Packages { entity: "crm::Tagged".into() })).unwrap();
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["TotalItems"], 1);
    }

    #[test]
    fn unreadable_packages_directory_is_reported() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("packages"), "not a directory").unwrap();

        let out = run(&cli(dir.path(), Command::Packages { entity: "Item".into() }));
        assert!(matches!(out, Err(CliError::Flow(FlowError::Storage { .. }))));
    }
}
