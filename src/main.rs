use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use flow_domain::{sample_customers, sample_postal_codes, CustomerRecord};
use flow_persistence::FlowStoreConfig;
use flowbatch::{customer_import_flow, run_customer_import, AppError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// `main-core [clientes.txt]`: importa el fichero indicado (líneas
/// `id;nombre;email;cp`) o los datos de ejemplo, bajo `FLOW_BASE_PATH`.
fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("main-core failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let config = FlowStoreConfig::from_env()?;
    let records = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            let text = fs::read_to_string(&path).map_err(|source| AppError::Io { path: path.clone(), source })?;
            CustomerRecord::parse_lines(&text)?
        }
        None => sample_customers(),
    };
    info!(base = %config.base_path.display(), page_size = config.page_size, records = records.len(), "customer import");

    let summary = run_customer_import(&config, customer_import_flow(), records, &sample_postal_codes(), None)?;
    info!(valid = summary.report.valid,
          invalid = summary.report.invalid,
          enriched = summary.enriched_customers,
          "customer import finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
