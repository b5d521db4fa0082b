use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use flow_cli::{run, Cli, CliError};

fn main() {
    // Cargar .env si existe para obtener FLOW_BASE_PATH
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let base: PathBuf = cli.base.clone();
    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(CliError::NotFound(what)) => {
            eprintln!("[flow-cli] no encontrado bajo {}: {what}", base.display());
            exit(4);
        }
        Err(e) => {
            eprintln!("[flow-cli] error: {e}");
            exit(5);
        }
    }
}
