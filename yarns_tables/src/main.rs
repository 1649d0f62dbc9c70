// Yarns lookup table generator: CLI entry point.
//
// Builds every resource table and writes them out as JSON and/or a C++
// header/source pair.
//
// Usage:
//   cargo run -p yarns_tables --bin generate -- [--out-dir DIR]
//     [--config FILE] [--format json|cpp|all]
//
// Log verbosity follows RUST_LOG (default `yarns_tables=info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use yarns_tables::emit::{self, OutputFormat};
use yarns_tables::{GeneratorConfig, Result, generate_all};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("yarns_tables=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let out_dir = flag_value(args, "--out-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let format: OutputFormat = match flag_value(args, "--format") {
        Some(f) => f.parse()?,
        None => OutputFormat::default(),
    };
    let config = match flag_value(args, "--config") {
        Some(path) => load_config(Path::new(path))?,
        None => GeneratorConfig::default(),
    };

    let tables = generate_all(&config)?;
    emit::write_all(&tables, &out_dir, format)?;
    Ok(())
}

fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let json = std::fs::read_to_string(path)?;
    GeneratorConfig::from_json(&json)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
