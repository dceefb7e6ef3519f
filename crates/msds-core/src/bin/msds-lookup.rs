//! msds-lookup
//!
//! Resolve one chemical against KOSHA and PubChem and print the merged
//! record as JSON.

use clap::Parser;
use msds_core::{
    ChemicalDataService, IdentifierKind, QueryResult, Section, ServiceConfig, SourceId,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "msds-lookup", version, about = "Look up MSDS data by CAS number or name")]
struct Args {
    /// CAS number (e.g. 71-43-2), or a chemical name with --name
    identifier: String,

    /// Treat the identifier as a chemical name
    #[arg(long)]
    name: bool,

    /// Only fetch one section
    #[arg(long, value_name = "physical|toxicity|ecological")]
    section: Option<Section>,

    /// Config file (defaults to the user config dir, if present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override which source wins during merge
    #[arg(long, value_name = "kosha|pubchem")]
    primary: Option<SourceId>,
}

fn load_config(args: &Args) -> Result<ServiceConfig, msds_core::ConfigError> {
    let config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => match ServiceConfig::default_path().filter(|p| p.exists()) {
            Some(path) => ServiceConfig::load(path)?,
            None => ServiceConfig::default(),
        },
    };
    Ok(config.from_env())
}

fn print<T: Serialize>(result: &QueryResult<T>) -> Result<bool, serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(result.success)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(&args)?;
    if let Some(primary) = args.primary {
        config.primary = primary;
    }

    let service = ChemicalDataService::from_config(&config)?;
    let kind = if args.name {
        IdentifierKind::Name
    } else {
        IdentifierKind::Cas
    };

    let id = args.identifier.as_str();
    let success = match args.section {
        None => print(&service.fetch(id, kind).await)?,
        Some(Section::Physical) => print(&service.fetch_physical_properties(id, kind).await)?,
        Some(Section::Toxicity) => print(&service.fetch_toxicity(id, kind).await)?,
        Some(Section::Ecological) => print(&service.fetch_ecological(id, kind).await)?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
