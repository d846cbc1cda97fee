use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use rvb_agent_core::{handlers, models::request::Request, models::response::Response, parameters};
use rvb_catalog::{catalog::Catalog, default_agent};

/// Patching agent: reads one JSON request from stdin and answers on stdout.
/// Patch runs answer with a stream of Server-Sent-Event frames instead of a
/// JSON response; everything else answers with one JSON line. Logs go to
/// stderr so stdout stays parseable.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Root directory holding the bundled JDK, patcher CLI, dependencies,
    /// dump tool and APK work directory.
    #[arg(long, default_value = "revanced")]
    root: PathBuf,
}

fn write_response(response: &Response) -> Result<()> {
    let mut lock = std::io::stdout().lock();
    serde_json::to_writer(&mut lock, response).context("Serializing JSON response")?;
    writeln!(lock)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    parameters::init_parameters(&cli.root);

    info!("Fetching patch catalog");
    let catalog = Catalog::fetch_or_empty(default_agent::get_agent());

    let mut line = String::new();
    BufReader::new(std::io::stdin())
        .read_line(&mut line)
        .context("Reading request")?;
    let request: Request = serde_json::from_str(&line).context("Parsing request")?;

    let mut stdout = std::io::stdout();
    match handlers::handle_request(&catalog, request, &mut stdout) {
        Ok(Some(response)) => write_response(&response)?,
        Ok(None) => {} // Patch runs stream their frames directly.
        Err(err) => error!("{err:?}"),
    }

    Ok(())
}
