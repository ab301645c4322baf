use anyhow::Result;
use clap::Parser;
use rback::{app, cli::Cli, config::TelemetryConfig, telemetry};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    telemetry::init(&TelemetryConfig::from_env());

    let config = Cli::parse().into_config()?;
    info!(
        namespace = %config.render.namespace,
        output = ?config.output,
        "Starting rback"
    );

    match app::run(&config) {
        Ok(rendered) => {
            print!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(error = %err, "Rendering failed");
            eprintln!("rback: {}", err);
            // Retrieval failures (kubectl, files) exit 2, everything else 1.
            Ok(ExitCode::from(if err.is_retrieval() { 2 } else { 1 }))
        }
    }
}
