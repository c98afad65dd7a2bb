//! voxgate - AI gateway with chunked-audio transcription
//!
//! Loads the YAML configuration, initializes logging and runs the HTTP
//! server until interrupted.

use clap::Parser;
use std::process::ExitCode;
use voxgate::server;
use voxgate::utils::logging;

#[derive(Parser)]
#[command(name = "voxgate", version, about = "AI gateway with chunked-audio transcription")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short = 'c', long = "config", default_value = "config.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init("info");

    match server::run_server(&cli.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
