use anyhow::Result;
use clap::{Parser, Subcommand};
use reel_cli::RenderOptions;
use reel_common::config::Config;
use reel_common::logging::init_logging;
use std::path::PathBuf;

/// Reel Check - find where viewers swipe away from a drama script.
#[derive(Parser, Debug)]
#[command(name = "reel")]
#[command(version)]
#[command(about = "Diagnose short-form drama scripts for rhythm, emotion, and retention.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score scripts with the rule engine and print JSON reports
    Analyze {
        /// Script files to analyze (reads stdin if none provided)
        files: Vec<PathBuf>,

        /// Include per-dimension scores, issues, and evidence candidates
        #[arg(long)]
        breakdown: bool,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Start the HTTP gateway
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            files,
            breakdown,
            compact,
        } => {
            init_logging("warn", "pretty");
            reel_cli::run_analyze(&files, RenderOptions { breakdown, compact })
        }
        Commands::Serve { host, port } => {
            let mut config = Config::load_and_validate()?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            init_logging(&config.observability.log_level, &config.observability.log_format);
            tracing::info!("Reel Check v{}", env!("CARGO_PKG_VERSION"));

            reel_gateway::start_server(&config).await
        }
    }
}
