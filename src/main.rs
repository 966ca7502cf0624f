use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use node_daemon::config::loader::load_or_default;
use node_daemon::observability::{logging, metrics};
use node_daemon::{Daemon, DaemonConfig, Interrupts, LocalNodeFactory};

#[derive(Parser)]
#[command(name = "node-daemon")]
#[command(about = "Peer-to-peer node daemon", long_about = None)]
struct Cli {
    /// Node configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a long-running daemon process
    Daemon {
        /// Command API bind address, overrides `[api] address`
        #[arg(long)]
        api: Option<String>,

        /// Swarm listen address, replaces `[swarm] listen_addresses` for this run
        #[arg(long)]
        swarmlisten: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let node_config = load_or_default(cli.config.as_deref())?;

    logging::init(&node_config.observability.log_level);
    tracing::info!("node-daemon v{} starting", env!("CARGO_PKG_VERSION"));

    if node_config.observability.metrics_enabled {
        match node_config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %node_config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.command {
        Commands::Daemon { api, swarmlisten } => {
            let config = DaemonConfig::from_node_config(&node_config, api, swarmlisten);
            tracing::info!(
                api_bind_address = %config.api_bind_address,
                swarm_listen_override = ?config.swarm_listen_override,
                "Configuration loaded"
            );

            let (events_tx, mut events_rx) = mpsc::unbounded_channel();
            let printer = tokio::spawn(async move {
                while let Some(event) = events_rx.recv().await {
                    println!("{}", event);
                }
            });

            let daemon = Daemon::new(
                node_config,
                config,
                LocalNodeFactory,
                Interrupts::os(),
                events_tx,
            );
            let result = daemon.run().await;
            let _ = printer.await;

            match result {
                Ok(outcome) => {
                    for diagnostic in outcome.diagnostics() {
                        tracing::warn!(error = %diagnostic, "Shutdown diagnostic");
                    }
                    tracing::info!("Shutdown complete");
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!(error = %e, "Fatal api server fault, aborting");
                    eprintln!("fatal: {}", e);
                    std::process::abort();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
