use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use backend_bootstrap::{default_tail_url, init_tracing, run_server, run_tail, AppContext};
use backend_infrastructure::{AppConfig, CONFIG_PATH_ENV};

#[derive(Parser, Debug)]
#[command(name = "anomaly-dashboard")]
#[command(about = "Transaction anomaly dashboard backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard API (default)
    Serve,
    /// Poll a running server's live stream and log each transaction
    Tail {
        /// Base URL of the server; defaults to the configured bind address
        #[arg(long)]
        url: Option<String>,
        /// Stop after this many polls
        #[arg(long)]
        polls: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = &args.config {
        std::env::set_var(CONFIG_PATH_ENV, config);
    }

    let config = AppConfig::load().await?;
    let _guard = init_tracing(args.log_json, config.log_dir().as_deref());

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(AppContext::new(&config)).await,
        Command::Tail { url, polls } => {
            let url = url.unwrap_or_else(|| default_tail_url(&config.bind_addr));
            let feed = run_tail(&config.to_runtime_config(), &url, polls).await?;
            info!(received = feed.len(), connected = feed.is_connected(), "tail finished");
            Ok(())
        }
    }
}
