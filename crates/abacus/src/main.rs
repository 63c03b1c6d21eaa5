//! Abacus - entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use abacus_config::{AbacusConfig, ConfigLoader, ENV_PREFIX};
use abacus_server::ShutdownSignal;
use clap::Parser;

/// Calculation service with a paginated result history.
#[derive(Parser, Debug)]
#[command(name = "abacus", version, about)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short, long, env = "ABACUS_CONFIG")]
    config: Option<PathBuf>,

    /// Load results at startup and save them on shutdown
    #[arg(long)]
    persist: bool,

    /// Where the results snapshot lives
    #[arg(long)]
    store_path: Option<PathBuf>,

    /// Bind address, e.g. 127.0.0.1:8080
    #[arg(long)]
    addr: Option<String>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<AbacusConfig> {
        let mut loader = ConfigLoader::new().with_dotenv();
        if let Some(path) = &self.config {
            loader = loader.with_file(path)?;
        }
        let mut config = loader.with_env_prefix(ENV_PREFIX).load()?;

        if self.persist {
            config.store.persist = true;
        }
        if let Some(path) = &self.store_path {
            config.store.path.clone_from(path);
        }
        if let Some(addr) = &self.addr {
            config.server.http_addr.clone_from(addr);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("abacus: invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = abacus_telemetry::init_logging(&config.log_config()) {
        eprintln!("abacus: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(version = abacus::VERSION, address = %config.server.http_addr, "starting abacus");

    match abacus::run(&config, ShutdownSignal::with_os_signals()).await {
        Ok(()) => {
            tracing::info!("shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "abacus stopped with an error");
            ExitCode::FAILURE
        }
    }
}
