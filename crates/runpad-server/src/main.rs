//! runpad server binary
//!
//! Serves the execute/share API in front of a Piston-compatible execution engine.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use runpad_core::{ConfigLoader, PistonExecutor, RunpadConfig};
use runpad_server::{shutdown_signal, AppState, RunpadServer, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[clap(author, version, about = "runpad - run and share code snippets through a remote execution engine")]
struct Cli {
    #[clap(long, short, help = "YAML configuration file (defaults apply when omitted)")]
    config: Option<PathBuf>,

    #[clap(long, help = "Address to listen on, overrides server.bind_addr")]
    bind_addr: Option<String>,

    #[clap(long, help = "Base URL of the execution engine, overrides engine.url")]
    engine_url: Option<String>,

    #[clap(long, help = "Engine request timeout in seconds, overrides engine.timeout_secs")]
    engine_timeout: Option<u64>,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn apply_overrides(&self, config: &mut RunpadConfig) {
        if let Some(ref bind_addr) = self.bind_addr {
            config.server.bind_addr = bind_addr.clone();
        }
        if let Some(ref engine_url) = self.engine_url {
            config.engine.url = engine_url.clone();
        }
        if let Some(timeout) = self.engine_timeout {
            config.engine.timeout_secs = timeout;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .parse_default_env()
        .init();

    let mut config = match cli.config {
        Some(ref path) => {
            log::info!("Loading configuration from file: {}", path.display());
            ConfigLoader::load(Some(path.as_path())).await?
        }
        None => {
            log::info!("No configuration file given, using defaults");
            ConfigLoader::load(None).await?
        }
    };
    cli.apply_overrides(&mut config);
    config.validate()?;

    let executor = PistonExecutor::new(&config.engine)?;
    log::info!(
        "Execution engine: {} (timeout {}s)",
        executor.execute_url(),
        config.engine.timeout_secs
    );

    let state = AppState::new(Arc::new(executor))?;
    let server_config = ServerConfig::from_settings(&config.server)?;

    log::info!("Configuration:");
    log::info!("  Bind address: {}", server_config.bind_addr);
    log::info!("  CORS enabled: {}", server_config.enable_cors);
    log::info!("  Max body size: {} bytes", server_config.max_body_size);
    log::info!("  Logging enabled: {}", server_config.enable_logging);

    let server = RunpadServer::with_config(state, server_config);

    if let Err(e) = server.serve_with_shutdown(shutdown_signal()).await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
