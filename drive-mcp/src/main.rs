//! drive-mcp - Google Drive MCP server
//!
//! Serves Drive tools over stdio (default) or streamable HTTP.

use anyhow::Context;
use clap::Parser;
use drive_core::{DriveApi, DriveClient, auth::Authenticator};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod authorize;
mod cli;
mod config;
mod mcp;
mod state;

use cli::{Cli, Commands, ServeArgs};
use config::{Config, Transport};
use mcp::DriveMcpServer;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the stdio transport
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter()?)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    info!("Config loaded from {:?}", config.config_path);

    match cli.command() {
        Commands::Auth => authorize::run(&config).await,
        Commands::Serve(args) => serve(config, args).await,
    }
}

/// `RUST_LOG` plus info level for this binary and the Drive library
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("drive_mcp=info".parse()?)
        .add_directive("drive_core=info".parse()?))
}

async fn serve(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(transport) = args.transport {
        config.server.transport = transport;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    info!("drive-mcp v{}", env!("CARGO_PKG_VERSION"));

    let auth = Authenticator::from_files(&config.auth.client_secret_path, &config.auth.token_path)
        .context("unable to load Drive credentials")?;
    let client = DriveClient::with_base_urls(
        auth,
        config.drive.api_base_url.as_str(),
        config.drive.upload_base_url.as_str(),
    )?;

    match client.about().await {
        Ok(about) => match about.user.and_then(|u| u.email_address) {
            Some(email) => info!("Connected to Drive as {}", email),
            None => info!("Connected to Drive"),
        },
        Err(e) => warn!("Drive connectivity check failed: {}", e),
    }

    let state = Arc::new(AppState::new(Arc::new(client)));
    let server = DriveMcpServer::new(state);

    match config.server.transport {
        Transport::Stdio => mcp::transport::run_stdio(server).await,
        Transport::Http => mcp::transport::run_http(server, &config.server.bind).await,
    }
}
