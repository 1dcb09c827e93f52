use anyhow::Context as _;
use apex_mcp_server::config::{Cli, ServerConfig, TransportKind};
use apex_mcp_server::server::ApexServer;
use apex_mcp_server::{logging, transport};
use apex_mcp_tools::ToolRegistry;
use clap::Parser as _;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(&cli.log_level, cli.log_format) {
        eprintln!("apex-mcp: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = ServerConfig::resolve(cli).context("invalid configuration")?;
    tracing::debug!(?config, "resolved configuration");

    let registry = ToolRegistry::new(config.apex.clone()).context("build tool registry")?;

    match config.transport {
        TransportKind::Stdio => transport::serve_stdio(ApexServer::new(registry))
            .await
            .context("stdio transport")?,
        TransportKind::Http => transport::serve_http(registry, &config.bind_addr())
            .await
            .context("HTTP transport")?,
    }
    Ok(())
}
