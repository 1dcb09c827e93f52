use anyhow::Context as _;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

pub use apex_mcp_test_support::{KillOnDrop, MockApex};

pub const TEST_TOKEN: &str = "integration-token";

#[allow(dead_code)]
pub fn pick_unused_port() -> anyhow::Result<u16> {
    apex_mcp_test_support::pick_unused_port()
}

#[allow(dead_code)]
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    apex_mcp_test_support::wait_http_ok(url, timeout_dur).await
}

/// `apex-mcp` with a clean environment: nothing leaks in from the developer's shell.
pub fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_apex-mcp"));
    for var in [
        "APEX_MCP_CONFIG",
        "APEX_API_KEY",
        "APEX_API_URL",
        "MCP_TRANSPORT",
        "HOST",
        "PORT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.arg("--log-level").arg("debug");
    cmd
}

#[allow(dead_code)]
pub fn spawn_http_server(api_url: &str, port: u16) -> anyhow::Result<Child> {
    server_command()
        .arg("--transport")
        .arg("http")
        .arg("--api-key")
        .arg(TEST_TOKEN)
        .arg("--api-url")
        .arg(api_url)
        .arg("--host")
        .arg("127.0.0.1")
        .arg("--port")
        .arg(port.to_string())
        .stdin(Stdio::null())
        .spawn()
        .context("spawn apex-mcp (http)")
}

/// Start the HTTP transport against `api_url` and wait for `/health`.
#[allow(dead_code)]
pub async fn start_http_server(api_url: &str) -> anyhow::Result<(String, KillOnDrop)> {
    let port = pick_unused_port()?;
    let child = KillOnDrop(spawn_http_server(api_url, port)?);
    let base_url = format!("http://127.0.0.1:{port}");
    wait_http_ok(&format!("{base_url}/health"), Duration::from_secs(20)).await?;
    Ok((base_url, child))
}
