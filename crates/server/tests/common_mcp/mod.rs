use anyhow::Context as _;
use futures::StreamExt as _;
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _};
use tokio_util::io::StreamReader;

const PROTOCOL_VERSION: &str = "2024-11-05";

fn initialize_request() -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "id": 0,
        "method": "initialize",
        "params": {
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": { "name": "apex-mcp-integration-tests", "version": "0" }
        }
    })
}

/// Minimal MCP client for the streamable HTTP endpoint (`/mcp`).
///
/// The server runs in stateless mode, so a session id is only echoed back when the server
/// hands one out.
#[allow(dead_code)]
pub struct McpStreamableHttpSession {
    client: reqwest::Client,
    base_url: String,
    session_id: Option<String>,
}

#[allow(dead_code)]
impl McpStreamableHttpSession {
    pub async fn connect(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();

        let init_resp = post_mcp(&client, &base_url, None, initialize_request()).await?;
        let session_id = init_resp
            .headers()
            .get("Mcp-Session-Id")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        let init_msg = read_json_message(init_resp).await?;
        anyhow::ensure!(init_msg.get("id") == Some(&json!(0)), "unexpected init id");
        anyhow::ensure!(
            init_msg.pointer("/result/serverInfo/name") == Some(&json!("apex-mcp")),
            "unexpected initialize result: {init_msg}"
        );

        let initialized_resp = post_mcp(
            &client,
            &base_url,
            session_id.as_deref(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .await?;
        anyhow::ensure!(
            initialized_resp.status().is_success(),
            "POST /mcp notifications/initialized returned {}",
            initialized_resp.status()
        );

        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    pub async fn request(
        &self,
        id: u64,
        method: &str,
        params: serde_json::Value,
        timeout_dur: Duration,
    ) -> anyhow::Result<serde_json::Value> {
        let resp = post_mcp(
            &self.client,
            &self.base_url,
            self.session_id.as_deref(),
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params,
            }),
        )
        .await?;

        tokio::time::timeout(timeout_dur, read_json_message(resp))
            .await
            .context("timeout waiting for response")?
    }
}

/// MCP client speaking newline-delimited JSON-RPC to a child process.
#[allow(dead_code)]
pub struct McpStdioSession {
    child: tokio::process::Child,
    stdin: tokio::process::ChildStdin,
    lines: tokio::io::Lines<tokio::io::BufReader<tokio::process::ChildStdout>>,
}

#[allow(dead_code)]
impl McpStdioSession {
    pub async fn start(mut cmd: tokio::process::Command) -> anyhow::Result<Self> {
        let mut child = cmd
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .context("spawn stdio server")?;
        let stdin = child.stdin.take().context("child stdin")?;
        let stdout = child.stdout.take().context("child stdout")?;

        let mut session = Self {
            child,
            stdin,
            lines: tokio::io::BufReader::new(stdout).lines(),
        };

        session.send(&initialize_request()).await?;
        let init = session.read_response(0, Duration::from_secs(10)).await?;
        anyhow::ensure!(
            init.pointer("/result/serverInfo/name") == Some(&json!("apex-mcp")),
            "unexpected initialize result: {init}"
        );
        session
            .send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;
        Ok(session)
    }

    pub async fn request(
        &mut self,
        id: u64,
        method: &str,
        params: serde_json::Value,
        timeout_dur: Duration,
    ) -> anyhow::Result<serde_json::Value> {
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;
        self.read_response(id, timeout_dur).await
    }

    /// Close stdin and wait for the process to exit.
    pub async fn shutdown(mut self) -> anyhow::Result<std::process::ExitStatus> {
        drop(self.stdin);
        let status = tokio::time::timeout(Duration::from_secs(10), self.child.wait())
            .await
            .context("timeout waiting for stdio server to exit")??;
        Ok(status)
    }

    async fn send(&mut self, msg: &serde_json::Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(msg)?;
        line.push(b'\n');
        self.stdin.write_all(&line).await.context("write stdin")?;
        self.stdin.flush().await.context("flush stdin")?;
        Ok(())
    }

    async fn read_response(
        &mut self,
        id: u64,
        timeout_dur: Duration,
    ) -> anyhow::Result<serde_json::Value> {
        tokio::time::timeout(timeout_dur, next_response(&mut self.lines, id))
            .await
            .context("timeout waiting for stdio response")?
    }
}

#[allow(dead_code)]
async fn next_response(
    lines: &mut tokio::io::Lines<tokio::io::BufReader<tokio::process::ChildStdout>>,
    id: u64,
) -> anyhow::Result<serde_json::Value> {
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let msg: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("stdout is not JSON-RPC: {line}"))?;
        if msg.get("id") == Some(&json!(id)) {
            return Ok(msg);
        }
    }
    anyhow::bail!("stdout closed before response {id}")
}

/// `result.content[0].text` of a `tools/call` response.
pub fn tool_call_text(msg: &serde_json::Value) -> anyhow::Result<String> {
    msg.pointer("/result/content/0/text")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .with_context(|| format!("tools/call missing result.content[0].text: {msg}"))
}

pub fn tool_call_is_error(msg: &serde_json::Value) -> bool {
    msg.pointer("/result/isError")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

#[allow(dead_code)]
async fn post_mcp(
    client: &reqwest::Client,
    base_url: &str,
    session_id: Option<&str>,
    body: serde_json::Value,
) -> anyhow::Result<reqwest::Response> {
    let mut req = client
        .post(format!("{}/mcp", base_url.trim_end_matches('/')))
        .header("Accept", "application/json, text/event-stream")
        .header("Content-Type", "application/json")
        .json(&body);

    if let Some(session_id) = session_id {
        req = req.header("Mcp-Session-Id", session_id);
    }

    req.send()
        .await
        .context("POST /mcp")?
        .error_for_status()
        .context("POST /mcp status")
}

/// Read one JSON-RPC message from either a plain JSON body or an event stream.
#[allow(dead_code)]
async fn read_json_message(resp: reqwest::Response) -> anyhow::Result<serde_json::Value> {
    let is_json = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if is_json {
        return resp.json().await.context("parse JSON response");
    }

    let mut stream = resp.bytes_stream();
    let byte_stream = futures::stream::poll_fn(move |cx| stream.poll_next_unpin(cx))
        .map(|r| r.map_err(std::io::Error::other));
    let reader = StreamReader::new(byte_stream);
    let mut lines = tokio::io::BufReader::new(reader).lines();

    let mut data_lines: Vec<String> = Vec::new();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim_end().to_string();

        if line.is_empty() {
            if data_lines.is_empty() {
                continue;
            }
            let data = data_lines.join("\n");
            let msg: serde_json::Value =
                serde_json::from_str(&data).context("parse event-stream data as JSON")?;
            // Skip priming events and notifications; return the first response.
            if msg.get("id").is_some() {
                return Ok(msg);
            }
            data_lines.clear();
            continue;
        }

        if let Some(v) = line.strip_prefix("data:") {
            let v = v.trim();
            if !v.is_empty() {
                data_lines.push(v.to_string());
            }
        }
    }

    anyhow::bail!("event-stream ended without a JSON-RPC response")
}
