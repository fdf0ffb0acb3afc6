use super::client::{GatewayClient, new_session_id};
use crate::model::ModelProvider;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

enum LoopControl {
    Continue,
    Exit,
}

struct SessionState {
    session_id: Option<String>,
}

pub async fn run<P>(client: Arc<GatewayClient<P>>) -> Result<(), StdioError>
where
    P: ModelProvider + 'static,
{
    let mut stdout = io::stdout();
    run_with(client.as_ref(), BufReader::new(io::stdin()), &mut stdout).await
}

/// Line-oriented chat loop over any reader/writer pair.
pub async fn run_with<P, R, W>(
    client: &GatewayClient<P>,
    reader: R,
    out: &mut W,
) -> Result<(), StdioError>
where
    P: ModelProvider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut state = SessionState { session_id: None };

    print_banner(out).await?;
    start_session(client, &mut state, out).await?;

    loop {
        prompt(out).await?;
        let Some(line) = lines.next_line().await? else {
            write_line(out, "\nInput closed. Leaving chat.").await?;
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            match handle_command(input, client, &mut state, out).await? {
                LoopControl::Continue => continue,
                LoopControl::Exit => break,
            }
        } else {
            handle_prompt(input, client, &state, out).await?;
        }
    }

    out.flush().await?;
    Ok(())
}

async fn start_session<P, W>(
    client: &GatewayClient<P>,
    state: &mut SessionState,
    out: &mut W,
) -> Result<(), StdioError>
where
    P: ModelProvider,
    W: AsyncWrite + Unpin,
{
    let session_id = new_session_id();
    match client.init_session(&session_id).await {
        Ok(outcome) => {
            debug!(session_id = session_id.as_str(), "Terminal session started");
            write_line(
                out,
                &format!(
                    "Session {session_id} ready with {} tool(s).",
                    outcome.tools.len()
                ),
            )
            .await?;
            state.session_id = Some(session_id);
        }
        Err(err) => {
            warn!(error = %err, "Terminal session could not be initialized");
            write_line(out, &format!("Error: {}", err.user_message())).await?;
            write_line(out, "Use /reset to try again.").await?;
            state.session_id = None;
        }
    }
    Ok(())
}

async fn handle_command<P, W>(
    input: &str,
    client: &GatewayClient<P>,
    state: &mut SessionState,
    out: &mut W,
) -> Result<LoopControl, StdioError>
where
    P: ModelProvider,
    W: AsyncWrite + Unpin,
{
    let command = input.split_whitespace().next().unwrap_or_default();
    match command {
        "/exit" | "/quit" => {
            write_line(out, "Goodbye.").await?;
            return Ok(LoopControl::Exit);
        }
        "/help" => print_help(out).await?,
        "/reset" => start_session(client, state, out).await?,
        "/tools" => match state.session_id.as_deref() {
            Some(session_id) => match client.session_tools(session_id).await {
                Ok(tools) if tools.is_empty() => write_line(out, "No tools available.").await?,
                Ok(tools) => {
                    for tool in tools {
                        write_line(
                            out,
                            &format!("- {} ({}): {}", tool.name, tool.owner_endpoint, tool.description),
                        )
                        .await?;
                    }
                }
                Err(err) => write_line(out, &format!("Error: {}", err.user_message())).await?,
            },
            None => write_line(out, "No active session. Use /reset.").await?,
        },
        other => {
            write_line(out, &format!("Unknown command '{other}'. Type /help.")).await?;
        }
    }
    Ok(LoopControl::Continue)
}

async fn handle_prompt<P, W>(
    input: &str,
    client: &GatewayClient<P>,
    state: &SessionState,
    out: &mut W,
) -> Result<(), StdioError>
where
    P: ModelProvider,
    W: AsyncWrite + Unpin,
{
    let Some(session_id) = state.session_id.as_deref() else {
        write_line(out, "No active session. Use /reset.").await?;
        return Ok(());
    };

    match client.chat(session_id, input).await {
        Ok(outcome) => {
            if let Some(tool) = outcome.tool_used.as_deref() {
                write_line(out, &format!("[tool: {tool}]")).await?;
            }
            write_line(out, &format!("Assistant: {}", outcome.response)).await?;
        }
        Err(err) => {
            write_line(out, &format!("Error: {}", err.user_message())).await?;
        }
    }
    Ok(())
}

async fn print_banner<W: AsyncWrite + Unpin>(out: &mut W) -> io::Result<()> {
    write_line(out, "MCP chat gateway - terminal mode").await?;
    write_line(out, "Type /help for commands.").await
}

async fn print_help<W: AsyncWrite + Unpin>(out: &mut W) -> io::Result<()> {
    write_line(out, "Commands:").await?;
    write_line(out, "  /help   Show this help").await?;
    write_line(out, "  /tools  List tools available to this session").await?;
    write_line(out, "  /reset  Start a new session").await?;
    write_line(out, "  /exit   Quit").await
}

async fn prompt<W: AsyncWrite + Unpin>(out: &mut W) -> io::Result<()> {
    out.write_all(b"> ").await?;
    out.flush().await
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}
