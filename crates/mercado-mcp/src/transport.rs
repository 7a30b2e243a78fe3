//! Stdio transport
//!
//! One JSON-RPC message per line in each direction. Requests are answered
//! strictly in arrival order; the session ends when the input reaches EOF.

use crate::{McpServer, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Serve requests read from `reader`, writing replies to `writer`
pub async fn serve<R, W>(server: &McpServer, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled = 0_u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        handled += 1;
        if let Some(reply) = server.handle_bytes(line).await {
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    debug!(messages = handled, "Input closed");
    Ok(())
}

/// Serve on the process's stdin/stdout
pub async fn serve_stdio(server: &McpServer) -> Result<()> {
    info!(
        server = %server.info().name,
        version = %server.info().version,
        "Serving MCP over stdio"
    );
    serve(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    info!("MCP session ended");
    Ok(())
}
