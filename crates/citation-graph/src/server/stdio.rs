//! Stdio transport.
//!
//! One action message per line in, one action message per line out.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::handlers::ActionDispatcher;

/// Serve action messages over stdin/stdout until stdin closes.
pub async fn run_stdio(dispatcher: &ActionDispatcher) -> anyhow::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    tracing::info!("Stdio server ready, waiting for actions...");
    serve_lines(dispatcher, reader, &mut stdout).await
}

/// Serve action messages from any line-oriented reader.
pub async fn serve_lines<R, W>(
    dispatcher: &ActionDispatcher,
    mut reader: R,
    writer: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            tracing::info!("Input closed, shutting down");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        for reply in dispatcher.dispatch_text(trimmed).await {
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;
    }

    Ok(())
}
