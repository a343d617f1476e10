//! Duplex transport: one JSON message per line in, one per line out.
//!
//! Lines are handled as raw bytes, so a line that is not UTF-8 gets a parse
//! error reply instead of ending the session.

use super::TransportError;
use crate::dispatch::Dispatcher;
use crate::session::domain::TransportBinding;
use crate::session::services::SessionRegistry;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Serves one implicit session over a line-oriented byte stream.
///
/// Requests are handled strictly in order. The session closes when the input
/// reaches end of file or the loop fails.
#[derive(Debug, Clone)]
pub struct DuplexTransport {
    dispatcher: Arc<Dispatcher>,
    sessions: Arc<SessionRegistry>,
}

impl DuplexTransport {
    /// Creates a transport sharing `dispatcher` and `sessions`.
    #[must_use]
    pub const fn new(dispatcher: Arc<Dispatcher>, sessions: Arc<SessionRegistry>) -> Self {
        Self {
            dispatcher,
            sessions,
        }
    }

    /// Serves the process's standard input and output.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when stdio fails or the session cannot be
    /// created.
    pub async fn run_stdio(&self) -> Result<(), TransportError> {
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serves `reader` and `writer` until the reader closes.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when reading, writing or encoding fails, or
    /// when the session cannot be created.
    pub async fn run<R, W>(&self, reader: R, writer: W) -> Result<(), TransportError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let session = self.sessions.create_session(TransportBinding::Duplex)?;
        info!(session_id = %session.id(), "duplex transport ready");

        let outcome = self.pump(reader, writer).await;
        if let Err(err) = &outcome {
            warn!(session_id = %session.id(), error = %err, "duplex transport failed");
        }
        if let Err(err) = self.sessions.close(session.id()) {
            warn!(session_id = %session.id(), error = %err, "failed to close duplex session");
        }
        outcome
    }

    async fn pump<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), TransportError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let line = buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            let Some(response) = self.dispatcher.handle_bytes(line).await else {
                continue;
            };
            let encoded = response.to_json_line()?;
            writer.write_all(encoded.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        debug!("duplex input closed");
        Ok(())
    }
}
