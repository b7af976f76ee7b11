//! Interactive terminal console — the operator side of the command loop.
//!
//! Stdin is read on a dedicated OS thread and forwarded over a channel, so a
//! pending read never holds up runtime shutdown (e.g. after Ctrl-C).

use std::io::BufRead;

use tokio::io::{AsyncWrite, AsyncWriteExt as _};
use tokio::sync::mpsc;

use ddd_app::ports::CommandSource;
use ddd_domain::error::DddError;

/// Prompt printed before every line.
pub const PROMPT: &str = "ddd> ";

/// Prompting line reader implementing [`CommandSource`].
pub struct Console<W> {
    lines: mpsc::Receiver<std::io::Result<String>>,
    out: W,
}

impl Console<tokio::io::Stdout> {
    /// Console reading stdin and prompting on stdout.
    #[must_use]
    pub fn stdio() -> Self {
        let (tx, rx) = mpsc::channel(1);
        std::thread::spawn(move || forward_lines(std::io::stdin().lock(), &tx));
        Self::new(rx, tokio::io::stdout())
    }
}

/// Forward every line of `reader` until end-of-input, a read error or the
/// receiver going away.
///
/// Bytes that are not UTF-8 are replaced rather than rejected, so a garbled
/// line reaches the session as an unknown command.
fn forward_lines<R: BufRead>(mut reader: R, tx: &mpsc::Sender<std::io::Result<String>>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let line = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => Ok(decode_line(&buf)),
            Err(err) => Err(err),
        };
        let failed = line.is_err();
        if tx.blocking_send(line).is_err() || failed {
            break;
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

impl<W> Console<W> {
    /// Console over an arbitrary line channel and prompt writer.
    pub fn new(lines: mpsc::Receiver<std::io::Result<String>>, out: W) -> Self {
        Self { lines, out }
    }
}

fn transport(err: std::io::Error) -> DddError {
    DddError::Transport(Box::new(err))
}

impl<W: AsyncWrite + Unpin + Send> CommandSource for Console<W> {
    async fn next_line(&mut self) -> Result<Option<String>, DddError> {
        self.out
            .write_all(PROMPT.as_bytes())
            .await
            .map_err(transport)?;
        self.out.flush().await.map_err(transport)?;

        match self.lines.recv().await {
            Some(line) => line.map(Some).map_err(transport),
            None => {
                // Leave the terminal on a fresh line after end-of-input.
                self.out.write_all(b"\n").await.map_err(transport)?;
                self.out.flush().await.map_err(transport)?;
                Ok(None)
            }
        }
    }
}
