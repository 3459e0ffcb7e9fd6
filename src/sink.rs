use crate::errors::AggregationError;
use arboard::Clipboard;
use async_trait::async_trait;
use tokio::io::{self, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Destination for a finished rendering.
#[async_trait]
pub trait ContentSink: Send + Sync {
    async fn write(&self, text: &str) -> Result<(), AggregationError>;

    /// Name used in status messages.
    fn destination(&self) -> &'static str {
        "clipboard"
    }
}

pub struct ClipboardSink {}

impl ClipboardSink {
    pub fn new() -> Self {
        ClipboardSink {}
    }
}

impl Default for ClipboardSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentSink for ClipboardSink {
    async fn write(&self, text: &str) -> Result<(), AggregationError> {
        debug!("Initializing clipboard");
        let mut clipboard =
            Clipboard::new().map_err(|e| AggregationError::ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| AggregationError::ClipboardError(e.to_string()))?;
        debug!("Clipboard updated ({} bytes)", text.len());
        Ok(())
    }
}

/// Writes the rendering to standard output, for pipes and headless sessions.
///
/// Nothing else goes to the writer; prompts and logs use stderr.
pub struct StdoutSink<W = io::Stdout> {
    out: Mutex<W>,
}

impl StdoutSink {
    pub fn new() -> Self {
        StdoutSink::with_writer(io::stdout())
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> StdoutSink<W> {
    pub fn with_writer(out: W) -> Self {
        StdoutSink {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> ContentSink for StdoutSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write(&self, text: &str) -> Result<(), AggregationError> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }

    fn destination(&self) -> &'static str {
        "stdout"
    }
}

/// Fire-and-forget status line for the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
    fn error(&self, message: &str);
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}
