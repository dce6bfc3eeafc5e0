//! The toast interface back to the host.

use async_trait::async_trait;
use copilot_usage_core::{Toast, ToastRequest};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::NotifyError;

/// Shows toasts in the host UI.
///
/// This is the only host capability the reporter needs.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Shows a toast. The reporter awaits the call but only logs failures.
    async fn show_toast(&self, toast: Toast) -> Result<(), NotifyError>;
}

/// Writes each toast as one `{"body": {...}}` JSON line.
#[derive(Debug)]
pub struct JsonLinesNotifier<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesNotifier<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> Notifier for JsonLinesNotifier<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn show_toast(&self, toast: Toast) -> Result<(), NotifyError> {
        let mut line = serde_json::to_vec(&ToastRequest::from(toast))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;

        debug!(bytes = line.len(), "Toast written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_usage_core::ToastVariant;

    #[tokio::test]
    async fn test_writes_one_line_per_toast() {
        let notifier = JsonLinesNotifier::new(Vec::new());
        notifier
            .show_toast(Toast::warning("Failed to fetch quota"))
            .await
            .unwrap();
        notifier
            .show_toast(Toast::usage("bar 10%\n30/300 • 270 left", ToastVariant::Info))
            .await
            .unwrap();

        let output = String::from_utf8(notifier.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: ToastRequest = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.body.message, "Failed to fetch quota");
        assert_eq!(first.body.variant, ToastVariant::Warning);

        let second: ToastRequest = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.body.title, "Copilot Premium Requests");
        assert!(second.body.message.contains('\n'));
    }
}
