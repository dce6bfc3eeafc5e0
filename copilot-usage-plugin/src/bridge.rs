//! Newline-delimited JSON transport.
//!
//! Each input line is one host event. Toasts go back through the
//! reporter's notifier.

use copilot_usage_core::HostEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::handler::UsageReporter;
use crate::notifier::Notifier;

/// Feeds every event line from `reader` to the reporter until EOF.
///
/// Blank lines are skipped. Lines that are not UTF-8 or not a valid event
/// are logged and skipped. Returns the number of events handled.
///
/// # Errors
///
/// Returns an error only if reading from `reader` fails.
pub async fn run_event_loop<R, N>(
    mut reader: R,
    reporter: &mut UsageReporter<N>,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    N: Notifier,
{
    let mut buf = Vec::new();
    let mut handled = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!(error = %e, "Skipping event line that is not UTF-8");
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        let event = match HostEvent::from_json(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Skipping malformed event line");
                continue;
            }
        };

        let outcome = reporter.handle_event(&event).await;
        debug!(event = event.kind(), ?outcome, "Event handled");
        handled += 1;
    }

    Ok(handled)
}
