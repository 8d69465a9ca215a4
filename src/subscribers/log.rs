//! # LogWriter: events as `tracing` records
//!
//! A subscriber that renders every [`Event`] as a structured `tracing` record.
//! Install any `tracing` subscriber in the application to see them.
//!
//! ## Levels
//! - `warn`: session-id misuse (`DuplicateSession`, `SessionNotFound`), stream and subscriber overflow
//! - `error`: `StreamFailed`, `SubscriberPanicked`
//! - `info`: session lifecycle, headphone connection changes
//! - `debug`: stream lifecycle and configuration

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let session = e.session.as_deref().unwrap_or("unknown");
        let sensor = e.sensor.map(|s| s.as_str()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::DuplicateSession => {
                tracing::warn!(seq = e.seq, session, "session already exists; create ignored");
            }
            EventKind::SessionNotFound => {
                tracing::warn!(
                    seq = e.seq,
                    session,
                    sensor,
                    operation = e.operation.unwrap_or("unknown"),
                    "session not found; operations must happen between create and destroy"
                );
            }
            EventKind::SessionCreated => {
                tracing::info!(seq = e.seq, session, "session created");
            }
            EventKind::SessionDestroyed => {
                tracing::info!(seq = e.seq, session, reason, "session destroyed");
            }
            EventKind::StreamStarted => {
                let queue = e.queue.as_ref().map(ToString::to_string).unwrap_or_default();
                tracing::debug!(seq = e.seq, session, sensor, queue = queue.as_str(), "stream started");
            }
            EventKind::StreamAlreadyActive => {
                tracing::debug!(seq = e.seq, session, sensor, "stream already active; start ignored");
            }
            EventKind::StreamStopped => {
                tracing::debug!(seq = e.seq, session, sensor, reason, "stream stopped");
            }
            EventKind::StreamFailed => {
                tracing::error!(seq = e.seq, session, sensor, reason, "stream failed");
            }
            EventKind::StreamOverflow => {
                tracing::warn!(seq = e.seq, session, sensor, reason, "stream reader behind; dropping newest");
            }
            EventKind::IntervalChanged => {
                tracing::debug!(seq = e.seq, session, sensor, interval = reason, "update interval set");
            }
            EventKind::HeadphoneConnected => {
                tracing::info!(seq = e.seq, session, "headphones connected");
            }
            EventKind::HeadphoneDisconnected => {
                tracing::info!(seq = e.seq, session, "headphones disconnected");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(subscriber = session, reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(subscriber = session, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn handles_every_kind_without_a_tracing_subscriber() {
        let w = LogWriter::new();
        for kind in [
            EventKind::DuplicateSession,
            EventKind::SessionNotFound,
            EventKind::StreamStarted,
            EventKind::StreamFailed,
            EventKind::StreamOverflow,
            EventKind::SubscriberPanicked,
        ] {
            w.on_event(&Event::new(kind).with_session("A")).await;
        }
        assert_eq!(w.name(), "LogWriter");
    }
}
