//! # Runtime events emitted by the session registry.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Session events**: creation and destruction of sessions
//! - **Misuse reports**: duplicate creation, operations on unknown sessions
//! - **Stream events**: subscription start, stop, failure, configuration
//! - **Accessory events**: headphone connect/disconnect
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! session label, the sensor kind, the operation and a reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Hardware callbacks publish from arbitrary threads, so use
//! `seq` to restore the exact order.
//!
//! ## Example
//! ```rust
//! use motionvisor::{Event, EventKind, SensorKind};
//!
//! let ev = Event::new(EventKind::SessionNotFound)
//!     .with_session("\"A\"")
//!     .with_sensor(SensorKind::Gyro)
//!     .with_operation("start_updates");
//!
//! assert_eq!(ev.kind, EventKind::SessionNotFound);
//! assert_eq!(ev.operation, Some("start_updates"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::hardware::{DeliveryQueue, SensorKind};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `session`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `session`: subscriber name
    /// - `reason`: "full" or "closed"
    SubscriberOverflow,

    // === Session events ===
    /// A session was created and now owns a capability handle.
    ///
    /// Sets:
    /// - `session`: session label
    SessionCreated,

    /// A session was destroyed; its streams were stopped and its handle released.
    ///
    /// Sets:
    /// - `session`: session label
    /// - `reason`: what triggered it ("destroy", "connection_dropped", "registry_dropped")
    SessionDestroyed,

    // === Misuse reports ===
    /// `create` was called for an id that is already live. State is unchanged.
    ///
    /// Sets:
    /// - `session`: session label
    DuplicateSession,

    /// An operation referenced an unknown session id.
    ///
    /// Sets:
    /// - `session`: session label
    /// - `operation`: name of the failing operation
    /// - `sensor`: sensor kind, when the operation targets one
    SessionNotFound,

    // === Stream events ===
    /// Hardware delivery started for a new subscription.
    ///
    /// Sets:
    /// - `session`, `sensor`, `queue`
    StreamStarted,

    /// A start was ignored because the (session, sensor) pair already has a subscriber.
    ///
    /// Sets:
    /// - `session`, `sensor`
    StreamAlreadyActive,

    /// A subscription ended normally (explicit stop, stream dropped, session destroyed).
    ///
    /// Sets:
    /// - `session`, `sensor`
    /// - `reason`: "stop", "dropped" or "session_destroyed"
    StreamStopped,

    /// A subscription was terminated by a hardware delivery error.
    ///
    /// Sets:
    /// - `session`, `sensor`
    /// - `reason`: hardware error message
    StreamFailed,

    /// A stream's queue was full and readings are being dropped. Published once
    /// per run of dropped readings.
    ///
    /// Sets:
    /// - `session`, `sensor` (absent for connection events)
    /// - `reason`: "full" or "connection_events_full"
    StreamOverflow,

    /// An update interval was applied to a session's source.
    ///
    /// Sets:
    /// - `session`, `sensor`
    /// - `reason`: interval rendering
    IntervalChanged,

    // === Accessory events ===
    /// A headphone accessory connected.
    ///
    /// Sets:
    /// - `session`
    HeadphoneConnected,

    /// A headphone accessory disconnected.
    ///
    /// Sets:
    /// - `session`
    HeadphoneDisconnected,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Session label (`Debug` rendering of the id), or subscriber name.
    pub session: Option<Arc<str>>,
    /// Sensor kind, if applicable.
    pub sensor: Option<SensorKind>,
    /// Operation that produced the event (for misuse reports).
    pub operation: Option<&'static str>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
    /// Delivery queue of a started stream.
    pub queue: Option<DeliveryQueue>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            session: None,
            sensor: None,
            operation: None,
            reason: None,
            queue: None,
        }
    }

    /// Attaches a session label.
    #[inline]
    pub fn with_session(mut self, session: impl Into<Arc<str>>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Attaches a sensor kind.
    #[inline]
    pub fn with_sensor(mut self, sensor: SensorKind) -> Self {
        self.sensor = Some(sensor);
        self
    }

    /// Attaches the operation name.
    #[inline]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a delivery queue.
    #[inline]
    pub fn with_queue(mut self, queue: DeliveryQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_session(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_session(subscriber)
            .with_reason(info)
    }

    /// True for reports of session-id misuse.
    #[inline]
    pub fn is_misuse(&self) -> bool {
        matches!(
            self.kind,
            EventKind::DuplicateSession | EventKind::SessionNotFound
        )
    }
}
