//! # HeadphoneMotionManager: sessions of headphone device motion.
//!
//! Creating a session returns its [`ConnectionEvents`] stream, fed by a
//! delegate installed on the session's [`HeadphoneSource`]. The stream owns the
//! session: dropping it destroys the session it created.
//!
//! ```text
//! Uninitialized ──create──► Created ──start──► Streaming ──stop──► Idle ─┐
//!                              │                  ▲                      │
//!                              │                  └────────start─────────┘
//!                              └──destroy / ConnectionEvents dropped──► Destroyed
//! ```
//!
//! Connection callbacks run on the queue of the most recent device-motion
//! start of the session, or on the main queue if there was none.
//! [`HeadphoneMotionManager::connection_queue`] reports that queue.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{broadcast, mpsc};

use super::delegate::Delegate;
use super::{Capability, OperationNames};
use crate::core::registry::{SessionRegistry, label};
use crate::core::stream::StopGuard;
use crate::core::subscription::Sink;
use crate::core::{Builder, Config, ListenerGuard, SensorStream, SessionId};
use crate::error::MotionError;
use crate::events::Event;
use crate::hardware::{
    ConnectionEvent, DeliveryQueue, HeadphoneSource, HeadphoneSourceFactory,
};
use crate::samples::DeviceMotion;

/// Device-motion operations of a [`HeadphoneMotionManager`].
pub type HeadphoneDeviceMotion<'a, K> = Capability<'a, K, dyn HeadphoneSource, DeviceMotion>;

const HEADPHONE_OPERATIONS: OperationNames = OperationNames {
    is_active: "is_device_motion_active",
    is_available: "is_device_motion_available",
    latest: "device_motion",
    set_update_interval: "set_device_motion_update_interval",
    start_updates: "start_device_motion_updates",
    stop_updates: "stop_device_motion_updates",
    reference_frame: false,
};

/// Connect/disconnect notifications of one headphone session.
///
/// Ends when the session is destroyed. Dropping it destroys the session,
/// unless that id has since been destroyed and created again. Holds up to
/// `Config::stream_capacity` unread events; newer ones are dropped.
pub struct ConnectionEvents {
    rx: mpsc::Receiver<ConnectionEvent>,
    _guard: StopGuard,
}

impl Stream for ConnectionEvents {
    type Item = ConnectionEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl fmt::Debug for ConnectionEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionEvents").finish_non_exhaustive()
    }
}

/// Registry of headphone-motion sessions keyed by `K`.
pub struct HeadphoneMotionManager<K: SessionId> {
    registry: Arc<SessionRegistry<K, dyn HeadphoneSource>>,
    factory: Arc<dyn HeadphoneSourceFactory>,
    _listener: Option<ListenerGuard>,
}

impl<K: SessionId> HeadphoneMotionManager<K> {
    /// Manager with the default [`Config`] and no subscribers.
    pub fn new(factory: impl HeadphoneSourceFactory) -> Self {
        Builder::new(Config::default()).headphone(factory)
    }

    pub(crate) fn new_internal(
        registry: Arc<SessionRegistry<K, dyn HeadphoneSource>>,
        factory: Arc<dyn HeadphoneSourceFactory>,
        listener: Option<ListenerGuard>,
    ) -> Self {
        Self {
            registry,
            factory,
            _listener: listener,
        }
    }

    /// Creates a session and returns its connection events.
    ///
    /// # Errors
    /// [`MotionError::DuplicateSession`] if `id` is live; that session is untouched.
    pub fn create(&self, id: K) -> Result<ConnectionEvents, MotionError> {
        self.create_with(id, self.factory.make())
    }

    /// Creates a session backed by `source` and returns its connection events.
    ///
    /// # Errors
    /// [`MotionError::DuplicateSession`] if `id` is live.
    pub fn create_with(
        &self,
        id: K,
        source: Arc<dyn HeadphoneSource>,
    ) -> Result<ConnectionEvents, MotionError> {
        let (sink, rx) =
            Sink::<ConnectionEvent>::channel(self.registry.config().stream_capacity_clamped());

        let teardown: Box<dyn FnOnce() + Send> = {
            let source = Arc::clone(&source);
            let sink = Arc::clone(&sink);
            Box::new(move || {
                source.set_connection_handler(None);
                sink.close();
            })
        };
        let ticket = self
            .registry
            .create(id.clone(), Arc::clone(&source), Some(teardown))?;

        let delegate = Delegate::new(sink, self.registry.bus().clone(), label(&id));
        source.set_connection_handler(Some(delegate.into_handler()));
        if !self.registry.is_current(&id, ticket) {
            // Destroyed while the delegate was being installed.
            source.set_connection_handler(None);
        }

        let weak = Arc::downgrade(&self.registry);
        let guard = StopGuard::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.destroy_ticket(&id, ticket, "connection_dropped");
            }
        });
        Ok(ConnectionEvents { rx, _guard: guard })
    }

    /// Destroys a session: stops its stream, unbinds its delegate and ends
    /// its connection events. Destroying an unknown id does nothing.
    pub fn destroy(&self, id: &K) {
        self.registry.destroy(id, "destroy");
    }

    pub fn contains(&self, id: &K) -> bool {
        self.registry.contains(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Device-motion facade of this manager.
    pub fn updates(&self) -> HeadphoneDeviceMotion<'_, K> {
        Capability::new(&self.registry, &HEADPHONE_OPERATIONS)
    }

    pub fn is_device_motion_active(&self, id: &K) -> bool {
        self.updates().is_active(id)
    }

    pub fn is_device_motion_available(&self, id: &K) -> bool {
        self.updates().is_available(id)
    }

    /// Latest device-motion reading, only while updates are active.
    pub fn device_motion(&self, id: &K) -> Option<DeviceMotion> {
        self.updates().latest(id)
    }

    pub fn start_device_motion_updates(&self, id: K) -> SensorStream<DeviceMotion> {
        self.updates().start_updates(id)
    }

    pub fn start_device_motion_updates_on(
        &self,
        id: K,
        queue: DeliveryQueue,
    ) -> SensorStream<DeviceMotion> {
        self.updates().start_updates_on(id, queue)
    }

    pub fn stop_device_motion_updates(&self, id: &K) {
        self.updates().stop_updates(id);
    }

    /// Queue connection callbacks of `id` are delivered on.
    ///
    /// That is the queue of the latest device-motion start, or
    /// [`DeliveryQueue::Main`] when updates were never started. An unknown id
    /// is reported and answered with `Main`.
    pub fn connection_queue(&self, id: &K) -> DeliveryQueue {
        match self.registry.last_queue(id) {
            Some(queue) => queue.unwrap_or_default(),
            None => {
                self.registry.report_missing(id, "connection_queue", None);
                DeliveryQueue::Main
            }
        }
    }

    /// Receiver of runtime events published from now on.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.registry.bus().subscribe()
    }
}
