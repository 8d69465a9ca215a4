//! # Capability facades and managers.
//!
//! Every sensor kind is exposed through the same engine, [`Capability`],
//! parameterized by the session id `K`, the handle type `H` and the reading `T`.
//! The per-kind aliases ([`Accelerometer`], [`Gyro`], [`Magnetometer`],
//! [`DeviceMotionUpdates`], [`HeadphoneDeviceMotion`]) pick the parameters.
//!
//! Managers own a registry and hand out facades borrowing it:
//! ```text
//! MotionManager<K> ──► accelerometer() / gyro() / magnetometer() / device_motion()
//! HeadphoneMotionManager<K> ──► device_motion() + ConnectionEvents
//! ```
//!
//! ## Session-id misuse
//! Every operation on an unknown id publishes `EventKind::SessionNotFound`.
//! Queries then return `false`/`None`, setters and stops do nothing, and a
//! started stream yields one `Err(MotionError::SessionNotFound)`.

mod accelerometer;
mod delegate;
mod device_motion;
mod gyro;
mod headphone;
mod magnetometer;
mod motion;

pub use accelerometer::Accelerometer;
pub use device_motion::DeviceMotionUpdates;
pub use gyro::Gyro;
pub use headphone::{ConnectionEvents, HeadphoneDeviceMotion, HeadphoneMotionManager};
pub use magnetometer::Magnetometer;
pub use motion::MotionManager;

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::core::SensorStream;
use crate::core::registry::{SessionId, SessionRegistry};
use crate::events::{Event, EventKind};
use crate::hardware::{DeliveryOptions, DeliveryQueue, SensorKind, SensorSource};
use crate::samples::Reading;

/// Effectful operations on one sensor kind, for any session of a manager.
pub struct Capability<'a, K: SessionId, H: ?Sized + SensorSource, T> {
    registry: &'a Arc<SessionRegistry<K, H>>,
    names: &'a OperationNames,
    _reading: PhantomData<fn() -> T>,
}

/// Operation names used in misuse reports.
///
/// `reference_frame` marks facades whose device-motion starts take
/// `Config::default_reference_frame`.
pub(crate) struct OperationNames {
    pub(crate) is_active: &'static str,
    pub(crate) is_available: &'static str,
    pub(crate) latest: &'static str,
    pub(crate) set_update_interval: &'static str,
    pub(crate) start_updates: &'static str,
    pub(crate) stop_updates: &'static str,
    pub(crate) reference_frame: bool,
}

pub(crate) const MOTION_OPERATIONS: OperationNames = OperationNames {
    is_active: "is_active",
    is_available: "is_available",
    latest: "latest",
    set_update_interval: "set_update_interval",
    start_updates: "start_updates",
    stop_updates: "stop_updates",
    reference_frame: true,
};

impl<'a, K: SessionId, H: ?Sized + SensorSource, T: Reading> Capability<'a, K, H, T> {
    pub(crate) fn new(registry: &'a Arc<SessionRegistry<K, H>>, names: &'a OperationNames) -> Self {
        Self {
            registry,
            names,
            _reading: PhantomData,
        }
    }

    /// Whether the hardware is currently delivering this kind for `id`.
    pub fn is_active(&self, id: &K) -> bool {
        self.registry
            .query(id, self.names.is_active, Some(T::KIND), |h| h.is_active(T::KIND))
            .unwrap_or(false)
    }

    /// Whether the device has the hardware for this kind.
    pub fn is_available(&self, id: &K) -> bool {
        self.registry
            .query(id, self.names.is_available, Some(T::KIND), |h| {
                h.is_available(T::KIND)
            })
            .unwrap_or(false)
    }

    /// Most recent reading, only while delivery is active.
    pub fn latest(&self, id: &K) -> Option<T> {
        self.registry
            .query(id, self.names.latest, Some(T::KIND), |h| {
                if h.is_active(T::KIND) {
                    h.latest(T::KIND).and_then(T::from_sample)
                } else {
                    None
                }
            })
            .flatten()
    }

    /// Sets the interval between readings.
    pub fn set_update_interval(&self, id: &K, interval: Duration) {
        let applied = self
            .registry
            .query(id, self.names.set_update_interval, Some(T::KIND), |h| {
                h.set_update_interval(T::KIND, interval)
            });
        if applied.is_some() {
            self.registry.bus().publish(
                Event::new(EventKind::IntervalChanged)
                    .with_session(crate::core::registry::label(id))
                    .with_sensor(T::KIND)
                    .with_reason(format!("{interval:?}")),
            );
        }
    }

    /// Starts updates on the configured default queue.
    ///
    /// The returned stream is cold: nothing happens until it is first polled.
    pub fn start_updates(&self, id: K) -> SensorStream<T> {
        let queue = self.registry.config().default_queue.clone();
        self.start_updates_on(id, queue)
    }

    /// Starts updates delivered on `queue`, with the configured default frame.
    pub fn start_updates_on(&self, id: K, queue: DeliveryQueue) -> SensorStream<T> {
        let options = self.default_options_on(queue);
        self.start_updates_with(id, options)
    }

    /// Starts updates with explicit delivery options.
    ///
    /// If a stream already owns `(id, kind)`, the new stream ends at once
    /// without emitting and without touching hardware.
    pub fn start_updates_with(&self, id: K, options: DeliveryOptions) -> SensorStream<T> {
        self.registry.open::<T>(id, options, self.names.start_updates)
    }

    fn default_options_on(&self, queue: DeliveryQueue) -> DeliveryOptions {
        let mut options = self.registry.config().default_options();
        options.queue = queue;
        if T::KIND != SensorKind::DeviceMotion || !self.names.reference_frame {
            options.reference_frame = None;
        }
        options
    }

    /// Stops updates: hardware delivery ends and the stream completes normally.
    ///
    /// Does nothing when no stream is running.
    pub fn stop_updates(&self, id: &K) {
        self.registry.stop(id, T::KIND, self.names.stop_updates);
    }
}
