//! # MotionManager: sessions of accelerometer, gyroscope, magnetometer and device motion.
//!
//! ## Example
//! ```no_run
//! use futures::StreamExt;
//! use motionvisor::{MotionManager, MotionSource};
//! # fn platform_source() -> std::sync::Arc<dyn MotionSource> { unimplemented!() }
//!
//! # async fn demo() -> Result<(), motionvisor::MotionError> {
//! let manager = MotionManager::new(|| platform_source());
//! manager.create("main")?;
//!
//! let mut gyro = manager.gyro().start_updates("main");
//! while let Some(reading) = gyro.next().await {
//!     println!("{:?}", reading?.rotation_rate);
//! }
//! manager.destroy(&"main");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;

use super::{
    Accelerometer, Capability, DeviceMotionUpdates, Gyro, MOTION_OPERATIONS, Magnetometer,
};
use crate::core::registry::SessionRegistry;
use crate::core::{Builder, Config, ListenerGuard, SessionId};
use crate::error::MotionError;
use crate::events::Event;
use crate::hardware::{MotionSource, MotionSourceFactory};

/// Registry of motion sessions keyed by `K`.
///
/// Each created session owns one [`MotionSource`] from the factory. Dropping
/// the manager destroys every session: live streams complete and hardware
/// delivery stops.
pub struct MotionManager<K: SessionId> {
    registry: Arc<SessionRegistry<K, dyn MotionSource>>,
    factory: Arc<dyn MotionSourceFactory>,
    _listener: Option<ListenerGuard>,
}

impl<K: SessionId> MotionManager<K> {
    /// Manager with the default [`Config`] and no subscribers.
    pub fn new(factory: impl MotionSourceFactory) -> Self {
        Builder::new(Config::default()).motion(factory)
    }

    pub(crate) fn new_internal(
        registry: Arc<SessionRegistry<K, dyn MotionSource>>,
        factory: Arc<dyn MotionSourceFactory>,
        listener: Option<ListenerGuard>,
    ) -> Self {
        Self {
            registry,
            factory,
            _listener: listener,
        }
    }

    /// Creates a session with a fresh source from the factory.
    ///
    /// # Errors
    /// [`MotionError::DuplicateSession`] if `id` is live; that session is untouched.
    pub fn create(&self, id: K) -> Result<(), MotionError> {
        self.create_with(id, self.factory.make())
    }

    /// Creates a session backed by `source`.
    ///
    /// # Errors
    /// [`MotionError::DuplicateSession`] if `id` is live.
    pub fn create_with(&self, id: K, source: Arc<dyn MotionSource>) -> Result<(), MotionError> {
        self.registry.create(id, source, None).map(|_| ())
    }

    /// Destroys a session: stops its streams and releases its source.
    ///
    /// Destroying an unknown id does nothing.
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

    pub fn accelerometer(&self) -> Accelerometer<'_, K> {
        Capability::new(&self.registry, &MOTION_OPERATIONS)
    }

    pub fn gyro(&self) -> Gyro<'_, K> {
        Capability::new(&self.registry, &MOTION_OPERATIONS)
    }

    pub fn magnetometer(&self) -> Magnetometer<'_, K> {
        Capability::new(&self.registry, &MOTION_OPERATIONS)
    }

    pub fn device_motion(&self) -> DeviceMotionUpdates<'_, K> {
        Capability::new(&self.registry, &MOTION_OPERATIONS)
    }

    /// Lets the platform show its device-movement calibration display.
    pub fn set_shows_device_movement_display(&self, id: &K, shows: bool) {
        self.registry
            .query(id, "set_shows_device_movement_display", None, |h| {
                h.set_shows_device_movement_display(shows)
            });
    }

    /// Receiver of runtime events published from now on.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.registry.bus().subscribe()
    }
}
