//! # In-memory sensor source for tests.
//!
//! [`FakeMotionSource`] implements both [`MotionSource`] and [`HeadphoneSource`].
//! Tests drive it by pushing samples, errors and connection events, and
//! inspect what the registry asked of it (start/stop counts, intervals,
//! delivery options).
//!
//! Handlers are invoked on the calling thread with no internal lock held.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::{
    AttitudeReferenceFrame, ConnectionEvent, ConnectionHandler, DeliveryHandler, DeliveryOptions,
    HeadphoneSource, HeadphoneSourceFactory, MotionSource, MotionSourceFactory, SensorKind,
    SensorSource,
};
use crate::error::HardwareError;
use crate::samples::Sample;

#[derive(Default)]
struct FakeState {
    unavailable: HashSet<SensorKind>,
    handlers: HashMap<SensorKind, DeliveryHandler>,
    options: HashMap<SensorKind, DeliveryOptions>,
    latest: HashMap<SensorKind, Sample>,
    intervals: HashMap<SensorKind, Duration>,
    starts: HashMap<SensorKind, usize>,
    stops: HashMap<SensorKind, usize>,
    reference_frame: Option<AttitudeReferenceFrame>,
    shows_device_movement_display: bool,
    connection: Option<ConnectionHandler>,
}

/// Scriptable sensor source.
#[derive(Default)]
pub struct FakeMotionSource {
    state: Mutex<FakeState>,
}

impl FakeMotionSource {
    /// Creates a source with every sensor kind available.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Factory handing out this same instance for every session.
    pub fn motion_factory(self: &Arc<Self>) -> impl MotionSourceFactory + use<> {
        let me = Arc::clone(self);
        move || Arc::clone(&me) as Arc<dyn MotionSource>
    }

    /// Factory handing out this same instance for every headphone session.
    pub fn headphone_factory(self: &Arc<Self>) -> impl HeadphoneSourceFactory + use<> {
        let me = Arc::clone(self);
        move || Arc::clone(&me) as Arc<dyn HeadphoneSource>
    }

    /// Marks `kind` as (un)available.
    pub fn set_available(&self, kind: SensorKind, available: bool) {
        let mut st = self.state.lock();
        if available {
            st.unavailable.remove(&kind);
        } else {
            st.unavailable.insert(kind);
        }
    }

    /// Delivers `sample` to the active handler of its kind.
    ///
    /// Returns `false` (and drops the sample) when that kind is not delivering.
    pub fn push(&self, sample: impl Into<Sample>) -> bool {
        let sample = sample.into();
        let kind = sample.kind();
        let handler = {
            let mut st = self.state.lock();
            let Some(handler) = st.handlers.get(&kind).cloned() else {
                return false;
            };
            st.latest.insert(kind, sample.clone());
            handler
        };
        handler(Ok(sample));
        true
    }

    /// Reports `error` to the active handler of `kind`.
    pub fn fail(&self, kind: SensorKind, error: HardwareError) -> bool {
        let handler = self.state.lock().handlers.get(&kind).cloned();
        match handler {
            Some(handler) => {
                handler(Err(error));
                true
            }
            None => false,
        }
    }

    /// Invokes the connection handler with [`ConnectionEvent::Connected`].
    pub fn connect(&self) -> bool {
        self.notify(ConnectionEvent::Connected)
    }

    /// Invokes the connection handler with [`ConnectionEvent::Disconnected`].
    pub fn disconnect(&self) -> bool {
        self.notify(ConnectionEvent::Disconnected)
    }

    fn notify(&self, event: ConnectionEvent) -> bool {
        let handler = self.state.lock().connection.clone();
        match handler {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    /// Number of `start_delivery` calls received for `kind`.
    pub fn start_count(&self, kind: SensorKind) -> usize {
        self.state.lock().starts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of `stop_delivery` calls received for `kind`.
    pub fn stop_count(&self, kind: SensorKind) -> usize {
        self.state.lock().stops.get(&kind).copied().unwrap_or(0)
    }

    /// Last interval set for `kind`.
    pub fn update_interval(&self, kind: SensorKind) -> Option<Duration> {
        self.state.lock().intervals.get(&kind).copied()
    }

    /// Options of the last `start_delivery` for `kind`.
    pub fn delivery_options(&self, kind: SensorKind) -> Option<DeliveryOptions> {
        self.state.lock().options.get(&kind).cloned()
    }

    pub fn shows_device_movement_display(&self) -> bool {
        self.state.lock().shows_device_movement_display
    }

    pub fn has_connection_handler(&self) -> bool {
        self.state.lock().connection.is_some()
    }
}

impl SensorSource for FakeMotionSource {
    fn is_active(&self, kind: SensorKind) -> bool {
        self.state.lock().handlers.contains_key(&kind)
    }

    fn is_available(&self, kind: SensorKind) -> bool {
        !self.state.lock().unavailable.contains(&kind)
    }

    fn latest(&self, kind: SensorKind) -> Option<Sample> {
        self.state.lock().latest.get(&kind).cloned()
    }

    fn set_update_interval(&self, kind: SensorKind, interval: Duration) {
        self.state.lock().intervals.insert(kind, interval);
    }

    fn start_delivery(&self, kind: SensorKind, options: &DeliveryOptions, handler: DeliveryHandler) {
        let mut st = self.state.lock();
        *st.starts.entry(kind).or_default() += 1;
        if kind == SensorKind::DeviceMotion {
            if let Some(frame) = options.reference_frame {
                st.reference_frame = Some(frame);
            }
        }
        st.options.insert(kind, options.clone());
        st.handlers.insert(kind, handler);
    }

    fn stop_delivery(&self, kind: SensorKind) {
        let mut st = self.state.lock();
        *st.stops.entry(kind).or_default() += 1;
        st.handlers.remove(&kind);
        st.latest.remove(&kind);
    }
}

impl MotionSource for FakeMotionSource {
    fn attitude_reference_frame(&self) -> AttitudeReferenceFrame {
        self.state.lock().reference_frame.unwrap_or_default()
    }

    fn set_shows_device_movement_display(&self, shows: bool) {
        self.state.lock().shows_device_movement_display = shows;
    }
}

impl HeadphoneSource for FakeMotionSource {
    fn set_connection_handler(&self, handler: Option<ConnectionHandler>) {
        self.state.lock().connection = handler;
    }
}
