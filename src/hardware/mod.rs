//! # Hardware boundary.
//!
//! The registry never talks to sensors directly. It consumes a capability
//! interface, [`SensorSource`], instantiated once per logical session by a
//! factory. Two refinements exist:
//! - [`MotionSource`]: accelerometer, gyroscope, magnetometer and device motion;
//! - [`HeadphoneSource`]: headphone device motion plus connect/disconnect callbacks.
//!
//! ## Delivery
//! ```text
//! start_delivery(kind, options, handler)
//!     │
//!     └─► source invokes handler(Ok(Sample)) on options.queue ... repeatedly
//!         source invokes handler(Err(HardwareError)) once on failure
//! stop_delivery(kind)
//!     └─► source drops the handler; no more callbacks for `kind`
//! ```
//!
//! ## Rules
//! - Handlers may be invoked from any thread.
//! - A source must not hold its own locks while invoking a handler: the
//!   registry may call back into `stop_delivery` from inside the handler.

mod headphone;
mod motion;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

pub use headphone::{ConnectionEvent, ConnectionHandler, HeadphoneSource, HeadphoneSourceFactory};
pub use motion::{MotionSource, MotionSourceFactory};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::HardwareError;
use crate::samples::Sample;

/// Stream kinds a source can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Accelerometer,
    Gyro,
    Magnetometer,
    DeviceMotion,
}

impl SensorKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyro => "gyro",
            SensorKind::Magnetometer => "magnetometer",
            SensorKind::DeviceMotion => "device_motion",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution context on which a source invokes delivery handlers.
///
/// The source interprets the selector; the registry only records and forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DeliveryQueue {
    /// The main/UI context.
    #[default]
    Main,
    /// A caller-named context.
    Named(Arc<str>),
}

impl DeliveryQueue {
    /// Shorthand for [`DeliveryQueue::Named`].
    pub fn named(label: impl Into<Arc<str>>) -> Self {
        DeliveryQueue::Named(label.into())
    }
}

impl fmt::Display for DeliveryQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryQueue::Main => f.write_str("main"),
            DeliveryQueue::Named(label) => f.write_str(label),
        }
    }
}

/// Reference frame for device-motion attitude values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttitudeReferenceFrame {
    /// Z axis vertical, X axis in an arbitrary horizontal direction.
    #[default]
    XArbitraryZVertical,
    /// As `XArbitraryZVertical`, with the magnetometer correcting yaw drift.
    XArbitraryCorrectedZVertical,
    /// Z axis vertical, X axis pointing to magnetic north.
    XMagneticNorthZVertical,
    /// Z axis vertical, X axis pointing to true north.
    XTrueNorthZVertical,
}

/// Options for one `start_delivery` call.
///
/// `reference_frame` applies to device motion only; `None` lets the source use
/// its current/default frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveryOptions {
    pub queue: DeliveryQueue,
    pub reference_frame: Option<AttitudeReferenceFrame>,
}

impl DeliveryOptions {
    /// Options delivering on `queue` with the source's default reference frame.
    pub fn on(queue: DeliveryQueue) -> Self {
        Self {
            queue,
            reference_frame: None,
        }
    }

    /// Sets the attitude reference frame.
    pub fn using(mut self, frame: AttitudeReferenceFrame) -> Self {
        self.reference_frame = Some(frame);
        self
    }
}

/// Callback a source invokes for each sample or for a terminal error.
pub type DeliveryHandler = Arc<dyn Fn(Result<Sample, HardwareError>) + Send + Sync>;

/// Capability set shared by every sensor source.
///
/// One instance backs exactly one session.
pub trait SensorSource: Send + Sync + 'static {
    /// Whether `kind` is currently delivering.
    fn is_active(&self, kind: SensorKind) -> bool;

    /// Whether the device has the hardware for `kind`.
    fn is_available(&self, kind: SensorKind) -> bool;

    /// Most recent sample for `kind`, if any.
    fn latest(&self, kind: SensorKind) -> Option<Sample>;

    /// Sets the interval between samples for `kind`.
    fn set_update_interval(&self, kind: SensorKind, interval: Duration);

    /// Starts delivering `kind` samples to `handler`.
    fn start_delivery(&self, kind: SensorKind, options: &DeliveryOptions, handler: DeliveryHandler);

    /// Stops delivering `kind` samples and drops the handler.
    fn stop_delivery(&self, kind: SensorKind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_platform() {
        assert_eq!(DeliveryQueue::default(), DeliveryQueue::Main);
        assert_eq!(
            AttitudeReferenceFrame::default(),
            AttitudeReferenceFrame::XArbitraryZVertical
        );
        let opts = DeliveryOptions::default();
        assert_eq!(opts.queue, DeliveryQueue::Main);
        assert_eq!(opts.reference_frame, None);
    }

    #[test]
    fn options_builder() {
        let opts = DeliveryOptions::on(DeliveryQueue::named("sensors"))
            .using(AttitudeReferenceFrame::XTrueNorthZVertical);
        assert_eq!(opts.queue.to_string(), "sensors");
        assert_eq!(opts.reference_frame, Some(AttitudeReferenceFrame::XTrueNorthZVertical));
    }
}
