use std::sync::Arc;

use super::{AttitudeReferenceFrame, SensorSource};

/// Source backing a [`MotionManager`](crate::MotionManager) session.
///
/// Delivers [`SensorKind::Accelerometer`](super::SensorKind::Accelerometer),
/// `Gyro`, `Magnetometer` and `DeviceMotion`.
pub trait MotionSource: SensorSource {
    /// Reference frame currently used for device-motion attitude.
    fn attitude_reference_frame(&self) -> AttitudeReferenceFrame;

    /// Whether the platform may show its device-movement calibration display.
    fn set_shows_device_movement_display(&self, shows: bool);
}

/// Allocates one [`MotionSource`] per created session.
///
/// Implemented for any `Fn() -> Arc<dyn MotionSource>` closure.
pub trait MotionSourceFactory: Send + Sync + 'static {
    fn make(&self) -> Arc<dyn MotionSource>;
}

impl<F> MotionSourceFactory for F
where
    F: Fn() -> Arc<dyn MotionSource> + Send + Sync + 'static,
{
    fn make(&self) -> Arc<dyn MotionSource> {
        self()
    }
}
