use crate::hardware::MotionSource;
use crate::samples::MagnetometerData;

use super::Capability;

/// Magnetometer operations of a [`MotionManager`](super::MotionManager).
pub type Magnetometer<'a, K> = Capability<'a, K, dyn MotionSource, MagnetometerData>;
