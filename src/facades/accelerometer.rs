use crate::hardware::MotionSource;
use crate::samples::AccelerometerData;

use super::Capability;

/// Accelerometer operations of a [`MotionManager`](super::MotionManager).
pub type Accelerometer<'a, K> = Capability<'a, K, dyn MotionSource, AccelerometerData>;
