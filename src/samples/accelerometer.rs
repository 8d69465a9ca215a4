use super::{Acceleration, Reading, Sample};
use crate::hardware::SensorKind;

/// A data sample from the device's three accelerometers.
///
/// Equality compares `acceleration.x/y/z`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelerometerData {
    /// Acceleration along each axis, in G's.
    pub acceleration: Acceleration,
}

impl AccelerometerData {
    pub const fn new(acceleration: Acceleration) -> Self {
        Self { acceleration }
    }
}

impl Reading for AccelerometerData {
    const KIND: SensorKind = SensorKind::Accelerometer;

    fn from_sample(sample: Sample) -> Option<Self> {
        match sample {
            Sample::Accelerometer(data) => Some(data),
            _ => None,
        }
    }
}

impl From<AccelerometerData> for Sample {
    fn from(data: AccelerometerData) -> Self {
        Sample::Accelerometer(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::Vector3;

    #[test]
    fn equality_is_structural() {
        let raw = (0.5, -1.0, 9.81);
        let a = AccelerometerData::new(Vector3::new(raw.0, raw.1, raw.2));
        let b = AccelerometerData {
            acceleration: Vector3 {
                x: 0.5,
                y: -1.0,
                z: 9.81,
            },
        };
        assert_eq!(a, b);
        assert_eq!(a.acceleration.x, 0.5);
        assert_eq!(a.acceleration.y, -1.0);
        assert_eq!(a.acceleration.z, 9.81);
        assert_ne!(a, AccelerometerData::default());
    }
}
