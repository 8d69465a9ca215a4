use super::{Reading, RotationRate, Sample};
use crate::hardware::SensorKind;

/// A single measurement of the device's rotation rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GyroData {
    /// Rotation rate around each axis, in radians per second.
    pub rotation_rate: RotationRate,
    /// Time at which the sample was taken, in seconds.
    pub timestamp: f64,
}

impl GyroData {
    pub const fn new(rotation_rate: RotationRate, timestamp: f64) -> Self {
        Self {
            rotation_rate,
            timestamp,
        }
    }
}

impl Reading for GyroData {
    const KIND: SensorKind = SensorKind::Gyro;

    fn from_sample(sample: Sample) -> Option<Self> {
        match sample {
            Sample::Gyro(data) => Some(data),
            _ => None,
        }
    }
}

impl From<GyroData> for Sample {
    fn from(data: GyroData) -> Self {
        Sample::Gyro(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::Vector3;

    #[test]
    fn fields_read_back() {
        let g = GyroData::new(Vector3::new(0.1, 0.2, 0.3), 100.0);
        assert_eq!(g.rotation_rate.x, 0.1);
        assert_eq!(g.rotation_rate.y, 0.2);
        assert_eq!(g.rotation_rate.z, 0.3);
        assert_eq!(g.timestamp, 100.0);
    }

    #[test]
    fn timestamp_participates_in_equality() {
        let a = GyroData::new(Vector3::new(0.1, 0.2, 0.3), 100.0);
        let b = GyroData::new(Vector3::new(0.1, 0.2, 0.3), 100.5);
        assert_ne!(a, b);
    }
}
