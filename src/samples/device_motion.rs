//! Device-motion sample: attitude, gravity, user acceleration, rotation rate
//! and calibrated magnetic field reported together by one source.

use super::{Acceleration, Attitude, MagneticField, Reading, RotationRate, Sample};
use crate::hardware::SensorKind;

/// Calibration accuracy of a magnetic field estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MagneticFieldCalibrationAccuracy {
    #[default]
    Uncalibrated,
    Low,
    Medium,
    High,
}

/// Magnetic field with the device bias removed, plus its accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibratedMagneticField {
    pub field: MagneticField,
    pub accuracy: MagneticFieldCalibrationAccuracy,
}

/// Encapsulated measurements of the attitude, rotation rate and acceleration
/// of a device.
///
/// Equality compares every numeric field plus the calibration accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceMotion {
    pub attitude: Attitude,
    /// Gravity acceleration vector in the device frame, in G's.
    pub gravity: Acceleration,
    /// Heading relative to the reference frame, in degrees (negative when unavailable).
    pub heading: f64,
    pub magnetic_field: CalibratedMagneticField,
    pub rotation_rate: RotationRate,
    /// Time at which the sample was taken, in seconds.
    pub timestamp: f64,
    /// Acceleration the user imparts to the device, in G's.
    pub user_acceleration: Acceleration,
}

impl Reading for DeviceMotion {
    const KIND: SensorKind = SensorKind::DeviceMotion;

    fn from_sample(sample: Sample) -> Option<Self> {
        match sample {
            Sample::DeviceMotion(data) => Some(data),
            _ => None,
        }
    }
}

impl From<DeviceMotion> for Sample {
    fn from(data: DeviceMotion) -> Self {
        Sample::DeviceMotion(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{Quaternion, Vector3};

    fn sample(accuracy: MagneticFieldCalibrationAccuracy) -> DeviceMotion {
        DeviceMotion {
            attitude: Attitude::from_quaternion(Quaternion::IDENTITY),
            gravity: Vector3::new(0.0, 0.0, -1.0),
            heading: 42.0,
            magnetic_field: CalibratedMagneticField {
                field: Vector3::new(10.0, 20.0, 30.0),
                accuracy,
            },
            rotation_rate: Vector3::new(0.1, 0.2, 0.3),
            timestamp: 12.5,
            user_acceleration: Vector3::new(0.01, 0.02, 0.03),
        }
    }

    #[test]
    fn equal_fields_are_equal() {
        let a = sample(MagneticFieldCalibrationAccuracy::High);
        let b = sample(MagneticFieldCalibrationAccuracy::High);
        assert_eq!(a, b);
        assert_eq!(DeviceMotion::from_sample(Sample::from(a)), Some(b));
    }

    #[test]
    fn accuracy_participates_in_equality() {
        assert_ne!(
            sample(MagneticFieldCalibrationAccuracy::High),
            sample(MagneticFieldCalibrationAccuracy::Low)
        );
    }
}
