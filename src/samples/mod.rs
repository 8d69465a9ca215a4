//! Sensor sample records.
//!
//! Every record is an immutable value compared **structurally** over its numeric
//! fields, so two samples built from the same raw readings are equal regardless
//! of where they came from.
//!
//! ## Contents
//! - [`Vector3`] and its aliases [`Acceleration`], [`RotationRate`], [`MagneticField`]
//! - [`AccelerometerData`], [`GyroData`], [`MagnetometerData`], [`DeviceMotion`]
//! - [`Attitude`], [`Quaternion`], [`RotationMatrix`]
//! - [`Sample`] the type-erased form handed over by sensor sources
//! - [`Reading`] maps a concrete record to its [`SensorKind`] and back

mod accelerometer;
mod attitude;
mod device_motion;
mod gyro;
mod magnetometer;

pub use accelerometer::AccelerometerData;
pub use attitude::{Attitude, Quaternion, RotationMatrix};
pub use device_motion::{CalibratedMagneticField, DeviceMotion, MagneticFieldCalibrationAccuracy};
pub use gyro::GyroData;
pub use magnetometer::MagnetometerData;

use crate::hardware::SensorKind;

/// Three-axis reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Creates a vector from its components.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Acceleration in G's (gravitational force).
pub type Acceleration = Vector3;

/// Rotation rate in radians per second.
pub type RotationRate = Vector3;

/// Magnetic field in microteslas.
pub type MagneticField = Vector3;

/// Type-erased sample as produced by a sensor source.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Accelerometer(AccelerometerData),
    Gyro(GyroData),
    Magnetometer(MagnetometerData),
    DeviceMotion(DeviceMotion),
}

impl Sample {
    /// Returns the sensor kind that produced this sample.
    pub fn kind(&self) -> SensorKind {
        match self {
            Sample::Accelerometer(_) => SensorKind::Accelerometer,
            Sample::Gyro(_) => SensorKind::Gyro,
            Sample::Magnetometer(_) => SensorKind::Magnetometer,
            Sample::DeviceMotion(_) => SensorKind::DeviceMotion,
        }
    }
}

/// A concrete sample record delivered by one sensor kind.
///
/// Facades and streams are parameterized over `Reading`; the registry uses
/// [`Reading::KIND`] as the subscription key and [`Reading::from_sample`] to
/// unwrap what the source delivers.
pub trait Reading: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Sensor kind producing this record.
    const KIND: SensorKind;

    /// Extracts the record from a type-erased sample (`None` on kind mismatch).
    fn from_sample(sample: Sample) -> Option<Self>;
}
