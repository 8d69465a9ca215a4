use super::{MagneticField, Reading, Sample};
use crate::hardware::SensorKind;

/// Measurement of the Earth's magnetic field relative to the device.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MagnetometerData {
    /// Raw (uncalibrated) field, in microteslas.
    pub magnetic_field: MagneticField,
    /// Time at which the sample was taken, in seconds.
    pub timestamp: f64,
}

impl MagnetometerData {
    pub const fn new(magnetic_field: MagneticField, timestamp: f64) -> Self {
        Self {
            magnetic_field,
            timestamp,
        }
    }
}

impl Reading for MagnetometerData {
    const KIND: SensorKind = SensorKind::Magnetometer;

    fn from_sample(sample: Sample) -> Option<Self> {
        match sample {
            Sample::Magnetometer(data) => Some(data),
            _ => None,
        }
    }
}

impl From<MagnetometerData> for Sample {
    fn from(data: MagnetometerData) -> Self {
        Sample::Magnetometer(data)
    }
}
