//! Device orientation relative to a reference frame.
//!
//! [`Attitude`] carries the three representations a motion source reports
//! together: a unit quaternion, the equivalent rotation matrix, and Euler
//! angles (roll, pitch, yaw in radians).

/// Unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// 3x3 rotation matrix, row-major (`mRC`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    pub m11: f64,
    pub m12: f64,
    pub m13: f64,
    pub m21: f64,
    pub m22: f64,
    pub m23: f64,
    pub m31: f64,
    pub m32: f64,
    pub m33: f64,
}

impl RotationMatrix {
    pub const IDENTITY: Self = Self {
        m11: 1.0,
        m12: 0.0,
        m13: 0.0,
        m21: 0.0,
        m22: 1.0,
        m23: 0.0,
        m31: 0.0,
        m32: 0.0,
        m33: 1.0,
    };
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Orientation of the device at a moment in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub quaternion: Quaternion,
    pub rotation_matrix: RotationMatrix,
    /// Rotation around the longitudinal axis, in radians.
    pub roll: f64,
    /// Rotation around the lateral axis, in radians.
    pub pitch: f64,
    /// Rotation around the vertical axis, in radians.
    pub yaw: f64,
}

impl Attitude {
    /// Builds an attitude whose matrix and Euler angles are derived from `q`.
    ///
    /// `q` is expected to be normalized; no normalization is applied.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let Quaternion { x, y, z, w } = q;

        let rotation_matrix = RotationMatrix {
            m11: 1.0 - 2.0 * (y * y + z * z),
            m12: 2.0 * (x * y - z * w),
            m13: 2.0 * (x * z + y * w),
            m21: 2.0 * (x * y + z * w),
            m22: 1.0 - 2.0 * (x * x + z * z),
            m23: 2.0 * (y * z - x * w),
            m31: 2.0 * (x * z - y * w),
            m32: 2.0 * (y * z + x * w),
            m33: 1.0 - 2.0 * (x * x + y * y),
        };

        let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
        let pitch = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

        Self {
            quaternion: q,
            rotation_matrix,
            roll,
            pitch,
            yaw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_quaternion_has_no_rotation() {
        let a = Attitude::from_quaternion(Quaternion::IDENTITY);
        assert_eq!(a.rotation_matrix, RotationMatrix::IDENTITY);
        assert_eq!(a.roll, 0.0);
        assert_eq!(a.pitch, 0.0);
        assert_eq!(a.yaw, 0.0);
        assert_eq!(a, Attitude::default());
    }

    #[test]
    fn quarter_turn_about_z_is_yaw() {
        let half = std::f64::consts::FRAC_PI_4;
        let a = Attitude::from_quaternion(Quaternion::new(0.0, 0.0, half.sin(), half.cos()));
        assert!((a.yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(a.roll.abs() < 1e-12);
        assert!(a.pitch.abs() < 1e-12);
        assert!((a.rotation_matrix.m21 - 1.0).abs() < 1e-12);
    }
}
