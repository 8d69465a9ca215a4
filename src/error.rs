//! Error types used by the motionvisor registry and its streams.
//!
//! This module defines two error types:
//!
//! - [`MotionError`]: errors raised by the registry, facades and streams.
//! - [`HardwareError`]: errors handed to delivery handlers by a sensor source.
//!
//! Both provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

use crate::hardware::SensorKind;

/// # Errors produced by a sensor source while delivering samples.
///
/// Sources report these through their [`DeliveryHandler`](crate::hardware::DeliveryHandler).
/// The registry turns them into [`MotionError::HardwareDelivery`] on the affected stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("hardware error {code}: {message}")]
pub struct HardwareError {
    /// Platform error code.
    pub code: i64,
    /// Human-readable description.
    pub message: String,
}

impl HardwareError {
    /// Creates a new hardware error.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        "hardware_error"
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        format!("code={} message={}", self.code, self.message)
    }
}

/// # Errors produced by the session registry.
///
/// `DuplicateSession` and `SessionNotFound` indicate a caller bug (an id used
/// before creation, after destruction, or created twice). `HardwareDelivery`
/// is a runtime condition that terminates a single stream.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// A session with this id is already live; the existing one is left untouched.
    #[error("session {session} already exists; destroy it before creating a new one")]
    DuplicateSession {
        /// Debug rendering of the session id.
        session: String,
    },

    /// No session with this id exists (not created yet, or already destroyed).
    #[error("session {session} not found; it must be created before use and not used after destroy")]
    SessionNotFound {
        /// Debug rendering of the session id.
        session: String,
    },

    /// The sensor source reported an error mid-stream.
    #[error("{sensor} delivery failed: {source}")]
    HardwareDelivery {
        /// Stream the error terminated.
        sensor: SensorKind,
        /// Error reported by the source.
        #[source]
        source: HardwareError,
    },
}

impl MotionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use motionvisor::MotionError;
    ///
    /// let err = MotionError::SessionNotFound { session: "\"A\"".into() };
    /// assert_eq!(err.as_label(), "session_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            MotionError::DuplicateSession { .. } => "duplicate_session",
            MotionError::SessionNotFound { .. } => "session_not_found",
            MotionError::HardwareDelivery { .. } => "hardware_delivery",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            MotionError::DuplicateSession { session } => format!("duplicate: {session}"),
            MotionError::SessionNotFound { session } => format!("not found: {session}"),
            MotionError::HardwareDelivery { sensor, source } => {
                format!("{sensor}: {}", source.as_message())
            }
        }
    }

    /// Indicates whether the error is caused by misuse of a session id.
    ///
    /// Returns `true` for [`MotionError::DuplicateSession`] and
    /// [`MotionError::SessionNotFound`], `false` for hardware failures.
    ///
    /// # Example
    /// ```
    /// use motionvisor::MotionError;
    ///
    /// let dup = MotionError::DuplicateSession { session: "1".into() };
    /// assert!(dup.is_misuse());
    /// ```
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            MotionError::DuplicateSession { .. } | MotionError::SessionNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let dup = MotionError::DuplicateSession { session: "1".into() };
        let missing = MotionError::SessionNotFound { session: "1".into() };
        let hw = MotionError::HardwareDelivery {
            sensor: SensorKind::Gyro,
            source: HardwareError::new(103, "unknown"),
        };

        assert_eq!(dup.as_label(), "duplicate_session");
        assert_eq!(missing.as_label(), "session_not_found");
        assert_eq!(hw.as_label(), "hardware_delivery");
    }

    #[test]
    fn hardware_failure_is_not_misuse() {
        let hw = MotionError::HardwareDelivery {
            sensor: SensorKind::Magnetometer,
            source: HardwareError::new(102, "true north not available"),
        };
        assert!(!hw.is_misuse());
        assert_eq!(
            hw.to_string(),
            "magnetometer delivery failed: hardware error 102: true north not available"
        );
        assert_eq!(hw.as_message(), "magnetometer: code=102 message=true north not available");
    }
}
