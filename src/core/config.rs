//! # Global manager configuration.
//!
//! Provides [`Config`] centralized settings for a motion or headphone manager.
//!
//! Config is used in two ways:
//! 1. **Manager creation**: `Builder::new(config)` sizes the event bus
//! 2. **Stream defaults**: `start_updates(id)` uses `default_queue`; device-motion
//!    starts without a frame use `default_reference_frame`; each stream buffers up
//!    to `stream_capacity` unread readings
//!
//! ## Sentinel values
//! - `default_reference_frame = None` → the source keeps its current frame

use crate::hardware::{AttitudeReferenceFrame, DeliveryOptions, DeliveryQueue};

/// Global configuration for a manager.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `default_queue`: Queue used by `start_updates(id)` when none is given
/// - `default_reference_frame`: Frame used by device-motion starts that name none
/// - `stream_capacity`: Unread readings a stream holds before dropping the newest (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,

    /// Delivery queue for streams started without an explicit one.
    pub default_queue: DeliveryQueue,

    /// Attitude reference frame for device-motion streams started without one.
    pub default_reference_frame: Option<AttitudeReferenceFrame>,

    /// Unread readings (or connection events) a stream buffers.
    ///
    /// When full, newer items are dropped and `StreamOverflow` is published.
    pub stream_capacity: usize,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a stream capacity clamped to a minimum of 1.
    #[inline]
    pub fn stream_capacity_clamped(&self) -> usize {
        self.stream_capacity.max(1)
    }

    /// Delivery options for a stream started with no explicit configuration.
    pub fn default_options(&self) -> DeliveryOptions {
        DeliveryOptions {
            queue: self.default_queue.clone(),
            reference_frame: self.default_reference_frame,
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `default_queue = DeliveryQueue::Main`
    /// - `default_reference_frame = None`
    /// - `stream_capacity = 256`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            default_queue: DeliveryQueue::Main,
            default_reference_frame: None,
            stream_capacity: 256,
        }
    }
}
