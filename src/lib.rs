//! # motionvisor
//!
//! **Motionvisor** exposes motion-sensor hardware (accelerometer, gyroscope,
//! magnetometer, device motion, headphone motion) as session-keyed,
//! testable interfaces.
//!
//! Callers pick their own session ids. Each session owns one hardware source;
//! each `(session, sensor kind)` pair has at most one live stream; destroying a
//! session (or dropping its manager) always stops hardware delivery and ends
//! the session's streams.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  caller ── create(id) / destroy(id) ──┐        ┌── start_updates(id) ──► SensorStream<T>
//!                                       ▼        ▼                           (cold)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  MotionManager<K> / HeadphoneMotionManager<K>                     │
//! │  - SessionRegistry (id → source handle, one lock)                 │
//! │  - SubscriptionTable ((id, kind) → single live sink)              │
//! │  - Capability facades (accelerometer, gyro, magnetometer, ...)    │
//! └──────┬──────────────────────────────────┬─────────────────────────┘
//!        │ start_delivery / stop_delivery   │ publish(Event)
//!        ▼                                  ▼
//! ┌───────────────────────┐   ┌───────────────────────────────────────┐
//! │ MotionSource /        │   │        Bus (broadcast channel)        │
//! │ HeadphoneSource       │   │     (capacity: Config::bus_capacity)  │
//! │ (one per session)     │   └──────────────┬────────────────────────┘
//! └──────────┬────────────┘                  ▼
//!            │ handler(Ok(sample) | Err(e))  listener ──► SubscriberSet
//!            ▼                                              ├─► LogWriter
//!      SensorStream<T> yields Result<T, MotionError>        └─► custom
//! ```
//!
//! ### Stream lifecycle
//! ```text
//! start_updates(id) ──► SensorStream (cold, nothing registered)
//!   first poll:
//!     ├─ id unknown            ─► SessionNotFound reported, yields Err once, ends
//!     ├─ (id, kind) taken      ─► StreamAlreadyActive reported, ends empty
//!     └─ otherwise             ─► subscription stored, start_delivery, StreamStarted
//!   then:
//!     ├─ sample                ─► Ok(T)
//!     ├─ hardware error        ─► stop_delivery, Err(HardwareDelivery), ends (StreamFailed)
//!     ├─ stop_updates(id)      ─► stop_delivery, ends (StreamStopped)
//!     ├─ destroy(id)           ─► stop_delivery, ends (StreamStopped, SessionDestroyed)
//!     └─ stream dropped        ─► stop_delivery if it still owns the pair
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                                  |
//! |-------------------|----------------------------------------------------------------|-----------------------------------------------------|
//! | **Managers**      | Create/destroy sessions, hand out per-kind facades.            | [`MotionManager`], [`HeadphoneMotionManager`]       |
//! | **Facades**       | Query, configure, start and stop one sensor kind.              | [`Capability`], [`Gyro`], [`DeviceMotionUpdates`]   |
//! | **Streams**       | Cold push streams with drop-driven teardown.                   | [`SensorStream`], [`ConnectionEvents`]              |
//! | **Hardware**      | The capability boundary implemented per platform.              | [`SensorSource`], [`MotionSource`], [`HeadphoneSource`] |
//! | **Subscriber API**| Hook into runtime events (logging, metrics, misuse reports).   | [`Subscribe`], [`Event`]                            |
//! | **Errors**        | Typed session misuse and hardware failures.                    | [`MotionError`], [`HardwareError`]                  |
//! | **Configuration** | Bus capacity, default queue and reference frame.               | [`Config`], [`Builder`]                             |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], rendering events as `tracing` records.
//! - `testing`: exports `FakeMotionSource`, a scriptable in-memory source.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use motionvisor::{Builder, Config, MotionSource};
//! # fn platform_source() -> Arc<dyn MotionSource> { unimplemented!() }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn motionvisor::Subscribe>> = vec![Arc::new(motionvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn motionvisor::Subscribe>> = Vec::new();
//!
//!     let manager = Builder::new(Config::default())
//!         .with_subscribers(subs)
//!         .motion(|| platform_source());
//!
//!     manager.create("main")?;
//!     let mut accel = manager.accelerometer().start_updates("main");
//!     if let Some(reading) = accel.next().await {
//!         println!("{:?}", reading?.acceleration);
//!     }
//!     manager.destroy(&"main");
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod facades;
mod hardware;
mod samples;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Builder, Config, SensorStream, SessionId};
pub use error::{HardwareError, MotionError};
pub use events::{Bus, Event, EventKind};
pub use facades::{
    Accelerometer, Capability, ConnectionEvents, DeviceMotionUpdates, Gyro, HeadphoneDeviceMotion,
    HeadphoneMotionManager, Magnetometer, MotionManager,
};
pub use hardware::{
    AttitudeReferenceFrame, ConnectionEvent, ConnectionHandler, DeliveryHandler, DeliveryOptions,
    DeliveryQueue, HeadphoneSource, HeadphoneSourceFactory, MotionSource, MotionSourceFactory,
    SensorKind, SensorSource,
};
pub use samples::{
    Acceleration, AccelerometerData, Attitude, CalibratedMagneticField, DeviceMotion, GyroData,
    MagneticField, MagneticFieldCalibrationAccuracy, MagnetometerData, Quaternion, Reading,
    RotationMatrix, RotationRate, Sample, Vector3,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a built-in tracing subscriber.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

// Optional: expose the in-memory source for downstream tests.
// Enable with: `--features testing`
#[cfg(feature = "testing")]
pub use hardware::fake::FakeMotionSource;
