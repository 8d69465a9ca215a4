//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`] for events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   SessionRegistry ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                                  │
//!                                                     ┌────────────┼──────────┐
//!                                                     ▼            ▼          ▼
//!                                                 LogWriter     Metrics    Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use motionvisor::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct MisuseCounter;
//!
//! #[async_trait]
//! impl Subscribe for MisuseCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::SessionNotFound {
//!             // increment counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
