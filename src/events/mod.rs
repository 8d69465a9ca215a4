//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the session registry, the stream
//! sinks, the headphone delegate bridge and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `SessionRegistry` (sessions, streams, misuse reports),
//!   the headphone `Delegate` (connect/disconnect), `SubscriberSet` workers
//!   (overflow/panic).
//! - **Consumers**: the listener spawned by [`Builder`](crate::Builder) (fans
//!   out to `SubscriberSet`) and anyone holding a receiver from `events()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
