//! Runtime core: sessions, subscriptions and streams.
//!
//! Public API from this module: [`Builder`], [`Config`], [`SessionId`] and
//! [`SensorStream`].
//!
//! Internal modules:
//! - [`registry`]: session id → handle map, stream activation and teardown;
//! - [`subscription`]: `(session, kind)` → single live subscriber;
//! - [`stream`]: cold streams whose drop releases their subscription;
//! - [`builder`]: wires bus, subscribers and registry into a manager.

mod builder;
mod config;
pub(crate) mod registry;
pub(crate) mod stream;
pub(crate) mod subscription;

pub use builder::Builder;
pub(crate) use builder::ListenerGuard;
pub use config::Config;
pub use registry::SessionId;
pub use stream::SensorStream;
