use std::sync::Arc;

use super::SensorSource;

/// Connection notifications for a headphone accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionEvent {
    Connected,
    Disconnected,
}

/// Callback a headphone source invokes on connect/disconnect.
///
/// Platform quirk: the callback runs on the queue used by the most recent
/// device-motion registration, or on the main context if none was made.
pub type ConnectionHandler = Arc<dyn Fn(ConnectionEvent) + Send + Sync>;

/// Source backing a [`HeadphoneMotionManager`](crate::HeadphoneMotionManager) session.
///
/// Only [`SensorKind::DeviceMotion`](super::SensorKind::DeviceMotion) is delivered.
pub trait HeadphoneSource: SensorSource {
    /// Installs (or with `None`, removes) the connection callback.
    fn set_connection_handler(&self, handler: Option<ConnectionHandler>);
}

/// Allocates one [`HeadphoneSource`] per created session.
///
/// Implemented for any `Fn() -> Arc<dyn HeadphoneSource>` closure.
pub trait HeadphoneSourceFactory: Send + Sync + 'static {
    fn make(&self) -> Arc<dyn HeadphoneSource>;
}

impl<F> HeadphoneSourceFactory for F
where
    F: Fn() -> Arc<dyn HeadphoneSource> + Send + Sync + 'static,
{
    fn make(&self) -> Arc<dyn HeadphoneSource> {
        self()
    }
}
