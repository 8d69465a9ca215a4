use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use super::registry::{SessionId, SessionRegistry};
use crate::{
    core::Config,
    events::Bus,
    facades::{HeadphoneMotionManager, MotionManager},
    hardware::{HeadphoneSource, HeadphoneSourceFactory, MotionSource, MotionSourceFactory, SensorSource},
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a manager with optional event subscribers.
pub struct Builder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Builder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (session lifecycle, misuse reports,
    /// stream failures) through dedicated workers with bounded queues.
    /// With at least one subscriber, building must happen inside a tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds a [`MotionManager`] allocating one source per session from `factory`.
    pub fn motion<K: SessionId>(self, factory: impl MotionSourceFactory) -> MotionManager<K> {
        let (registry, listener) = self.build::<K, dyn MotionSource>();
        MotionManager::new_internal(registry, Arc::new(factory), listener)
    }

    /// Builds a [`HeadphoneMotionManager`] allocating one source per session from `factory`.
    pub fn headphone<K: SessionId>(
        self,
        factory: impl HeadphoneSourceFactory,
    ) -> HeadphoneMotionManager<K> {
        let (registry, listener) = self.build::<K, dyn HeadphoneSource>();
        HeadphoneMotionManager::new_internal(registry, Arc::new(factory), listener)
    }

    fn build<K: SessionId, H: ?Sized + SensorSource>(
        self,
    ) -> (Arc<SessionRegistry<K, H>>, Option<ListenerGuard>) {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let subs = SubscriberSet::new(self.subscribers, bus.clone());
            Some(ListenerGuard::spawn(&bus, subs))
        };
        (SessionRegistry::new(bus, self.cfg), listener)
    }
}

/// Forwards bus events to a [`SubscriberSet`] until dropped.
pub(crate) struct ListenerGuard {
    token: CancellationToken,
}

impl ListenerGuard {
    fn spawn(bus: &Bus, subs: SubscriberSet) -> Self {
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();
        let rt = token.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => subs.emit_arc(Arc::new(ev)),
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "event listener lagged; events dropped");
                            continue;
                        }
                    },
                    _ = rt.cancelled() => break,
                }
            }
            subs.shutdown().await;
        });
        Self { token }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
