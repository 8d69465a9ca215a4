//! # Session registry - named sessions and their sensor subscriptions.
//!
//! The registry maps caller-chosen session ids to capability handles and keeps
//! the subscription table for every `(session, kind)` pair.
//!
//! ## Architecture
//! ```text
//! create(id, handle)  ──► sessions[id] = Session { handle, ticket }   ─► SessionCreated
//! open::<T>(id, opts) ──► SensorStream (cold)
//!      first poll     ──► activate: subscriptions[(id, T::KIND)] = sink
//!                         handle.start_delivery(kind, opts, handler)  ─► StreamStarted
//! handler(Ok(sample)) ──► sink.send(Ok(T)); queue full  ─► StreamOverflow
//! handler(Err(e))     ──► fail: remove, stop_delivery, sink.fail(e)   ─► StreamFailed
//! stop(id, kind)      ──► remove, stop_delivery, sink.finish()        ─► StreamStopped
//! stream dropped      ──► release(ticket): same as stop, if still owner
//! destroy(id)         ──► drain subscriptions, stop each, teardown    ─► SessionDestroyed
//! ```
//!
//! ## Rules
//! - One handle per id, one subscription per `(id, kind)`
//! - All mutation goes through one lock; the lock is never held while calling
//!   into a handle or a sink
//! - Every `start_delivery` is matched by exactly one `stop_delivery`
//! - A missing id is reported on the bus; queries degrade, starts fail the
//!   stream, setters and stops are no-ops, destroy is silent

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::stream::{Activation, SensorStream, StopGuard};
use super::subscription::{Delivery, Sink, Subscription, SubscriptionTable};
use crate::core::Config;
use crate::error::{HardwareError, MotionError};
use crate::events::{Bus, Event, EventKind};
use crate::hardware::{DeliveryHandler, DeliveryOptions, DeliveryQueue, SensorKind, SensorSource};
use crate::samples::{Reading, Sample};

/// Requirements for a session identifier.
///
/// Any hashable, cloneable, debuggable value works (`&'static str`, `u32`,
/// `String`, a custom enum). The `Debug` rendering labels events and errors.
pub trait SessionId: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> SessionId for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

pub(crate) fn label<K: Debug>(id: &K) -> String {
    format!("{id:?}")
}

type Teardown = Box<dyn FnOnce() + Send>;

/// One live session.
struct Session<H: ?Sized> {
    handle: Arc<H>,
    ticket: u64,
    last_queue: Option<DeliveryQueue>,
    teardown: Option<Teardown>,
}

struct RegistryState<K, H: ?Sized> {
    sessions: HashMap<K, Session<H>>,
    subscriptions: SubscriptionTable<K>,
    next_ticket: u64,
}

impl<K, H: ?Sized> RegistryState<K, H> {
    fn ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }
}

/// Registry of sessions keyed by `K`, each owning one handle of type `H`.
pub(crate) struct SessionRegistry<K: SessionId, H: ?Sized + SensorSource> {
    state: Mutex<RegistryState<K, H>>,
    bus: Bus,
    config: Config,
}

/// What `destroy` removed, processed outside the lock.
struct Removed<H: ?Sized> {
    session: Session<H>,
    subscriptions: Vec<(SensorKind, Subscription)>,
}

impl<K: SessionId, H: ?Sized + SensorSource> SessionRegistry<K, H> {
    pub(crate) fn new(bus: Bus, config: Config) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(RegistryState {
                sessions: HashMap::new(),
                subscriptions: SubscriptionTable::new(),
                next_ticket: 0,
            }),
            bus,
            config,
        })
    }

    pub(crate) fn bus(&self) -> &Bus {
        &self.bus
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Registers `id` with `handle`; returns the session ticket.
    ///
    /// A duplicate id is reported and returned as an error; the existing
    /// session is left untouched and `teardown` is dropped without running.
    pub(crate) fn create(
        &self,
        id: K,
        handle: Arc<H>,
        teardown: Option<Teardown>,
    ) -> Result<u64, MotionError> {
        let session = label(&id);
        {
            let mut st = self.state.lock();
            if !st.sessions.contains_key(&id) {
                let ticket = st.ticket();
                st.sessions.insert(
                    id,
                    Session {
                        handle,
                        ticket,
                        last_queue: None,
                        teardown,
                    },
                );
                drop(st);
                self.bus
                    .publish(Event::new(EventKind::SessionCreated).with_session(session));
                return Ok(ticket);
            }
        }
        self.bus.publish(
            Event::new(EventKind::DuplicateSession)
                .with_session(session.as_str())
                .with_operation("create"),
        );
        Err(MotionError::DuplicateSession { session })
    }

    /// Destroys `id`; `false` if it did not exist.
    pub(crate) fn destroy(&self, id: &K, reason: &'static str) -> bool {
        let removed = {
            let mut st = self.state.lock();
            Self::remove_session(&mut st, id, None)
        };
        match removed {
            Some(removed) => {
                self.finish_removed(&label(id), removed, reason);
                true
            }
            None => false,
        }
    }

    /// Destroys `id` only if it is still the session created with `ticket`.
    pub(crate) fn destroy_ticket(&self, id: &K, ticket: u64, reason: &'static str) -> bool {
        let removed = {
            let mut st = self.state.lock();
            Self::remove_session(&mut st, id, Some(ticket))
        };
        match removed {
            Some(removed) => {
                self.finish_removed(&label(id), removed, reason);
                true
            }
            None => false,
        }
    }

    fn remove_session(
        st: &mut RegistryState<K, H>,
        id: &K,
        ticket: Option<u64>,
    ) -> Option<Removed<H>> {
        if let Some(ticket) = ticket {
            if st.sessions.get(id)?.ticket != ticket {
                return None;
            }
        }
        let session = st.sessions.remove(id)?;
        let subscriptions = st.subscriptions.drain_session(id);
        Some(Removed {
            session,
            subscriptions,
        })
    }

    fn finish_removed(&self, session: &str, removed: Removed<H>, reason: &'static str) {
        let Removed {
            session: mut s,
            subscriptions,
        } = removed;

        for (kind, sub) in subscriptions {
            if !sub.pending {
                s.handle.stop_delivery(kind);
            }
            sub.sink.finish();
            self.bus.publish(
                Event::new(EventKind::StreamStopped)
                    .with_session(session)
                    .with_sensor(kind)
                    .with_reason("session_destroyed"),
            );
        }
        if let Some(teardown) = s.teardown.take() {
            teardown();
        }
        drop(s);

        self.bus.publish(
            Event::new(EventKind::SessionDestroyed)
                .with_session(session)
                .with_reason(reason),
        );
    }

    /// Publishes a `SessionNotFound` report.
    pub(crate) fn report_missing(&self, id: &K, operation: &'static str, sensor: Option<SensorKind>) {
        let mut ev = Event::new(EventKind::SessionNotFound)
            .with_session(label(id))
            .with_operation(operation);
        if let Some(sensor) = sensor {
            ev = ev.with_sensor(sensor);
        }
        self.bus.publish(ev);
    }

    /// Returns the handle of `id`, reporting a miss.
    pub(crate) fn lookup(
        &self,
        id: &K,
        operation: &'static str,
        sensor: Option<SensorKind>,
    ) -> Option<Arc<H>> {
        let handle = self
            .state
            .lock()
            .sessions
            .get(id)
            .map(|s| Arc::clone(&s.handle));
        if handle.is_none() {
            self.report_missing(id, operation, sensor);
        }
        handle
    }

    /// Runs `f` against the handle of `id`, outside the lock.
    pub(crate) fn query<R>(
        &self,
        id: &K,
        operation: &'static str,
        sensor: Option<SensorKind>,
        f: impl FnOnce(&H) -> R,
    ) -> Option<R> {
        self.lookup(id, operation, sensor).map(|h| f(&*h))
    }

    pub(crate) fn contains(&self, id: &K) -> bool {
        self.state.lock().sessions.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().sessions.len()
    }

    #[cfg(test)]
    pub(crate) fn subscription_count(&self) -> usize {
        self.state.lock().subscriptions.len()
    }

    /// Whether `id` is still the session created with `ticket`.
    pub(crate) fn is_current(&self, id: &K, ticket: u64) -> bool {
        self.state
            .lock()
            .sessions
            .get(id)
            .is_some_and(|s| s.ticket == ticket)
    }

    /// Queue of the most recent device-motion start on `id`.
    pub(crate) fn last_queue(&self, id: &K) -> Option<Option<DeliveryQueue>> {
        self.state
            .lock()
            .sessions
            .get(id)
            .map(|s| s.last_queue.clone())
    }

    /// Returns a cold stream for `(id, T::KIND)`.
    pub(crate) fn open<T: Reading>(
        self: &Arc<Self>,
        id: K,
        options: DeliveryOptions,
        operation: &'static str,
    ) -> SensorStream<T> {
        let weak = Arc::downgrade(self);
        SensorStream::cold(move || match weak.upgrade() {
            Some(registry) => registry.activate::<T>(id, options, operation),
            None => Activation::Failed(MotionError::SessionNotFound { session: label(&id) }),
        })
    }

    fn activate<T: Reading>(
        self: &Arc<Self>,
        id: K,
        options: DeliveryOptions,
        operation: &'static str,
    ) -> Activation<T> {
        let kind = T::KIND;
        let session = label(&id);

        let claimed = {
            let mut st = self.state.lock();
            let handle = st.sessions.get(&id).map(|s| Arc::clone(&s.handle));
            match handle {
                None => None,
                Some(_) if st.subscriptions.contains(&id, kind) => Some(None),
                Some(handle) => {
                    let ticket = st.ticket();
                    let (sink, rx) =
                        Sink::<Result<T, MotionError>>::channel(self.config.stream_capacity_clamped());
                    st.subscriptions.insert(
                        id.clone(),
                        kind,
                        Subscription {
                            ticket,
                            pending: true,
                            sink: sink.clone(),
                        },
                    );
                    if kind == SensorKind::DeviceMotion {
                        if let Some(s) = st.sessions.get_mut(&id) {
                            s.last_queue = Some(options.queue.clone());
                        }
                    }
                    Some(Some((handle, ticket, sink, rx)))
                }
            }
        };

        let (handle, ticket, sink, rx) = match claimed {
            None => {
                self.report_missing(&id, operation, Some(kind));
                return Activation::Failed(MotionError::SessionNotFound { session });
            }
            Some(None) => {
                self.bus.publish(
                    Event::new(EventKind::StreamAlreadyActive)
                        .with_session(session)
                        .with_sensor(kind),
                );
                return Activation::Inert;
            }
            Some(Some(claim)) => claim,
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        let handler: DeliveryHandler = {
            let weak = weak.clone();
            let id = id.clone();
            let bus = self.bus.clone();
            let label: Arc<str> = Arc::from(session.as_str());
            Arc::new(move |delivery: Result<Sample, HardwareError>| match delivery {
                Ok(sample) => {
                    let Some(reading) = T::from_sample(sample) else {
                        return;
                    };
                    if sink.send(Ok(reading)) == Delivery::Overflowed {
                        bus.publish(
                            Event::new(EventKind::StreamOverflow)
                                .with_session(Arc::clone(&label))
                                .with_sensor(kind)
                                .with_reason("full"),
                        );
                    }
                }
                Err(error) => match weak.upgrade() {
                    Some(registry) => registry.fail(&id, kind, ticket, error),
                    None => sink.send_last(Err(MotionError::HardwareDelivery {
                        sensor: kind,
                        source: error,
                    })),
                },
            })
        };

        handle.start_delivery(kind, &options, handler);
        self.bus.publish(
            Event::new(EventKind::StreamStarted)
                .with_session(session)
                .with_sensor(kind)
                .with_queue(options.queue),
        );

        // Settle the pending flag; if the entry went away meanwhile, the stop is ours.
        let still_owned = {
            let mut st = self.state.lock();
            match st.subscriptions.get_mut(&id, kind) {
                Some(sub) if sub.ticket == ticket => {
                    sub.pending = false;
                    true
                }
                _ => false,
            }
        };
        if !still_owned {
            handle.stop_delivery(kind);
        }

        let guard = StopGuard::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.release(&id, kind, ticket);
            }
        });
        Activation::Live(rx, guard)
    }

    /// Ends the subscription of `(id, kind)` because of a hardware error.
    fn fail(&self, id: &K, kind: SensorKind, ticket: u64, error: HardwareError) {
        let Some((sub, handle)) = self.take_subscription(id, kind, Some(ticket)) else {
            return;
        };
        if !sub.pending {
            handle.stop_delivery(kind);
        }
        let reason = error.as_message();
        sub.sink.fail(MotionError::HardwareDelivery {
            sensor: kind,
            source: error,
        });
        self.bus.publish(
            Event::new(EventKind::StreamFailed)
                .with_session(label(id))
                .with_sensor(kind)
                .with_reason(reason),
        );
    }

    /// Ends the subscription owned by a dropped stream.
    fn release(&self, id: &K, kind: SensorKind, ticket: u64) {
        if let Some((sub, handle)) = self.take_subscription(id, kind, Some(ticket)) {
            self.end(id, kind, sub, &handle, "dropped");
        }
    }

    /// Stops `(id, kind)`; `true` if a subscription was stopped.
    pub(crate) fn stop(&self, id: &K, kind: SensorKind, operation: &'static str) -> bool {
        if !self.contains(id) {
            self.report_missing(id, operation, Some(kind));
            return false;
        }
        match self.take_subscription(id, kind, None) {
            Some((sub, handle)) => {
                self.end(id, kind, sub, &handle, "stop");
                true
            }
            None => false,
        }
    }

    fn take_subscription(
        &self,
        id: &K,
        kind: SensorKind,
        ticket: Option<u64>,
    ) -> Option<(Subscription, Arc<H>)> {
        let mut st = self.state.lock();
        let handle = Arc::clone(&st.sessions.get(id)?.handle);
        let sub = match ticket {
            Some(ticket) => st.subscriptions.remove_if(id, kind, ticket),
            None => st.subscriptions.remove(id, kind),
        }?;
        Some((sub, handle))
    }

    fn end(&self, id: &K, kind: SensorKind, sub: Subscription, handle: &H, reason: &'static str) {
        if !sub.pending {
            handle.stop_delivery(kind);
        }
        sub.sink.finish();
        self.bus.publish(
            Event::new(EventKind::StreamStopped)
                .with_session(label(id))
                .with_sensor(kind)
                .with_reason(reason),
        );
    }
}

impl<K: SessionId, H: ?Sized + SensorSource> Drop for SessionRegistry<K, H> {
    fn drop(&mut self) {
        let removed: Vec<(K, Removed<H>)> = {
            let st = self.state.get_mut();
            let ids: Vec<K> = st.sessions.keys().cloned().collect();
            ids.into_iter()
                .filter_map(|id| Self::remove_session(st, &id, None).map(|r| (id, r)))
                .collect()
        };
        for (id, removed) in removed {
            self.finish_removed(&label(&id), removed, "registry_dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::fake::FakeMotionSource;
    use crate::samples::{GyroData, MagnetometerData, Vector3};
    use futures::{FutureExt, StreamExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Registry = SessionRegistry<&'static str, FakeMotionSource>;

    fn registry() -> Arc<Registry> {
        SessionRegistry::new(Bus::new(64), Config::default())
    }

    fn gyro(x: f64) -> GyroData {
        GyroData::new(Vector3::new(x, 0.0, 0.0), 1.0)
    }

    #[test]
    fn duplicate_create_keeps_first_handle() {
        let reg = registry();
        let mut rx = reg.bus().subscribe();
        let first = FakeMotionSource::new();
        let second = FakeMotionSource::new();

        assert!(reg.create("A", first.clone(), None).is_ok());
        assert_eq!(
            reg.create("A", second, None),
            Err(MotionError::DuplicateSession {
                session: "\"A\"".into()
            })
        );
        assert_eq!(reg.len(), 1);
        let kept = reg.lookup(&"A", "test", None).expect("session");
        assert!(Arc::ptr_eq(&kept, &first));

        assert_eq!(rx.try_recv().map(|e| e.kind).ok(), Some(EventKind::SessionCreated));
        assert_eq!(rx.try_recv().map(|e| e.kind).ok(), Some(EventKind::DuplicateSession));
    }

    #[test]
    fn stale_stream_drop_leaves_newer_subscription_running() {
        let reg = registry();
        let hw = FakeMotionSource::new();
        reg.create("A", hw.clone(), None).ok();

        let mut first = reg.open::<GyroData>("A", DeliveryOptions::default(), "start_updates");
        assert_eq!(first.next().now_or_never(), None);
        assert!(reg.stop(&"A", SensorKind::Gyro, "stop_updates"));

        let mut second = reg.open::<GyroData>("A", DeliveryOptions::default(), "start_updates");
        assert_eq!(second.next().now_or_never(), None);
        drop(first);

        assert!(hw.is_active(SensorKind::Gyro));
        assert_eq!(hw.start_count(SensorKind::Gyro), 2);
        assert_eq!(hw.stop_count(SensorKind::Gyro), 1);

        assert!(hw.push(gyro(1.0)));
        assert_eq!(second.next().now_or_never(), Some(Some(Ok(gyro(1.0)))));

        drop(second);
        assert_eq!(hw.stop_count(SensorKind::Gyro), 2);
        assert_eq!(reg.subscription_count(), 0);
    }

    #[test]
    fn hardware_error_fails_only_that_stream() {
        let reg = registry();
        let hw = FakeMotionSource::new();
        reg.create("A", hw.clone(), None).ok();

        let mut mag = reg.open::<MagnetometerData>("A", DeliveryOptions::default(), "start_updates");
        let mut gyr = reg.open::<GyroData>("A", DeliveryOptions::default(), "start_updates");
        assert_eq!(mag.next().now_or_never(), None);
        assert_eq!(gyr.next().now_or_never(), None);

        assert!(hw.fail(SensorKind::Magnetometer, HardwareError::new(102, "no field")));
        assert_eq!(
            mag.next().now_or_never(),
            Some(Some(Err(MotionError::HardwareDelivery {
                sensor: SensorKind::Magnetometer,
                source: HardwareError::new(102, "no field"),
            })))
        );
        assert_eq!(mag.next().now_or_never(), Some(None));
        assert_eq!(hw.stop_count(SensorKind::Magnetometer), 1);

        drop(mag);
        assert_eq!(hw.stop_count(SensorKind::Magnetometer), 1);
        assert!(hw.is_active(SensorKind::Gyro));
        assert!(reg.contains(&"A"));
    }

    #[test]
    fn dropping_registry_ends_streams_and_runs_teardown() {
        let reg = registry();
        let hw = FakeMotionSource::new();
        let torn_down = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = torn_down.clone();
        reg.create(
            "A",
            hw.clone(),
            Some(Box::new(move || flag.store(true, std::sync::atomic::Ordering::SeqCst))
                as Teardown),
        )
        .ok();

        let mut stream = reg.open::<GyroData>("A", DeliveryOptions::default(), "start_updates");
        assert_eq!(stream.next().now_or_never(), None);

        drop(reg);
        assert!(torn_down.load(std::sync::atomic::Ordering::SeqCst));
        assert_eq!(hw.stop_count(SensorKind::Gyro), 1);
        assert_eq!(stream.next().now_or_never(), Some(None));
        drop(stream);
        assert_eq!(hw.stop_count(SensorKind::Gyro), 1);
    }

    #[test]
    fn destroy_ticket_ignores_a_recreated_session() {
        let reg = registry();
        let old = reg.create("A", FakeMotionSource::new(), None).unwrap_or_default();
        assert!(reg.destroy(&"A", "destroy"));
        reg.create("A", FakeMotionSource::new(), None).ok();

        assert!(!reg.destroy_ticket(&"A", old, "connection_dropped"));
        assert!(reg.contains(&"A"));
        assert!(!reg.destroy(&"missing", "destroy"));
    }

    #[derive(Default)]
    struct FailsOnStart {
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    impl SensorSource for FailsOnStart {
        fn is_active(&self, _: SensorKind) -> bool {
            false
        }
        fn is_available(&self, _: SensorKind) -> bool {
            true
        }
        fn latest(&self, _: SensorKind) -> Option<Sample> {
            None
        }
        fn set_update_interval(&self, _: SensorKind, _: Duration) {}
        fn start_delivery(&self, _: SensorKind, _: &DeliveryOptions, handler: DeliveryHandler) {
            self.starts.fetch_add(1, Ordering::SeqCst);
            handler(Err(HardwareError::new(109, "sensor busy")));
        }
        fn stop_delivery(&self, _: SensorKind) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn error_during_start_stops_once() {
        let reg = SessionRegistry::<&'static str, FailsOnStart>::new(Bus::new(64), Config::default());
        let hw = Arc::new(FailsOnStart::default());
        reg.create("A", hw.clone(), None).ok();

        let mut stream = reg.open::<GyroData>("A", DeliveryOptions::default(), "start_updates");
        assert_eq!(
            stream.next().now_or_never(),
            Some(Some(Err(MotionError::HardwareDelivery {
                sensor: SensorKind::Gyro,
                source: HardwareError::new(109, "sensor busy"),
            })))
        );
        assert_eq!(stream.next().now_or_never(), Some(None));
        assert_eq!(hw.starts.load(Ordering::SeqCst), 1);
        assert_eq!(hw.stops.load(Ordering::SeqCst), 1);
        assert_eq!(reg.subscription_count(), 0);

        drop(stream);
        assert_eq!(hw.stops.load(Ordering::SeqCst), 1);
        assert!(reg.contains(&"A"));
    }

    /// Destroys its own session from inside `start_delivery`.
    #[derive(Default)]
    struct DestroysOnStart {
        registry: Mutex<Weak<SessionRegistry<&'static str, DestroysOnStart>>>,
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    impl SensorSource for DestroysOnStart {
        fn is_active(&self, _: SensorKind) -> bool {
            false
        }
        fn is_available(&self, _: SensorKind) -> bool {
            true
        }
        fn latest(&self, _: SensorKind) -> Option<Sample> {
            None
        }
        fn set_update_interval(&self, _: SensorKind, _: Duration) {}
        fn start_delivery(&self, _: SensorKind, _: &DeliveryOptions, _: DeliveryHandler) {
            self.starts.fetch_add(1, Ordering::SeqCst);
            let registry = self.registry.lock().upgrade();
            if let Some(registry) = registry {
                registry.destroy(&"A", "destroy");
            }
        }
        fn stop_delivery(&self, _: SensorKind) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn destroy_during_start_stops_once() {
        let reg =
            SessionRegistry::<&'static str, DestroysOnStart>::new(Bus::new(64), Config::default());
        let hw = Arc::new(DestroysOnStart::default());
        *hw.registry.lock() = Arc::downgrade(&reg);
        reg.create("A", hw.clone(), None).ok();

        let mut stream = reg.open::<GyroData>("A", DeliveryOptions::default(), "start_updates");
        assert_eq!(stream.next().now_or_never(), Some(None));
        assert!(!reg.contains(&"A"));
        assert_eq!(hw.starts.load(Ordering::SeqCst), 1);
        assert_eq!(hw.stops.load(Ordering::SeqCst), 1);

        drop(stream);
        assert_eq!(hw.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn slow_reader_drops_newest_and_reports_once() {
        let reg: Arc<Registry> = SessionRegistry::new(
            Bus::new(64),
            Config {
                stream_capacity: 2,
                ..Config::default()
            },
        );
        let hw = FakeMotionSource::new();
        reg.create("A", hw.clone(), None).ok();
        let mut events = reg.bus().subscribe();

        let mut stream = reg.open::<GyroData>("A", DeliveryOptions::default(), "start_updates");
        assert_eq!(stream.next().now_or_never(), None);
        for x in 1..=4 {
            assert!(hw.push(gyro(f64::from(x))));
        }

        assert_eq!(stream.next().now_or_never(), Some(Some(Ok(gyro(1.0)))));
        assert_eq!(stream.next().now_or_never(), Some(Some(Ok(gyro(2.0)))));
        assert_eq!(stream.next().now_or_never(), None);

        let overflows: Vec<Event> = std::iter::from_fn(|| events.try_recv().ok())
            .filter(|e| e.kind == EventKind::StreamOverflow)
            .collect();
        assert_eq!(overflows.len(), 1);
        assert_eq!(overflows[0].sensor, Some(SensorKind::Gyro));

        assert!(hw.push(gyro(5.0)));
        assert_eq!(stream.next().now_or_never(), Some(Some(Ok(gyro(5.0)))));
        assert!(hw.is_active(SensorKind::Gyro));
    }
}
