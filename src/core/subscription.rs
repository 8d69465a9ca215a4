//! # Stream subscription table.
//!
//! Maps `(session, sensor kind)` to the single live subscriber of that pair.
//!
//! ## Rules
//! - At most one [`Subscription`] per `(session, kind)`
//! - Each subscription carries a unique ticket; removal by ticket never touches
//!   a newer subscription of the same pair
//! - A subscription is `pending` between its insertion and the return of the
//!   matching `start_delivery`; whoever removes a pending entry leaves the
//!   hardware stop to the starter

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::MotionError;
use crate::hardware::SensorKind;

/// Outcome of [`Sink::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Sent,
    /// Queue full; first message dropped since the last successful send.
    Overflowed,
    /// Queue still full; message dropped.
    Dropped,
    /// Sink closed or receiver gone.
    Closed,
}

/// Sending half of a stream; closing it completes the stream.
///
/// Bounded: `capacity` regular messages, plus one slot kept for the terminal
/// message. When the reader falls behind, the newest message is dropped.
/// The sender sits behind a lock so a terminal message and the close happen
/// as one step.
pub(crate) struct Sink<M> {
    inner: Mutex<SinkInner<M>>,
}

struct SinkInner<M> {
    tx: Option<mpsc::Sender<M>>,
    dropping: bool,
}

impl<M> Sink<M> {
    pub(crate) fn channel(capacity: usize) -> (Arc<Self>, mpsc::Receiver<M>) {
        let (tx, rx) = mpsc::channel(capacity.max(1) + 1);
        (
            Arc::new(Self {
                inner: Mutex::new(SinkInner {
                    tx: Some(tx),
                    dropping: false,
                }),
            }),
            rx,
        )
    }

    /// Delivers `msg` unless the queue is full or the sink is closed.
    pub(crate) fn send(&self, msg: M) -> Delivery {
        let mut inner = self.inner.lock();
        let Some(tx) = inner.tx.as_ref() else {
            return Delivery::Closed;
        };
        if tx.is_closed() {
            return Delivery::Closed;
        }
        // The last slot belongs to the terminal message.
        let sent = if tx.capacity() > 1 {
            match tx.try_send(msg) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => false,
                Err(mpsc::error::TrySendError::Closed(_)) => return Delivery::Closed,
            }
        } else {
            false
        };
        if sent {
            inner.dropping = false;
            Delivery::Sent
        } else if std::mem::replace(&mut inner.dropping, true) {
            Delivery::Dropped
        } else {
            Delivery::Overflowed
        }
    }

    /// Delivers a last message and closes.
    pub(crate) fn send_last(&self, msg: M) {
        if let Some(tx) = self.inner.lock().tx.take() {
            let _ = tx.try_send(msg);
        }
    }

    pub(crate) fn close(&self) {
        self.inner.lock().tx.take();
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.inner.lock().tx.is_none()
    }
}

/// Type-erased way to end a subscriber.
pub(crate) trait Terminate: Send + Sync {
    /// Normal completion.
    fn finish(&self);
    /// Terminal error, then completion.
    fn fail(&self, error: MotionError);
}

impl<T: Send> Terminate for Sink<Result<T, MotionError>> {
    fn finish(&self) {
        self.close();
    }

    fn fail(&self, error: MotionError) {
        self.send_last(Err(error));
    }
}

/// One live subscriber.
pub(crate) struct Subscription {
    pub(crate) ticket: u64,
    pub(crate) pending: bool,
    pub(crate) sink: Arc<dyn Terminate>,
}

/// `(session, kind)` → live subscriber.
pub(crate) struct SubscriptionTable<K> {
    entries: HashMap<K, HashMap<SensorKind, Subscription>>,
}

impl<K: Eq + Hash> SubscriptionTable<K> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn contains(&self, session: &K, kind: SensorKind) -> bool {
        self.entries
            .get(session)
            .is_some_and(|kinds| kinds.contains_key(&kind))
    }

    pub(crate) fn get_mut(&mut self, session: &K, kind: SensorKind) -> Option<&mut Subscription> {
        self.entries.get_mut(session)?.get_mut(&kind)
    }

    /// Inserts unless the pair is taken; returns whether it was inserted.
    pub(crate) fn insert(&mut self, session: K, kind: SensorKind, sub: Subscription) -> bool {
        let kinds = self.entries.entry(session).or_default();
        if kinds.contains_key(&kind) {
            return false;
        }
        kinds.insert(kind, sub);
        true
    }

    pub(crate) fn remove(&mut self, session: &K, kind: SensorKind) -> Option<Subscription> {
        let kinds = self.entries.get_mut(session)?;
        let sub = kinds.remove(&kind);
        if kinds.is_empty() {
            self.entries.remove(session);
        }
        sub
    }

    /// Removes the subscription only if it still carries `ticket`.
    pub(crate) fn remove_if(
        &mut self,
        session: &K,
        kind: SensorKind,
        ticket: u64,
    ) -> Option<Subscription> {
        let owned = self
            .entries
            .get(session)
            .and_then(|kinds| kinds.get(&kind))
            .is_some_and(|sub| sub.ticket == ticket);
        if owned {
            self.remove(session, kind)
        } else {
            None
        }
    }

    /// Removes every subscription of `session`.
    pub(crate) fn drain_session(&mut self, session: &K) -> Vec<(SensorKind, Subscription)> {
        self.entries
            .remove(session)
            .map(|kinds| kinds.into_iter().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(ticket: u64) -> (Subscription, mpsc::Receiver<Result<u8, MotionError>>) {
        let (sink, rx) = Sink::<Result<u8, MotionError>>::channel(8);
        (
            Subscription {
                ticket,
                pending: false,
                sink,
            },
            rx,
        )
    }

    #[test]
    fn one_subscription_per_pair() {
        let mut table = SubscriptionTable::new();
        let (a, _ra) = sub(1);
        let (b, _rb) = sub(2);
        assert!(table.insert("A", SensorKind::Gyro, a));
        assert!(!table.insert("A", SensorKind::Gyro, b));
        assert!(table.contains(&"A", SensorKind::Gyro));
        assert!(!table.contains(&"A", SensorKind::Accelerometer));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn stale_ticket_does_not_remove_newer_subscription() {
        let mut table = SubscriptionTable::new();
        let (a, _ra) = sub(7);
        table.insert("A", SensorKind::Gyro, a);

        assert!(table.remove_if(&"A", SensorKind::Gyro, 3).is_none());
        assert!(table.contains(&"A", SensorKind::Gyro));
        assert_eq!(
            table.remove_if(&"A", SensorKind::Gyro, 7).map(|s| s.ticket),
            Some(7)
        );
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn drain_only_touches_one_session() {
        let mut table = SubscriptionTable::new();
        for (session, ticket) in [("A", 1), ("B", 2)] {
            let (s, _r) = sub(ticket);
            table.insert(session, SensorKind::Magnetometer, s);
        }
        let (s, _r) = sub(3);
        table.insert("A", SensorKind::Gyro, s);

        assert_eq!(table.drain_session(&"A").len(), 2);
        assert!(table.contains(&"B", SensorKind::Magnetometer));
        assert!(table.drain_session(&"A").is_empty());
    }

    #[test]
    fn fail_sends_one_error_then_closes() {
        let (sink, mut rx) = Sink::<Result<u8, MotionError>>::channel(8);
        assert_eq!(sink.send(Ok(1)), Delivery::Sent);
        sink.fail(MotionError::SessionNotFound {
            session: "A".into(),
        });
        assert!(sink.is_closed());
        assert_eq!(sink.send(Ok(2)), Delivery::Closed);

        assert_eq!(rx.try_recv().ok(), Some(Ok(1)));
        assert!(matches!(
            rx.try_recv(),
            Ok(Err(MotionError::SessionNotFound { .. }))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn full_queue_drops_newest_and_keeps_room_for_the_error() {
        let (sink, mut rx) = Sink::<Result<u8, MotionError>>::channel(2);
        assert_eq!(sink.send(Ok(1)), Delivery::Sent);
        assert_eq!(sink.send(Ok(2)), Delivery::Sent);
        assert_eq!(sink.send(Ok(3)), Delivery::Overflowed);
        assert_eq!(sink.send(Ok(4)), Delivery::Dropped);

        assert_eq!(rx.try_recv().ok(), Some(Ok(1)));
        assert_eq!(sink.send(Ok(5)), Delivery::Sent);
        assert_eq!(sink.send(Ok(6)), Delivery::Overflowed);

        sink.fail(MotionError::SessionNotFound {
            session: "A".into(),
        });
        assert_eq!(rx.try_recv().ok(), Some(Ok(2)));
        assert_eq!(rx.try_recv().ok(), Some(Ok(5)));
        assert!(matches!(
            rx.try_recv(),
            Ok(Err(MotionError::SessionNotFound { .. }))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_closes_the_sink() {
        let (sink, rx) = Sink::<u8>::channel(4);
        drop(rx);
        assert_eq!(sink.send(1), Delivery::Closed);
    }
}
