//! Bridge from a headphone source's connection callback to the session's
//! [`ConnectionEvents`](super::ConnectionEvents) stream and the event bus.

use std::sync::Arc;

use crate::core::subscription::{Delivery, Sink};
use crate::events::{Bus, Event, EventKind};
use crate::hardware::{ConnectionEvent, ConnectionHandler};

pub(crate) struct Delegate {
    sink: Arc<Sink<ConnectionEvent>>,
    bus: Bus,
    session: Arc<str>,
}

impl Delegate {
    pub(crate) fn new(sink: Arc<Sink<ConnectionEvent>>, bus: Bus, session: impl Into<Arc<str>>) -> Self {
        Self {
            sink,
            bus,
            session: session.into(),
        }
    }

    fn forward(&self, event: ConnectionEvent) {
        match self.sink.send(event) {
            Delivery::Closed => return,
            Delivery::Overflowed => self.bus.publish(
                Event::new(EventKind::StreamOverflow)
                    .with_session(Arc::clone(&self.session))
                    .with_reason("connection_events_full"),
            ),
            Delivery::Sent | Delivery::Dropped => {}
        }
        let kind = match event {
            ConnectionEvent::Connected => EventKind::HeadphoneConnected,
            ConnectionEvent::Disconnected => EventKind::HeadphoneDisconnected,
        };
        self.bus
            .publish(Event::new(kind).with_session(Arc::clone(&self.session)));
    }

    pub(crate) fn into_handler(self) -> ConnectionHandler {
        Arc::new(move |event: ConnectionEvent| self.forward(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_until_the_sink_closes() {
        let bus = Bus::new(8);
        let mut events = bus.subscribe();
        let (sink, mut rx) = Sink::channel(4);
        let handler = Delegate::new(sink.clone(), bus, "\"AirPods\"").into_handler();

        handler(ConnectionEvent::Connected);
        sink.close();
        handler(ConnectionEvent::Disconnected);

        assert_eq!(rx.try_recv().ok(), Some(ConnectionEvent::Connected));
        assert!(rx.try_recv().is_err());

        let ev = events.try_recv().expect("event");
        assert_eq!(ev.kind, EventKind::HeadphoneConnected);
        assert_eq!(ev.session.as_deref(), Some("\"AirPods\""));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn full_connection_queue_reports_once() {
        let bus = Bus::new(16);
        let mut events = bus.subscribe();
        let (sink, mut rx) = Sink::channel(1);
        let handler = Delegate::new(sink, bus, "\"AirPods\"").into_handler();

        handler(ConnectionEvent::Connected);
        handler(ConnectionEvent::Disconnected);
        handler(ConnectionEvent::Connected);

        assert_eq!(rx.try_recv().ok(), Some(ConnectionEvent::Connected));
        assert!(rx.try_recv().is_err());

        let kinds: Vec<EventKind> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::HeadphoneConnected,
                EventKind::StreamOverflow,
                EventKind::HeadphoneDisconnected,
                EventKind::HeadphoneConnected,
            ]
        );
    }
}
