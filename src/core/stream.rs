//! # Cold sensor streams.
//!
//! A [`SensorStream`] does nothing until it is first polled. The first poll
//! runs its activation: the registry either registers a subscriber and starts
//! hardware delivery (`Live`), ignores a duplicate start (`Inert`), or reports
//! a missing session (`Failed`).
//!
//! ```text
//! Cold ──first poll──► Live ──sink closed──► Done
//!   │                   └──dropped──► StopGuard runs (release subscription)
//!   ├──────────────────► Failed ──one Err──► Done
//!   └──────────────────► Done (inert)
//! ```
//!
//! Dropping a cold stream never touches hardware.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use futures::stream::FusedStream;
use tokio::sync::mpsc;

use crate::error::MotionError;

/// Runs a closure once, when dropped.
pub(crate) struct StopGuard(Option<Box<dyn FnOnce() + Send>>);

impl StopGuard {
    pub(crate) fn new(on_drop: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(on_drop)))
    }
}

impl Drop for StopGuard {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

/// Outcome of a stream's first poll.
pub(crate) enum Activation<T> {
    Live(mpsc::Receiver<Result<T, MotionError>>, StopGuard),
    Inert,
    Failed(MotionError),
}

type Activate<T> = Box<dyn FnOnce() -> Activation<T> + Send>;

enum State<T> {
    Cold(Activate<T>),
    Live {
        rx: mpsc::Receiver<Result<T, MotionError>>,
        _guard: StopGuard,
    },
    Failed(Option<MotionError>),
    Done,
}

/// Push-based stream of sensor readings for one `(session, kind)` pair.
///
/// Yields `Ok(reading)` for each sample the hardware delivers. Ends:
/// - normally, after `stop_updates`, session destruction or manager drop;
/// - with a single `Err(MotionError::HardwareDelivery)` when the source fails;
/// - with a single `Err(MotionError::SessionNotFound)` when started on an unknown id;
/// - immediately and silently when another stream already owns the pair.
///
/// Dropping a live stream stops hardware delivery, unless the subscription was
/// already taken over or ended.
///
/// Readings queue up to `Config::stream_capacity`. A stream that is not polled
/// fast enough loses the newest readings, and each run of losses is reported
/// once as `EventKind::StreamOverflow`.
#[must_use = "streams do nothing unless polled"]
pub struct SensorStream<T> {
    state: State<T>,
}

impl<T> SensorStream<T> {
    pub(crate) fn cold(activate: impl FnOnce() -> Activation<T> + Send + 'static) -> Self {
        Self {
            state: State::Cold(Box::new(activate)),
        }
    }

    /// True until the first poll.
    pub fn is_cold(&self) -> bool {
        matches!(self.state, State::Cold(_))
    }
}

impl<T> Unpin for SensorStream<T> {}

impl<T> Stream for SensorStream<T> {
    type Item = Result<T, MotionError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if matches!(this.state, State::Cold(_)) {
            if let State::Cold(activate) = std::mem::replace(&mut this.state, State::Done) {
                this.state = match activate() {
                    Activation::Live(rx, guard) => State::Live { rx, _guard: guard },
                    Activation::Inert => State::Done,
                    Activation::Failed(err) => State::Failed(Some(err)),
                };
            }
        }

        match &mut this.state {
            State::Live { rx, .. } => match rx.poll_recv(cx) {
                Poll::Ready(None) => {
                    this.state = State::Done;
                    Poll::Ready(None)
                }
                other => other,
            },
            State::Failed(err) => {
                let err = err.take();
                this.state = State::Done;
                Poll::Ready(err.map(Err))
            }
            State::Cold(_) | State::Done => Poll::Ready(None),
        }
    }
}

impl<T> FusedStream for SensorStream<T> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<T> fmt::Debug for SensorStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Cold(_) => "cold",
            State::Live { .. } => "live",
            State::Failed(_) => "failed",
            State::Done => "done",
        };
        f.debug_struct("SensorStream").field("state", &state).finish()
    }
}
