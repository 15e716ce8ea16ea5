//! Greeting streams in their two consumption shapes.
//!
//! A continuous stream is driven by one spawned producer task per stream. The
//! producer owns a repeating timer and hands each greeting to the consumer
//! through a channel with room for a single value, so "the consumer has not
//! taken the last greeting yet" is exactly "the channel is full". Nothing is
//! shared between streams except the read-only clock.

use crate::config::{OverrunPolicy, StreamConfig};
use crate::connection::{ConnectionGuard, ConnectionId};
use crate::state::{Lifecycle, StreamState};
use domain::clock::Clock;
use domain::error::Error as DomainError;
use domain::greeting::{self, GreetingRequest, GreetingResponse};
use futures::Stream;
use log::*;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Greetings a continuous stream may hold before the consumer takes them.
const PENDING_CAPACITY: usize = 1;

/// The consumer's handle on one greeting stream.
///
/// Dropping the handle cancels the stream.
pub struct GreetingStream {
    id: ConnectionId,
    source: Source,
    state: watch::Receiver<StreamState>,
    cancel: CancellationToken,
    _connection: Option<ConnectionGuard>,
}

enum Source {
    Once {
        pending: Option<(Arc<dyn Clock>, GreetingRequest)>,
        lifecycle: Lifecycle,
    },
    Periodic {
        rx: mpsc::Receiver<GreetingResponse>,
        _cancel_on_drop: DropGuard,
    },
}

impl GreetingStream {
    /// A stream that yields exactly one greeting, computed when first polled,
    /// and then completes. No timer is armed and no task is spawned.
    pub fn once(clock: Arc<dyn Clock>, request: GreetingRequest) -> Self {
        let id = ConnectionId::new();
        let (lifecycle, state) = Lifecycle::new(id.clone());
        Self {
            id,
            source: Source::Once {
                pending: Some((clock, request)),
                lifecycle,
            },
            state,
            cancel: CancellationToken::new(),
            _connection: None,
        }
    }

    /// An unbounded stream yielding one greeting per `config.interval`, the
    /// first one a full interval after this call. It runs until `cancel` fires
    /// or the returned handle is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn periodic(
        clock: Arc<dyn Clock>,
        request: GreetingRequest,
        config: StreamConfig,
        cancel: CancellationToken,
    ) -> Self {
        let id = ConnectionId::new();
        let (lifecycle, state) = Lifecycle::new(id.clone());
        let (tx, rx) = mpsc::channel(PENDING_CAPACITY);

        let producer = Producer {
            id: id.clone(),
            clock,
            request,
            config,
            tx,
            cancel: cancel.clone(),
            lifecycle,
        };
        tokio::spawn(producer.run());

        Self {
            id,
            source: Source::Periodic {
                rx,
                _cancel_on_drop: cancel.clone().drop_guard(),
            },
            state,
            cancel,
            _connection: None,
        }
    }

    pub(crate) fn with_connection(mut self, guard: ConnectionGuard) -> Self {
        self._connection = Some(guard);
        self
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn state(&self) -> StreamState {
        *self.state.borrow()
    }

    /// Stops the stream. A greeting already handed over may still be
    /// yielded, but no new one is computed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Stream for GreetingStream {
    type Item = GreetingResponse;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match &mut this.source {
            Source::Once { pending, lifecycle } => {
                if this.cancel.is_cancelled() {
                    pending.take();
                    lifecycle.transition(StreamState::Cancelled);
                    return Poll::Ready(None);
                }
                match pending.take() {
                    Some((clock, request)) => {
                        lifecycle.transition(StreamState::Running);
                        let greeting = greeting::greet_once(clock.as_ref(), &request);
                        lifecycle.transition(StreamState::Completed);
                        Poll::Ready(Some(greeting))
                    }
                    None => Poll::Ready(None),
                }
            }
            Source::Periodic { rx, .. } => rx.poll_recv(cx),
        }
    }
}

struct Producer {
    id: ConnectionId,
    clock: Arc<dyn Clock>,
    request: GreetingRequest,
    config: StreamConfig,
    tx: mpsc::Sender<GreetingResponse>,
    cancel: CancellationToken,
    lifecycle: Lifecycle,
}

impl Producer {
    async fn run(self) {
        let id = self.id.as_str();

        if self.config.interval.is_zero() {
            let fault = DomainError::timer_fault("a zero period cannot be armed");
            error!("Stream {id} failed to start its timer: {fault}");
            self.lifecycle.transition(StreamState::Failed);
            return;
        }

        if self.cancel.is_cancelled() {
            self.lifecycle.transition(StreamState::Cancelled);
            return;
        }

        self.lifecycle.transition(StreamState::Running);
        debug!(
            "Stream {id} started for {:?}, ticking every {:?} ({} on overrun)",
            self.request.name(),
            self.config.interval,
            self.config.overrun_policy
        );

        let interval = self.config.interval;
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(match self.config.overrun_policy {
            OverrunPolicy::Drop => MissedTickBehavior::Skip,
            OverrunPolicy::Block => MissedTickBehavior::Delay,
        });

        let mut tick: u64 = 0;
        let mut emitted: u64 = 0;
        let mut dropped: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            tick += 1;

            let permit = match self.config.overrun_policy {
                OverrunPolicy::Drop => match self.tx.try_reserve() {
                    Ok(permit) => permit,
                    Err(TrySendError::Full(())) => {
                        dropped += 1;
                        warn!(
                            "Stream {id}: dropping tick {tick}, \
                             the previous greeting has not been delivered yet"
                        );
                        continue;
                    }
                    Err(TrySendError::Closed(())) => break,
                },
                OverrunPolicy::Block => {
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => break,
                        permit = self.tx.reserve() => match permit {
                            Ok(permit) => permit,
                            Err(_) => break,
                        },
                    }
                }
            };

            permit.send(greeting::compute(self.request.name(), self.clock.now()));
            emitted += 1;
        }

        // Cancellation requested or the consumer is gone.
        self.lifecycle.transition(StreamState::Cancelled);
        info!(
            "Stream {id} ended ({:?}) after {emitted} greeting(s), {dropped} dropped tick(s)",
            self.lifecycle.current()
        );
    }
}
