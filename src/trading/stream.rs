//! Live quote streams
//!
//! A subscription delivers one quote immediately, then re-evaluates on a
//! fixed interval and whenever a relevant [`ChainEvent`] arrives.
//!
//! Staleness is fenced twice. The streamer owns a generation counter that
//! [`QuoteStreamer::cancel_all`] advances, and each subscription owns its own
//! cancel flag. A subscription is live while its flag is clear and the
//! counter still equals the value captured at subscribe time.
//!
//! Liveness is re-checked under a delivery gate shared by every stream of a
//! streamer, and cancelling takes the same gate, so once a cancel returns no
//! quote computed before it reaches the listener. The gate is reentrant, so a
//! listener may cancel its own stream or any other stream of the same
//! streamer. Listeners of one streamer never run concurrently.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use alloy_primitives::Address;
use parking_lot::{Mutex, ReentrantMutex};
use tokio::sync::{Notify, broadcast};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::aggregator::QuoteAggregator;
use super::lifecycle::ListenerRef;
use crate::common::chain::{ChainEvent, EventSource};
use crate::utils::quote::QuoteRequest;

const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

struct Session {
    id: u64,
    generation: u64,
    cancelled: AtomicBool,
    wake: Notify,
    // Held across the liveness check and the listener call.
    gate: Arc<ReentrantMutex<()>>,
}

impl Session {
    fn is_live(&self, generation: &AtomicU64) -> bool {
        !self.cancelled.load(Ordering::Acquire) && generation.load(Ordering::Acquire) == self.generation
    }
}

pub struct QuoteStreamer {
    aggregator: Arc<QuoteAggregator>,
    events: Option<Arc<dyn EventSource>>,
    refresh_interval: Duration,
    generation: Arc<AtomicU64>,
    gate: Arc<ReentrantMutex<()>>,
    sessions: Mutex<Vec<Weak<Session>>>,
    next_id: AtomicU64,
}

impl QuoteStreamer {
    /// Streams re-evaluate every `aggregator.config().refresh_interval`, plus
    /// on events from `events` when given.
    pub fn new(aggregator: Arc<QuoteAggregator>, events: Option<Arc<dyn EventSource>>) -> Self {
        let refresh_interval = aggregator.config().refresh_interval.max(MIN_REFRESH_INTERVAL);
        Self {
            aggregator,
            events,
            refresh_interval,
            generation: Arc::new(AtomicU64::new(0)),
            gate: Arc::new(ReentrantMutex::new(())),
            sessions: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Number of subscriptions that are still live.
    pub fn active_sessions(&self) -> usize {
        let mut sessions = self.sessions.lock();
        sessions.retain(|s| s.strong_count() > 0);
        sessions.iter().filter_map(Weak::upgrade).filter(|s| s.is_live(&self.generation)).count()
    }

    /// Starts streaming quotes for `request` into `listener`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn subscribe(&self, request: QuoteRequest, listener: ListenerRef) -> Subscription {
        let session = Arc::new(Session {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            generation: self.generation.load(Ordering::Acquire),
            cancelled: AtomicBool::new(false),
            wake: Notify::new(),
            gate: self.gate.clone(),
        });
        {
            let mut sessions = self.sessions.lock();
            sessions.retain(|s| s.strong_count() > 0);
            sessions.push(Arc::downgrade(&session));
        }
        debug!("quote stream {} opened for pool {} at generation {}", session.id, request.pool, session.generation);

        let events = self.events.as_ref().map(|source| source.subscribe());
        let handle = tokio::spawn(run_stream(
            session.clone(),
            self.generation.clone(),
            self.aggregator.clone(),
            request,
            listener,
            events,
            self.refresh_interval,
        ));

        Subscription { session, generation: self.generation.clone(), handle }
    }

    /// Invalidates every subscription created so far.
    pub fn cancel_all(&self) {
        // waits out a delivery already past its liveness check
        let _gate = self.gate.lock();
        let previous = self.generation.fetch_add(1, Ordering::AcqRel);
        let sessions = std::mem::take(&mut *self.sessions.lock());
        for session in sessions.iter().filter_map(Weak::upgrade) {
            session.wake.notify_one();
        }
        debug!("all quote streams cancelled, generation {} -> {}", previous, previous + 1);
    }
}

/// Handle to a running stream. Dropping it cancels the stream.
pub struct Subscription {
    session: Arc<Session>,
    generation: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stops deliveries, including any quote still being computed.
    pub fn cancel(&self) {
        let _gate = self.session.gate.lock();
        if !self.session.cancelled.swap(true, Ordering::AcqRel) {
            self.session.wake.notify_one();
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_live(&self.generation)
    }

    /// Generation captured when the subscription started.
    pub fn generation(&self) -> u64 {
        self.session.generation
    }

    /// Waits for the stream task to tear down after a cancel.
    pub async fn closed(&mut self) {
        if let Err(e) = (&mut self.handle).await {
            warn!("quote stream {} task failed: {e}", self.session.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_stream(
    session: Arc<Session>,
    generation: Arc<AtomicU64>,
    aggregator: Arc<QuoteAggregator>,
    request: QuoteRequest,
    listener: ListenerRef,
    mut events: Option<broadcast::Receiver<ChainEvent>>,
    refresh_interval: Duration,
) {
    let mut ticker = tokio::time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = session.wake.notified() => {}
            _ = ticker.tick() => {}
            relevant = next_trigger(&mut events, request.pool) => {
                if !relevant {
                    continue;
                }
            }
        }
        if !session.is_live(&generation) {
            break;
        }

        let result = tokio::select! {
            _ = session.wake.notified() => break,
            result = aggregator.best_quote(&request) => result,
        };
        let quote = result.unwrap_or_else(|e| {
            warn!("quote stream {} evaluation failed: {e}", session.id);
            None
        });

        let _gate = session.gate.lock();
        if !session.is_live(&generation) {
            break;
        }
        listener.on_quote(quote);
    }
    debug!("quote stream {} closed", session.id);
}

/// Resolves `true` on an event that should trigger a re-evaluation. Never
/// resolves when there is no event feed.
async fn next_trigger(events: &mut Option<broadcast::Receiver<ChainEvent>>, pool: Address) -> bool {
    let Some(rx) = events.as_mut() else {
        return std::future::pending().await;
    };
    match rx.recv().await {
        Ok(event) => event.affects_pool(pool),
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
            debug!("quote stream missed {skipped} events, re-evaluating");
            true
        }
        Err(broadcast::error::RecvError::Closed) => {
            *events = None;
            false
        }
    }
}
