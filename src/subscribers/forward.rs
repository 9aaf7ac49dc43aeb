//! # Bridge from the synchronous bus to async consumers.
//!
//! [`AsyncForwarder`] is a [`Subscribe`] that copies every event it receives
//! into a bounded queue drained by a dedicated Tokio worker, which calls an
//! [`AsyncSubscribe`] implementation.
//!
//! ## Architecture
//! ```text
//! Bus.publish(ev) ──► AsyncForwarder.on_event ──► [bounded queue] ──► worker ──► sub.on_event().await
//!                         (try_send)                                     └──► panic caught → warn
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `on_event` never waits; a full queue drops the event
//!   for this consumer only and logs a warning.
//! - **FIFO**: the worker handles events one at a time, in publish order.
//! - **Isolation**: a panicking async subscriber is logged and the worker moves
//!   on to the next event.
//! - **Shutdown**: [`ForwarderHandle::shutdown`] closes the queue; the worker
//!   drains what is already queued and exits.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use annoroute::{AsyncForwarder, AsyncSubscribe, Bus, Event};
//!
//! struct Persist;
//!
//! #[async_trait]
//! impl AsyncSubscribe for Persist {
//!     async fn on_event(&self, _ev: &Event) {
//!         // write to a database, send over a socket, ...
//!     }
//!     fn name(&self) -> &'static str { "persist" }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let bus = Bus::new();
//! let (forwarder, handle) = AsyncForwarder::spawn(Arc::new(Persist), 256);
//! bus.subscribe_all(forwarder);
//! // ... publish ...
//! handle.shutdown().await;
//! # }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{panic_message, Event};
use crate::subscribers::Subscribe;

/// Async event consumer driven by an [`AsyncForwarder`] worker.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Slow processing only fills this consumer's queue.
#[async_trait]
pub trait AsyncSubscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the worker task, not in the publisher context.
    async fn on_event(&self, event: &Event);

    /// Returns the consumer name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

struct Shared {
    name: &'static str,
    sender: Mutex<Option<mpsc::Sender<Arc<Event>>>>,
    dropped: AtomicU64,
}

impl Shared {
    fn record_drop(&self, seq: u64, reason: &'static str) {
        self.dropped.fetch_add(1, AtomicOrdering::Relaxed);
        tracing::warn!(subscriber = self.name, seq, reason, "forwarder dropped event");
    }
}

/// Synchronous side of the bridge; subscribe it on a [`Bus`](crate::Bus).
pub struct AsyncForwarder {
    shared: Arc<Shared>,
}

impl AsyncForwarder {
    /// Spawns the worker and returns the forwarder with its control handle.
    ///
    /// `capacity` is clamped to a minimum of 1.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn(sub: Arc<dyn AsyncSubscribe>, capacity: usize) -> (Arc<Self>, ForwarderHandle) {
        let (tx, mut rx) = mpsc::channel::<Arc<Event>>(capacity.max(1));
        let shared = Arc::new(Shared {
            name: sub.name(),
            sender: Mutex::new(Some(tx)),
            dropped: AtomicU64::new(0),
        });

        let worker = tokio::spawn(async move {
            while let Some(ev) = rx.recv().await {
                let fut = sub.on_event(ev.as_ref());

                if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                    tracing::warn!(
                        subscriber = sub.name(),
                        seq = ev.seq,
                        panic = %panic_message(panic_err.as_ref()),
                        "async subscriber panicked"
                    );
                }
            }
        });

        let forwarder = Arc::new(Self {
            shared: Arc::clone(&shared),
        });
        (forwarder, ForwarderHandle { shared, worker })
    }

    /// Number of events dropped because the queue was full or closed.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(AtomicOrdering::Relaxed)
    }
}

impl Subscribe for AsyncForwarder {
    fn on_event(&self, event: &Event) {
        let sender = self.shared.sender.lock();
        let Some(tx) = sender.as_ref() else {
            self.shared.record_drop(event.seq, "closed");
            return;
        };
        match tx.try_send(Arc::new(event.clone())) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => self.shared.record_drop(event.seq, "full"),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.shared.record_drop(event.seq, "closed")
            }
        }
    }

    fn name(&self) -> &'static str {
        self.shared.name
    }
}

/// Control handle for a forwarder worker.
pub struct ForwarderHandle {
    shared: Arc<Shared>,
    worker: JoinHandle<()>,
}

impl ForwarderHandle {
    /// Number of events dropped so far.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(AtomicOrdering::Relaxed)
    }

    /// Closes the queue and waits for the worker to drain it.
    ///
    /// Events published after this call are counted as dropped.
    pub async fn shutdown(self) {
        drop(self.shared.sender.lock().take());
        let _ = self.worker.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, AnnotationMetadata};
    use crate::events::{Bus, CompletedDetail, Completion, EventKind};

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AsyncSubscribe for Collect {
        async fn on_event(&self, ev: &Event) {
            tokio::task::yield_now().await;
            self.seen.lock().push(ev.annotation().uid.clone());
        }
    }

    #[derive(Default)]
    struct Explode {
        handled: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AsyncSubscribe for Explode {
        async fn on_event(&self, ev: &Event) {
            if ev.annotation().uid == "bad" {
                panic!("cannot handle");
            }
            self.handled.lock().push(ev.annotation().uid.clone());
        }
    }

    fn completed(uid: &str) -> Event {
        Event::completed(CompletedDetail {
            annotation: Arc::new(Annotation::new(uid, AnnotationMetadata::new("Length"))),
            completion: Completion::Plain,
        })
    }

    #[tokio::test]
    async fn test_forwards_in_fifo_order() {
        let bus = Bus::new();
        let collect = Arc::new(Collect::default());
        let (fwd, handle) = AsyncForwarder::spawn(collect.clone(), 16);
        bus.subscribe(EventKind::AnnotationCompleted, fwd);

        for uid in ["a", "b", "c"] {
            bus.publish(completed(uid)).unwrap();
        }
        handle.shutdown().await;

        assert_eq!(*collect.seen.lock(), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_full_queue_drops_for_this_consumer_only() {
        let bus = Bus::new();
        let collect = Arc::new(Collect::default());
        let (fwd, handle) = AsyncForwarder::spawn(collect.clone(), 1);
        bus.subscribe(EventKind::AnnotationCompleted, fwd.clone());

        // current-thread runtime: the worker cannot run until we await.
        for uid in ["a", "b", "c"] {
            bus.publish(completed(uid)).unwrap();
        }
        assert_eq!(fwd.dropped(), 2);
        assert_eq!(handle.dropped(), 2);

        handle.shutdown().await;
        assert_eq!(*collect.seen.lock(), ["a"]);
    }

    #[tokio::test]
    async fn test_panicking_consumer_keeps_worker_alive() {
        let explode = Arc::new(Explode::default());
        let (fwd, handle) = AsyncForwarder::spawn(explode.clone(), 8);
        fwd.on_event(&completed("bad"));
        fwd.on_event(&completed("good"));
        handle.shutdown().await;

        assert_eq!(fwd.dropped(), 0);
        assert_eq!(*explode.handled.lock(), ["good"]);
    }

    #[tokio::test]
    async fn test_events_after_shutdown_are_dropped() {
        let (fwd, handle) = AsyncForwarder::spawn(Arc::new(Collect::default()), 8);
        handle.shutdown().await;

        fwd.on_event(&completed("late"));
        assert_eq!(fwd.dropped(), 1);
    }
}
