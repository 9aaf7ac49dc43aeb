//! # Event bus for annotation events.
//!
//! [`Bus`] is a synchronous publish/subscribe channel keyed by [`EventKind`].
//! `publish()` invokes every current subscriber of the event's kind before it
//! returns.
//!
//! ## Architecture
//! ```text
//! Publishers:                           Subscribers (per kind, in order):
//!   Router ──┐                            ┌──► sub1.on_event(&ev)
//!            ├──► Bus.publish(ev) ──► snapshot ──► sub2.on_event(&ev)
//!   Host   ──┘                            └──► subN.on_event(&ev)
//! ```
//!
//! ## Rules
//! - **Synchronous**: delivery happens inside `publish()`; nothing is buffered.
//! - **Registration order**: subscribers of a kind are invoked in the order they subscribed.
//! - **Snapshot per pass**: the subscriber list is copied before delivery, so
//!   subscribing/unsubscribing during a pass (even from a subscriber) only affects later passes.
//! - **Isolation**: a panicking subscriber is caught; the rest of the pass still runs
//!   and the panic is reported as [`PublishError::SubscriberPanicked`].
//! - **No persistence**: an event published with no subscribers is dropped.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber panics while holding a lock.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::event::{Event, EventKind};
use crate::error::{PublishError, SubscriberFailure};
use crate::subscribers::Subscribe;

/// Identifies one subscription; pass it to [`Bus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Entry {
    id: SubscriptionId,
    kind: EventKind,
    subscriber: Arc<dyn Subscribe>,
}

struct Inner {
    next_id: AtomicU64,
    entries: RwLock<Vec<Entry>>,
}

/// Publish/subscribe channel for annotation events.
///
/// ### Properties
/// - **Cloneable**: clones share the same subscriber list (`Arc` inside).
/// - **Constructible**: there is no process-wide instance; hosts create one
///   and hand it to the router and to whoever subscribes.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<Inner>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("subscribers", &self.inner.entries.read().len())
            .finish()
    }
}

impl Bus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(0),
                entries: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Registers `subscriber` for events of `kind`.
    ///
    /// The same subscriber may be registered several times; it is then
    /// invoked once per registration.
    pub fn subscribe(&self, kind: EventKind, subscriber: Arc<dyn Subscribe>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, AtomicOrdering::Relaxed));
        self.inner.entries.write().push(Entry {
            id,
            kind,
            subscriber,
        });
        tracing::trace!(%kind, id = id.0, "subscriber registered");
        id
    }

    /// Registers `subscriber` for every [`EventKind`].
    pub fn subscribe_all(&self, subscriber: Arc<dyn Subscribe>) -> Vec<SubscriptionId> {
        EventKind::ALL
            .iter()
            .map(|kind| self.subscribe(*kind, Arc::clone(&subscriber)))
            .collect()
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.inner.entries.write();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Number of subscriptions currently registered for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .entries
            .read()
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Delivers `event` to every current subscriber of its kind.
    ///
    /// Returns the number of subscribers that handled the event without
    /// panicking. If any panicked, the pass still completes and the panics are
    /// returned together.
    pub fn publish(&self, event: Event) -> Result<usize, PublishError> {
        let kind = event.kind();
        let scheduled: Vec<Arc<dyn Subscribe>> = {
            let entries = self.inner.entries.read();
            entries
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| Arc::clone(&e.subscriber))
                .collect()
        };

        let mut delivered = 0;
        let mut failures = Vec::new();
        for sub in &scheduled {
            match panic::catch_unwind(AssertUnwindSafe(|| sub.on_event(&event))) {
                Ok(()) => delivered += 1,
                Err(panic_err) => failures.push(SubscriberFailure {
                    subscriber: sub.name(),
                    message: panic_message(panic_err.as_ref()),
                }),
            }
        }

        if failures.is_empty() {
            Ok(delivered)
        } else {
            Err(PublishError::SubscriberPanicked { kind, failures })
        }
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, AnnotationMetadata};
    use crate::events::{CompletedDetail, Completion, RemovedDetail};
    use parking_lot::Mutex;

    fn completed() -> Event {
        Event::completed(CompletedDetail {
            annotation: Arc::new(Annotation::new("a", AnnotationMetadata::new("Length"))),
            completion: Completion::Plain,
        })
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Arc<dyn Subscribe> {
        let log = Arc::clone(log);
        Arc::new(move |_: &Event| log.lock().push(tag))
    }

    #[test]
    fn test_delivers_in_registration_order() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(EventKind::AnnotationCompleted, recorder(&log, "first"));
        bus.subscribe(EventKind::AnnotationCompleted, recorder(&log, "second"));
        bus.subscribe(EventKind::AnnotationAdded, recorder(&log, "other-kind"));

        assert_eq!(bus.publish(completed()).unwrap(), 2);
        assert_eq!(*log.lock(), ["first", "second"]);
    }

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let bus = Bus::new();
        assert_eq!(bus.publish(completed()).unwrap(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = bus.subscribe(EventKind::AnnotationCompleted, recorder(&log, "x"));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(EventKind::AnnotationCompleted), 0);
        bus.publish(completed()).unwrap();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_subscribe_during_delivery_affects_next_pass_only() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let late = recorder(&log, "late");

        let bus_in_sub = bus.clone();
        let registered = Arc::new(Mutex::new(false));
        let registered_in_sub = Arc::clone(&registered);
        let log_in_sub = Arc::clone(&log);
        bus.subscribe(
            EventKind::AnnotationCompleted,
            Arc::new(move |_: &Event| {
                log_in_sub.lock().push("early");
                let mut done = registered_in_sub.lock();
                if !*done {
                    *done = true;
                    bus_in_sub.subscribe(EventKind::AnnotationCompleted, Arc::clone(&late));
                }
            }),
        );

        assert_eq!(bus.publish(completed()).unwrap(), 1);
        assert_eq!(*log.lock(), ["early"]);

        assert_eq!(bus.publish(completed()).unwrap(), 2);
        assert_eq!(*log.lock(), ["early", "early", "late"]);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            EventKind::AnnotationRemoved,
            Arc::new(|_: &Event| panic!("subscriber exploded")),
        );
        bus.subscribe(EventKind::AnnotationRemoved, recorder(&log, "after"));

        let ann = Arc::new(Annotation::new("a", AnnotationMetadata::new("Length")));
        let err = bus.publish(Event::removed(RemovedDetail::new(ann))).unwrap_err();

        assert_eq!(*log.lock(), ["after"]);
        let failures = err.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "subscriber exploded");
    }

    #[test]
    fn test_subscribe_all_covers_every_kind() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let ids = bus.subscribe_all(recorder(&log, "all"));
        assert_eq!(ids.len(), EventKind::ALL.len());
        for kind in EventKind::ALL {
            assert_eq!(bus.subscriber_count(kind), 1);
        }
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }
}
