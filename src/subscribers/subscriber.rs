//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for reacting to annotation
//! events published on the [`Bus`](crate::Bus).
//!
//! ## Rules
//! - `on_event` runs **inside** `Bus::publish`, on the publisher's thread.
//!   Keep it short; hand slow work to an [`AsyncForwarder`](crate::AsyncForwarder).
//! - Subscribers may call back into the bus or the router; the bus holds no
//!   lock while delivering.
//! - A panic is caught by the bus and reported to the publisher; other
//!   subscribers in the same pass still run.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use annoroute::{Bus, Event, EventKind, Subscribe, Target};
//!
//! struct Redraw;
//!
//! impl Subscribe for Redraw {
//!     fn on_event(&self, ev: &Event) {
//!         if let Some(Target::Viewport { viewport_id, .. }) = ev.target() {
//!             // schedule a render of `viewport_id`
//!             let _ = viewport_id;
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "redraw" }
//! }
//!
//! let bus = Bus::new();
//! bus.subscribe(EventKind::AnnotationAdded, Arc::new(Redraw));
//! ```

use crate::events::Event;

/// Synchronous event subscriber.
///
/// Closures of type `Fn(&Event)` implement this trait directly.
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    ///
    /// Called once per subscription, in registration order.
    fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs and in
    /// [`SubscriberFailure`](crate::SubscriberFailure).
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Subscribe for F
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        self(event)
    }
}
