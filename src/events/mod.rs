//! Annotation events: types and bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to annotation events emitted by the router.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`EventDetail`] event classification and payloads
//! - [`Target`] explicit viewport addressing
//! - [`Bus`] synchronous, kind-keyed publish/subscribe
//!
//! ## Quick reference
//! - **Publishers**: [`Router`](crate::Router); hosts may publish directly too.
//! - **Consumers**: anything implementing [`Subscribe`](crate::Subscribe),
//!   including [`AsyncForwarder`](crate::AsyncForwarder) for async consumers.

mod bus;
mod event;

pub(crate) use bus::panic_message;
pub use bus::{Bus, SubscriptionId};
pub use event::{
    AddedDetail, CompletedDetail, Completion, Event, EventDetail, EventKind, ModifiedDetail,
    RemovedDetail, Target,
};
