//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling annotation events delivered by the [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Router ── publish(Event) ──► Bus ──► subscribers of ev.kind(), in order
//!                                           │
//!                                           ├──► Subscribe::on_event(&Event)   (sync, in publisher)
//!                                           │         │
//!                                           │    ┌────┴─────┬──────────┐
//!                                           │    ▼          ▼          ▼
//!                                           │  LogWriter  closures   Custom
//!                                           │
//!                                           └──► AsyncForwarder ──► queue ──► AsyncSubscribe (tokio worker)
//! ```
//!
//! ## Subscriber types
//! - **Inline subscribers** - run inside `publish` (redraw scheduling, caches, logging)
//! - **Forwarded subscribers** - run on a Tokio worker (I/O, persistence, network fan-out)

mod forward;
#[cfg(feature = "logging")]
mod log;
mod subscriber;

pub use forward::{AsyncForwarder, AsyncSubscribe, ForwarderHandle};
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
