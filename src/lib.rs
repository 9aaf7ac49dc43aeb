//! # annoroute
//!
//! **annoroute** routes annotation change notifications to the viewports that
//! should hear about them.
//!
//! When an annotation is added, modified, completed or removed, the
//! [`Router`] decides which viewports are affected and publishes one typed
//! [`Event`] per target on a [`Bus`]. The interesting case is
//! frame-of-reference fan-out: an added annotation is announced to **every**
//! active viewport that shows the same coordinate space, across every tool
//! group that has the annotation's tool, even viewports that never saw the
//! add directly.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   annotation store (host)
//!            │  notify_added / notify_added_for_frame_of_reference
//!            │  notify_modified / notify_completed / notify_removed
//!            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Router                                                           │
//! │  - ToolGroupRegistry   (which groups carry the tool, their views) │
//! │  - SurfaceDirectory    (handle / ids → live viewport + FOR)       │
//! │  - Config              (default change type, failure policy)      │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   │ publish(Event) × targets
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                    Bus (synchronous, keyed by EventKind)          │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   sub1.on_event()    sub2.on_event()    AsyncForwarder ──► queue ──► AsyncSubscribe
//!   (redraw)           (LogWriter)                                     (tokio worker)
//! ```
//!
//! ### Fan-out
//! ```text
//! groups_with_tool(tool) ──► bindings (group order, binding order)
//!     └─► lookup_by_ids ──► Err: skip (stale)   Ok: keep if FOR matches
//!             └─► none kept  → 1 × Added{Unspecified}
//!             └─► n kept     → n × Added{Viewport}
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Routing**       | Target selection and publishing per mutation kind.            | [`Router`], [`RouterBuilder`]               |
//! | **Events**        | Typed payloads with explicit targets.                         | [`Event`], [`EventDetail`], [`Target`]      |
//! | **Bus**           | Synchronous kind-keyed publish/subscribe with panic isolation.| [`Bus`], [`Subscribe`]                      |
//! | **Async bridge**  | Hand events to async consumers through bounded queues.        | [`AsyncForwarder`], [`AsyncSubscribe`]      |
//! | **Collaborators** | Lookup contracts plus in-memory implementations.              | [`SurfaceDirectory`], [`ToolGroupRegistry`] |
//! | **Errors**        | Typed errors with stable labels.                              | [`RouterError`], [`NotEnabledError`]        |
//! | **Configuration** | Centralize router settings.                                   | [`Config`], [`FailurePolicy`]               |
//!
//! ## Optional features
//! - `logging`: exports the tracing-backed [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use annoroute::{
//!     Annotation, AnnotationMetadata, ElementHandle, EnabledSurface, Event, EventKind, Router,
//!     SurfaceTable, ToolGroupManager, ViewportBinding,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let surfaces = Arc::new(SurfaceTable::new());
//! surfaces.enable(ElementHandle::new(1), EnabledSurface::new("axial", "engine", "for-ct"));
//! surfaces.enable(ElementHandle::new(2), EnabledSurface::new("coronal", "engine", "for-ct"));
//!
//! let groups = Arc::new(ToolGroupManager::new());
//! groups.create_group("ct")?;
//! groups.add_tool("ct", "Length")?;
//! groups.add_viewport("ct", ViewportBinding::new("axial", "engine"))?;
//! groups.add_viewport("ct", ViewportBinding::new("coronal", "engine"))?;
//!
//! let router = Router::builder(surfaces.clone(), groups.clone()).build();
//! router.bus().subscribe(
//!     EventKind::AnnotationAdded,
//!     Arc::new(|ev: &Event| println!("redraw {:?}", ev.target())),
//! );
//!
//! let ann = Arc::new(Annotation::new(
//!     "ann-1",
//!     AnnotationMetadata::new("Length").with_frame_of_reference("for-ct"),
//! ));
//! assert_eq!(router.notify_added_for_frame_of_reference(ann)?, 2);
//! # Ok(())
//! # }
//! ```
mod annotation;
mod core;
mod error;
mod events;
mod subscribers;
mod surfaces;
mod tool_groups;

// ---- Public re-exports ----

pub use annotation::{Annotation, AnnotationMetadata, ChangeType};
pub use crate::core::{Config, FailurePolicy, Router, RouterBuilder};
pub use error::{NotEnabledError, PublishError, RouterError, SubscriberFailure, ToolGroupError};
pub use events::{
    AddedDetail, Bus, CompletedDetail, Completion, Event, EventDetail, EventKind, ModifiedDetail,
    RemovedDetail, SubscriptionId, Target,
};
pub use subscribers::{AsyncForwarder, AsyncSubscribe, ForwarderHandle, Subscribe};
pub use surfaces::{
    ElementHandle, EnabledSurface, RenderingEngineHandle, SurfaceDirectory, SurfaceTable,
};
pub use tool_groups::{ToolGroup, ToolGroupManager, ToolGroupRegistry, ViewportBinding};

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
