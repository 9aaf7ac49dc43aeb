//! # Router: decides who hears about an annotation mutation.
//!
//! The [`Router`] reads the surface directory and the tool-group registry,
//! computes a target set, and publishes one or more events on its [`Bus`].
//! It keeps no state between calls.
//!
//! ## Fan-out by frame of reference
//! ```text
//! notify_added_for_frame_of_reference(annotation)
//!   │
//!   ├─► registry.groups_with_tool(metadata.tool_name)
//!   │       └─ none ──────────────────────────────► publish Added{Unspecified}   (1 event)
//!   │
//!   ├─► for group in groups, for binding in group.viewports:
//!   │       directory.lookup_by_ids(binding)
//!   │         ├─ Err  → stale binding, skip
//!   │         └─ Ok(surface) → keep if surface.FOR == annotation.FOR
//!   │
//!   └─► kept.is_empty()
//!           ├─ yes ───────────────────────────────► publish Added{Unspecified}   (1 event)
//!           └─ no  ───────────────────────────────► publish Added{Viewport} per kept surface
//! ```
//!
//! ## Rules
//! - Caller-supplied handles that do not resolve are errors ([`RouterError::NotEnabled`]);
//!   nothing is published.
//! - Bindings that do not resolve during fan-out are skipped silently.
//! - No deduplication: a viewport bound in two matching groups is notified twice.
//! - Every publish gets a freshly built [`Event`].

use std::sync::Arc;

use crate::annotation::{Annotation, ChangeType};
use crate::core::builder::RouterBuilder;
use crate::core::config::Config;
use crate::error::RouterError;
use crate::events::{
    AddedDetail, Bus, CompletedDetail, Completion, Event, ModifiedDetail, RemovedDetail, Target,
};
use crate::subscribers::{AsyncForwarder, AsyncSubscribe, ForwarderHandle};
use crate::surfaces::{ElementHandle, EnabledSurface, SurfaceDirectory};
use crate::tool_groups::ToolGroupRegistry;

/// Annotation event router.
///
/// Every `notify_*` operation returns the number of events it published.
pub struct Router<D, R> {
    directory: D,
    registry: R,
    bus: Bus,
    cfg: Config,
}

impl<D, R> Router<D, R>
where
    D: SurfaceDirectory,
    R: ToolGroupRegistry,
{
    /// Creates a router over the given collaborators.
    pub fn new(directory: D, registry: R, bus: Bus, cfg: Config) -> Self {
        Self {
            directory,
            registry,
            bus,
            cfg,
        }
    }

    /// Returns a builder; see [`RouterBuilder`].
    pub fn builder(directory: D, registry: R) -> RouterBuilder<D, R> {
        RouterBuilder::new(directory, registry)
    }

    /// Bus this router publishes on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Settings this router was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Surface directory used to resolve viewports.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Tool-group registry consulted during fan-out.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Notifies the single viewport behind `element` that `annotation` was added.
    ///
    /// # Errors
    ///
    /// [`RouterError::NotEnabled`] if `element` is not an active viewport;
    /// nothing is published in that case.
    pub fn notify_added(
        &self,
        annotation: Arc<Annotation>,
        element: ElementHandle,
    ) -> Result<usize, RouterError> {
        let surface = self.directory.lookup_by_element(element)?;
        self.publish(Event::added(AddedDetail {
            annotation,
            target: viewport_target(&surface),
        }))?;
        Ok(1)
    }

    /// Notifies every active viewport that shares the annotation's frame of reference.
    ///
    /// Publishes one targeted `AnnotationAdded` per matching binding, in
    /// tool-group order then binding order. When nothing matches (or no tool
    /// group carries the annotation's tool) a single untargeted event is
    /// published instead.
    ///
    /// # Errors
    ///
    /// Only [`RouterError::Publish`], under [`FailurePolicy::Propagate`](crate::FailurePolicy::Propagate).
    pub fn notify_added_for_frame_of_reference(
        &self,
        annotation: Arc<Annotation>,
    ) -> Result<usize, RouterError> {
        let targets = self.frame_of_reference_targets(&annotation);

        if targets.is_empty() {
            self.publish(Event::added(AddedDetail {
                annotation,
                target: Target::Unspecified,
            }))?;
            return Ok(1);
        }

        let count = targets.len();
        for target in targets {
            self.publish(Event::added(AddedDetail {
                annotation: Arc::clone(&annotation),
                target,
            }))?;
        }
        Ok(count)
    }

    /// Computes the viewports that frame-of-reference fan-out would target.
    ///
    /// Returns an empty vector when no tool group carries the tool or no
    /// active bound viewport shows the annotation's frame of reference.
    pub fn frame_of_reference_targets(&self, annotation: &Annotation) -> Vec<Target> {
        let tool = annotation.tool_name();
        let groups = self.registry.groups_with_tool(tool);
        if groups.is_empty() {
            tracing::debug!(%tool, "no tool group carries tool");
            return Vec::new();
        }

        let Some(frame_of_reference) = annotation.frame_of_reference_uid() else {
            tracing::debug!(%tool, annotation = %annotation.uid, "annotation has no frame of reference");
            return Vec::new();
        };

        let mut targets = Vec::new();
        for group in &groups {
            for binding in &group.viewports {
                let surface = match self
                    .directory
                    .lookup_by_ids(&binding.viewport_id, &binding.rendering_engine_id)
                {
                    Ok(surface) => surface,
                    Err(err) => {
                        tracing::debug!(
                            group = %group.id,
                            viewport_id = %binding.viewport_id,
                            rendering_engine_id = %binding.rendering_engine_id,
                            reason = err.as_label(),
                            "skipping stale viewport binding"
                        );
                        continue;
                    }
                };
                if surface.shows_frame_of_reference(frame_of_reference) {
                    targets.push(viewport_target(&surface));
                }
            }
        }

        tracing::debug!(
            %tool,
            %frame_of_reference,
            groups = groups.len(),
            matched = targets.len(),
            "frame-of-reference fan-out computed"
        );
        targets
    }

    /// Publishes a caller-built removal detail verbatim.
    pub fn notify_removed(&self, detail: RemovedDetail) -> Result<usize, RouterError> {
        self.publish(Event::removed(detail))?;
        Ok(1)
    }

    /// Publishes one `AnnotationModified`.
    ///
    /// With an element, the event targets that viewport; without one it is
    /// untargeted and subscribers work out which viewports are affected.
    /// `change_type` defaults to [`Config::default_change_type`].
    ///
    /// # Errors
    ///
    /// [`RouterError::NotEnabled`] if an explicit `element` is not active.
    pub fn notify_modified(
        &self,
        annotation: Arc<Annotation>,
        element: Option<ElementHandle>,
        change_type: Option<ChangeType>,
    ) -> Result<usize, RouterError> {
        let target = match element {
            Some(element) => {
                let surface = self.directory.lookup_by_element(element)?;
                viewport_target(&surface)
            }
            None => Target::Unspecified,
        };

        self.publish(Event::modified(ModifiedDetail {
            annotation,
            target,
            change_type: change_type.unwrap_or(self.cfg.default_change_type),
        }))?;
        Ok(1)
    }

    /// Publishes one plain `AnnotationCompleted`.
    pub fn notify_completed(&self, annotation: Arc<Annotation>) -> Result<usize, RouterError> {
        self.publish(Event::completed(CompletedDetail {
            annotation,
            completion: Completion::Plain,
        }))?;
        Ok(1)
    }

    /// Publishes one `AnnotationCompleted` in contour form.
    ///
    /// `hole_processing_enabled` defaults to `false`.
    pub fn notify_contour_completed(
        &self,
        annotation: Arc<Annotation>,
        hole_processing_enabled: Option<bool>,
    ) -> Result<usize, RouterError> {
        self.publish(Event::completed(CompletedDetail {
            annotation,
            completion: Completion::Contour {
                hole_processing_enabled: hole_processing_enabled.unwrap_or(false),
            },
        }))?;
        Ok(1)
    }

    /// Subscribes an async consumer to every event kind on this router's bus.
    ///
    /// The queue capacity comes from [`Config::forward_queue_capacity`].
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn_forwarder(&self, sub: Arc<dyn AsyncSubscribe>) -> ForwarderHandle {
        let (forwarder, handle) = AsyncForwarder::spawn(sub, self.cfg.forward_capacity_clamped());
        self.bus.subscribe_all(forwarder);
        handle
    }

    fn publish(&self, event: Event) -> Result<(), RouterError> {
        let kind = event.kind();
        tracing::debug!(%kind, seq = event.seq, target = ?event.target(), "publishing annotation event");

        match self.bus.publish(event) {
            Ok(_) => Ok(()),
            Err(err) if !self.cfg.propagates_subscriber_failures() => {
                for failure in err.failures() {
                    tracing::warn!(
                        %kind,
                        subscriber = failure.subscriber,
                        panic = %failure.message,
                        "subscriber panicked; continuing"
                    );
                }
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Target naming the viewport behind `surface`, with the engine id taken from its handle.
fn viewport_target(surface: &EnabledSurface) -> Target {
    Target::viewport(surface.viewport_id.as_str(), surface.rendering_engine_id())
}
