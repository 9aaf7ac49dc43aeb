//! # Annotation events published on the bus.
//!
//! [`EventKind`] is the subscription key. [`Event`] wraps one
//! [`EventDetail`] together with ordering metadata; the kind is derived from
//! the detail variant so the two can never disagree.
//!
//! Targets are explicit: a detail either names one viewport
//! ([`Target::Viewport`]) or none ([`Target::Unspecified`]). Subscribers that
//! only care about the kind can ignore the target; the rest match on it.
//!
//! ## Ordering guarantees
//! `seq` is process-wide and increases monotonically, so events from several
//! buses can still be ordered.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use annoroute::{AddedDetail, Annotation, AnnotationMetadata, Event, EventKind, Target};
//!
//! let ann = Arc::new(Annotation::new("a1", AnnotationMetadata::new("Length")));
//! let ev = Event::added(AddedDetail {
//!     annotation: ann,
//!     target: Target::viewport("CT_AXIAL", "engine"),
//! });
//!
//! assert_eq!(ev.kind(), EventKind::AnnotationAdded);
//! assert_eq!(ev.target().and_then(|t| t.viewport_id()), Some("CT_AXIAL"));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, ChangeType};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of annotation events; the key subscribers register under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// An annotation was added.
    ///
    /// Detail: [`AddedDetail`].
    AnnotationAdded,

    /// An annotation's handles, stats or labels changed.
    ///
    /// Detail: [`ModifiedDetail`].
    AnnotationModified,

    /// The drawing of an annotation finished.
    ///
    /// Detail: [`CompletedDetail`], plain or contour form.
    AnnotationCompleted,

    /// An annotation was removed from the store.
    ///
    /// Detail: [`RemovedDetail`], built by the caller.
    AnnotationRemoved,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 4] = [
        EventKind::AnnotationAdded,
        EventKind::AnnotationModified,
        EventKind::AnnotationCompleted,
        EventKind::AnnotationRemoved,
    ];

    /// Stable wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AnnotationAdded => "ANNOTATION_ADDED",
            EventKind::AnnotationModified => "ANNOTATION_MODIFIED",
            EventKind::AnnotationCompleted => "ANNOTATION_COMPLETED",
            EventKind::AnnotationRemoved => "ANNOTATION_REMOVED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which viewport a notification is addressed to.
///
/// On the wire a viewport target is the `viewportId` / `renderingEngineId`
/// pair flattened into the detail; an unspecified target has no keys at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TargetRepr", into = "TargetRepr")]
pub enum Target {
    /// One specific viewport.
    Viewport {
        viewport_id: String,
        rendering_engine_id: String,
    },
    /// No viewport; subscribers decide for themselves what is affected.
    Unspecified,
}

impl Target {
    pub fn viewport(viewport_id: impl Into<String>, rendering_engine_id: impl Into<String>) -> Self {
        Target::Viewport {
            viewport_id: viewport_id.into(),
            rendering_engine_id: rendering_engine_id.into(),
        }
    }

    #[inline]
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Target::Unspecified)
    }

    #[inline]
    pub fn viewport_id(&self) -> Option<&str> {
        match self {
            Target::Viewport { viewport_id, .. } => Some(viewport_id),
            Target::Unspecified => None,
        }
    }

    #[inline]
    pub fn rendering_engine_id(&self) -> Option<&str> {
        match self {
            Target::Viewport {
                rendering_engine_id,
                ..
            } => Some(rendering_engine_id),
            Target::Unspecified => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    viewport_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rendering_engine_id: Option<String>,
}

impl From<TargetRepr> for Target {
    fn from(repr: TargetRepr) -> Self {
        match (repr.viewport_id, repr.rendering_engine_id) {
            (Some(viewport_id), Some(rendering_engine_id)) => Target::Viewport {
                viewport_id,
                rendering_engine_id,
            },
            _ => Target::Unspecified,
        }
    }
}

impl From<Target> for TargetRepr {
    fn from(target: Target) -> Self {
        match target {
            Target::Viewport {
                viewport_id,
                rendering_engine_id,
            } => TargetRepr {
                viewport_id: Some(viewport_id),
                rendering_engine_id: Some(rendering_engine_id),
            },
            Target::Unspecified => TargetRepr {
                viewport_id: None,
                rendering_engine_id: None,
            },
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Viewport {
                viewport_id,
                rendering_engine_id,
            } => write!(f, "{rendering_engine_id}/{viewport_id}"),
            Target::Unspecified => f.write_str("<unspecified>"),
        }
    }
}

/// Payload of [`EventKind::AnnotationAdded`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedDetail {
    pub annotation: Arc<Annotation>,
    #[serde(flatten)]
    pub target: Target,
}

/// Payload of [`EventKind::AnnotationModified`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedDetail {
    pub annotation: Arc<Annotation>,
    #[serde(flatten)]
    pub target: Target,
    pub change_type: ChangeType,
}

/// Shape of an [`EventKind::AnnotationCompleted`] payload.
///
/// Serialized as an optional `contourHoleProcessingEnabled` key: absent for
/// the plain form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CompletionRepr", into = "CompletionRepr")]
pub enum Completion {
    /// Any annotation finished drawing.
    Plain,
    /// A contour finished drawing; carries the hole-processing flag.
    Contour { hole_processing_enabled: bool },
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contour_hole_processing_enabled: Option<bool>,
}

impl From<CompletionRepr> for Completion {
    fn from(repr: CompletionRepr) -> Self {
        match repr.contour_hole_processing_enabled {
            Some(hole_processing_enabled) => Completion::Contour {
                hole_processing_enabled,
            },
            None => Completion::Plain,
        }
    }
}

impl From<Completion> for CompletionRepr {
    fn from(completion: Completion) -> Self {
        let contour_hole_processing_enabled = match completion {
            Completion::Plain => None,
            Completion::Contour {
                hole_processing_enabled,
            } => Some(hole_processing_enabled),
        };
        CompletionRepr {
            contour_hole_processing_enabled,
        }
    }
}

/// Payload of [`EventKind::AnnotationCompleted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDetail {
    pub annotation: Arc<Annotation>,
    #[serde(flatten)]
    pub completion: Completion,
}

impl CompletedDetail {
    /// Hole-processing flag; `None` for the plain form.
    #[inline]
    pub fn contour_hole_processing_enabled(&self) -> Option<bool> {
        match self.completion {
            Completion::Plain => None,
            Completion::Contour {
                hole_processing_enabled,
            } => Some(hole_processing_enabled),
        }
    }
}

/// Payload of [`EventKind::AnnotationRemoved`]; built by the caller and
/// published verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedDetail {
    pub annotation: Arc<Annotation>,
    #[serde(flatten)]
    pub target: Target,
    /// Store the annotation was removed from, when the host runs several.
    #[serde(
        rename = "annotationManagerUID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub annotation_manager_uid: Option<String>,
}

impl RemovedDetail {
    /// Untargeted removal from the default store.
    pub fn new(annotation: Arc<Annotation>) -> Self {
        Self {
            annotation,
            target: Target::Unspecified,
            annotation_manager_uid: None,
        }
    }

    #[inline]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    #[inline]
    pub fn with_annotation_manager(mut self, uid: impl Into<String>) -> Self {
        self.annotation_manager_uid = Some(uid.into());
        self
    }
}

/// Event payload, one variant per [`EventKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum EventDetail {
    Added(AddedDetail),
    Modified(ModifiedDetail),
    Completed(CompletedDetail),
    Removed(RemovedDetail),
}

impl EventDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetail::Added(_) => EventKind::AnnotationAdded,
            EventDetail::Modified(_) => EventKind::AnnotationModified,
            EventDetail::Completed(_) => EventKind::AnnotationCompleted,
            EventDetail::Removed(_) => EventKind::AnnotationRemoved,
        }
    }

    pub fn annotation(&self) -> &Arc<Annotation> {
        match self {
            EventDetail::Added(d) => &d.annotation,
            EventDetail::Modified(d) => &d.annotation,
            EventDetail::Completed(d) => &d.annotation,
            EventDetail::Removed(d) => &d.annotation,
        }
    }

    /// Target of the detail; `None` for completion events, which never carry one.
    pub fn target(&self) -> Option<&Target> {
        match self {
            EventDetail::Added(d) => Some(&d.target),
            EventDetail::Modified(d) => Some(&d.target),
            EventDetail::Removed(d) => Some(&d.target),
            EventDetail::Completed(_) => None,
        }
    }
}

/// Annotation event with ordering metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Payload.
    pub detail: EventDetail,
}

impl Event {
    /// Creates an event with current timestamp and next sequence number.
    pub fn new(detail: EventDetail) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            detail,
        }
    }

    #[inline]
    pub fn added(detail: AddedDetail) -> Self {
        Self::new(EventDetail::Added(detail))
    }

    #[inline]
    pub fn modified(detail: ModifiedDetail) -> Self {
        Self::new(EventDetail::Modified(detail))
    }

    #[inline]
    pub fn completed(detail: CompletedDetail) -> Self {
        Self::new(EventDetail::Completed(detail))
    }

    #[inline]
    pub fn removed(detail: RemovedDetail) -> Self {
        Self::new(EventDetail::Removed(detail))
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.detail.kind()
    }

    #[inline]
    pub fn annotation(&self) -> &Arc<Annotation> {
        self.detail.annotation()
    }

    #[inline]
    pub fn target(&self) -> Option<&Target> {
        self.detail.target()
    }
}
