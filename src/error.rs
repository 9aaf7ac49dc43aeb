//! Error types used by the router, the bus and the in-memory registries.
//!
//! - [`NotEnabledError`] — a handle or id pair does not resolve to an active viewport.
//! - [`PublishError`] — one or more subscribers panicked during a delivery pass.
//! - [`RouterError`] — what router operations return; wraps the two above.
//! - [`ToolGroupError`] — misuse of the in-memory [`ToolGroupManager`](crate::ToolGroupManager).
//!
//! All of them provide `as_label()` for logs/metrics.

use thiserror::Error;

use crate::events::EventKind;
use crate::surfaces::ElementHandle;

/// # Lookup of a viewport that is not currently enabled.
///
/// Raised by single-surface lookups. Frame-of-reference fan-out treats the
/// same failure as a stale binding and skips it instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotEnabledError {
    /// The element handle maps to no active viewport.
    #[error("element {0} is not enabled")]
    Element(ElementHandle),

    /// No active viewport with this id exists on this rendering engine.
    #[error("viewport {viewport_id:?} on rendering engine {rendering_engine_id:?} is not enabled")]
    Viewport {
        viewport_id: String,
        rendering_engine_id: String,
    },
}

impl NotEnabledError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            NotEnabledError::Element(_) => "element_not_enabled",
            NotEnabledError::Viewport { .. } => "viewport_not_enabled",
        }
    }
}

/// A subscriber that panicked while handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberFailure {
    /// Value of [`Subscribe::name`](crate::Subscribe::name).
    pub subscriber: &'static str,
    /// Panic payload rendered as text.
    pub message: String,
}

/// # Errors produced by [`Bus::publish`](crate::Bus::publish).
///
/// Delivery always runs to the end of the pass; the error is reported after
/// every scheduled subscriber has been invoked.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum PublishError {
    #[error("{} subscriber(s) panicked while handling {kind}", failures.len())]
    SubscriberPanicked {
        kind: EventKind,
        failures: Vec<SubscriberFailure>,
    },
}

impl PublishError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PublishError::SubscriberPanicked { .. } => "subscriber_panicked",
        }
    }

    /// Returns the individual subscriber failures.
    pub fn failures(&self) -> &[SubscriberFailure] {
        match self {
            PublishError::SubscriberPanicked { failures, .. } => failures,
        }
    }
}

/// # Errors returned by [`Router`](crate::Router) operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RouterError {
    /// A caller-supplied element did not resolve. Nothing was published.
    #[error(transparent)]
    NotEnabled(#[from] NotEnabledError),

    /// A subscriber failed and the configured policy is to propagate.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl RouterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use annoroute::{ElementHandle, NotEnabledError, RouterError};
    ///
    /// let err = RouterError::from(NotEnabledError::Element(ElementHandle::new(7)));
    /// assert_eq!(err.as_label(), "element_not_enabled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RouterError::NotEnabled(e) => e.as_label(),
            RouterError::Publish(e) => e.as_label(),
        }
    }

    /// Indicates whether this error is a caller-side resolution failure.
    pub fn is_not_enabled(&self) -> bool {
        matches!(self, RouterError::NotEnabled(_))
    }
}

/// # Errors produced by the in-memory tool-group registry.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolGroupError {
    #[error("tool group {0:?} already exists")]
    AlreadyExists(String),

    #[error("tool group {0:?} not found")]
    NotFound(String),
}

impl ToolGroupError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ToolGroupError::AlreadyExists(_) => "tool_group_exists",
            ToolGroupError::NotFound(_) => "tool_group_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let viewport = NotEnabledError::Viewport {
            viewport_id: "vp".into(),
            rendering_engine_id: "re".into(),
        };
        assert_eq!(viewport.as_label(), "viewport_not_enabled");
        assert_eq!(
            RouterError::from(viewport).as_label(),
            "viewport_not_enabled"
        );
        assert_eq!(
            ToolGroupError::NotFound("g".into()).as_label(),
            "tool_group_not_found"
        );
    }

    #[test]
    fn test_publish_error_message_counts_failures() {
        let err = PublishError::SubscriberPanicked {
            kind: EventKind::AnnotationAdded,
            failures: vec![
                SubscriberFailure {
                    subscriber: "a",
                    message: "boom".into(),
                },
                SubscriberFailure {
                    subscriber: "b",
                    message: "bang".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "2 subscriber(s) panicked while handling ANNOTATION_ADDED"
        );
        assert_eq!(err.failures().len(), 2);
        assert!(!RouterError::from(err).is_not_enabled());
    }
}
