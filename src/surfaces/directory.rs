//! # Surface lookup contract.
//!
//! The viewport subsystem owns the drawing surfaces; the router only needs to
//! resolve a handle to the viewport's ids and frame of reference. Both lookups
//! fail with [`NotEnabledError`] for a viewport that is not active. They never
//! return an "empty" surface.

use std::fmt;
use std::sync::Arc;

use crate::error::NotEnabledError;

/// Opaque platform handle of a viewport element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u64);

impl ElementHandle {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to the rendering engine that owns a viewport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderingEngineHandle {
    id: Arc<str>,
}

impl RenderingEngineHandle {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self { id: id.into() }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Live state of one active viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledSurface {
    pub viewport_id: String,
    /// Coordinate space currently displayed by the viewport.
    pub frame_of_reference_uid: String,
    pub rendering_engine: RenderingEngineHandle,
}

impl EnabledSurface {
    pub fn new(
        viewport_id: impl Into<String>,
        rendering_engine_id: impl Into<Arc<str>>,
        frame_of_reference_uid: impl Into<String>,
    ) -> Self {
        Self {
            viewport_id: viewport_id.into(),
            frame_of_reference_uid: frame_of_reference_uid.into(),
            rendering_engine: RenderingEngineHandle::new(rendering_engine_id),
        }
    }

    /// Id of the owning rendering engine, read from its handle.
    #[inline]
    pub fn rendering_engine_id(&self) -> &str {
        self.rendering_engine.id()
    }

    /// Returns true if this surface displays the given frame of reference.
    #[inline]
    pub fn shows_frame_of_reference(&self, uid: &str) -> bool {
        self.frame_of_reference_uid == uid
    }
}

/// Read-only lookup of active viewports.
///
/// Implementations must be safe to read while the host mutates its own
/// viewport state; the router never writes through this trait.
pub trait SurfaceDirectory {
    /// Resolves a platform element to its active viewport.
    fn lookup_by_element(&self, element: ElementHandle) -> Result<EnabledSurface, NotEnabledError>;

    /// Resolves a viewport by id on a given rendering engine.
    fn lookup_by_ids(
        &self,
        viewport_id: &str,
        rendering_engine_id: &str,
    ) -> Result<EnabledSurface, NotEnabledError>;
}

impl<T: SurfaceDirectory + ?Sized> SurfaceDirectory for Arc<T> {
    fn lookup_by_element(&self, element: ElementHandle) -> Result<EnabledSurface, NotEnabledError> {
        (**self).lookup_by_element(element)
    }

    fn lookup_by_ids(
        &self,
        viewport_id: &str,
        rendering_engine_id: &str,
    ) -> Result<EnabledSurface, NotEnabledError> {
        (**self).lookup_by_ids(viewport_id, rendering_engine_id)
    }
}

impl<T: SurfaceDirectory + ?Sized> SurfaceDirectory for &T {
    fn lookup_by_element(&self, element: ElementHandle) -> Result<EnabledSurface, NotEnabledError> {
        (**self).lookup_by_element(element)
    }

    fn lookup_by_ids(
        &self,
        viewport_id: &str,
        rendering_engine_id: &str,
    ) -> Result<EnabledSurface, NotEnabledError> {
        (**self).lookup_by_ids(viewport_id, rendering_engine_id)
    }
}
