//! # In-memory surface directory.
//!
//! [`SurfaceTable`] keeps the enabled viewports keyed by element handle. Hosts
//! call [`enable`](SurfaceTable::enable) / [`disable`](SurfaceTable::disable)
//! as viewports come and go; the router reads it through [`SurfaceDirectory`].
//!
//! ## Rules
//! - Enabling a handle that is already enabled replaces its surface.
//! - Lookups return clones; nothing borrowed from the table outlives a call.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::directory::{ElementHandle, EnabledSurface, SurfaceDirectory};
use crate::error::NotEnabledError;

/// Thread-safe table of enabled viewports.
#[derive(Debug, Default)]
pub struct SurfaceTable {
    surfaces: RwLock<HashMap<ElementHandle, EnabledSurface>>,
}

impl SurfaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `element` as an active viewport. Returns the surface it replaced, if any.
    pub fn enable(&self, element: ElementHandle, surface: EnabledSurface) -> Option<EnabledSurface> {
        tracing::debug!(
            %element,
            viewport_id = %surface.viewport_id,
            rendering_engine_id = surface.rendering_engine_id(),
            "surface enabled"
        );
        self.surfaces.write().insert(element, surface)
    }

    /// Tears down the viewport behind `element`.
    pub fn disable(&self, element: ElementHandle) -> Option<EnabledSurface> {
        let removed = self.surfaces.write().remove(&element);
        if removed.is_some() {
            tracing::debug!(%element, "surface disabled");
        }
        removed
    }

    /// Points an active viewport at a different frame of reference (e.g. a new volume).
    pub fn set_frame_of_reference(
        &self,
        element: ElementHandle,
        uid: impl Into<String>,
    ) -> Result<(), NotEnabledError> {
        let mut surfaces = self.surfaces.write();
        let surface = surfaces
            .get_mut(&element)
            .ok_or(NotEnabledError::Element(element))?;
        surface.frame_of_reference_uid = uid.into();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.surfaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.read().is_empty()
    }
}

impl SurfaceDirectory for SurfaceTable {
    fn lookup_by_element(&self, element: ElementHandle) -> Result<EnabledSurface, NotEnabledError> {
        self.surfaces
            .read()
            .get(&element)
            .cloned()
            .ok_or(NotEnabledError::Element(element))
    }

    fn lookup_by_ids(
        &self,
        viewport_id: &str,
        rendering_engine_id: &str,
    ) -> Result<EnabledSurface, NotEnabledError> {
        self.surfaces
            .read()
            .values()
            .find(|s| s.viewport_id == viewport_id && s.rendering_engine_id() == rendering_engine_id)
            .cloned()
            .ok_or_else(|| NotEnabledError::Viewport {
                viewport_id: viewport_id.to_string(),
                rendering_engine_id: rendering_engine_id.to_string(),
            })
    }
}
