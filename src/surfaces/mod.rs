//! # Enabled-surface directory.
//!
//! Maps element handles and `(viewport id, rendering engine id)` pairs to the
//! live state of an active viewport.
//!
//! - [`SurfaceDirectory`] the lookup contract the router consumes
//! - [`SurfaceTable`] in-memory implementation for hosts without their own

mod directory;
mod table;

pub use directory::{ElementHandle, EnabledSurface, RenderingEngineHandle, SurfaceDirectory};
pub use table::SurfaceTable;
