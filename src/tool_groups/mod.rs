//! # Tool-group registry.
//!
//! A tool group is a named set of tools bound to a set of viewports. The
//! router asks which groups carry an annotation's tool and walks their
//! viewport bindings.
//!
//! - [`ToolGroupRegistry`] the query contract the router consumes
//! - [`ToolGroupManager`] in-memory implementation

mod manager;
mod registry;

pub use manager::ToolGroupManager;
pub use registry::{ToolGroup, ToolGroupRegistry, ViewportBinding};
