//! # Tool-group query contract.

use std::sync::Arc;

/// A viewport bound to a tool group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewportBinding {
    pub viewport_id: String,
    pub rendering_engine_id: String,
}

impl ViewportBinding {
    pub fn new(viewport_id: impl Into<String>, rendering_engine_id: impl Into<String>) -> Self {
        Self {
            viewport_id: viewport_id.into(),
            rendering_engine_id: rendering_engine_id.into(),
        }
    }
}

/// Snapshot of one tool group: its id and its viewport bindings, in binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolGroup {
    pub id: String,
    pub viewports: Vec<ViewportBinding>,
}

/// Read-only query over the host's tool groups.
///
/// ### Contract
/// - An unknown tool name yields an empty vector, never an error.
/// - Groups come back in the order they were created.
/// - The result is a snapshot; the router re-queries on every call.
pub trait ToolGroupRegistry {
    fn groups_with_tool(&self, tool_name: &str) -> Vec<ToolGroup>;
}

impl<T: ToolGroupRegistry + ?Sized> ToolGroupRegistry for Arc<T> {
    fn groups_with_tool(&self, tool_name: &str) -> Vec<ToolGroup> {
        (**self).groups_with_tool(tool_name)
    }
}

impl<T: ToolGroupRegistry + ?Sized> ToolGroupRegistry for &T {
    fn groups_with_tool(&self, tool_name: &str) -> Vec<ToolGroup> {
        (**self).groups_with_tool(tool_name)
    }
}
