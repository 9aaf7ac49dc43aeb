//! # In-memory tool-group manager.
//!
//! [`ToolGroupManager`] owns tool groups in creation order. Each group keeps
//! its tool names and its viewport bindings in insertion order.
//!
//! ## Rules
//! - Group ids are unique; creating a duplicate fails.
//! - Binding a viewport twice to the same group is a no-op. The same viewport
//!   may still be bound to several groups.
//! - `groups_with_tool` hands out clones, so a fan-out in progress never sees
//!   a half-applied mutation.

use parking_lot::RwLock;

use super::registry::{ToolGroup, ToolGroupRegistry, ViewportBinding};
use crate::error::ToolGroupError;

#[derive(Debug)]
struct Group {
    id: String,
    tools: Vec<String>,
    viewports: Vec<ViewportBinding>,
}

impl Group {
    fn snapshot(&self) -> ToolGroup {
        ToolGroup {
            id: self.id.clone(),
            viewports: self.viewports.clone(),
        }
    }
}

/// Thread-safe registry of tool groups.
#[derive(Debug, Default)]
pub struct ToolGroupManager {
    groups: RwLock<Vec<Group>>,
}

impl ToolGroupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty group.
    pub fn create_group(&self, id: impl Into<String>) -> Result<(), ToolGroupError> {
        let id = id.into();
        let mut groups = self.groups.write();
        if groups.iter().any(|g| g.id == id) {
            return Err(ToolGroupError::AlreadyExists(id));
        }
        tracing::debug!(group = %id, "tool group created");
        groups.push(Group {
            id,
            tools: Vec::new(),
            viewports: Vec::new(),
        });
        Ok(())
    }

    /// Removes a group and all of its bindings.
    pub fn destroy_group(&self, id: &str) -> Result<(), ToolGroupError> {
        let mut groups = self.groups.write();
        let before = groups.len();
        groups.retain(|g| g.id != id);
        if groups.len() == before {
            return Err(ToolGroupError::NotFound(id.to_string()));
        }
        tracing::debug!(group = %id, "tool group destroyed");
        Ok(())
    }

    /// Registers a tool on a group. Adding a tool twice is a no-op.
    pub fn add_tool(&self, group: &str, tool_name: impl Into<String>) -> Result<(), ToolGroupError> {
        let tool_name = tool_name.into();
        self.with_group(group, |g| {
            if !g.tools.contains(&tool_name) {
                g.tools.push(tool_name);
            }
        })
    }

    pub fn remove_tool(&self, group: &str, tool_name: &str) -> Result<(), ToolGroupError> {
        self.with_group(group, |g| g.tools.retain(|t| t != tool_name))
    }

    /// Binds a viewport to a group.
    pub fn add_viewport(&self, group: &str, binding: ViewportBinding) -> Result<(), ToolGroupError> {
        self.with_group(group, |g| {
            if !g.viewports.contains(&binding) {
                g.viewports.push(binding);
            }
        })
    }

    pub fn remove_viewport(
        &self,
        group: &str,
        binding: &ViewportBinding,
    ) -> Result<(), ToolGroupError> {
        self.with_group(group, |g| g.viewports.retain(|b| b != binding))
    }

    /// Returns a snapshot of one group.
    pub fn group(&self, id: &str) -> Option<ToolGroup> {
        self.groups
            .read()
            .iter()
            .find(|g| g.id == id)
            .map(Group::snapshot)
    }

    /// Returns group ids in creation order.
    pub fn group_ids(&self) -> Vec<String> {
        self.groups.read().iter().map(|g| g.id.clone()).collect()
    }

    fn with_group(&self, id: &str, f: impl FnOnce(&mut Group)) -> Result<(), ToolGroupError> {
        let mut groups = self.groups.write();
        let group = groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| ToolGroupError::NotFound(id.to_string()))?;
        f(group);
        Ok(())
    }
}

impl ToolGroupRegistry for ToolGroupManager {
    fn groups_with_tool(&self, tool_name: &str) -> Vec<ToolGroup> {
        self.groups
            .read()
            .iter()
            .filter(|g| g.tools.iter().any(|t| t == tool_name))
            .map(Group::snapshot)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_yields_empty() {
        let mgr = ToolGroupManager::new();
        mgr.create_group("g1").unwrap();
        assert!(mgr.groups_with_tool("Length").is_empty());
    }

    #[test]
    fn test_groups_come_back_in_creation_order() {
        let mgr = ToolGroupManager::new();
        for id in ["b", "a", "c"] {
            mgr.create_group(id).unwrap();
            mgr.add_tool(id, "Length").unwrap();
        }
        mgr.add_tool("a", "Angle").unwrap();

        let ids: Vec<String> = mgr
            .groups_with_tool("Length")
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(mgr.groups_with_tool("Angle").len(), 1);
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let mgr = ToolGroupManager::new();
        mgr.create_group("g").unwrap();
        assert_eq!(
            mgr.create_group("g"),
            Err(ToolGroupError::AlreadyExists("g".into()))
        );
    }

    #[test]
    fn test_unknown_group_rejected() {
        let mgr = ToolGroupManager::new();
        assert_eq!(
            mgr.add_tool("missing", "Length"),
            Err(ToolGroupError::NotFound("missing".into()))
        );
        assert!(mgr.destroy_group("missing").is_err());
    }

    #[test]
    fn test_viewport_binding_order_and_dedup_within_group() {
        let mgr = ToolGroupManager::new();
        mgr.create_group("g").unwrap();
        mgr.add_viewport("g", ViewportBinding::new("vp2", "re")).unwrap();
        mgr.add_viewport("g", ViewportBinding::new("vp1", "re")).unwrap();
        mgr.add_viewport("g", ViewportBinding::new("vp2", "re")).unwrap();

        let group = mgr.group("g").unwrap();
        assert_eq!(
            group.viewports,
            [ViewportBinding::new("vp2", "re"), ViewportBinding::new("vp1", "re")]
        );

        mgr.remove_viewport("g", &ViewportBinding::new("vp2", "re")).unwrap();
        assert_eq!(mgr.group("g").unwrap().viewports.len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mgr = ToolGroupManager::new();
        mgr.create_group("g").unwrap();
        mgr.add_tool("g", "Length").unwrap();
        mgr.add_viewport("g", ViewportBinding::new("vp", "re")).unwrap();

        let snapshot = mgr.groups_with_tool("Length");
        mgr.destroy_group("g").unwrap();

        assert_eq!(snapshot[0].viewports.len(), 1);
        assert!(mgr.groups_with_tool("Length").is_empty());
        assert!(mgr.group_ids().is_empty());
    }

    #[test]
    fn test_remove_tool() {
        let mgr = ToolGroupManager::new();
        mgr.create_group("g").unwrap();
        mgr.add_tool("g", "Length").unwrap();
        mgr.remove_tool("g", "Length").unwrap();
        assert!(mgr.groups_with_tool("Length").is_empty());
    }
}
