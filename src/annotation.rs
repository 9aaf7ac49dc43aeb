//! # Annotation data model as seen by the router.
//!
//! Annotations are owned by the host's annotation store; the router only
//! reads [`AnnotationMetadata`] to pick notification targets. Events carry
//! the annotation as `Arc<Annotation>` so a fan-out does not copy geometry.
//!
//! ## Example
//! ```rust
//! use annoroute::{Annotation, AnnotationMetadata};
//!
//! let ann = Annotation::new(
//!     "ann-1",
//!     AnnotationMetadata::new("Length").with_frame_of_reference("1.2.840.1"),
//! );
//! assert_eq!(ann.metadata.tool_name, "Length");
//! assert_eq!(ann.frame_of_reference_uid(), Some("1.2.840.1"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Descriptive fields of an annotation.
///
/// `extra` holds tool-specific metadata that the router never inspects
/// (camera position, slice index, label, ...).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMetadata {
    /// Name of the tool that created the annotation.
    pub tool_name: String,
    /// Coordinate space the annotation lives in.
    ///
    /// `None` matches no viewport during frame-of-reference fan-out.
    #[serde(
        rename = "FrameOfReferenceUID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_of_reference_uid: Option<String>,
    /// Image the annotation was drawn on, when it is image-bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_image_id: Option<String>,
    /// Tool-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnnotationMetadata {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_frame_of_reference(mut self, uid: impl Into<String>) -> Self {
        self.frame_of_reference_uid = Some(uid.into());
        self
    }

    #[inline]
    pub fn with_referenced_image(mut self, image_id: impl Into<String>) -> Self {
        self.referenced_image_id = Some(image_id.into());
        self
    }

    /// Attaches a tool-specific field.
    #[inline]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A spatial annotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Opaque identifier assigned by the annotation store.
    #[serde(rename = "annotationUID")]
    pub uid: String,
    pub metadata: AnnotationMetadata,
    /// Geometry and cached statistics; opaque to the router.
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub invalidated: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl Annotation {
    /// Creates a visible, unlocked annotation with an empty data payload.
    pub fn new(uid: impl Into<String>, metadata: AnnotationMetadata) -> Self {
        Self {
            uid: uid.into(),
            metadata,
            data: Value::Null,
            highlighted: false,
            invalidated: false,
            is_locked: false,
            is_visible: true,
        }
    }

    #[inline]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    #[inline]
    pub fn tool_name(&self) -> &str {
        &self.metadata.tool_name
    }

    #[inline]
    pub fn frame_of_reference_uid(&self) -> Option<&str> {
        self.metadata.frame_of_reference_uid.as_deref()
    }
}

/// What changed in a modified annotation.
///
/// The vocabulary belongs to the annotation subsystem; the router forwards
/// the value untouched and only supplies the default.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    /// Live interaction (drag, hover) that has not settled yet.
    Interaction,
    /// Handle positions changed.
    #[default]
    HandlesUpdated,
    /// Cached statistics were recomputed.
    StatsUpdated,
    /// The drawing gesture finished.
    Completed,
    /// Interpolated annotations were regenerated.
    InterpolationUpdated,
    /// Change replayed from history.
    History,
    /// The referenced image or metadata pointer moved.
    MetadataReferenceModified,
    /// The label text changed.
    LabelChange,
}

impl ChangeType {
    /// Returns a stable label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Interaction => "Interaction",
            ChangeType::HandlesUpdated => "HandlesUpdated",
            ChangeType::StatsUpdated => "StatsUpdated",
            ChangeType::Completed => "Completed",
            ChangeType::InterpolationUpdated => "InterpolationUpdated",
            ChangeType::History => "History",
            ChangeType::MetadataReferenceModified => "MetadataReferenceModified",
            ChangeType::LabelChange => "LabelChange",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_type_defaults_to_handles_updated() {
        assert_eq!(ChangeType::default(), ChangeType::HandlesUpdated);
    }

    #[test]
    fn test_metadata_without_frame_of_reference() {
        let ann = Annotation::new("a", AnnotationMetadata::new("Probe"));
        assert_eq!(ann.frame_of_reference_uid(), None);
        assert_eq!(ann.tool_name(), "Probe");
        assert!(ann.is_visible);
    }

    #[test]
    fn test_metadata_uses_host_field_names() {
        let meta = AnnotationMetadata::new("Length")
            .with_frame_of_reference("for-1")
            .with_field("sliceIndex", 4);
        let value = serde_json::to_value(&meta).unwrap();

        assert_eq!(value["toolName"], json!("Length"));
        assert_eq!(value["FrameOfReferenceUID"], json!("for-1"));
        assert_eq!(value["sliceIndex"], json!(4));
        assert!(value.get("referencedImageId").is_none());

        let bare = serde_json::to_value(AnnotationMetadata::new("Length")).unwrap();
        assert!(bare.get("FrameOfReferenceUID").is_none());
    }

    #[test]
    fn test_annotation_parses_host_json() {
        let raw = json!({
            "annotationUID": "abc",
            "metadata": { "toolName": "Angle", "FrameOfReferenceUID": "for-9", "viewUp": [0, 1, 0] },
            "data": { "handles": { "points": [] } }
        });
        let ann: Annotation = serde_json::from_value(raw).unwrap();

        assert_eq!(ann.uid, "abc");
        assert_eq!(ann.frame_of_reference_uid(), Some("for-9"));
        assert_eq!(ann.metadata.extra["viewUp"], json!([0, 1, 0]));
        assert!(ann.is_visible);
        assert!(!ann.is_locked);
    }
}
