//! # Example: fan_out
//!
//! Demonstrates frame-of-reference fan-out across two tool groups.
//!
//! Shows how to:
//! - Register viewports in a [`SurfaceTable`] and bind them in a [`ToolGroupManager`].
//! - Attach a synchronous [`Subscribe`] closure and an [`AsyncSubscribe`] consumer.
//! - Call [`Router::notify_added_for_frame_of_reference`] and watch the targets.
//!
//! ## Flow
//! ```text
//! notify_added_for_frame_of_reference(ann)
//!     ├─► groups_with_tool("Length") ──► [ct, fusion]
//!     ├─► lookup_by_ids(binding) ──► keep viewports showing "for-ct"
//!     └─► Bus.publish(Added{Viewport}) × matches
//!           ├─► redraw closure (in publisher context)
//!           └─► AsyncForwarder ──► queue ──► Persist.on_event().await
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example fan_out
//! ```

use std::sync::Arc;

use annoroute::{
    Annotation, AnnotationMetadata, AsyncSubscribe, ElementHandle, EnabledSurface, Event,
    EventKind, Router, SurfaceTable, Target, ToolGroupManager, ViewportBinding,
};

/// Stand-in for an async sink (database, socket, ...).
struct Persist;

#[async_trait::async_trait]
impl AsyncSubscribe for Persist {
    async fn on_event(&self, ev: &Event) {
        println!(
            "[persist] seq={} kind={} annotation={}",
            ev.seq,
            ev.kind(),
            ev.annotation().uid
        );
    }

    fn name(&self) -> &'static str {
        "persist"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let surfaces = Arc::new(SurfaceTable::new());
    surfaces.enable(ElementHandle::new(1), EnabledSurface::new("CT_AXIAL", "engine", "for-ct"));
    surfaces.enable(ElementHandle::new(2), EnabledSurface::new("CT_SAGITTAL", "engine", "for-ct"));
    surfaces.enable(ElementHandle::new(3), EnabledSurface::new("PT_AXIAL", "engine", "for-pt"));

    let groups = Arc::new(ToolGroupManager::new());
    groups.create_group("ct")?;
    groups.add_tool("ct", "Length")?;
    groups.add_viewport("ct", ViewportBinding::new("CT_AXIAL", "engine"))?;
    groups.add_viewport("ct", ViewportBinding::new("CT_SAGITTAL", "engine"))?;

    groups.create_group("fusion")?;
    groups.add_tool("fusion", "Length")?;
    groups.add_viewport("fusion", ViewportBinding::new("PT_AXIAL", "engine"))?;
    // never enabled: skipped as a stale binding
    groups.add_viewport("fusion", ViewportBinding::new("MIP", "engine"))?;

    let router = Router::builder(Arc::clone(&surfaces), Arc::clone(&groups)).build();
    router.bus().subscribe(
        EventKind::AnnotationAdded,
        Arc::new(|ev: &Event| match ev.target() {
            Some(Target::Viewport { viewport_id, .. }) => println!("[redraw] {viewport_id}"),
            _ => println!("[redraw] every viewport"),
        }),
    );
    let persist = router.spawn_forwarder(Arc::new(Persist));

    let ann = Arc::new(Annotation::new(
        "length-1",
        AnnotationMetadata::new("Length").with_frame_of_reference("for-ct"),
    ));
    let published = router.notify_added_for_frame_of_reference(Arc::clone(&ann))?;
    println!("[main] fan-out published {published} event(s)");

    router.notify_contour_completed(ann, Some(true))?;

    persist.shutdown().await;
    Ok(())
}
