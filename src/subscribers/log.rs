//! # Tracing subscriber for debugging and demos.
//!
//! [`LogWriter`] turns each annotation event into one `tracing` record at
//! `INFO`, with structured fields.
//!
//! ## Output format (with `tracing_subscriber::fmt`)
//! ```text
//! INFO annotation added seq=3 annotation=ann-1 tool=Length target=engine/CT_AXIAL
//! INFO annotation modified seq=4 annotation=ann-1 tool=Length target=<unspecified> change_type=HandlesUpdated
//! INFO annotation completed seq=5 annotation=ann-1 tool=Length contour_holes=None
//! INFO annotation removed seq=6 annotation=ann-1 tool=Length target=<unspecified>
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use annoroute::{Bus, LogWriter};
//! let bus = Bus::new();
//! bus.subscribe_all(Arc::new(LogWriter));
//! ```

use crate::events::{Event, EventDetail};
use crate::Subscribe;

/// Logs every event it receives.
///
/// Enabled via the `logging` feature. Not intended as an audit trail -
/// implement a custom [`Subscribe`] for that.
pub struct LogWriter;

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let annotation = &e.annotation().uid;
        let tool = e.annotation().tool_name();
        match &e.detail {
            EventDetail::Added(d) => {
                tracing::info!(seq = e.seq, %annotation, %tool, target = %d.target, "annotation added");
            }
            EventDetail::Modified(d) => {
                tracing::info!(
                    seq = e.seq,
                    %annotation,
                    %tool,
                    target = %d.target,
                    change_type = d.change_type.as_str(),
                    "annotation modified"
                );
            }
            EventDetail::Completed(d) => {
                tracing::info!(
                    seq = e.seq,
                    %annotation,
                    %tool,
                    contour_holes = ?d.contour_hole_processing_enabled(),
                    "annotation completed"
                );
            }
            EventDetail::Removed(d) => {
                tracing::info!(
                    seq = e.seq,
                    %annotation,
                    %tool,
                    target = %d.target,
                    manager = ?d.annotation_manager_uid,
                    "annotation removed"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
