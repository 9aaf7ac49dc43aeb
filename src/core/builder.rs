use std::sync::Arc;

use crate::{
    core::{Config, Router},
    events::{Bus, EventKind},
    subscribers::Subscribe,
    surfaces::SurfaceDirectory,
    tool_groups::ToolGroupRegistry,
};

/// Builder for constructing a [`Router`] with optional wiring.
pub struct RouterBuilder<D, R> {
    directory: D,
    registry: R,
    cfg: Config,
    bus: Option<Bus>,
    subscribers: Vec<(EventKind, Arc<dyn Subscribe>)>,
}

impl<D, R> RouterBuilder<D, R>
where
    D: SurfaceDirectory,
    R: ToolGroupRegistry,
{
    /// Creates a builder with default configuration and no subscribers.
    pub fn new(directory: D, registry: R) -> Self {
        Self {
            directory,
            registry,
            cfg: Config::default(),
            bus: None,
            subscribers: Vec::new(),
        }
    }

    /// Publishes on an existing bus instead of a fresh one.
    ///
    /// Use this when the host already hands the same bus to other publishers.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Subscribers registered on the bus at build time, in the given order.
    pub fn with_subscribers(mut self, subscribers: Vec<(EventKind, Arc<dyn Subscribe>)>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the router.
    ///
    /// Creates a new bus unless one was supplied, then registers the
    /// configured subscribers on it.
    pub fn build(self) -> Router<D, R> {
        let bus = self.bus.unwrap_or_default();
        for (kind, sub) in self.subscribers {
            bus.subscribe(kind, sub);
        }
        Router::new(self.directory, self.registry, bus, self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::SurfaceTable;
    use crate::tool_groups::ToolGroupManager;
    use crate::Event;

    #[test]
    fn test_build_registers_subscribers_on_supplied_bus() {
        let bus = Bus::new();
        let noop: Arc<dyn Subscribe> = Arc::new(|_: &Event| {});
        let router = RouterBuilder::new(SurfaceTable::new(), ToolGroupManager::new())
            .with_bus(bus.clone())
            .with_subscribers(vec![
                (EventKind::AnnotationAdded, Arc::clone(&noop)),
                (EventKind::AnnotationRemoved, noop),
            ])
            .build();

        assert_eq!(bus.subscriber_count(EventKind::AnnotationAdded), 1);
        assert_eq!(router.bus().subscriber_count(EventKind::AnnotationRemoved), 1);
        assert!(router.config().propagates_subscriber_failures());
    }
}
