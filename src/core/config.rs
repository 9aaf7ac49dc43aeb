//! # Router configuration.
//!
//! Provides [`Config`], the centralized settings for a [`Router`](crate::Router).
//!
//! ## Sentinel values
//! - `forward_queue_capacity = 0` → clamped to 1 by [`Config::forward_capacity_clamped`]

use crate::annotation::ChangeType;

/// What the router does when a subscriber panics during one of its publishes.
///
/// The bus always finishes the delivery pass first; the policy only decides
/// what the router does afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the operation and return [`RouterError::Publish`](crate::RouterError::Publish).
    ///
    /// Targeted publishes not yet attempted in a fan-out are skipped.
    #[default]
    Propagate,
    /// Log at `WARN` and carry on with the remaining publishes.
    Log,
}

/// Configuration for the annotation event router.
///
/// ## Field semantics
/// - `default_change_type`: change type stamped on modifications when the caller passes none
/// - `on_subscriber_failure`: reaction to subscriber panics
/// - `forward_queue_capacity`: queue size for forwarders spawned via
///   [`Router::spawn_forwarder`](crate::Router::spawn_forwarder) (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Change type used by `notify_modified` when none is given.
    pub default_change_type: ChangeType,

    /// Reaction to a subscriber panic.
    pub on_subscriber_failure: FailurePolicy,

    /// Capacity of each async forwarder queue.
    ///
    /// Events arriving while the queue is full are dropped for that consumer.
    pub forward_queue_capacity: usize,
}

impl Config {
    /// Returns a forwarder capacity clamped to a minimum of 1.
    #[inline]
    pub fn forward_capacity_clamped(&self) -> usize {
        self.forward_queue_capacity.max(1)
    }

    /// Returns true if subscriber panics abort router operations.
    #[inline]
    pub fn propagates_subscriber_failures(&self) -> bool {
        self.on_subscriber_failure == FailurePolicy::Propagate
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `default_change_type = ChangeType::HandlesUpdated`
    /// - `on_subscriber_failure = FailurePolicy::Propagate`
    /// - `forward_queue_capacity = 1024`
    fn default() -> Self {
        Self {
            default_change_type: ChangeType::HandlesUpdated,
            on_subscriber_failure: FailurePolicy::Propagate,
            forward_queue_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.default_change_type, ChangeType::HandlesUpdated);
        assert!(cfg.propagates_subscriber_failures());
        assert_eq!(cfg.forward_capacity_clamped(), 1024);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let cfg = Config {
            forward_queue_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.forward_capacity_clamped(), 1);
    }
}
