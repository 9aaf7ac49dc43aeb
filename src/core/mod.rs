//! Router core: fan-out decisions and wiring.
//!
//! The public API from this module is [`Router`], its [`RouterBuilder`] and
//! the [`Config`] both take.
//!
//! Internal modules:
//! - [`router`]: target selection and publishing for each mutation kind;
//! - [`builder`]: optional wiring of bus, config and initial subscribers;
//! - [`config`]: router settings.

mod builder;
mod config;
mod router;

pub use builder::RouterBuilder;
pub use config::{Config, FailurePolicy};
pub use router::Router;
