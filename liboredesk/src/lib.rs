//! Oredesk - state core for a minerals-marketplace operations desk
//!
//! This library provides the shared data source the dashboard screens sit
//! on: typed entity schemas, a closed action vocabulary, a pure
//! snapshot-to-snapshot transition function, derived read-only views, and
//! a store that distributes each new snapshot to subscribers.

pub mod actions;
pub mod config;
pub mod error;
pub mod events;
pub mod flow;
pub mod logging;
pub mod snapshot;
pub mod store;
pub mod transition;
pub mod types;
pub mod validation;
pub mod views;

// Re-export commonly used types
pub use actions::Action;
pub use config::Config;
pub use error::{DeskError, Result};
pub use snapshot::Snapshot;
pub use store::{DeskStore, SharedStore};
pub use types::{Order, OrderType, RegistryUser, Transaction};
pub use views::{dashboard_statistics, DashboardStatistics};
