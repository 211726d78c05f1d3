//! Action eligibility for plan, issue and rollout workflows.
//!
//! A [`Snapshot`] (or any host-supplied entities) is reduced by
//! [`context::build`] into a flat [`ActionContext`]; the [`ActionRegistry`]
//! runs the rule catalog over it and picks one primary action plus the
//! secondary ones. Everything past loading is pure and synchronous.

pub mod config;
pub mod context;
pub mod error;
pub mod names;
pub mod permission;
pub mod plan_check;
pub mod registry;
pub mod rules;
pub mod snapshot;
pub mod types;

#[cfg(test)]
mod test_support;

pub use context::ActionContext;
pub use error::{PlanflowError, Result};
pub use registry::{evaluate, ActionRegistry, Decision};
pub use snapshot::Snapshot;
