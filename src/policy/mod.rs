//! Policies: typed actions, effects, statements, and the deny-overrides
//! evaluation that answers "is this action on this resource allowed".
//!
//! - **Effect**: Allow / Deny, plus the internal Unspecified marker
//! - **Action**: closed per-resource-type action families
//! - **Statement**: one effect bound to a resource set and an action set
//! - **Policy**: named, tagged aggregate of statements

pub mod action;
pub mod effect;
pub mod policy;
pub mod statement;

use thiserror::Error;

pub use action::{compare_actions, PolicyAction, ProjectAction, WorkflowAction};
pub use effect::Effect;
pub use policy::{compare_policies, Policy};
pub use statement::{compare_statements, Statement};

/// Errors from policy construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("invalid policy effect '{0}': correct values are 'Allow' or 'Deny'")]
    InvalidEffect(String),

    #[error("invalid action format '{0}': expected '<resource-type>:<action>'")]
    InvalidActionFormat(String),

    #[error("no action family registered for resource type: {0}")]
    UnknownActionResource(String),

    #[error("unknown action '{token}' for resource type '{resource}'")]
    UnknownAction { resource: &'static str, token: String },
}
