//! # AutOps Core
//!
//! Domain core of the AutOps automation platform.
//!
//! ## Architecture
//!
//! - **Identifiers**: Hierarchical `autops::` resource identifiers with
//!   random short-id minting and strict grammar validation
//! - **Collections**: Comparator-driven, insertion-ordered lists backing
//!   every aggregate membership
//! - **Policies**: Statement-based access control with deny-overrides
//!   resolution (`Deny` > `Allow` > unspecified)
//! - **Identity**: User principals with policy attachments and the
//!   [`identity::Restricted`] capability trait
//! - **Projects**: Root aggregates owning templates, workflows, and policies
//! - **Storage**: Async repository ports implemented by outer layers

pub mod collection;
pub mod entity;
pub mod error;
pub mod identifier;
pub mod identity;
pub mod policy;
pub mod project;
pub mod storage;
pub mod tags;
pub mod template;
pub mod workflow;

pub use error::{CoreError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::collection::{Comparator, OrderedList};
    pub use crate::entity::{
        Descriptor, ExecutionLog, Identified, Named, Status, Tagged, Timestamps, VersionedSource,
    };
    pub use crate::error::{CoreError, Result};
    pub use crate::identifier::{compare_identifiers, Identifier, IdentifierError, ResourceType};
    pub use crate::identity::{PolicyAttachments, Restricted, User};
    pub use crate::policy::{
        compare_actions, compare_policies, compare_statements, Effect, Policy, PolicyAction,
        ProjectAction, Statement, WorkflowAction,
    };
    pub use crate::project::Project;
    pub use crate::storage::{PolicyRepository, ProjectRepository, UserRepository};
    pub use crate::tags::{compare_tags, Tag, TagSet};
    pub use crate::template::{Template, TemplateType};
    pub use crate::workflow::Workflow;
}
