//! Crate-wide error aggregate.
//!
//! Each module defines its own focused error enum; this module folds them
//! into a single [`CoreError`] so callers can use one `Result` alias across
//! the crate while still matching on the originating concern.

use thiserror::Error;

use crate::collection::CollectionError;
use crate::entity::EntityError;
use crate::identifier::IdentifierError;
use crate::identity::IdentityError;
use crate::policy::PolicyError;
use crate::project::ProjectError;
use crate::template::TemplateError;

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;
