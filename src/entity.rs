//! Shared entity components and capability traits.
//!
//! The original entity hierarchy (timestamped → named → stateful/tagged) is
//! expressed here as composition: an aggregate *has* a [`Timestamps`], a
//! [`Descriptor`], a [`crate::tags::TagSet`], and exposes them through the
//! small capability traits at the bottom of this module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifier::Identifier;
use crate::tags::TagSet;

const NAME_MAX_LENGTH: usize = 128;
const DESCRIPTION_MAX_LENGTH: usize = 512;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from the shared entity components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error(
        "name must be non-empty, at most 128 characters, and composed of \
         letters, numbers, hyphens (-) and underscores (_)"
    )]
    InvalidName,

    #[error("description must be at most 512 characters")]
    InvalidDescription,

    #[error("cannot parse '{0}' as a status")]
    InvalidStatus(String),

    #[error("'{0}' is neither a valid URL nor a plausible local path")]
    InvalidPathOrUrl(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// Timestamps
// ═══════════════════════════════════════════════════════════════════════════════

/// Creation and last-modification times of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Both timestamps set to the current instant.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild from stored timestamps.
    pub fn from_parts(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    /// Record a modification.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Descriptor (name + description)
// ═══════════════════════════════════════════════════════════════════════════════

/// Validated name and description of an aggregate.
///
/// Names are non-empty, at most 128 characters, restricted to
/// `[A-Za-z0-9_-]`. Descriptions are trimmed and at most 512 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    name: String,
    description: String,
}

impl Descriptor {
    pub fn new(name: &str, description: &str) -> Result<Self, EntityError> {
        let mut descriptor = Self {
            name: String::new(),
            description: String::new(),
        };
        descriptor.set_name(name)?;
        descriptor.set_description(description)?;
        Ok(descriptor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), EntityError> {
        let valid = !name.is_empty()
            && name.len() <= NAME_MAX_LENGTH
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(EntityError::InvalidName);
        }
        self.name = name.to_owned();
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), EntityError> {
        let description = description.trim();
        if description.len() > DESCRIPTION_MAX_LENGTH {
            return Err(EntityError::InvalidDescription);
        }
        self.description = description.to_owned();
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status
// ═══════════════════════════════════════════════════════════════════════════════

/// Execution status of a stateful aggregate (templates, workflows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Running,
    Success,
    Failure,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    /// Parse a status token, case-insensitively.
    pub fn parse(token: &str) -> Result<Self, EntityError> {
        match token.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            _ => Err(EntityError::InvalidStatus(token.to_owned())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Execution log & versioned source
// ═══════════════════════════════════════════════════════════════════════════════

fn is_syntactically_safe_path(path: &str) -> bool {
    !path.is_empty()
        && path.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '.' | '_' | '/' | '-' | ':' | '\\')
        })
}

fn is_url_like(path: &str) -> bool {
    match path.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or("");
            !scheme.is_empty()
                && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-')
                && !host.is_empty()
        }
        None => false,
    }
}

fn validate_path_or_url(path: &str) -> Result<(), EntityError> {
    if !is_syntactically_safe_path(path) {
        return Err(EntityError::InvalidPathOrUrl(path.to_owned()));
    }
    Ok(())
}

/// Reference to an execution log, either a local path or a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLog {
    log_path: String,
}

impl ExecutionLog {
    pub fn new(log_path: &str) -> Result<Self, EntityError> {
        validate_path_or_url(log_path)?;
        Ok(Self {
            log_path: log_path.to_owned(),
        })
    }

    pub fn log_path(&self) -> &str {
        &self.log_path
    }

    /// Whether the log reference points at a remote location.
    pub fn is_remote(&self) -> bool {
        is_url_like(&self.log_path)
    }
}

/// A source location (local path or URL) together with a version number.
///
/// Used by templates and workflows to track where their definition lives and
/// how many revisions it has gone through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedSource {
    source_path: String,
    version: u32,
}

impl VersionedSource {
    pub fn new(source_path: &str, version: u32) -> Result<Self, EntityError> {
        let mut source = Self {
            source_path: String::new(),
            version,
        };
        source.set_source_path(source_path)?;
        Ok(source)
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_source_path(&mut self, path: &str) -> Result<(), EntityError> {
        validate_path_or_url(path)?;
        self.source_path = path.to_owned();
        Ok(())
    }

    /// Copy of this source pointing at `new_source_path`, with the version
    /// incremented.
    pub fn fork_with_new_version(&self, new_source_path: &str) -> Result<Self, EntityError> {
        let mut fork = self.clone();
        fork.set_source_path(new_source_path)?;
        fork.version = self.version + 1;
        Ok(fork)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Capability traits
// ═══════════════════════════════════════════════════════════════════════════════

/// An aggregate addressed by a resource identifier.
pub trait Identified {
    fn identifier(&self) -> &Identifier;
}

/// An aggregate with a validated name and description.
pub trait Named {
    fn descriptor(&self) -> &Descriptor;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn description(&self) -> &str {
        self.descriptor().description()
    }
}

/// An aggregate carrying key-value tags.
pub trait Tagged {
    fn tags(&self) -> &TagSet;
    fn tags_mut(&mut self) -> &mut TagSet;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_accepts_valid_names() {
        for name in ["a", "deploy-prod_01", "X".repeat(128).as_str()] {
            assert!(Descriptor::new(name, "").is_ok(), "rejected {name:?}");
        }
    }

    #[test]
    fn test_descriptor_rejects_invalid_names() {
        for name in ["", "white space", "exclaim!", "X".repeat(129).as_str()] {
            assert_eq!(
                Descriptor::new(name, "").unwrap_err(),
                EntityError::InvalidName,
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_descriptor_trims_and_bounds_description() {
        let descriptor = Descriptor::new("n", "  padded  ").unwrap();
        assert_eq!(descriptor.description(), "padded");

        let err = Descriptor::new("n", &"d".repeat(513)).unwrap_err();
        assert_eq!(err, EntityError::InvalidDescription);
        assert!(Descriptor::new("n", &"d".repeat(512)).is_ok());
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            Status::Pending,
            Status::Running,
            Status::Success,
            Status::Failure,
        ] {
            assert_eq!(Status::parse(status.as_str()), Ok(status));
        }
        assert_eq!(Status::parse("RUNNING"), Ok(Status::Running));
        assert!(matches!(
            Status::parse("paused"),
            Err(EntityError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_timestamps_touch_moves_updated_at() {
        let mut ts = Timestamps::now();
        let created = ts.created_at;
        ts.touch();
        assert_eq!(ts.created_at, created);
        assert!(ts.updated_at >= created);
    }

    #[test]
    fn test_execution_log_paths() {
        assert!(ExecutionLog::new("/var/log/autops/run.log").is_ok());
        let remote = ExecutionLog::new("https://logs.example.com/run/42").unwrap();
        assert!(remote.is_remote());
        assert!(ExecutionLog::new("").is_err());
        assert!(ExecutionLog::new("bad path with spaces").is_err());
    }

    #[test]
    fn test_versioned_source_fork() {
        let source = VersionedSource::new("git://repo.example.com/infra", 1).unwrap();
        let fork = source.fork_with_new_version("/srv/templates/v2").unwrap();
        assert_eq!(fork.version(), 2);
        assert_eq!(fork.source_path(), "/srv/templates/v2");
        // Original untouched.
        assert_eq!(source.version(), 1);

        assert!(source.fork_with_new_version("no spaces allowed ").is_err());
    }
}
