//! Hierarchical resource identifiers.
//!
//! Every addressable object in AutOps carries a structured identifier of the
//! form `autops::<type>:<short-id>[:<type>:<short-id>[:<type>:<short-id>]]`,
//! for example `autops::project:V1StGXR8_Z:policy:fV_9m5qwBt`.
//!
//! The grammar enforced here:
//! - 1, 2, or 3 `(type, id)` pairs after the `autops::` prefix
//! - the first pair's type is `project` or `user`
//! - only a `project` may own children (a `user` identifier is always a leaf)
//! - the second pair's type is never `project` or `user`
//! - every id token is exactly [`SHORT_ID_LENGTH`] characters of `[A-Za-z0-9_-]`
//! - type tokens are accepted case-insensitively and stored lowercase
//!
//! A constructed [`Identifier`] is immutable and always satisfies the
//! grammar; its derived resource type is the type token of its last pair.

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Namespace prefix shared by every AutOps identifier.
pub const IDENTIFIER_PREFIX: &str = "autops::";

/// Length of the random id token in each identifier segment.
pub const SHORT_ID_LENGTH: usize = 10;

/// 64-character alphabet of the short-id tokens. The power-of-two size keeps
/// sampling from raw bytes uniform.
const SHORT_ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from identifier parsing, derivation, and generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error(
        "identifier must match \
         'autops::<type>:<short-id>[:<type>:<short-id>[:<type>:<short-id>]]', got: {0}"
    )]
    Malformed(String),

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("short-id generation failed: entropy source unavailable")]
    GenerationFailed,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resource Type
// ═══════════════════════════════════════════════════════════════════════════════

/// Closed set of addressable object categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    User,
    Project,
    Workflow,
    Template,
    Policy,
}

impl ResourceType {
    /// Canonical lowercase token used inside identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Workflow => "workflow",
            Self::Template => "template",
            Self::Policy => "policy",
        }
    }

    /// Parse a token, case-insensitively. Unknown tokens fail.
    pub fn parse(token: &str) -> Result<Self, IdentifierError> {
        match token.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "project" => Ok(Self::Project),
            "workflow" => Ok(Self::Workflow),
            "template" => Ok(Self::Template),
            "policy" => Ok(Self::Policy),
            _ => Err(IdentifierError::UnknownResourceType(token.to_owned())),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Short-ID generation
// ═══════════════════════════════════════════════════════════════════════════════

/// Generate a fresh random short-id token.
///
/// Draws from the OS entropy source. Collisions are negligible at practical
/// scale (64^10 values); a generation failure is fatal and never retried.
pub fn generate_short_id() -> Result<String, IdentifierError> {
    let mut bytes = [0u8; SHORT_ID_LENGTH];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| IdentifierError::GenerationFailed)?;
    Ok(bytes
        .iter()
        .map(|b| SHORT_ID_ALPHABET[(b % 64) as usize] as char)
        .collect())
}

/// Lowercase the type tokens of a validated identifier string, leaving the
/// case-sensitive id tokens untouched.
fn canonicalize(raw: &str) -> String {
    let tokens: Vec<String> = raw[IDENTIFIER_PREFIX.len()..]
        .split(':')
        .enumerate()
        .map(|(i, token)| {
            if i % 2 == 0 {
                token.to_ascii_lowercase()
            } else {
                token.to_owned()
            }
        })
        .collect();
    format!("{IDENTIFIER_PREFIX}{}", tokens.join(":"))
}

fn is_valid_short_id(token: &str) -> bool {
    token.len() == SHORT_ID_LENGTH
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ═══════════════════════════════════════════════════════════════════════════════
// Identifier
// ═══════════════════════════════════════════════════════════════════════════════

/// A validated, immutable resource identifier.
///
/// Identifiers compare and hash by their full string form, which makes them
/// directly usable as ordered-list elements and map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Validate `raw` against the identifier grammar and wrap it.
    ///
    /// Type tokens are accepted case-insensitively but stored in their
    /// canonical lowercase form, so two spellings of the same identifier
    /// always compare equal. Id tokens are case-sensitive and kept verbatim.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        Self::validate(&raw)?;
        Ok(Self(canonicalize(&raw)))
    }

    /// Check `raw` against the grammar without constructing an identifier.
    pub fn validate(raw: &str) -> Result<(), IdentifierError> {
        let malformed = || IdentifierError::Malformed(raw.to_owned());

        let body = raw.strip_prefix(IDENTIFIER_PREFIX).ok_or_else(malformed)?;
        let tokens: Vec<&str> = body.split(':').collect();
        if !matches!(tokens.len(), 2 | 4 | 6) {
            return Err(malformed());
        }

        let head = ResourceType::parse(tokens[0])?;
        if head != ResourceType::Project && head != ResourceType::User {
            return Err(malformed());
        }
        // Only projects own children.
        if tokens.len() > 2 && head != ResourceType::Project {
            return Err(malformed());
        }

        if tokens.len() >= 4 {
            let second = ResourceType::parse(tokens[2])?;
            if second == ResourceType::Project || second == ResourceType::User {
                return Err(malformed());
            }
        }
        if tokens.len() == 6 {
            ResourceType::parse(tokens[4])?;
        }

        for id_token in tokens.iter().skip(1).step_by(2) {
            if !is_valid_short_id(id_token) {
                return Err(malformed());
            }
        }

        Ok(())
    }

    /// Build a fresh root identifier (`autops::<type>:<new-id>`).
    ///
    /// Only `Project` and `User` are valid roots; anything else fails
    /// validation of the synthesized string.
    pub fn root(resource_type: ResourceType) -> Result<Self, IdentifierError> {
        let short_id = generate_short_id()?;
        Self::parse(format!(
            "{IDENTIFIER_PREFIX}{}:{short_id}",
            resource_type.as_str()
        ))
    }

    /// Build a fresh child identifier by appending `:<type>:<new-id>` to this
    /// identifier. The result is re-validated, so illegal nestings (children
    /// of a user, nested projects, three levels under a leaf) fail here.
    pub fn child(&self, resource_type: ResourceType) -> Result<Self, IdentifierError> {
        let short_id = generate_short_id()?;
        Self::parse(format!("{}:{}:{short_id}", self.0, resource_type.as_str()))
    }

    /// The resource type of the last `(type, id)` pair.
    pub fn resource_type(&self) -> ResourceType {
        let tokens = self.segments();
        match ResourceType::parse(tokens[tokens.len() - 2]) {
            Ok(resource_type) => resource_type,
            // Every type token was parsed during validation.
            Err(_) => unreachable!("validated identifier carries a known type token"),
        }
    }

    /// The `(type, id)` tokens after the prefix, in order.
    pub fn segments(&self) -> Vec<&str> {
        self.0[IDENTIFIER_PREFIX.len()..].split(':').collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Identifier::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Comparator for [`crate::collection::OrderedList`] elements.
pub fn compare_identifiers(a: &Identifier, b: &Identifier) -> std::cmp::Ordering {
    a.cmp(b)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
