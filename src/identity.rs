//! Principals and the policy attach/detach lifecycle.
//!
//! A [`PolicyAttachments`] component turns any aggregate into a restricted
//! entity: policies are attached to constrain what the principal may do,
//! and [`PolicyAttachments::permission`] answers authorization queries by
//! folding every attached policy with deny-overrides.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::collection::OrderedList;
use crate::entity::{Identified, Timestamps};
use crate::identifier::{Identifier, ResourceType};
use crate::policy::{compare_policies, Effect, Policy, PolicyAction};
use crate::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from principals and policy attachment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("no policy with identifier {0} is attached to this entity")]
    PolicyNotAttached(Identifier),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error(
        "username must be 3-30 characters, composed of letters, numbers \
         and underscores (_)"
    )]
    InvalidUsername,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Policy attachments (restricted entity component)
// ═══════════════════════════════════════════════════════════════════════════════

/// The set of policies attached to a principal, in attachment order.
///
/// Attachment is a multiset: attaching the same policy twice keeps two
/// occurrences, and [`PolicyAttachments::detach`] removes exactly one.
/// Callers wanting idempotent attachment check [`PolicyAttachments::get`]
/// first.
#[derive(Debug, Clone)]
pub struct PolicyAttachments {
    policies: OrderedList<Policy>,
}

impl PolicyAttachments {
    pub fn new() -> Self {
        Self::from_policies(Vec::new())
    }

    /// Rebuild from stored attachments.
    pub fn from_policies(policies: Vec<Policy>) -> Self {
        Self {
            policies: OrderedList::with_items(compare_policies, policies),
        }
    }

    /// Attach a policy. Never deduplicates.
    pub fn attach(&mut self, policy: Policy) {
        debug!(policy = %policy.identifier(), "attaching policy");
        self.policies.append(policy);
    }

    /// Detach one occurrence of the policy with the given identifier.
    pub fn detach(&mut self, id: &Identifier) -> std::result::Result<(), IdentityError> {
        let attached = self
            .get(id)
            .cloned()
            .ok_or_else(|| IdentityError::PolicyNotAttached(id.clone()))?;
        self.policies.remove(&attached);
        debug!(policy = %id, "detached policy");
        Ok(())
    }

    /// First attached policy with the given identifier, if any.
    pub fn get(&self, id: &Identifier) -> Option<&Policy> {
        self.policies
            .select_one(|policy| policy.identifier() == id)
    }

    /// Snapshot copy of the attached policies, safe to iterate while the
    /// live collection is mutated.
    pub fn list(&self) -> Vec<Policy> {
        self.policies.items()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// The principal's net permission for `(resource, action)` across every
    /// attached policy.
    ///
    /// Deny-overrides at this level too: the first denying policy settles
    /// the query; otherwise one allowing policy yields `Allow`; with no
    /// applicable policy the result is `Unspecified`, never an implicit
    /// grant.
    pub fn permission(&self, resource: &Identifier, action: PolicyAction) -> Effect {
        let mut allowed = false;
        for policy in &self.policies {
            match policy.permission(resource, action) {
                Effect::Deny => return Effect::Deny,
                Effect::Allow => allowed = true,
                Effect::Unspecified => {}
            }
        }
        if allowed {
            Effect::Allow
        } else {
            Effect::Unspecified
        }
    }
}

impl Default for PolicyAttachments {
    fn default() -> Self {
        Self::new()
    }
}

/// An aggregate that can have policies attached to constrain it.
pub trait Restricted {
    fn attachments(&self) -> &PolicyAttachments;
    fn attachments_mut(&mut self) -> &mut PolicyAttachments;

    fn attach_policy(&mut self, policy: Policy) {
        self.attachments_mut().attach(policy);
    }

    fn detach_policy(&mut self, id: &Identifier) -> std::result::Result<(), IdentityError> {
        self.attachments_mut().detach(id)
    }

    fn get_attached_policy(&self, id: &Identifier) -> Option<&Policy> {
        self.attachments().get(id)
    }

    fn list_attached_policies(&self) -> Vec<Policy> {
        self.attachments().list()
    }

    fn permission(&self, resource: &Identifier, action: PolicyAction) -> Effect {
        self.attachments().permission(resource, action)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// User
// ═══════════════════════════════════════════════════════════════════════════════

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
        });
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    local_ok && host_ok && tld_ok
}

fn is_valid_username(username: &str) -> bool {
    (3..=30).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A user account: a principal with a USER root identifier, a validated
/// email and username, and attached policies.
#[derive(Debug, Clone)]
pub struct User {
    identifier: Identifier,
    timestamps: Timestamps,
    attachments: PolicyAttachments,
    email: String,
    verified: bool,
    username: String,
}

impl User {
    /// Create a new user with a freshly minted identifier. The email starts
    /// unverified.
    pub fn new(email: &str, username: &str) -> Result<Self> {
        let identifier = Identifier::root(ResourceType::User)?;
        let now = Utc::now();
        Self::from_parts(identifier.as_str(), email, false, username, Vec::new(), now, now)
    }

    /// Reconstruct a user from stored plain data.
    pub fn from_parts(
        identifier: &str,
        email: &str,
        verified: bool,
        username: &str,
        attached_policies: Vec<Policy>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self> {
        let identifier = Identifier::parse(identifier)?;
        if identifier.resource_type() != ResourceType::User {
            return Err(crate::identifier::IdentifierError::Malformed(
                identifier.as_str().to_owned(),
            )
            .into());
        }
        let mut user = Self {
            identifier,
            timestamps: Timestamps::from_parts(created_at, updated_at),
            attachments: PolicyAttachments::from_policies(attached_policies),
            email: String::new(),
            verified: false,
            username: String::new(),
        };
        user.set_email(email)?;
        user.set_username(username)?;
        user.verified = verified;
        Ok(user)
    }

    /// Update the email after validation. Resets the verification flag.
    pub fn set_email(&mut self, email: &str) -> std::result::Result<(), IdentityError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(IdentityError::InvalidEmail(email.to_owned()));
        }
        self.email = email.to_owned();
        self.verified = false;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_username(&mut self, username: &str) -> std::result::Result<(), IdentityError> {
        let username = username.trim();
        if !is_valid_username(username) {
            return Err(IdentityError::InvalidUsername);
        }
        self.username = username.to_owned();
        self.timestamps.touch();
        Ok(())
    }

    pub fn verify_email(&mut self) {
        self.verified = true;
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Identified for User {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl Restricted for User {
    fn attachments(&self) -> &PolicyAttachments {
        &self.attachments
    }

    fn attachments_mut(&mut self) -> &mut PolicyAttachments {
        &mut self.attachments
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
