//! The policy aggregate and its deny-overrides evaluation.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::action::PolicyAction;
use super::statement::{compare_statements, Statement};
use super::Effect;
use crate::collection::OrderedList;
use crate::entity::{Descriptor, Identified, Named, Tagged, Timestamps};
use crate::identifier::{Identifier, ResourceType};
use crate::tags::{Tag, TagSet};
use crate::Result;

/// A named, described, tagged aggregate of statements, owned by a project.
///
/// Evaluation is deny-dominant: any statement that denies the queried
/// `(resource, action)` pair denies the whole policy, no matter how many
/// other statements allow it or in which order they were added.
#[derive(Debug, Clone)]
pub struct Policy {
    identifier: Identifier,
    descriptor: Descriptor,
    timestamps: Timestamps,
    tags: TagSet,
    statements: OrderedList<Statement>,
}

impl Policy {
    /// Create a policy under `project`, minting a fresh POLICY identifier.
    pub fn new(
        project: &Identifier,
        name: &str,
        description: &str,
        statements: Vec<Statement>,
    ) -> Result<Self> {
        let identifier = project.child(ResourceType::Policy)?;
        let now = Utc::now();
        Self::from_parts(
            identifier.as_str(),
            name,
            description,
            now,
            now,
            Vec::new(),
            statements,
        )
    }

    /// Reconstruct a policy from stored plain data. The stored timestamps
    /// are kept verbatim; rebuilding is not a modification.
    pub fn from_parts(
        identifier: &str,
        name: &str,
        description: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        tags: Vec<Tag>,
        statements: Vec<Statement>,
    ) -> Result<Self> {
        Ok(Self {
            identifier: Identifier::parse(identifier)?,
            descriptor: Descriptor::new(name, description)?,
            timestamps: Timestamps::from_parts(created_at, updated_at),
            tags: TagSet::from_tags(tags),
            statements: OrderedList::with_items(compare_statements, statements),
        })
    }

    /// The net effect of this policy for `(resource, action)`.
    ///
    /// Short-circuiting deny-overrides fold: the first denying statement
    /// settles the evaluation; otherwise one allowing statement suffices
    /// for `Allow`; with no applicable statement the result is
    /// `Unspecified`, which grants nothing.
    pub fn permission(&self, resource: &Identifier, action: PolicyAction) -> Effect {
        let mut allowed = false;
        for statement in &self.statements {
            match statement.permission(resource, action) {
                Effect::Deny => {
                    debug!(
                        policy = %self.identifier,
                        resource = %resource,
                        action = %action,
                        "statement denied, short-circuiting"
                    );
                    return Effect::Deny;
                }
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

    /// Snapshot copy of the statements.
    pub fn list_statements(&self) -> Vec<Statement> {
        self.statements.items()
    }

    /// The live statement list; edits go through the collection directly.
    pub fn statements_mut(&mut self) -> &mut OrderedList<Statement> {
        self.timestamps.touch();
        &mut self.statements
    }

    pub fn statements(&self) -> &[Statement] {
        self.statements.as_slice()
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.descriptor.set_name(name)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.descriptor.set_description(description)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Identified for Policy {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl Named for Policy {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl Tagged for Policy {
    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut TagSet {
        self.timestamps.touch();
        &mut self.tags
    }
}

/// Policies are equal when their identifiers are equal.
pub fn compare_policies(a: &Policy, b: &Policy) -> Ordering {
    a.identifier.cmp(&b.identifier)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::action::ProjectAction;
    use crate::policy::PolicyError;
    use crate::tags::Tag;
    use crate::CoreError;

    const PROJECT: &str = "autops::project:abcDEF1234";

    fn project_identifier() -> Identifier {
        Identifier::parse(PROJECT).unwrap()
    }

    fn read() -> PolicyAction {
        PolicyAction::Project(ProjectAction::Read)
    }

    fn update() -> PolicyAction {
        PolicyAction::Project(ProjectAction::Update)
    }

    fn statement(effect: Effect) -> Statement {
        Statement::new(effect, vec![project_identifier()], vec![read()]).unwrap()
    }

    #[test]
    fn test_new_mints_policy_identifier_under_project() {
        let policy = Policy::new(&project_identifier(), "ReadOnly", "read access", vec![]).unwrap();
        assert_eq!(policy.identifier().resource_type(), ResourceType::Policy);
        assert!(policy.identifier().as_str().starts_with(PROJECT));
    }

    #[test]
    fn test_new_validates_name() {
        let err = Policy::new(&project_identifier(), "bad name", "", vec![]).unwrap_err();
        assert!(matches!(err, CoreError::Entity(_)));
    }

    #[test]
    fn test_from_parts_validates_identifier() {
        let now = Utc::now();
        let err = Policy::from_parts(
            "autops::policy:abcDEF1234",
            "p",
            "",
            now,
            now,
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Identifier(_)));
    }

    #[test]
    fn test_from_parts_restores_tags_with_stored_timestamps() {
        let created = Utc::now() - chrono::Duration::days(3);
        let updated = created + chrono::Duration::hours(1);
        let policy = Policy::from_parts(
            "autops::project:abcDEF1234:policy:XYZxyz7890",
            "stored",
            "rebuilt from storage",
            created,
            updated,
            vec![Tag::new("env", "prod"), Tag::new("team", "platform")],
            vec![],
        )
        .unwrap();

        assert_eq!(policy.tags().get("env").map(Tag::value), Some("prod"));
        assert_eq!(policy.tags().len(), 2);
        // Rebuilding is not a modification.
        assert_eq!(policy.timestamps().created_at, created);
        assert_eq!(policy.timestamps().updated_at, updated);
    }

    #[test]
    fn test_permission_unspecified_without_statements() {
        let policy = Policy::new(&project_identifier(), "empty", "", vec![]).unwrap();
        assert_eq!(
            policy.permission(&project_identifier(), read()),
            Effect::Unspecified
        );
    }

    #[test]
    fn test_permission_allow() {
        let policy = Policy::new(
            &project_identifier(),
            "reader",
            "",
            vec![statement(Effect::Allow)],
        )
        .unwrap();
        assert_eq!(policy.permission(&project_identifier(), read()), Effect::Allow);
        // Action outside the statement's targets.
        assert_eq!(
            policy.permission(&project_identifier(), update()),
            Effect::Unspecified
        );
    }

    #[test]
    fn test_deny_wins_regardless_of_order() {
        let allow_first = Policy::new(
            &project_identifier(),
            "p1",
            "",
            vec![statement(Effect::Allow), statement(Effect::Deny)],
        )
        .unwrap();
        let deny_first = Policy::new(
            &project_identifier(),
            "p2",
            "",
            vec![statement(Effect::Deny), statement(Effect::Allow)],
        )
        .unwrap();
        assert_eq!(
            allow_first.permission(&project_identifier(), read()),
            Effect::Deny
        );
        assert_eq!(
            deny_first.permission(&project_identifier(), read()),
            Effect::Deny
        );
    }

    #[test]
    fn test_statement_edits_flip_the_result() {
        let mut policy = Policy::new(&project_identifier(), "mutable", "", vec![]).unwrap();
        let allow = statement(Effect::Allow);
        let deny = statement(Effect::Deny);

        policy.statements_mut().append(allow.clone());
        assert_eq!(policy.permission(&project_identifier(), read()), Effect::Allow);

        policy.statements_mut().append(deny);
        assert_eq!(policy.permission(&project_identifier(), read()), Effect::Deny);

        // Removing the allow leaves the deny in force.
        assert!(policy.statements_mut().remove(&allow));
        assert_eq!(policy.permission(&project_identifier(), read()), Effect::Deny);
    }

    #[test]
    fn test_statement_construction_rejects_unspecified() {
        let err = Statement::new(Effect::Unspecified, vec![], vec![]).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidEffect(_)));
    }

    #[test]
    fn test_tags_and_rename() {
        let mut policy = Policy::new(&project_identifier(), "tagged", "", vec![]).unwrap();
        policy.tags_mut().insert(Tag::new("team", "platform"));
        assert!(policy.tags().contains_key("team"));

        policy.set_name("renamed").unwrap();
        assert_eq!(policy.name(), "renamed");
        assert!(policy.set_name("").is_err());
    }

    #[test]
    fn test_compare_policies_by_identifier() {
        let a = Policy::new(&project_identifier(), "a", "", vec![]).unwrap();
        let b = Policy::new(&project_identifier(), "b", "", vec![]).unwrap();
        assert_eq!(compare_policies(&a, &a), Ordering::Equal);
        // Freshly minted identifiers differ.
        assert_ne!(compare_policies(&a, &b), Ordering::Equal);
    }
}
