//! Typed policy actions, grouped into one closed family per resource type.
//!
//! The canonical textual form is `<resource-type>:<ActionToken>` for parsing
//! (e.g. `project:Read`) and `<ActionToken>:<resource-type>` for the full
//! display name (e.g. `Read:project`). Adding a family for a new resource
//! type means adding an enum here plus a [`PolicyAction`] variant.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::PolicyError;
use crate::identifier::ResourceType;

// ═══════════════════════════════════════════════════════════════════════════════
// Per-resource action families
// ═══════════════════════════════════════════════════════════════════════════════

/// Actions applicable to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectAction {
    Read,
    Update,
    Delete,
    ListWorkflows,
    ListTemplates,
}

impl ProjectAction {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::ListWorkflows => "ListWorkflows",
            Self::ListTemplates => "ListTemplates",
        }
    }

    pub fn parse(token: &str) -> Result<Self, PolicyError> {
        match token {
            "Read" => Ok(Self::Read),
            "Update" => Ok(Self::Update),
            "Delete" => Ok(Self::Delete),
            "ListWorkflows" => Ok(Self::ListWorkflows),
            "ListTemplates" => Ok(Self::ListTemplates),
            _ => Err(PolicyError::UnknownAction {
                resource: ResourceType::Project.as_str(),
                token: token.to_owned(),
            }),
        }
    }
}

/// Actions applicable to a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkflowAction {
    Read,
    Update,
    Delete,
    Run,
}

impl WorkflowAction {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Run => "Run",
        }
    }

    pub fn parse(token: &str) -> Result<Self, PolicyError> {
        match token {
            "Read" => Ok(Self::Read),
            "Update" => Ok(Self::Update),
            "Delete" => Ok(Self::Delete),
            "Run" => Ok(Self::Run),
            _ => Err(PolicyError::UnknownAction {
                resource: ResourceType::Workflow.as_str(),
                token: token.to_owned(),
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PolicyAction
// ═══════════════════════════════════════════════════════════════════════════════

/// A policy action: one member of one resource-type family.
///
/// Two actions are equal only when both the resource type and the action
/// token match: `project:Read` and `workflow:Read` are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PolicyAction {
    Project(ProjectAction),
    Workflow(WorkflowAction),
}

impl PolicyAction {
    /// The resource type this action applies to.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Project(_) => ResourceType::Project,
            Self::Workflow(_) => ResourceType::Workflow,
        }
    }

    /// The bare action token, e.g. `Read`.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Project(action) => action.token(),
            Self::Workflow(action) => action.token(),
        }
    }

    /// Full display name, `<ActionToken>:<resource-type>` (e.g. `Read:project`).
    pub fn full_name(&self) -> String {
        format!("{}:{}", self.token(), self.resource_type().as_str())
    }

    /// Parse the canonical form `<resource-type>:<ActionToken>`.
    ///
    /// Fails with a distinct error for a missing separator, an unregistered
    /// resource type, or an unknown token within a known family.
    pub fn parse(s: &str) -> Result<Self, PolicyError> {
        let (resource, token) = s
            .split_once(':')
            .ok_or_else(|| PolicyError::InvalidActionFormat(s.to_owned()))?;
        match resource {
            "project" => Ok(Self::Project(ProjectAction::parse(token)?)),
            "workflow" => Ok(Self::Workflow(WorkflowAction::parse(token)?)),
            _ => Err(PolicyError::UnknownActionResource(resource.to_owned())),
        }
    }
}

impl fmt::Display for PolicyAction {
    /// Canonical parse form, `<resource-type>:<ActionToken>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type().as_str(), self.token())
    }
}

impl FromStr for PolicyAction {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PolicyAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PolicyAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PolicyAction::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Comparator for [`crate::collection::OrderedList`] elements.
pub fn compare_actions(a: &PolicyAction, b: &PolicyAction) -> Ordering {
    a.cmp(b)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_actions() {
        for (text, action) in [
            ("project:Read", ProjectAction::Read),
            ("project:Update", ProjectAction::Update),
            ("project:Delete", ProjectAction::Delete),
            ("project:ListWorkflows", ProjectAction::ListWorkflows),
            ("project:ListTemplates", ProjectAction::ListTemplates),
        ] {
            assert_eq!(PolicyAction::parse(text), Ok(PolicyAction::Project(action)));
        }
    }

    #[test]
    fn test_parse_workflow_actions() {
        for (text, action) in [
            ("workflow:Read", WorkflowAction::Read),
            ("workflow:Update", WorkflowAction::Update),
            ("workflow:Delete", WorkflowAction::Delete),
            ("workflow:Run", WorkflowAction::Run),
        ] {
            assert_eq!(
                PolicyAction::parse(text),
                Ok(PolicyAction::Workflow(action))
            );
        }
    }

    #[test]
    fn test_parse_error_kinds() {
        assert_eq!(
            PolicyAction::parse("Read"),
            Err(PolicyError::InvalidActionFormat("Read".into()))
        );
        assert_eq!(
            PolicyAction::parse("template:Read"),
            Err(PolicyError::UnknownActionResource("template".into()))
        );
        assert_eq!(
            PolicyAction::parse("project:Run"),
            Err(PolicyError::UnknownAction {
                resource: "project",
                token: "Run".into()
            })
        );
        // Action tokens are case-sensitive.
        assert!(PolicyAction::parse("project:read").is_err());
    }

    #[test]
    fn test_full_name_and_display() {
        let action = PolicyAction::Project(ProjectAction::Read);
        assert_eq!(action.full_name(), "Read:project");
        assert_eq!(action.to_string(), "project:Read");

        let run = PolicyAction::Workflow(WorkflowAction::Run);
        assert_eq!(run.full_name(), "Run:workflow");
    }

    #[test]
    fn test_same_token_different_family_is_distinct() {
        let project_read = PolicyAction::Project(ProjectAction::Read);
        let workflow_read = PolicyAction::Workflow(WorkflowAction::Read);
        assert_ne!(project_read, workflow_read);
        assert_ne!(
            compare_actions(&project_read, &workflow_read),
            Ordering::Equal
        );
    }

    #[test]
    fn test_serde_uses_canonical_form() {
        let action = PolicyAction::Workflow(WorkflowAction::Run);
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, "\"workflow:Run\"");
        let back: PolicyAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
