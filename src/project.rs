//! Projects: the root aggregate grouping templates, workflows, and policies.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

use crate::collection::OrderedList;
use crate::entity::{Descriptor, Identified, Named, Tagged, Timestamps};
use crate::identifier::{Identifier, ResourceType};
use crate::policy::{compare_policies, Policy};
use crate::tags::{Tag, TagSet};
use crate::template::{compare_templates, Template};
use crate::workflow::{compare_workflows, Workflow};
use crate::Result;

/// Errors from project membership management.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    #[error("no template with identifier {0} in this project")]
    TemplateNotFound(Identifier),

    #[error("no workflow with identifier {0} in this project")]
    WorkflowNotFound(Identifier),

    #[error("no policy with identifier {0} in this project")]
    PolicyNotFound(Identifier),

    #[error("a member with identifier {0} is already present in this project")]
    DuplicateMember(Identifier),
}

/// A project: named, tagged root aggregate owning templates, workflows, and
/// policies. Members are unique by identifier.
#[derive(Debug, Clone)]
pub struct Project {
    identifier: Identifier,
    descriptor: Descriptor,
    timestamps: Timestamps,
    tags: TagSet,
    templates: OrderedList<Template>,
    workflows: OrderedList<Workflow>,
    policies: OrderedList<Policy>,
}

impl Project {
    /// Create an empty project with a fresh root identifier.
    pub fn new(name: &str, description: &str) -> Result<Self> {
        let identifier = Identifier::root(ResourceType::Project)?;
        let now = Utc::now();
        Self::from_parts(
            identifier.as_str(),
            name,
            description,
            now,
            now,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    /// Reconstruct a project from stored plain data. The stored timestamps
    /// are kept verbatim; rebuilding is not a modification.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        identifier: &str,
        name: &str,
        description: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        tags: Vec<Tag>,
        templates: Vec<Template>,
        workflows: Vec<Workflow>,
        policies: Vec<Policy>,
    ) -> Result<Self> {
        let identifier = Identifier::parse(identifier)?;
        if identifier.resource_type() != ResourceType::Project {
            return Err(crate::identifier::IdentifierError::Malformed(
                identifier.as_str().to_owned(),
            )
            .into());
        }
        Ok(Self {
            identifier,
            descriptor: Descriptor::new(name, description)?,
            timestamps: Timestamps::from_parts(created_at, updated_at),
            tags: TagSet::from_tags(tags),
            templates: OrderedList::with_items(compare_templates, templates),
            workflows: OrderedList::with_items(compare_workflows, workflows),
            policies: OrderedList::with_items(compare_policies, policies),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Templates
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_templates(&self) -> &[Template] {
        self.templates.as_slice()
    }

    pub fn get_template(&self, id: &Identifier) -> Option<&Template> {
        self.templates.select_one(|t| t.identifier() == id)
    }

    pub fn add_template(&mut self, template: Template) -> std::result::Result<(), ProjectError> {
        if self.templates.contains(&template) {
            warn!(member = %template.identifier(), "rejecting duplicate template");
            return Err(ProjectError::DuplicateMember(template.identifier().clone()));
        }
        self.templates.append(template);
        self.timestamps.touch();
        Ok(())
    }

    pub fn remove_template(&mut self, id: &Identifier) -> std::result::Result<(), ProjectError> {
        let template = self
            .get_template(id)
            .cloned()
            .ok_or_else(|| ProjectError::TemplateNotFound(id.clone()))?;
        self.templates.remove(&template);
        self.timestamps.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Workflows
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_workflows(&self) -> &[Workflow] {
        self.workflows.as_slice()
    }

    pub fn get_workflow(&self, id: &Identifier) -> Option<&Workflow> {
        self.workflows.select_one(|w| w.identifier() == id)
    }

    pub fn add_workflow(&mut self, workflow: Workflow) -> std::result::Result<(), ProjectError> {
        if self.workflows.contains(&workflow) {
            warn!(member = %workflow.identifier(), "rejecting duplicate workflow");
            return Err(ProjectError::DuplicateMember(workflow.identifier().clone()));
        }
        self.workflows.append(workflow);
        self.timestamps.touch();
        Ok(())
    }

    pub fn remove_workflow(&mut self, id: &Identifier) -> std::result::Result<(), ProjectError> {
        let workflow = self
            .get_workflow(id)
            .cloned()
            .ok_or_else(|| ProjectError::WorkflowNotFound(id.clone()))?;
        self.workflows.remove(&workflow);
        self.timestamps.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Policies
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_policies(&self) -> &[Policy] {
        self.policies.as_slice()
    }

    pub fn get_policy(&self, id: &Identifier) -> Option<&Policy> {
        self.policies.select_one(|p| p.identifier() == id)
    }

    pub fn add_policy(&mut self, policy: Policy) -> std::result::Result<(), ProjectError> {
        if self.policies.contains(&policy) {
            warn!(member = %policy.identifier(), "rejecting duplicate policy");
            return Err(ProjectError::DuplicateMember(policy.identifier().clone()));
        }
        self.policies.append(policy);
        self.timestamps.touch();
        Ok(())
    }

    pub fn remove_policy(&mut self, id: &Identifier) -> std::result::Result<(), ProjectError> {
        let policy = self
            .get_policy(id)
            .cloned()
            .ok_or_else(|| ProjectError::PolicyNotFound(id.clone()))?;
        self.policies.remove(&policy);
        self.timestamps.touch();
        Ok(())
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Identified for Project {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl Named for Project {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl Tagged for Project {
    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut TagSet {
        self.timestamps.touch();
        &mut self.tags
    }
}

/// Projects are equal when their identifiers are equal.
pub fn compare_projects(a: &Project, b: &Project) -> Ordering {
    a.identifier.cmp(&b.identifier)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
