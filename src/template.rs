//! Infrastructure templates: versioned automation sources owned by a project.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{
    Descriptor, ExecutionLog, Identified, Named, Status, Tagged, Timestamps, VersionedSource,
};
use crate::identifier::{Identifier, ResourceType};
use crate::tags::{Tag, TagSet};
use crate::Result;

/// Errors from template construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("cannot parse '{0}' as a template type")]
    InvalidTemplateType(String),
}

/// The automation tool a template targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Terraform,
    Ansible,
    Packer,
    OpenTofu,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terraform => "terraform",
            Self::Ansible => "ansible",
            Self::Packer => "packer",
            Self::OpenTofu => "opentofu",
        }
    }

    pub fn parse(token: &str) -> std::result::Result<Self, TemplateError> {
        match token.to_ascii_lowercase().as_str() {
            "terraform" => Ok(Self::Terraform),
            "ansible" => Ok(Self::Ansible),
            "packer" => Ok(Self::Packer),
            "opentofu" => Ok(Self::OpenTofu),
            _ => Err(TemplateError::InvalidTemplateType(token.to_owned())),
        }
    }
}

/// A versioned automation template under a project.
#[derive(Debug, Clone)]
pub struct Template {
    identifier: Identifier,
    descriptor: Descriptor,
    timestamps: Timestamps,
    tags: TagSet,
    status: Status,
    log: Option<ExecutionLog>,
    source: VersionedSource,
    template_type: TemplateType,
}

impl Template {
    /// Create a template under `project` with a fresh identifier, starting
    /// at version 1.
    pub fn new(
        project: &Identifier,
        name: &str,
        description: &str,
        status: Status,
        template_type: TemplateType,
        source_path: &str,
    ) -> Result<Self> {
        let identifier = project.child(ResourceType::Template)?;
        let now = Utc::now();
        Self::from_parts(
            identifier.as_str(),
            name,
            description,
            status,
            template_type,
            source_path,
            1,
            Vec::new(),
            now,
            now,
        )
    }

    /// Reconstruct a template from stored plain data. The stored timestamps
    /// are kept verbatim; rebuilding is not a modification.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        identifier: &str,
        name: &str,
        description: &str,
        status: Status,
        template_type: TemplateType,
        source_path: &str,
        version: u32,
        tags: Vec<Tag>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            identifier: Identifier::parse(identifier)?,
            descriptor: Descriptor::new(name, description)?,
            timestamps: Timestamps::from_parts(created_at, updated_at),
            tags: TagSet::from_tags(tags),
            status,
            log: None,
            source: VersionedSource::new(source_path, version)?,
            template_type,
        })
    }

    pub fn template_type(&self) -> TemplateType {
        self.template_type
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.timestamps.touch();
    }

    pub fn execution_log(&self) -> Option<&ExecutionLog> {
        self.log.as_ref()
    }

    pub fn set_execution_log(&mut self, log: ExecutionLog) {
        self.log = Some(log);
    }

    pub fn source(&self) -> &VersionedSource {
        &self.source
    }

    /// Point the template at a new source, bumping the version.
    pub fn update_source(&mut self, new_source_path: &str) -> Result<()> {
        self.source = self.source.fork_with_new_version(new_source_path)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Identified for Template {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl Named for Template {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl Tagged for Template {
    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut TagSet {
        self.timestamps.touch();
        &mut self.tags
    }
}

/// Templates are equal when their identifiers are equal.
pub fn compare_templates(a: &Template, b: &Template) -> Ordering {
    a.identifier.cmp(&b.identifier)
}
