//! Workflows: versioned, stateful automation sequences owned by a project.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::entity::{
    Descriptor, ExecutionLog, Identified, Named, Status, Tagged, Timestamps, VersionedSource,
};
use crate::identifier::{Identifier, ResourceType};
use crate::tags::{Tag, TagSet};
use crate::Result;

/// A workflow definition under a project.
#[derive(Debug, Clone)]
pub struct Workflow {
    identifier: Identifier,
    descriptor: Descriptor,
    timestamps: Timestamps,
    tags: TagSet,
    status: Status,
    log: Option<ExecutionLog>,
    source: VersionedSource,
}

impl Workflow {
    /// Create a workflow under `project` with a fresh identifier, starting
    /// at version 1.
    pub fn new(
        project: &Identifier,
        name: &str,
        description: &str,
        status: Status,
        source_path: &str,
    ) -> Result<Self> {
        let identifier = project.child(ResourceType::Workflow)?;
        let now = Utc::now();
        Self::from_parts(
            identifier.as_str(),
            name,
            description,
            status,
            source_path,
            1,
            Vec::new(),
            now,
            now,
        )
    }

    /// Reconstruct a workflow from stored plain data. The stored timestamps
    /// are kept verbatim; rebuilding is not a modification.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        identifier: &str,
        name: &str,
        description: &str,
        status: Status,
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
        })
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

    /// Point the workflow at a new source, bumping the version.
    pub fn update_source(&mut self, new_source_path: &str) -> Result<()> {
        self.source = self.source.fork_with_new_version(new_source_path)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

impl Identified for Workflow {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl Named for Workflow {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl Tagged for Workflow {
    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut TagSet {
        self.timestamps.touch();
        &mut self.tags
    }
}

/// Workflows are equal when their identifiers are equal.
pub fn compare_workflows(a: &Workflow, b: &Workflow) -> Ordering {
    a.identifier.cmp(&b.identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Identifier {
        Identifier::parse("autops::project:abcDEF1234").unwrap()
    }

    #[test]
    fn test_new_workflow() {
        let workflow = Workflow::new(
            &project(),
            "nightly-deploy",
            "deploys to staging",
            Status::Pending,
            "/srv/workflows/deploy.yaml",
        )
        .unwrap();
        assert_eq!(workflow.identifier().resource_type(), ResourceType::Workflow);
        assert_eq!(workflow.source().version(), 1);
    }

    #[test]
    fn test_status_and_log_lifecycle() {
        let mut workflow = Workflow::new(
            &project(),
            "w",
            "",
            Status::Pending,
            "/srv/workflows/w.yaml",
        )
        .unwrap();
        workflow.set_status(Status::Running);
        assert_eq!(workflow.status(), Status::Running);
        assert!(workflow.execution_log().is_none());

        workflow
            .set_execution_log(ExecutionLog::new("https://logs.example.com/w/1").unwrap());
        assert!(workflow.execution_log().unwrap().is_remote());
    }
}
