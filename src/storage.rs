//! Storage ports consumed by the application layer.
//!
//! The core owns the contracts only: repositories receive and return domain
//! aggregates, which they rebuild from plain data through the `from_parts`
//! constructors. Concrete implementations (SQL, in-memory, ...) live
//! outside this crate. `find_all`-style listings are offset/limit paginated
//! and preserve a stable order.

use async_trait::async_trait;

use crate::identifier::Identifier;
use crate::identity::User;
use crate::policy::Policy;
use crate::project::Project;
use crate::tags::Tag;
use crate::Result;

/// Persistence port for policies, including the entity attachment relation
/// and tag-based lookup.
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    async fn create(&self, policy: &Policy) -> Result<()>;
    async fn update(&self, policy: &Policy) -> Result<()>;
    async fn delete(&self, policy_id: &Identifier) -> Result<()>;

    async fn find_by_id(&self, policy_id: &Identifier) -> Result<Option<Policy>>;
    async fn find_all(&self, offset: usize, limit: usize) -> Result<Vec<Policy>>;

    /// Policies attached to the given restricted entity.
    async fn find_by_entity(
        &self,
        entity_id: &Identifier,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Policy>>;

    async fn attach_to_entity(
        &self,
        policy_id: &Identifier,
        entity_id: &Identifier,
    ) -> Result<()>;

    async fn detach_from_entity(
        &self,
        policy_id: &Identifier,
        entity_id: &Identifier,
    ) -> Result<()>;

    /// Policies carrying every one of the given tags.
    async fn find_with_all_tags(
        &self,
        tags: &[Tag],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Policy>>;

    /// Policies carrying at least one of the given tags.
    async fn find_with_any_tags(
        &self,
        tags: &[Tag],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Policy>>;
}

/// Persistence port for user principals.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;
    async fn update(&self, user: &User) -> Result<()>;
    async fn delete(&self, user_id: &Identifier) -> Result<()>;

    async fn find_by_id(&self, user_id: &Identifier) -> Result<Option<User>>;
    async fn find_all(&self, offset: usize, limit: usize) -> Result<Vec<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Persistence port for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> Result<()>;
    async fn update(&self, project: &Project) -> Result<()>;
    async fn delete(&self, project_id: &Identifier) -> Result<()>;

    async fn find_by_id(&self, project_id: &Identifier) -> Result<Option<Project>>;
    async fn find_all(&self, offset: usize, limit: usize) -> Result<Vec<Project>>;

    /// Projects carrying every one of the given tags.
    async fn find_with_all_tags(
        &self,
        tags: &[Tag],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Project>>;

    /// Projects carrying at least one of the given tags.
    async fn find_with_any_tags(
        &self,
        tags: &[Tag],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Project>>;
}
