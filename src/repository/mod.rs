use crate::error::AppResult;
use crate::models::{
    Achievement, AchievementFilter, AdminIdentity, CreateAchievementRequest, CreateMessageRequest,
    CreateProjectRequest, CreateSkillRequest, Message, MessageFilter, Project, ProjectFilter, Skill,
    SkillFilter, UpdateAchievementRequest, UpdateProjectRequest, UpdateSkillRequest,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::{PostgresRepository, connect, run_migrations};

/// Repository Trait
///
/// The persistence contract behind every route. Handlers only see this trait,
/// so the Postgres store and the in-process store are interchangeable.
///
/// Every resource follows the same shape:
/// - `list_*` returns all matches in the resource's default order.
/// - `create_*` validates, assigns id and timestamps, persists.
/// - `update_*` merges the provided fields into the stored entity, re-validates
///   the result and fails with `NotFound` for an unknown id.
/// - `delete_*` removes and returns the prior state, or fails with `NotFound`.
///
/// Operations are atomic per entity only; nothing spans two collections.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Credential Store ---
    // Case-insensitive lookup used by login.
    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<AdminIdentity>>;
    // Out-of-band provisioning only. No route reaches this.
    async fn insert_admin(&self, admin: AdminIdentity) -> AppResult<AdminIdentity>;

    // --- Projects ---
    // Newest first.
    async fn list_projects(&self, filter: &ProjectFilter) -> AppResult<Vec<Project>>;
    async fn get_project(&self, id: Uuid) -> AppResult<Option<Project>>;
    async fn create_project(&self, req: CreateProjectRequest) -> AppResult<Project>;
    async fn update_project(&self, id: Uuid, req: UpdateProjectRequest) -> AppResult<Project>;
    async fn delete_project(&self, id: Uuid) -> AppResult<Project>;

    // --- Skills ---
    // Category ascending, then proficiency descending.
    async fn list_skills(&self, filter: &SkillFilter) -> AppResult<Vec<Skill>>;
    // Fails with DuplicateName when the name is taken.
    async fn create_skill(&self, req: CreateSkillRequest) -> AppResult<Skill>;
    async fn update_skill(&self, id: Uuid, req: UpdateSkillRequest) -> AppResult<Skill>;
    async fn delete_skill(&self, id: Uuid) -> AppResult<Skill>;

    // --- Achievements ---
    // Most recent `date` first.
    async fn list_achievements(&self, filter: &AchievementFilter) -> AppResult<Vec<Achievement>>;
    async fn create_achievement(&self, req: CreateAchievementRequest) -> AppResult<Achievement>;
    async fn update_achievement(
        &self,
        id: Uuid,
        req: UpdateAchievementRequest,
    ) -> AppResult<Achievement>;
    async fn delete_achievement(&self, id: Uuid) -> AppResult<Achievement>;

    // --- Messages ---
    // Newest first.
    async fn list_messages(&self, filter: &MessageFilter) -> AppResult<Vec<Message>>;
    async fn create_message(&self, req: CreateMessageRequest) -> AppResult<Message>;
    // The only mutation of a message: flips is_read to true.
    async fn mark_message_read(&self, id: Uuid) -> AppResult<Message>;
    async fn delete_message(&self, id: Uuid) -> AppResult<Message>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
