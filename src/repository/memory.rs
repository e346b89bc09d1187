use super::Repository;
use crate::error::{AppError, AppResult};
use crate::models::{
    Achievement, AchievementFilter, AdminIdentity, CreateAchievementRequest, CreateMessageRequest,
    CreateProjectRequest, CreateSkillRequest, Message, MessageFilter, Project, ProjectFilter, Skill,
    SkillFilter, UpdateAchievementRequest, UpdateProjectRequest, UpdateSkillRequest,
};
use async_trait::async_trait;
use std::cmp::Reverse;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

#[derive(Default)]
struct Collections {
    admins: Vec<AdminIdentity>,
    projects: Vec<Project>,
    skills: Vec<Skill>,
    achievements: Vec<Achievement>,
    messages: Vec<Message>,
}

/// MemoryRepository
///
/// An in-process implementation of `Repository`. Used when running locally
/// without `DATABASE_URL`, and by the test suite. Each operation holds the
/// lock for its whole read-merge-write, which gives the same per-entity
/// atomicity the Postgres store provides. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRepository {
    inner: RwLock<Collections>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: Uuid, id_of: impl Fn(&T) -> Uuid) -> Option<T> {
    let index = items.iter().position(|item| id_of(item) == id)?;
    Some(items.remove(index))
}

// Case-insensitive, matching the `LOWER(name)` unique index in Postgres.
fn name_taken(skills: &[Skill], name: &str, except: Option<Uuid>) -> bool {
    let name = name.to_lowercase();
    skills
        .iter()
        .any(|s| Some(s.id) != except && s.name.to_lowercase() == name)
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<AdminIdentity>> {
        let email = email.to_lowercase();
        let data = self.inner.read().await;
        Ok(data.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn insert_admin(&self, mut admin: AdminIdentity) -> AppResult<AdminIdentity> {
        let mut data = self.inner.write().await;
        admin.email = admin.email.to_lowercase();
        if data.admins.iter().any(|a| a.email == admin.email) {
            return Err(AppError::Internal(format!(
                "admin {} already exists",
                admin.email
            )));
        }
        data.admins.push(admin.clone());
        Ok(admin)
    }

    // --- Projects ---

    async fn list_projects(&self, filter: &ProjectFilter) -> AppResult<Vec<Project>> {
        let data = self.inner.read().await;
        let mut projects: Vec<Project> = data
            .projects
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        projects.sort_by_key(|p| Reverse(p.created_at));
        Ok(projects)
    }

    async fn get_project(&self, id: Uuid) -> AppResult<Option<Project>> {
        let data = self.inner.read().await;
        Ok(data.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn create_project(&self, req: CreateProjectRequest) -> AppResult<Project> {
        req.validate()?;
        let project = Project::new(req);
        project.validate()?;

        let mut data = self.inner.write().await;
        data.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: Uuid, req: UpdateProjectRequest) -> AppResult<Project> {
        let mut data = self.inner.write().await;
        let stored = data
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound("Project"))?;

        let mut merged = stored.clone();
        merged.apply(req);
        merged.validate()?;
        *stored = merged.clone();
        Ok(merged)
    }

    async fn delete_project(&self, id: Uuid) -> AppResult<Project> {
        let mut data = self.inner.write().await;
        remove_by_id(&mut data.projects, id, |p| p.id).ok_or(AppError::NotFound("Project"))
    }

    // --- Skills ---

    async fn list_skills(&self, filter: &SkillFilter) -> AppResult<Vec<Skill>> {
        let data = self.inner.read().await;
        let mut skills: Vec<Skill> = data
            .skills
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        skills.sort_by(|a, b| {
            a.category
                .as_str()
                .cmp(b.category.as_str())
                .then(b.proficiency.cmp(&a.proficiency))
                // Byte order, same as `COLLATE "C"` in Postgres.
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(skills)
    }

    async fn create_skill(&self, req: CreateSkillRequest) -> AppResult<Skill> {
        req.validate()?;
        let skill = Skill::new(req);
        skill.validate()?;

        let mut data = self.inner.write().await;
        if name_taken(&data.skills, &skill.name, None) {
            return Err(AppError::DuplicateName(skill.name));
        }
        data.skills.push(skill.clone());
        Ok(skill)
    }

    async fn update_skill(&self, id: Uuid, req: UpdateSkillRequest) -> AppResult<Skill> {
        let mut data = self.inner.write().await;
        let index = data
            .skills
            .iter()
            .position(|s| s.id == id)
            .ok_or(AppError::NotFound("Skill"))?;

        let mut merged = data.skills[index].clone();
        merged.apply(req);
        merged.validate()?;
        if name_taken(&data.skills, &merged.name, Some(id)) {
            return Err(AppError::DuplicateName(merged.name));
        }
        data.skills[index] = merged.clone();
        Ok(merged)
    }

    async fn delete_skill(&self, id: Uuid) -> AppResult<Skill> {
        let mut data = self.inner.write().await;
        remove_by_id(&mut data.skills, id, |s| s.id).ok_or(AppError::NotFound("Skill"))
    }

    // --- Achievements ---

    async fn list_achievements(&self, filter: &AchievementFilter) -> AppResult<Vec<Achievement>> {
        let data = self.inner.read().await;
        let mut achievements: Vec<Achievement> = data
            .achievements
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        achievements.sort_by_key(|a| Reverse((a.date, a.created_at)));
        Ok(achievements)
    }

    async fn create_achievement(&self, req: CreateAchievementRequest) -> AppResult<Achievement> {
        req.validate()?;
        let achievement = Achievement::new(req);
        achievement.validate()?;

        let mut data = self.inner.write().await;
        data.achievements.push(achievement.clone());
        Ok(achievement)
    }

    async fn update_achievement(
        &self,
        id: Uuid,
        req: UpdateAchievementRequest,
    ) -> AppResult<Achievement> {
        let mut data = self.inner.write().await;
        let stored = data
            .achievements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound("Achievement"))?;

        let mut merged = stored.clone();
        merged.apply(req);
        merged.validate()?;
        *stored = merged.clone();
        Ok(merged)
    }

    async fn delete_achievement(&self, id: Uuid) -> AppResult<Achievement> {
        let mut data = self.inner.write().await;
        remove_by_id(&mut data.achievements, id, |a| a.id)
            .ok_or(AppError::NotFound("Achievement"))
    }

    // --- Messages ---

    async fn list_messages(&self, filter: &MessageFilter) -> AppResult<Vec<Message>> {
        let data = self.inner.read().await;
        let mut messages: Vec<Message> = data
            .messages
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        messages.sort_by_key(|m| Reverse(m.created_at));
        Ok(messages)
    }

    async fn create_message(&self, req: CreateMessageRequest) -> AppResult<Message> {
        req.validate()?;
        let message = Message::new(req);

        let mut data = self.inner.write().await;
        data.messages.push(message.clone());
        Ok(message)
    }

    async fn mark_message_read(&self, id: Uuid) -> AppResult<Message> {
        let mut data = self.inner.write().await;
        let stored = data
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AppError::NotFound("Message"))?;
        stored.is_read = true;
        Ok(stored.clone())
    }

    async fn delete_message(&self, id: Uuid) -> AppResult<Message> {
        let mut data = self.inner.write().await;
        remove_by_id(&mut data.messages, id, |m| m.id).ok_or(AppError::NotFound("Message"))
    }
}
