use super::Repository;
use crate::error::{AppError, AppResult};
use crate::models::{
    Achievement, AchievementFilter, AdminIdentity, CreateAchievementRequest, CreateMessageRequest,
    CreateProjectRequest, CreateSkillRequest, Message, MessageFilter, Project, ProjectFilter, Skill,
    SkillFilter, UpdateAchievementRequest, UpdateProjectRequest, UpdateSkillRequest,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, postgres::PgPoolOptions, query_builder::QueryBuilder};
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

const PROJECT_COLUMNS: &str = "id, title, description, tech_stack, demo_url, repo_url, images, \
     category, featured, created_at, updated_at";
const SKILL_COLUMNS: &str = "id, name, category, proficiency, created_at, updated_at";
const ACHIEVEMENT_COLUMNS: &str =
    "id, title, issuer, date, description, certificate_url, kind, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, name, email, message, is_read, created_at";

/// connect
///
/// Opens the connection pool. The pool is lazy about individual connections
/// but this call fails fast if the first one cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// run_migrations
///
/// Applies the embedded `migrations/` directory. Already-applied versions are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn skill_name_taken(&self, name: &str, except: Option<Uuid>) -> AppResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM skills WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_admin_by_email(&self, email: &str) -> AppResult<Option<AdminIdentity>> {
        let admin = sqlx::query_as::<_, AdminIdentity>(
            "SELECT id, email, password_hash FROM admins WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn insert_admin(&self, admin: AdminIdentity) -> AppResult<AdminIdentity> {
        let inserted = sqlx::query_as::<_, AdminIdentity>(
            "INSERT INTO admins (id, email, password_hash) VALUES ($1, LOWER($2), $3) \
             RETURNING id, email, password_hash",
        )
        .bind(admin.id)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    // --- Projects ---

    /// list_projects
    ///
    /// Optional filters are appended with QueryBuilder so every value is bound,
    /// never interpolated.
    async fn list_projects(&self, filter: &ProjectFilter) -> AppResult<Vec<Project>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE 1 = 1"));

        if let Some(category) = filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category.as_str());
        }
        if let Some(featured) = filter.featured {
            builder.push(" AND featured = ");
            builder.push_bind(featured);
        }
        builder.push(" ORDER BY created_at DESC");

        let projects = builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn get_project(&self, id: Uuid) -> AppResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn create_project(&self, req: CreateProjectRequest) -> AppResult<Project> {
        req.validate()?;
        let project = Project::new(req);
        project.validate()?;

        let inserted = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects ({PROJECT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.tech_stack)
        .bind(&project.links.demo)
        .bind(&project.links.repo)
        .bind(&project.images)
        .bind(project.category.as_str())
        .bind(project.featured)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    /// update_project
    ///
    /// Read-merge-write under `SELECT ... FOR UPDATE` so two concurrent partial
    /// updates of the same row cannot interleave.
    async fn update_project(&self, id: Uuid, req: UpdateProjectRequest) -> AppResult<Project> {
        let mut tx = self.pool.begin().await?;

        let mut project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("Project"))?;

        project.apply(req);
        project.validate()?;

        let updated = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET title = $2, description = $3, tech_stack = $4, demo_url = $5, \
             repo_url = $6, images = $7, category = $8, featured = $9, updated_at = $10 \
             WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.tech_stack)
        .bind(&project.links.demo)
        .bind(&project.links.repo)
        .bind(&project.images)
        .bind(project.category.as_str())
        .bind(project.featured)
        .bind(project.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_project(&self, id: Uuid) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(&format!(
            "DELETE FROM projects WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Project"))
    }

    // --- Skills ---

    async fn list_skills(&self, filter: &SkillFilter) -> AppResult<Vec<Skill>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {SKILL_COLUMNS} FROM skills WHERE 1 = 1"));

        if let Some(category) = filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category.as_str());
        }
        builder.push(
            " ORDER BY category COLLATE \"C\" ASC, proficiency DESC, name COLLATE \"C\" ASC",
        );

        let skills = builder
            .build_query_as::<Skill>()
            .fetch_all(&self.pool)
            .await?;
        Ok(skills)
    }

    /// create_skill
    ///
    /// The existence check gives the common case a clean error; the unique
    /// index still decides races between two concurrent creates.
    async fn create_skill(&self, req: CreateSkillRequest) -> AppResult<Skill> {
        req.validate()?;
        let skill = Skill::new(req);
        skill.validate()?;

        if self.skill_name_taken(&skill.name, None).await? {
            return Err(AppError::DuplicateName(skill.name));
        }

        sqlx::query_as::<_, Skill>(&format!(
            "INSERT INTO skills ({SKILL_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SKILL_COLUMNS}"
        ))
        .bind(skill.id)
        .bind(&skill.name)
        .bind(skill.category.as_str())
        .bind(skill.proficiency)
        .bind(skill.created_at)
        .bind(skill.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_skill_write(e, &skill.name))
    }

    async fn update_skill(&self, id: Uuid, req: UpdateSkillRequest) -> AppResult<Skill> {
        let mut tx = self.pool.begin().await?;

        let mut skill = sqlx::query_as::<_, Skill>(&format!(
            "SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("Skill"))?;

        skill.apply(req);
        skill.validate()?;

        if self.skill_name_taken(&skill.name, Some(id)).await? {
            return Err(AppError::DuplicateName(skill.name));
        }

        let updated = sqlx::query_as::<_, Skill>(&format!(
            "UPDATE skills SET name = $2, category = $3, proficiency = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {SKILL_COLUMNS}"
        ))
        .bind(id)
        .bind(&skill.name)
        .bind(skill.category.as_str())
        .bind(skill.proficiency)
        .bind(skill.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_skill_write(e, &skill.name))?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_skill(&self, id: Uuid) -> AppResult<Skill> {
        sqlx::query_as::<_, Skill>(&format!(
            "DELETE FROM skills WHERE id = $1 RETURNING {SKILL_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Skill"))
    }

    // --- Achievements ---

    async fn list_achievements(&self, filter: &AchievementFilter) -> AppResult<Vec<Achievement>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE 1 = 1"
        ));

        if let Some(kind) = filter.kind {
            builder.push(" AND kind = ");
            builder.push_bind(kind.as_str());
        }
        builder.push(" ORDER BY date DESC, created_at DESC");

        let achievements = builder
            .build_query_as::<Achievement>()
            .fetch_all(&self.pool)
            .await?;
        Ok(achievements)
    }

    async fn create_achievement(&self, req: CreateAchievementRequest) -> AppResult<Achievement> {
        req.validate()?;
        let achievement = Achievement::new(req);
        achievement.validate()?;

        let inserted = sqlx::query_as::<_, Achievement>(&format!(
            "INSERT INTO achievements ({ACHIEVEMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ACHIEVEMENT_COLUMNS}"
        ))
        .bind(achievement.id)
        .bind(&achievement.title)
        .bind(&achievement.issuer)
        .bind(achievement.date)
        .bind(&achievement.description)
        .bind(&achievement.certificate_url)
        .bind(achievement.kind.as_str())
        .bind(achievement.created_at)
        .bind(achievement.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn update_achievement(
        &self,
        id: Uuid,
        req: UpdateAchievementRequest,
    ) -> AppResult<Achievement> {
        let mut tx = self.pool.begin().await?;

        let mut achievement = sqlx::query_as::<_, Achievement>(&format!(
            "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("Achievement"))?;

        achievement.apply(req);
        achievement.validate()?;

        let updated = sqlx::query_as::<_, Achievement>(&format!(
            "UPDATE achievements SET title = $2, issuer = $3, date = $4, description = $5, \
             certificate_url = $6, kind = $7, updated_at = $8 \
             WHERE id = $1 RETURNING {ACHIEVEMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&achievement.title)
        .bind(&achievement.issuer)
        .bind(achievement.date)
        .bind(&achievement.description)
        .bind(&achievement.certificate_url)
        .bind(achievement.kind.as_str())
        .bind(achievement.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_achievement(&self, id: Uuid) -> AppResult<Achievement> {
        sqlx::query_as::<_, Achievement>(&format!(
            "DELETE FROM achievements WHERE id = $1 RETURNING {ACHIEVEMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Achievement"))
    }

    // --- Messages ---

    async fn list_messages(&self, filter: &MessageFilter) -> AppResult<Vec<Message>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE 1 = 1"));

        if let Some(is_read) = filter.is_read {
            builder.push(" AND is_read = ");
            builder.push_bind(is_read);
        }
        builder.push(" ORDER BY created_at DESC");

        let messages = builder
            .build_query_as::<Message>()
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    async fn create_message(&self, req: CreateMessageRequest) -> AppResult<Message> {
        req.validate()?;
        let message = Message::new(req);

        let inserted = sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO messages ({MESSAGE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.message)
        .bind(message.is_read)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn mark_message_read(&self, id: Uuid) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(&format!(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Message"))
    }

    async fn delete_message(&self, id: Uuid) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(&format!(
            "DELETE FROM messages WHERE id = $1 RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Message"))
    }
}
