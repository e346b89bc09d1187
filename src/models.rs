use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Rejects text that is empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Deserializes a present field (including `null`) as `Some`, so an update
/// can tell "set to null" apart from "not sent".
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn trimmed(value: String) -> String {
    match value.trim() {
        t if t.len() == value.len() => value,
        t => t.to_string(),
    }
}

/// Current time truncated to microseconds, the resolution Postgres stores.
/// Keeps an entity returned from `create` equal to the same entity read back.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// UnknownVariant
///
/// Raised when a stored category/type column holds a value outside its enum.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// --- Closed Value Domains ---

/// ProjectCategory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum ProjectCategory {
    Web,
    Mobile,
    Data,
    PowerBI,
    Other,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Web => "Web",
            ProjectCategory::Mobile => "Mobile",
            ProjectCategory::Data => "Data",
            ProjectCategory::PowerBI => "PowerBI",
            ProjectCategory::Other => "Other",
        }
    }
}

impl TryFrom<String> for ProjectCategory {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Web" => Ok(ProjectCategory::Web),
            "Mobile" => Ok(ProjectCategory::Mobile),
            "Data" => Ok(ProjectCategory::Data),
            "PowerBI" => Ok(ProjectCategory::PowerBI),
            "Other" => Ok(ProjectCategory::Other),
            _ => Err(UnknownVariant {
                kind: "project category",
                value,
            }),
        }
    }
}

/// SkillCategory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum SkillCategory {
    Frontend,
    Backend,
    Tools,
    Data,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Tools => "Tools",
            SkillCategory::Data => "Data",
        }
    }
}

impl TryFrom<String> for SkillCategory {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Frontend" => Ok(SkillCategory::Frontend),
            "Backend" => Ok(SkillCategory::Backend),
            "Tools" => Ok(SkillCategory::Tools),
            "Data" => Ok(SkillCategory::Data),
            _ => Err(UnknownVariant {
                kind: "skill category",
                value,
            }),
        }
    }
}

/// AchievementType
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum AchievementType {
    Certificate,
    Award,
    Competition,
    Academic,
}

impl AchievementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementType::Certificate => "Certificate",
            AchievementType::Award => "Award",
            AchievementType::Competition => "Competition",
            AchievementType::Academic => "Academic",
        }
    }
}

impl TryFrom<String> for AchievementType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Certificate" => Ok(AchievementType::Certificate),
            "Award" => Ok(AchievementType::Award),
            "Competition" => Ok(AchievementType::Competition),
            "Academic" => Ok(AchievementType::Academic),
            _ => Err(UnknownVariant {
                kind: "achievement type",
                value,
            }),
        }
    }
}

// --- Core Resources (Mapped to Database) ---

/// AdminIdentity
///
/// An administrator credential from the `admins` table. Only read during login;
/// created by the out-of-band `provision-admin` binary. Deliberately neither
/// `Serialize` nor `Debug` so the hash cannot leak into a response or a log line.
#[derive(Clone, FromRow)]
pub struct AdminIdentity {
    pub id: Uuid,
    /// Stored lowercase.
    pub email: String,
    pub password_hash: String,
}

/// ProjectLinks
///
/// External links of a project. `repo` is mandatory; `demo` is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, ToSchema, FromRow, Validate)]
#[ts(export)]
pub struct ProjectLinks {
    #[sqlx(rename = "demo_url")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[sqlx(rename = "repo_url")]
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub repo: String,
}

/// Project
///
/// A portfolio project from the `projects` table. Publicly readable,
/// mutated only through the admin routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Project {
    pub id: Uuid,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub tech_stack: Vec<String>,
    #[sqlx(flatten)]
    #[validate(nested)]
    pub links: ProjectLinks,
    pub images: Vec<String>,
    #[sqlx(try_from = "String")]
    pub category: ProjectCategory,
    pub featured: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Skill
///
/// A named skill with a proficiency score in `[1, 100]`. Names are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Skill {
    pub id: Uuid,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[sqlx(try_from = "String")]
    pub category: SkillCategory,
    #[validate(range(min = 1, max = 100))]
    pub proficiency: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Achievement
///
/// A certificate, award, competition result or academic distinction.
/// `type` is a reserved word in Rust, so the field is `kind` and the column is `kind`;
/// the JSON key stays `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Achievement {
    pub id: Uuid,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub issuer: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub certificate_url: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub kind: AchievementType,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Message
///
/// A contact-form submission. Content is immutable after creation; the only
/// mutation is flipping `is_read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---
//
// Required text fields default to "" so that a missing field surfaces as a
// validation error naming the field, not as a JSON parse failure.

/// CreateProjectRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateProjectRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[validate(required, nested)]
    pub links: Option<ProjectLinks>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(required)]
    pub category: Option<ProjectCategory>,
    #[serde(default)]
    pub featured: bool,
}

/// UpdateProjectRequest
///
/// Partial update; absent fields are left untouched. `links` replaces the
/// whole links object when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub links: Option<ProjectLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// CreateSkillRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateSkillRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(required)]
    pub category: Option<SkillCategory>,
    #[validate(required, range(min = 1, max = 100))]
    pub proficiency: Option<i32>,
}

/// UpdateSkillRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateSkillRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<SkillCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100))]
    pub proficiency: Option<i32>,
}

/// CreateAchievementRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateAchievementRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub issuer: String,
    #[validate(required)]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub certificate_url: Option<String>,
    #[serde(rename = "type")]
    #[validate(required)]
    pub kind: Option<AchievementType>,
}

/// UpdateAchievementRequest
///
/// `description` and `certificateUrl` are clearable: an explicit `null`
/// removes the stored value, an absent key keeps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateAchievementRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    #[ts(optional)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    #[ts(optional)]
    pub certificate_url: Option<Option<String>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AchievementType>,
}

/// CreateMessageRequest
///
/// Contact-form payload (public).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct CreateMessageRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

/// LoginRequest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

// --- Merging Partial Updates ---
//
// Single-line text (titles, names, links) is stored trimmed, so skill name
// comparisons ignore stray whitespace.

impl ProjectLinks {
    fn normalized(self) -> Self {
        Self {
            demo: self.demo.map(trimmed).filter(|d| !d.is_empty()),
            repo: trimmed(self.repo),
        }
    }
}

impl Project {
    pub fn new(req: CreateProjectRequest) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            title: trimmed(req.title),
            description: req.description,
            tech_stack: req.tech_stack,
            links: req.links.map(ProjectLinks::normalized).unwrap_or_default(),
            images: req.images,
            category: req.category.unwrap_or(ProjectCategory::Other),
            featured: req.featured,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateProjectRequest) {
        if let Some(title) = req.title {
            self.title = trimmed(title);
        }
        if let Some(description) = req.description {
            self.description = description;
        }
        if let Some(tech_stack) = req.tech_stack {
            self.tech_stack = tech_stack;
        }
        if let Some(links) = req.links {
            self.links = links.normalized();
        }
        if let Some(images) = req.images {
            self.images = images;
        }
        if let Some(category) = req.category {
            self.category = category;
        }
        if let Some(featured) = req.featured {
            self.featured = featured;
        }
        self.updated_at = timestamp_now();
    }
}

impl Skill {
    pub fn new(req: CreateSkillRequest) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            name: trimmed(req.name),
            category: req.category.unwrap_or(SkillCategory::Tools),
            proficiency: req.proficiency.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateSkillRequest) {
        if let Some(name) = req.name {
            self.name = trimmed(name);
        }
        if let Some(category) = req.category {
            self.category = category;
        }
        if let Some(proficiency) = req.proficiency {
            self.proficiency = proficiency;
        }
        self.updated_at = timestamp_now();
    }
}

impl Achievement {
    pub fn new(req: CreateAchievementRequest) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            title: trimmed(req.title),
            issuer: trimmed(req.issuer),
            date: req.date.unwrap_or_else(|| now.date_naive()),
            description: req.description,
            certificate_url: req.certificate_url,
            kind: req.kind.unwrap_or(AchievementType::Certificate),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateAchievementRequest) {
        if let Some(title) = req.title {
            self.title = trimmed(title);
        }
        if let Some(issuer) = req.issuer {
            self.issuer = trimmed(issuer);
        }
        if let Some(date) = req.date {
            self.date = date;
        }
        if let Some(description) = req.description {
            self.description = description;
        }
        if let Some(certificate_url) = req.certificate_url {
            self.certificate_url = certificate_url;
        }
        if let Some(kind) = req.kind {
            self.kind = kind;
        }
        self.updated_at = timestamp_now();
    }
}

impl Message {
    pub fn new(req: CreateMessageRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: trimmed(req.name),
            email: trimmed(req.email),
            message: req.message,
            is_read: false,
            created_at: timestamp_now(),
        }
    }
}

// --- Query Filters ---

/// ProjectFilter
///
/// Exact-match query parameters for `GET /api/projects`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectFilter {
    pub category: Option<ProjectCategory>,
    pub featured: Option<bool>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        self.category.is_none_or(|c| project.category == c)
            && self.featured.is_none_or(|f| project.featured == f)
    }
}

/// SkillFilter
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SkillFilter {
    pub category: Option<SkillCategory>,
}

impl SkillFilter {
    pub fn matches(&self, skill: &Skill) -> bool {
        self.category.is_none_or(|c| skill.category == c)
    }
}

/// AchievementFilter
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AchievementFilter {
    #[serde(rename = "type")]
    pub kind: Option<AchievementType>,
}

impl AchievementFilter {
    pub fn matches(&self, achievement: &Achievement) -> bool {
        self.kind.is_none_or(|k| achievement.kind == k)
    }
}

/// MessageFilter
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MessageFilter {
    pub is_read: Option<bool>,
}

impl MessageFilter {
    pub fn matches(&self, message: &Message) -> bool {
        self.is_read.is_none_or(|r| message.is_read == r)
    }
}

// --- Response Envelopes (Output) ---

/// ApiResponse
///
/// The `{ message, data }` envelope returned by every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// NotificationStatus
///
/// What happened to the owner notification of a new contact message at the
/// time the response was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NotificationStatus {
    /// Handed to the background mailer; the outcome is only logged.
    Queued,
    /// No mailer configured.
    Disabled,
}

/// MessageCreatedResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageCreatedResponse {
    pub message: String,
    pub data: Message,
    pub notification: NotificationStatus,
}

/// AdminInfo
///
/// Public view of an administrator identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminInfo {
    pub id: Uuid,
    pub email: String,
}

/// LoginResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminInfo,
}
