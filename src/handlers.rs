use crate::{
    AppState,
    auth::{self, AuthAdmin},
    error::{AppError, AppResult, ErrorBody},
    extract::{EntityId, Filter, ValidatedJson},
    models::{
        Achievement, AchievementFilter, AdminInfo, ApiResponse, CreateAchievementRequest,
        CreateMessageRequest, CreateProjectRequest, CreateSkillRequest, LoginRequest,
        LoginResponse, Message, MessageCreatedResponse, MessageFilter, Project, ProjectFilter,
        Skill, SkillFilter, UpdateAchievementRequest, UpdateProjectRequest, UpdateSkillRequest,
    },
    notify,
};
use axum::{Json, extract::State, http::StatusCode};

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

fn created<T>(message: &str, data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::new(message, data)))
}

fn ok<T>(message: &str, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::new(message, data))
}

// --- Public ---

/// list_projects
///
/// [Public Route] All projects, newest first, optionally filtered by
/// `category` and `featured`.
#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectFilter),
    responses(
        (status = 200, description = "Projects", body = [Project]),
        (status = 400, description = "Bad filter value", body = ErrorBody)
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Filter(filter): Filter<ProjectFilter>,
) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(state.repo.list_projects(&filter).await?))
}

/// get_project
///
/// [Public Route] A single project by id.
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = uuid::Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<Project>> {
    state
        .repo
        .get_project(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Project"))
}

/// list_skills
///
/// [Public Route] Grouped by category, strongest first within a category.
#[utoipa::path(
    get,
    path = "/api/skills",
    params(SkillFilter),
    responses((status = 200, description = "Skills", body = [Skill]))
)]
pub async fn list_skills(
    State(state): State<AppState>,
    Filter(filter): Filter<SkillFilter>,
) -> AppResult<Json<Vec<Skill>>> {
    Ok(Json(state.repo.list_skills(&filter).await?))
}

/// list_achievements
#[utoipa::path(
    get,
    path = "/api/achievements",
    params(AchievementFilter),
    responses((status = 200, description = "Achievements, most recent first", body = [Achievement]))
)]
pub async fn list_achievements(
    State(state): State<AppState>,
    Filter(filter): Filter<AchievementFilter>,
) -> AppResult<Json<Vec<Achievement>>> {
    Ok(Json(state.repo.list_achievements(&filter).await?))
}

/// create_message
///
/// [Public Route] Contact form submission. The message is persisted first;
/// the owner notification is then handed to a detached task and never
/// affects the status code.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = MessageCreatedResponse),
        (status = 400, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn create_message(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateMessageRequest>,
) -> AppResult<(StatusCode, Json<MessageCreatedResponse>)> {
    let message = state.repo.create_message(payload).await?;
    tracing::info!(message_id = %message.id, "contact message received");

    let notification = notify::dispatch(
        state.notifier.as_ref(),
        state.config.notify_timeout,
        message.clone(),
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageCreatedResponse {
            message: "Message sent successfully".to_string(),
            data: message,
            notification,
        }),
    ))
}

/// login
///
/// [Public Route] Exchanges admin credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = auth::login(&state.repo, &state.config, payload).await?;
    Ok(Json(response))
}

// --- Admin ---

/// me
///
/// [Admin Route] The identity carried by the presented token.
#[utoipa::path(
    get,
    path = "/api/admin/me",
    responses(
        (status = 200, description = "Current admin", body = AdminInfo),
        (status = 401, description = "Not authorized", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn me(admin: AuthAdmin) -> Json<AdminInfo> {
    Json(AdminInfo {
        id: admin.id,
        email: admin.email,
    })
}

#[utoipa::path(
    post,
    path = "/api/admin/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Project>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Not authorized", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProjectRequest>,
) -> AppResult<Created<Project>> {
    let project = state.repo.create_project(payload).await?;
    tracing::info!(project_id = %project.id, "project created");
    Ok(created("Project created successfully", project))
}

/// update_project
///
/// [Admin Route] Partial update; only the fields present in the body change.
#[utoipa::path(
    put,
    path = "/api/admin/projects/{id}",
    params(("id" = uuid::Uuid, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Project>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn update_project(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(payload): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<Json<ApiResponse<Project>>> {
    let project = state.repo.update_project(id, payload).await?;
    Ok(ok("Project updated successfully", project))
}

#[utoipa::path(
    delete,
    path = "/api/admin/projects/{id}",
    params(("id" = uuid::Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Deleted; returns the removed project", body = ApiResponse<Project>),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn delete_project(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<ApiResponse<Project>>> {
    let project = state.repo.delete_project(id).await?;
    tracing::info!(project_id = %project.id, "project deleted");
    Ok(ok("Project deleted successfully", project))
}

/// create_skill
///
/// [Admin Route] Fails with 400 "Skill with this name already exists" on a
/// name collision.
#[utoipa::path(
    post,
    path = "/api/admin/skills",
    request_body = CreateSkillRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Skill>),
        (status = 400, description = "Validation failed or duplicate name", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn create_skill(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSkillRequest>,
) -> AppResult<Created<Skill>> {
    let skill = state.repo.create_skill(payload).await?;
    Ok(created("Skill created successfully", skill))
}

#[utoipa::path(
    put,
    path = "/api/admin/skills/{id}",
    params(("id" = uuid::Uuid, Path, description = "Skill id")),
    request_body = UpdateSkillRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Skill>),
        (status = 400, description = "Validation failed or duplicate name", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn update_skill(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(payload): ValidatedJson<UpdateSkillRequest>,
) -> AppResult<Json<ApiResponse<Skill>>> {
    let skill = state.repo.update_skill(id, payload).await?;
    Ok(ok("Skill updated successfully", skill))
}

#[utoipa::path(
    delete,
    path = "/api/admin/skills/{id}",
    params(("id" = uuid::Uuid, Path, description = "Skill id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Skill>),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn delete_skill(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<ApiResponse<Skill>>> {
    let skill = state.repo.delete_skill(id).await?;
    Ok(ok("Skill deleted successfully", skill))
}

#[utoipa::path(
    post,
    path = "/api/admin/achievements",
    request_body = CreateAchievementRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Achievement>),
        (status = 400, description = "Validation failed", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn create_achievement(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAchievementRequest>,
) -> AppResult<Created<Achievement>> {
    let achievement = state.repo.create_achievement(payload).await?;
    Ok(created("Achievement created successfully", achievement))
}

#[utoipa::path(
    put,
    path = "/api/admin/achievements/{id}",
    params(("id" = uuid::Uuid, Path, description = "Achievement id")),
    request_body = UpdateAchievementRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Achievement>),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn update_achievement(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(payload): ValidatedJson<UpdateAchievementRequest>,
) -> AppResult<Json<ApiResponse<Achievement>>> {
    let achievement = state.repo.update_achievement(id, payload).await?;
    Ok(ok("Achievement updated successfully", achievement))
}

#[utoipa::path(
    delete,
    path = "/api/admin/achievements/{id}",
    params(("id" = uuid::Uuid, Path, description = "Achievement id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Achievement>),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn delete_achievement(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<ApiResponse<Achievement>>> {
    let achievement = state.repo.delete_achievement(id).await?;
    Ok(ok("Achievement deleted successfully", achievement))
}

/// list_messages
///
/// [Admin Route] Contact messages, newest first; `isRead` narrows the list.
#[utoipa::path(
    get,
    path = "/api/admin/messages",
    params(MessageFilter),
    responses(
        (status = 200, description = "Messages", body = [Message]),
        (status = 401, description = "Not authorized", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Filter(filter): Filter<MessageFilter>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.repo.list_messages(&filter).await?))
}

/// mark_message_read
///
/// [Admin Route] Sets `isRead` to true. Idempotent.
#[utoipa::path(
    put,
    path = "/api/admin/messages/{id}",
    params(("id" = uuid::Uuid, Path, description = "Message id")),
    responses(
        (status = 200, description = "Marked as read", body = ApiResponse<Message>),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn mark_message_read(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<ApiResponse<Message>>> {
    let message = state.repo.mark_message_read(id).await?;
    Ok(ok("Message marked as read", message))
}

#[utoipa::path(
    delete,
    path = "/api/admin/messages/{id}",
    params(("id" = uuid::Uuid, Path, description = "Message id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<Message>),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn delete_message(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<ApiResponse<Message>>> {
    let message = state.repo.delete_message(id).await?;
    Ok(ok("Message deleted successfully", message))
}
