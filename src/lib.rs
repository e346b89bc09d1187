use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod repository;

// Routing split by access level (Public, Admin).
pub mod routes;
use auth::AuthAdmin;
use routes::{admin, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use notify::{MockNotifier, NotifierState, SmtpNotifier};
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and wire schema into the OpenAPI
/// document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_projects, handlers::get_project, handlers::list_skills,
        handlers::list_achievements, handlers::create_message, handlers::login,
        handlers::me, handlers::create_project, handlers::update_project,
        handlers::delete_project, handlers::create_skill, handlers::update_skill,
        handlers::delete_skill, handlers::create_achievement, handlers::update_achievement,
        handlers::delete_achievement, handlers::list_messages, handlers::mark_message_read,
        handlers::delete_message
    ),
    components(
        schemas(
            models::Project, models::ProjectLinks, models::ProjectCategory,
            models::CreateProjectRequest, models::UpdateProjectRequest,
            models::Skill, models::SkillCategory, models::CreateSkillRequest,
            models::UpdateSkillRequest, models::Achievement, models::AchievementType,
            models::CreateAchievementRequest, models::UpdateAchievementRequest,
            models::Message, models::CreateMessageRequest, models::MessageCreatedResponse,
            models::NotificationStatus, models::LoginRequest, models::LoginResponse,
            models::AdminInfo, error::ErrorBody,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "portfolio", description = "Portfolio content and admin API")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// AppState
///
/// The single immutable container shared by every request: the store, the
/// optional owner notifier, and the loaded configuration. Built once in `main`
/// (or a test) and handed to `create_router`.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    /// `None` when SMTP is not configured; messages are then stored without notification.
    pub notifier: Option<NotifierState>,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// The Access Gate. Extracting `AuthAdmin` either succeeds or rejects with a
/// 401, so a request without a valid admin token never reaches the handler.
async fn auth_middleware(_admin: AuthAdmin, request: Request, next: Next) -> Response {
    next.run(request).await
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = config
        .client_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

/// create_router
///
/// Assembles the routing tree, scopes the Access Gate to the admin router,
/// and wraps everything in the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one request, carrying the generated `x-request-id` so every log
/// line of the request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
