use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// Content management for the site owner. This router must be wrapped in the
/// `auth_middleware` route layer, which rejects any request without a valid
/// admin token before body extraction or a repository call happens.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/me
        // Lets the admin UI check whether a stored token is still accepted.
        .route("/api/admin/me", get(handlers::me))
        // --- Projects ---
        .route("/api/admin/projects", post(handlers::create_project))
        .route(
            "/api/admin/projects/{id}",
            put(handlers::update_project).delete(handlers::delete_project),
        )
        // --- Skills ---
        .route("/api/admin/skills", post(handlers::create_skill))
        .route(
            "/api/admin/skills/{id}",
            put(handlers::update_skill).delete(handlers::delete_skill),
        )
        // --- Achievements ---
        .route("/api/admin/achievements", post(handlers::create_achievement))
        .route(
            "/api/admin/achievements/{id}",
            put(handlers::update_achievement).delete(handlers::delete_achievement),
        )
        // --- Messages ---
        // Contact messages are private: listing lives here, not in the public router.
        .route("/api/admin/messages", get(handlers::list_messages))
        // PUT marks as read; there is no general message update.
        .route(
            "/api/admin/messages/{id}",
            put(handlers::mark_message_read).delete(handlers::delete_message),
        )
}
