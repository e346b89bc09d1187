use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a token. Reads never expose contact messages;
/// the only public writes are the contact form and the login exchange.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Does not touch the store.
        .route("/health", get(|| async { "ok" }))
        // GET /api/projects?category=...&featured=...
        .route("/api/projects", get(handlers::list_projects))
        // GET /api/projects/{id}
        .route("/api/projects/{id}", get(handlers::get_project))
        // GET /api/skills?category=...
        .route("/api/skills", get(handlers::list_skills))
        // GET /api/achievements?type=...
        .route("/api/achievements", get(handlers::list_achievements))
        // POST /api/messages
        // Contact form. Persists, then notifies the owner in the background.
        .route("/api/messages", post(handlers::create_message))
        // POST /api/admin/login
        // Lives under /admin for URL symmetry but is public by necessity.
        .route("/api/admin/login", post(handlers::login))
}
